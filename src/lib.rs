// SPDX-License-Identifier: MIT

pub mod base;
pub mod herald;
