// SPDX-License-Identifier: MIT

pub mod condition;
pub mod config;
pub mod messengers;
pub mod scheduler;
pub mod server;
pub mod tasks;
pub mod weather;
