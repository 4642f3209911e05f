// SPDX-License-Identifier: MIT

pub mod registry;
mod telegram;
mod viber;

pub use registry::MessengerRegistry;
pub use telegram::Telegram;
pub use viber::Viber;
