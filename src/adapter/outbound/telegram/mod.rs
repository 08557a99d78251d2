//! Telegram adapters.
//!
//! - [`bot`]: Bot API command listener.
//! - [`messenger`]: Bot API delivery of notices.
//! - [`channel`]: MTProto reader for the monitored channel.
//! - [`session`]: MTProto session strings and interactive login.

pub mod bot;
pub mod channel;
pub mod command;
pub mod format;
pub mod messenger;
pub mod session;

pub use channel::MtprotoChannel;
pub use messenger::TelegramMessenger;
