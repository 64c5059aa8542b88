//! Shared message pipeline — platform-agnostic relay turn processing.
//!
//! The channel adapter maps platform events to [`InboundMessage`] and calls
//! [`Relay::handle_message`]; everything else (commands, gating, history,
//! generation, dispatch) happens here, once.

pub mod commands;
pub mod gate;
pub mod history;
pub mod process;

pub use gate::ChannelScope;
pub use process::{InboundMessage, Relay};
