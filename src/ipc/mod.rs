//! IPC (Inter-Process Communication) Module
//!
//! Browser native messaging: JSON messages in length-prefixed frames over the
//! host process's stdin/stdout.

pub mod codec;
pub mod messages;

pub use codec::{encode_message, read_message, write_message, MAX_INBOUND_MESSAGE};
pub use messages::*;
