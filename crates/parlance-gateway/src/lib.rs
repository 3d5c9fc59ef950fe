//! Parlance Gateway — HTTP/WebSocket transport for the conversational relay

pub mod server;
pub mod ws;

pub use server::{start_gateway, ServeConfig};
