//! Blocking HTTP transport used to reach the identity server.

pub mod client;
pub mod config;
