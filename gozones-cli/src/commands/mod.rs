//! CLI command implementations.

pub mod config;
pub mod init;
pub mod layers;
pub mod locate;
pub mod output;
pub mod session;
