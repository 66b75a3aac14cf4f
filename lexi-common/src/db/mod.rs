//! Database bootstrap shared by LexiLift services

pub mod init;
pub mod retry;

pub use init::*;
pub use retry::*;
