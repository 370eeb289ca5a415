pub mod config;
pub mod init;
pub mod lm;
pub mod types;
