pub mod config;
pub mod init;
pub mod list;
pub mod log;
pub mod punch;
pub mod status;
pub mod watch;
