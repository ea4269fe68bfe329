pub mod config;
pub mod delete;
pub mod gather;
pub mod generate;
pub mod init;
pub mod list;
pub mod new;
pub mod show;
