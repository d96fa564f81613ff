pub mod api;
pub mod config;
pub mod date;
pub mod db;
pub mod http;
pub mod mail;
pub mod receipt;
pub mod spoiler;

pub use self::config::Config;
