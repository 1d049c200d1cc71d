pub mod config;
pub mod logging;

pub mod auth;
pub mod drive;
pub mod fetch;
pub mod http;
pub mod local_name;
pub mod select;
