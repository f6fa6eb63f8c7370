pub mod account;
pub mod config;
pub mod gui;
pub mod logger;
pub mod services;
pub mod session;
pub mod ui;
pub mod validate;
pub mod wizard;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
