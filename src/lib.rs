pub mod application;
pub mod client;
pub mod config;
pub mod domain;
pub mod http;
pub mod infrastructure;
pub mod telemetry;
pub mod ui;
