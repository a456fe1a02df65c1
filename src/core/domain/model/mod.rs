pub mod entity;
pub mod health_check;
pub mod host;
pub mod instance;
pub mod pool;
pub mod server_config;
pub mod service;
