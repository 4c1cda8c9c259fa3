pub mod config;
pub mod config_struct;
pub mod properties;
