//! Storage modules: client settings, local config file

pub mod file_store;
pub mod settings;
