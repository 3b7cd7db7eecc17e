//! Draft/commit model and the workflows built on it

pub mod dashboard;
pub mod devices;
pub mod notify;
pub mod sanitize;
pub mod session;
pub mod whitelist;
