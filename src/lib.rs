//! sbtv-console library
//!
//! Draft/commit editing of the iSponsorBlockTV configuration, device
//! pairing and channel whitelist search.

pub mod core;
pub mod error;
pub mod remote;
pub mod storage;
pub mod types;
pub mod ui;
pub mod utils;
