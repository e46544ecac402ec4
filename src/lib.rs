//! GiftDesk - record-tracking backend for a device-repair/gift-request
//! workflow.
//!
//! Exposed as a library so the binaries and the integration tests can share
//! the config, database, and feature modules.

pub mod core;
pub mod features;
pub mod modules;
pub mod shared;
