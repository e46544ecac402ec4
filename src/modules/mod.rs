//! Modules layer - infrastructure components
//!
//! Contains adapters for resources outside the database, currently only the
//! local-disk upload store.

pub mod storage;
