//! Storage module for uploaded documents
//!
//! Files live flat in one local directory and are served back verbatim by
//! filename.

mod local_store;

pub use local_store::LocalStore;
