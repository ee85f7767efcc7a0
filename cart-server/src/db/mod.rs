//! Database access layer

pub mod store;
