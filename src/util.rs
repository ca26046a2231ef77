//! Common utilities.

pub mod fixedupdate;
