//! cloudkit_core - pure types and functions shared by the cloudkit helpers.
//!
//! Nothing in this crate performs I/O. The AWS-backed implementations of the
//! traits defined here live in the `cloudkit` crate.

pub mod args;
pub mod http;
pub mod notify;
pub mod params;
pub mod parse;
pub mod storage;
