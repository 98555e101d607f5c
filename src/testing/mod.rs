//! Test support: seeded synthetic datasets.
//!
//! Shared by the crate's own tests and usable by bundle authors to
//! smoke-test a competition layout before shipping it.

pub mod data;
