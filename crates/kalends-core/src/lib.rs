//! Core types shared by every kalends crate.
//!
//! Holds configuration, route constants, the core error type and the
//! calendar domain model. Nothing in here performs I/O beyond reading
//! configuration at startup.

pub mod config;
pub mod constants;
pub mod error;
pub mod model;
pub mod util;
