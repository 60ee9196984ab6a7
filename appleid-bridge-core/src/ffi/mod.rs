//! The C boundary. This module holds all of the crate's `unsafe` code.
//!
//! [`wire`] mirrors the native structs and converts them to and from owned
//! Rust values. With the `ffi` feature, [`exports`] adds the `extern "C"`
//! entry points the native side calls back into, plus the helpers that drive
//! the native start and state-check calls.

pub mod wire;
pub use wire::*;

#[cfg(feature = "ffi")]
pub mod exports;
#[cfg(feature = "ffi")]
pub use exports::*;
