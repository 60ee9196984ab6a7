//! Distributable library for hosts consuming Sign in with Apple credentials.
//!
//! Everything lives in [`appleid_bridge_core`]; this crate re-exports it and
//! its bindings so that a single library is linked into the app.

pub use appleid_bridge_core::*;

appleid_bridge_core::uniffi_reexport_scaffolding!();
