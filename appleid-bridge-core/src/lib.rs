//! Data model and wire contract for Sign in with Apple credentials that
//! cross from a native authentication provider into a host runtime.
//!
//! The native side hands over `#[repr(C)]` structs ([`ffi::RawCredential`])
//! and integer codes. This crate decodes them into owned, validated values
//! ([`CredentialResult`], [`CredentialFailure`], [`CredentialStateOutcome`])
//! and delivers them to a foreign [`SignInListener`].
#![deny(clippy::all, clippy::pedantic, clippy::nursery)]

pub mod codec;
pub use codec::{Decoded, WireEnum};

mod codes;
pub use codes::*;

mod credential;
pub use credential::*;

mod error;
pub use error::*;

pub mod ffi;

mod listener;
pub use listener::*;

pub mod logger;

mod name;
pub use name::*;

mod nonce;
pub use nonce::*;

mod outcome;
pub use outcome::*;

mod request;
pub use request::*;

mod scope;
pub use scope::*;

/// Result type for fallible bridge operations.
pub type BridgeResult<T, E = BridgeError> = std::result::Result<T, E>;

uniffi::setup_scaffolding!("appleid_bridge_core");
