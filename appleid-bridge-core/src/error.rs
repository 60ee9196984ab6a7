use thiserror::Error;

use crate::scope::Scope;

/// Error outputs from the credential bridge.
///
/// All of these describe data the producer should never have sent or input
/// the caller should never have passed. An authorization that simply failed is
/// not an error: it is a [`crate::CredentialFailure`].
#[derive(Debug, Error, uniffi::Error)]
#[uniffi(flat_error)]
pub enum BridgeError {
    /// A composite value violates its shape, e.g. a name nested more than one level deep.
    #[error("invalid_composite: {0}")]
    InvalidComposite(String),
    /// A scoped field is present although its scope bit is not set.
    #[error("scope_mismatch: `{field}` is present but scopes are `{scopes}`")]
    ScopeMismatch {
        /// Name of the offending field.
        field: &'static str,
        /// Scopes that came with the credential.
        scopes: Scope,
    },
    /// A required field is absent.
    #[error("missing_field: {0}")]
    MissingField(&'static str),
    /// A text field is not valid UTF-8.
    #[error("invalid_text: `{0}` is not valid UTF-8")]
    InvalidText(&'static str),
    /// Unexpected error serializing a value.
    #[error("serialization_error: {0}")]
    SerializationError(String),
    /// The presented input is not valid for the requested operation.
    #[error("invalid_input: {attribute}: {reason}")]
    InvalidInput {
        /// Name of the offending input.
        attribute: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}
