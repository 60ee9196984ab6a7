use serde::{Deserialize, Serialize};

use crate::error::BridgeError;
use crate::nonce::sha256_hex;
use crate::scope::Scope;
use crate::BridgeResult;

/// Parameters of a sign-in request sent to the native side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, uniffi::Record)]
pub struct SignInRequest {
    /// Scopes to ask the user for. The user may grant fewer.
    pub requested_scopes: Scope,
    /// Value passed to the identity provider and embedded in the identity token.
    pub nonce: Option<String>,
    /// Value returned unmodified in the resulting credential.
    pub state: Option<String>,
}

impl SignInRequest {
    /// A request for `requested_scopes` without nonce or state.
    #[must_use]
    pub const fn new(requested_scopes: Scope) -> Self {
        Self {
            requested_scopes,
            nonce: None,
            state: None,
        }
    }

    /// Sets the state echoed back in the credential.
    #[must_use]
    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    /// Sets the nonce to the SHA-256 hash of `raw_nonce`.
    ///
    /// # Errors
    /// Returns [`BridgeError::InvalidInput`] if `raw_nonce` is empty.
    pub fn with_hashed_nonce(mut self, raw_nonce: &str) -> BridgeResult<Self> {
        self.nonce = Some(sha256_hex(raw_nonce)?);
        Ok(self)
    }
}

/// Builds a [`SignInRequest`] whose nonce is the SHA-256 hash of `raw_nonce`.
///
/// # Errors
/// Returns an error if `raw_nonce` is empty.
#[uniffi::export]
pub fn sign_in_request_with_hashed_nonce(
    requested_scopes: Scope,
    raw_nonce: &str,
    state: Option<String>,
) -> Result<SignInRequest, BridgeError> {
    let request = SignInRequest {
        state,
        ..SignInRequest::new(requested_scopes)
    };
    request.with_hashed_nonce(raw_nonce)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hashed_nonce() {
        let request = SignInRequest::new(Scope::EMAIL)
            .with_state("xyz")
            .with_hashed_nonce("abc")
            .unwrap();

        assert_eq!(request.requested_scopes, Scope::EMAIL);
        assert_eq!(request.state.as_deref(), Some("xyz"));
        assert_eq!(
            request.nonce.as_deref(),
            Some("BA7816BF8F01CFEA414140DE5DAE2223B00361A396177A9CB410FF61F20015AD")
        );
    }

    #[test]
    fn test_empty_raw_nonce_is_rejected() {
        let result = sign_in_request_with_hashed_nonce(Scope::NONE, "", None);
        assert!(matches!(result, Err(BridgeError::InvalidInput { .. })));
    }
}
