use std::sync::Arc;

use crate::codec::{Decoded, WireEnum};
use crate::codes::{AuthorizationErrorCode, CredentialState};
use crate::credential::{CredentialFailure, CredentialResult};

/// The outcome of one sign-in attempt: a credential or a failure, never both.
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Enum)]
pub enum SignInOutcome {
    /// The user signed in.
    SignedIn {
        /// The issued credential.
        credential: Arc<CredentialResult>,
    },
    /// The attempt failed. Cancellation by the user also ends up here.
    Failed {
        /// Why the attempt failed.
        failure: Arc<CredentialFailure>,
    },
}

impl SignInOutcome {
    /// Wraps a failure code as it was received from the native side.
    #[must_use]
    pub fn from_raw_failure(raw: i16) -> Self {
        Self::Failed {
            failure: Arc::new(CredentialFailure::from_raw(raw)),
        }
    }

    /// Wraps a known failure code.
    #[must_use]
    pub fn from_error(code: AuthorizationErrorCode) -> Self {
        Self::Failed {
            failure: Arc::new(CredentialFailure::from_error(code)),
        }
    }

    /// The credential, if the user signed in.
    #[must_use]
    pub fn credential(&self) -> Option<&CredentialResult> {
        match self {
            Self::SignedIn { credential } => Some(credential),
            Self::Failed { .. } => None,
        }
    }

    /// The failure, if the attempt failed.
    #[must_use]
    pub fn failure(&self) -> Option<&CredentialFailure> {
        match self {
            Self::SignedIn { .. } => None,
            Self::Failed { failure } => Some(failure),
        }
    }

    /// Converts into a `Result`.
    ///
    /// # Errors
    /// Returns the failure if the attempt failed.
    pub fn into_result(self) -> Result<Arc<CredentialResult>, Arc<CredentialFailure>> {
        match self {
            Self::SignedIn { credential } => Ok(credential),
            Self::Failed { failure } => Err(failure),
        }
    }
}

impl From<CredentialResult> for SignInOutcome {
    fn from(credential: CredentialResult) -> Self {
        Self::SignedIn {
            credential: Arc::new(credential),
        }
    }
}

impl From<CredentialFailure> for SignInOutcome {
    fn from(failure: CredentialFailure) -> Self {
        Self::Failed {
            failure: Arc::new(failure),
        }
    }
}

/// The outcome of re-validating a previously issued credential.
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Enum)]
pub enum CredentialStateOutcome {
    /// The check ran and reported a state. Never [`CredentialState::PluginError`].
    State {
        /// The reported state.
        state: CredentialState,
    },
    /// The native check itself failed.
    PluginError {
        /// Description of the native failure, if one was given.
        description: Option<String>,
    },
    /// The native side reported a state this bridge does not know.
    Unrecognized {
        /// The raw state byte.
        raw: u8,
    },
}

impl CredentialStateOutcome {
    /// Interprets the raw state byte and optional error description sent by
    /// the native check.
    ///
    /// The description is only kept for the `PluginError` sentinel.
    #[must_use]
    pub fn from_raw(raw: u8, description: Option<String>) -> Self {
        match CredentialState::decode(raw) {
            Decoded::Known(CredentialState::PluginError) => Self::PluginError { description },
            Decoded::Known(state) => Self::State { state },
            Decoded::Unrecognized(raw) => Self::Unrecognized { raw },
        }
    }

    /// The state, if the check produced a real one.
    #[must_use]
    pub const fn state(&self) -> Option<CredentialState> {
        match self {
            Self::State { state } => Some(*state),
            Self::PluginError { .. } | Self::Unrecognized { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_canceled_failure_has_no_credential() {
        let outcome = SignInOutcome::from_error(AuthorizationErrorCode::Canceled);

        assert!(outcome.credential().is_none());
        let failure = outcome.failure().unwrap();
        assert_eq!(failure.code(), Decoded::Known(AuthorizationErrorCode::Canceled));
        assert!(outcome.into_result().is_err());
    }

    #[test]
    fn test_raw_failure_keeps_unknown_codes() {
        let outcome = SignInOutcome::from_raw_failure(-7);
        let failure = outcome.failure().unwrap();
        assert_eq!(failure.code(), Decoded::Unrecognized(-7));
    }

    #[test_case(0, CredentialState::Revoked)]
    #[test_case(1, CredentialState::Authorized)]
    #[test_case(2, CredentialState::NotFound)]
    #[test_case(3, CredentialState::Transferred)]
    fn test_state_outcome_real_states(raw: u8, expected: CredentialState) {
        let outcome = CredentialStateOutcome::from_raw(raw, None);
        assert_eq!(outcome, CredentialStateOutcome::State { state: expected });
        assert_eq!(outcome.state(), Some(expected));
    }

    #[test]
    fn test_state_outcome_plugin_error_is_not_a_state() {
        let outcome = CredentialStateOutcome::from_raw(255, Some("keychain locked".to_string()));
        assert_eq!(
            outcome,
            CredentialStateOutcome::PluginError {
                description: Some("keychain locked".to_string())
            }
        );
        assert_eq!(outcome.state(), None);
    }

    #[test]
    fn test_state_outcome_unrecognized() {
        let outcome = CredentialStateOutcome::from_raw(42, Some("ignored".to_string()));
        assert_eq!(outcome, CredentialStateOutcome::Unrecognized { raw: 42 });
        assert_eq!(outcome.state(), None);
    }
}
