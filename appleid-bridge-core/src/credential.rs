use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::codec::{Decoded, WireEnum};
use crate::codes::{AuthorizationErrorCode, ReportedAgeRange, ReportedUserStatus};
use crate::error::BridgeError;
use crate::name::PersonNameComponents;
use crate::scope::{Scope, ScopeFlag};
use crate::BridgeResult;

/// The fields of an Apple ID credential as handed over by the producer,
/// before any consistency check.
///
/// Turn it into a [`CredentialResult`] with [`CredentialResult::assemble`].
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, uniffi::Record)]
pub struct CredentialParts {
    /// Opaque, stable identifier of the Apple ID account for the developer team.
    pub user_id: String,
    /// Anti-forgery value echoed back unmodified from the request.
    pub state: Option<String>,
    /// Scopes the user authorized. Decides which of `email` and `full_name` may be present.
    pub scopes: Scope,
    /// Short-lived, one-time code proving authorization to the app's server.
    pub authorization_code: Option<String>,
    /// Signed JSON Web Token describing the user's identity.
    pub identity_token: Option<String>,
    /// Email shared by the user. Requires the `Email` scope.
    pub email: Option<String>,
    /// Full name shared by the user. Requires the `FullName` scope.
    pub full_name: Option<PersonNameComponents>,
    /// Whether the user is likely a real person. Unknown bytes are kept.
    pub real_user_status: ReportedUserStatus,
    /// Whether the user is a child. Unknown bytes are kept.
    pub user_age_range: ReportedAgeRange,
}

impl fmt::Debug for CredentialParts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialParts")
            .field("user_id", &self.user_id)
            .field("state", &self.state)
            .field("scopes", &self.scopes)
            .field("authorization_code", &redacted(self.authorization_code.as_ref()))
            .field("identity_token", &redacted(self.identity_token.as_ref()))
            .field("email", &redacted(self.email.as_ref()))
            .field("full_name", &redacted(self.full_name.as_ref()))
            .field("real_user_status", &self.real_user_status)
            .field("user_age_range", &self.user_age_range)
            .finish()
    }
}

const fn redacted<T>(value: Option<&T>) -> Option<&'static str> {
    match value {
        Some(_) => Some("<redacted>"),
        None => None,
    }
}

/// A successful Apple ID authorization.
///
/// Built once by [`CredentialResult::assemble`] and never modified afterwards.
/// The email and full name are only present when the matching scope is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, uniffi::Object)]
#[serde(transparent)]
pub struct CredentialResult {
    parts: CredentialParts,
}

impl CredentialResult {
    /// Checks the parts for consistency and freezes them into a credential.
    ///
    /// A scope bit that is set without its field is accepted (the provider
    /// only shares name and email on the first authorization). A field that is
    /// present without its scope bit is rejected.
    ///
    /// # Errors
    /// - [`BridgeError::MissingField`] if `user_id` is empty.
    /// - [`BridgeError::ScopeMismatch`] if `email` or `full_name` is present without its scope.
    pub fn assemble(parts: CredentialParts) -> BridgeResult<Self> {
        if parts.user_id.is_empty() {
            return Err(BridgeError::MissingField("user_id"));
        }
        if parts.email.is_some() && !parts.scopes.contains(ScopeFlag::Email) {
            return Err(BridgeError::ScopeMismatch {
                field: "email",
                scopes: parts.scopes,
            });
        }
        if parts.full_name.is_some() && !parts.scopes.contains(ScopeFlag::FullName) {
            return Err(BridgeError::ScopeMismatch {
                field: "full_name",
                scopes: parts.scopes,
            });
        }

        Ok(Self { parts })
    }

    /// Borrows the validated fields.
    #[must_use]
    pub const fn parts(&self) -> &CredentialParts {
        &self.parts
    }

    /// Gives back the validated fields.
    #[must_use]
    pub fn into_parts(self) -> CredentialParts {
        self.parts
    }
}

#[uniffi::export]
impl CredentialResult {
    /// Opaque, stable identifier of the Apple ID account.
    #[must_use]
    pub fn user_id(&self) -> String {
        self.parts.user_id.clone()
    }

    /// Anti-forgery value echoed back from the request.
    #[must_use]
    pub fn state(&self) -> Option<String> {
        self.parts.state.clone()
    }

    /// Scopes the user authorized.
    #[must_use]
    pub const fn scopes(&self) -> Scope {
        self.parts.scopes
    }

    /// Whether the user authorized `flag`.
    #[must_use]
    pub const fn has_scope(&self, flag: ScopeFlag) -> bool {
        self.parts.scopes.contains(flag)
    }

    /// One-time authorization code.
    #[must_use]
    pub fn authorization_code(&self) -> Option<String> {
        self.parts.authorization_code.clone()
    }

    /// Signed identity token.
    #[must_use]
    pub fn identity_token(&self) -> Option<String> {
        self.parts.identity_token.clone()
    }

    /// Email shared by the user.
    #[must_use]
    pub fn email(&self) -> Option<String> {
        self.parts.email.clone()
    }

    /// Full name shared by the user.
    #[must_use]
    pub fn full_name(&self) -> Option<PersonNameComponents> {
        self.parts.full_name.clone()
    }

    /// Whether the user is likely a real person.
    #[must_use]
    pub const fn real_user_status(&self) -> ReportedUserStatus {
        self.parts.real_user_status
    }

    /// Whether the user is a child.
    #[must_use]
    pub const fn user_age_range(&self) -> ReportedAgeRange {
        self.parts.user_age_range
    }

    /// Serializes the credential to JSON for hosts that cross the boundary as text.
    ///
    /// # Errors
    /// Returns [`BridgeError::SerializationError`] if serialization fails.
    pub fn to_json(&self) -> Result<String, BridgeError> {
        serde_json::to_string(&self.parts)
            .map_err(|e| BridgeError::SerializationError(e.to_string()))
    }
}

/// Builds a [`CredentialResult`] from foreign code.
///
/// # Errors
/// See [`CredentialResult::assemble`].
#[uniffi::export]
pub fn assemble_credential(
    parts: CredentialParts,
) -> Result<Arc<CredentialResult>, BridgeError> {
    CredentialResult::assemble(parts).map(Arc::new)
}

/// A failed authorization. Carries the error code and nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, uniffi::Object)]
pub struct CredentialFailure {
    code: Decoded<AuthorizationErrorCode, i16>,
}

impl CredentialFailure {
    /// A failure with a known code.
    #[must_use]
    pub const fn from_error(code: AuthorizationErrorCode) -> Self {
        Self {
            code: Decoded::Known(code),
        }
    }

    /// A failure read from its raw wire value. Unknown values are kept.
    #[must_use]
    pub fn from_raw(raw: i16) -> Self {
        Self {
            code: AuthorizationErrorCode::decode(raw),
        }
    }

    /// The decoded error code.
    #[must_use]
    pub const fn code(&self) -> Decoded<AuthorizationErrorCode, i16> {
        self.code
    }
}

#[uniffi::export]
impl CredentialFailure {
    /// The error code, or `None` if the raw value is not one this bridge knows.
    #[must_use]
    pub fn error_code(&self) -> Option<AuthorizationErrorCode> {
        self.code.known()
    }

    /// The error code exactly as it was on the wire.
    #[must_use]
    pub fn raw_code(&self) -> i16 {
        match self.code {
            Decoded::Known(code) => code.encode(),
            Decoded::Unrecognized(raw) => raw,
        }
    }

    /// Whether the raw code is outside the known table.
    #[must_use]
    pub const fn is_unrecognized(&self) -> bool {
        self.code.is_unrecognized()
    }

    /// Whether the user canceled the attempt.
    #[must_use]
    pub fn is_canceled(&self) -> bool {
        self.code == Decoded::Known(AuthorizationErrorCode::Canceled)
    }
}

impl fmt::Display for CredentialFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Decoded::Known(code) => write!(f, "{code} ({})", code.encode()),
            Decoded::Unrecognized(raw) => write!(f, "unrecognized ({raw})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codes::{UserAgeRange, UserDetectionStatus};
    use crate::name::NameFields;

    fn parts(scopes: Scope) -> CredentialParts {
        CredentialParts {
            user_id: "000123.abc".to_string(),
            state: None,
            scopes,
            authorization_code: None,
            identity_token: None,
            email: None,
            full_name: None,
            real_user_status: UserDetectionStatus::Unknown.into(),
            user_age_range: UserAgeRange::NotAvailable.into(),
        }
    }

    fn ann_lee() -> PersonNameComponents {
        PersonNameComponents::new(
            NameFields {
                given_name: Some("Ann".to_string()),
                family_name: Some("Lee".to_string()),
                ..NameFields::default()
            },
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_email_with_email_scope_is_accepted() {
        let credential = CredentialResult::assemble(CredentialParts {
            email: Some("a@b.com".to_string()),
            ..parts(Scope::EMAIL)
        })
        .unwrap();

        assert_eq!(credential.email().as_deref(), Some("a@b.com"));
        assert!(credential.full_name().is_none());
    }

    #[test]
    fn test_email_without_scope_is_rejected() {
        let err = CredentialResult::assemble(CredentialParts {
            email: Some("a@b.com".to_string()),
            ..parts(Scope::NONE)
        })
        .unwrap_err();

        assert!(
            matches!(err, BridgeError::ScopeMismatch { field: "email", .. }),
            "{err}"
        );
    }

    #[test]
    fn test_full_name_without_scope_is_rejected() {
        let err = CredentialResult::assemble(CredentialParts {
            full_name: Some(ann_lee()),
            ..parts(Scope::EMAIL)
        })
        .unwrap_err();

        assert!(
            matches!(err, BridgeError::ScopeMismatch { field: "full_name", .. }),
            "{err}"
        );
    }

    #[test]
    fn test_reserved_scope_bits_do_not_authorize_fields() {
        let err = CredentialResult::assemble(CredentialParts {
            email: Some("a@b.com".to_string()),
            ..parts(Scope::from_bits(0x80))
        })
        .unwrap_err();

        assert!(matches!(err, BridgeError::ScopeMismatch { .. }));
    }

    #[test]
    fn test_scope_without_field_is_accepted() {
        let credential =
            CredentialResult::assemble(parts(Scope::EMAIL | Scope::FULL_NAME)).unwrap();
        assert!(credential.has_scope(ScopeFlag::Email));
        assert!(credential.email().is_none());
    }

    #[test]
    fn test_empty_user_id_is_rejected() {
        let err = CredentialResult::assemble(CredentialParts {
            user_id: String::new(),
            ..parts(Scope::NONE)
        })
        .unwrap_err();

        assert!(matches!(err, BridgeError::MissingField("user_id")));
    }

    #[test]
    fn test_end_to_end_read_back() {
        let credential = CredentialResult::assemble(CredentialParts {
            user_id: "user-42".to_string(),
            state: Some("xyz".to_string()),
            scopes: Scope::from_flags([ScopeFlag::Email, ScopeFlag::FullName]),
            authorization_code: Some("abc123".to_string()),
            identity_token: Some("tok".to_string()),
            email: Some("a@b.com".to_string()),
            full_name: Some(ann_lee()),
            real_user_status: UserDetectionStatus::LikelyReal.into(),
            user_age_range: UserAgeRange::NotChild.into(),
        })
        .unwrap();

        assert_eq!(credential.user_id(), "user-42");
        assert!(credential.scopes().contains(ScopeFlag::Email));
        assert_eq!(
            credential.full_name().unwrap().given_name(),
            Some("Ann")
        );
        assert_eq!(credential.state().as_deref(), Some("xyz"));
        assert_eq!(credential.authorization_code().as_deref(), Some("abc123"));
        assert_eq!(credential.identity_token().as_deref(), Some("tok"));
        assert_eq!(credential.real_user_status().known(), Some(UserDetectionStatus::LikelyReal));
        assert_eq!(credential.user_age_range().known(), Some(UserAgeRange::NotChild));
    }

    #[test]
    fn test_debug_output_redacts_secrets() {
        let credential = CredentialResult::assemble(CredentialParts {
            authorization_code: Some("abc123".to_string()),
            identity_token: Some("eyJhbGciOi".to_string()),
            email: Some("a@b.com".to_string()),
            ..parts(Scope::EMAIL)
        })
        .unwrap();

        let debug = format!("{credential:?}");
        assert!(debug.contains("000123.abc"));
        assert!(!debug.contains("abc123"));
        assert!(!debug.contains("eyJhbGciOi"));
        assert!(!debug.contains("a@b.com"));
    }

    #[test]
    fn test_to_json() {
        let credential = CredentialResult::assemble(CredentialParts {
            full_name: Some(ann_lee()),
            ..parts(Scope::FULL_NAME)
        })
        .unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&credential.to_json().unwrap()).unwrap();
        assert_eq!(value["user_id"], "000123.abc");
        assert_eq!(value["scopes"], 1);
        assert_eq!(value["full_name"]["family_name"], "Lee");
        assert_eq!(value["real_user_status"], "unknown");
        assert_eq!(value["user_age_range"], "not_available");
    }

    #[test]
    fn test_failure_from_error() {
        let failure = CredentialFailure::from_error(AuthorizationErrorCode::Canceled);
        assert_eq!(failure.code(), Decoded::Known(AuthorizationErrorCode::Canceled));
        assert_eq!(failure.error_code(), Some(AuthorizationErrorCode::Canceled));
        assert_eq!(failure.raw_code(), 1001);
        assert!(failure.is_canceled());
        assert_eq!(failure.to_string(), "canceled (1001)");
    }

    #[test]
    fn test_failure_from_unrecognized_raw() {
        let failure = CredentialFailure::from_raw(1042);
        assert!(failure.is_unrecognized());
        assert_eq!(failure.error_code(), None);
        assert_eq!(failure.raw_code(), 1042);
        assert!(!failure.is_canceled());
        assert_eq!(failure.to_string(), "unrecognized (1042)");
    }
}
