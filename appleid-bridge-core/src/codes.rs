use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::codec::{Decoded, WireEnum};

/// State of a previously issued Apple ID credential, as reported by a
/// re-validation check.
///
/// Encoded as a `u8`. `PluginError` (`255`) is not a credential state: it
/// reports that the native check itself could not run and must be handled as
/// an error, never as e.g. `Revoked`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    Serialize,
    Deserialize,
    uniffi::Enum,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CredentialState {
    /// The user's authorization was revoked; they should be signed out.
    Revoked,
    /// The user is authorized.
    Authorized,
    /// The user has no relationship with Sign in with Apple for this app.
    NotFound,
    /// The app moved to a different team and the user identifier must be migrated.
    Transferred,
    /// The native check failed before producing a state.
    PluginError,
}

impl CredentialState {
    /// Whether this is the bridge failure sentinel rather than a real state.
    #[must_use]
    pub const fn is_plugin_error(self) -> bool {
        matches!(self, Self::PluginError)
    }
}

impl WireEnum for CredentialState {
    type Raw = u8;

    const VARIANTS: &'static [Self] = &[
        Self::Revoked,
        Self::Authorized,
        Self::NotFound,
        Self::Transferred,
        Self::PluginError,
    ];

    fn encode(self) -> u8 {
        match self {
            Self::Revoked => 0,
            Self::Authorized => 1,
            Self::NotFound => 2,
            Self::Transferred => 3,
            Self::PluginError => 255,
        }
    }
}

/// Reason an authorization attempt failed. Encoded as an `i16`.
///
/// Negative values belong to the bridge: the request could not even be formed
/// or its result could not be interpreted. Values from `1000` up mirror the
/// identity provider's own error domain.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    Serialize,
    Deserialize,
    uniffi::Enum,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AuthorizationErrorCode {
    /// The native plugin is already processing a sign-in request.
    PluginBusy,
    /// The provider returned a credential type the bridge cannot represent.
    UnknownCredentialType,
    /// The attempt failed for an unknown reason.
    Unknown,
    /// The user canceled the attempt.
    Canceled,
    /// The request received an invalid response.
    InvalidResponse,
    /// The request was not handled.
    NotHandled,
    /// The attempt failed.
    Failed,
    /// The request is not interactive.
    NotInteractive,
    /// A public key registration matched an excluded credential.
    MatchedExcludedCredential,
    /// A credential import request failed.
    CredentialImport,
    /// A credential export request failed.
    CredentialExport,
}

impl AuthorizationErrorCode {
    /// Whether the failure originates in the bridge (negative codes).
    #[must_use]
    pub fn is_bridge_error(self) -> bool {
        self.encode() < 0
    }

    /// Whether the failure was reported by the identity provider (codes `>= 1000`).
    #[must_use]
    pub fn is_provider_error(self) -> bool {
        self.encode() >= 1000
    }
}

impl WireEnum for AuthorizationErrorCode {
    type Raw = i16;

    const VARIANTS: &'static [Self] = &[
        Self::PluginBusy,
        Self::UnknownCredentialType,
        Self::Unknown,
        Self::Canceled,
        Self::InvalidResponse,
        Self::NotHandled,
        Self::Failed,
        Self::NotInteractive,
        Self::MatchedExcludedCredential,
        Self::CredentialImport,
        Self::CredentialExport,
    ];

    fn encode(self) -> i16 {
        match self {
            Self::PluginBusy => -2,
            Self::UnknownCredentialType => -1,
            Self::Unknown => 1000,
            Self::Canceled => 1001,
            Self::InvalidResponse => 1002,
            Self::NotHandled => 1003,
            Self::Failed => 1004,
            Self::NotInteractive => 1005,
            Self::MatchedExcludedCredential => 1006,
            Self::CredentialImport => 1007,
            Self::CredentialExport => 1008,
        }
    }
}

/// Hint on whether the signed-in user is a real person. Encoded as a `u8`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    Serialize,
    Deserialize,
    uniffi::Enum,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum UserDetectionStatus {
    /// Not supported on the current platform; ignore the value.
    Unsupported,
    /// Could not be determined. New users also get this value and should not be blocked.
    Unknown,
    /// High confidence that the user is real.
    LikelyReal,
}

impl WireEnum for UserDetectionStatus {
    type Raw = u8;

    const VARIANTS: &'static [Self] = &[Self::Unsupported, Self::Unknown, Self::LikelyReal];

    fn encode(self) -> u8 {
        match self {
            Self::Unsupported => 0,
            Self::Unknown => 1,
            Self::LikelyReal => 2,
        }
    }
}

/// Whether the signed-in user is a child. Encoded as a `u8`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    Serialize,
    Deserialize,
    uniffi::Enum,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum UserAgeRange {
    /// The OS did not report an age range (older systems).
    NotAvailable,
    /// The app lacks the entitlement needed to support child accounts.
    Unknown,
    /// The user is a child.
    Child,
    /// The user is not a child.
    NotChild,
}

impl WireEnum for UserAgeRange {
    type Raw = u8;

    const VARIANTS: &'static [Self] =
        &[Self::NotAvailable, Self::Unknown, Self::Child, Self::NotChild];

    fn encode(self) -> u8 {
        match self {
            Self::NotAvailable => 0,
            Self::Unknown => 1,
            Self::Child => 2,
            Self::NotChild => 3,
        }
    }
}

/// Serde shape shared by the reported values: the symbol's name when known,
/// the raw byte otherwise.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum ReportedRepr<T> {
    Known(T),
    Unrecognized(u8),
}

/// A [`UserDetectionStatus`] exactly as the native side reported it.
///
/// A byte outside the table is kept instead of failing the credential, so a
/// newer provider adding a status does not break sign-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, uniffi::Enum)]
#[serde(
    from = "ReportedRepr<UserDetectionStatus>",
    into = "ReportedRepr<UserDetectionStatus>"
)]
pub enum ReportedUserStatus {
    /// A status from the table.
    Known {
        /// The decoded status.
        status: UserDetectionStatus,
    },
    /// A byte this bridge does not know.
    Unrecognized {
        /// The raw byte.
        raw: u8,
    },
}

impl ReportedUserStatus {
    /// Decodes a raw byte, keeping unknown values.
    #[must_use]
    pub fn from_raw(raw: u8) -> Self {
        match UserDetectionStatus::decode(raw) {
            Decoded::Known(status) => Self::Known { status },
            Decoded::Unrecognized(raw) => Self::Unrecognized { raw },
        }
    }

    /// The status, or `None` for an unknown byte.
    #[must_use]
    pub const fn known(self) -> Option<UserDetectionStatus> {
        match self {
            Self::Known { status } => Some(status),
            Self::Unrecognized { .. } => None,
        }
    }

    /// The byte as it travels on the wire.
    #[must_use]
    pub fn raw(self) -> u8 {
        match self {
            Self::Known { status } => status.encode(),
            Self::Unrecognized { raw } => raw,
        }
    }
}

impl From<UserDetectionStatus> for ReportedUserStatus {
    fn from(status: UserDetectionStatus) -> Self {
        Self::Known { status }
    }
}

impl From<ReportedRepr<UserDetectionStatus>> for ReportedUserStatus {
    fn from(repr: ReportedRepr<UserDetectionStatus>) -> Self {
        match repr {
            ReportedRepr::Known(status) => Self::Known { status },
            ReportedRepr::Unrecognized(raw) => Self::from_raw(raw),
        }
    }
}

impl From<ReportedUserStatus> for ReportedRepr<UserDetectionStatus> {
    fn from(value: ReportedUserStatus) -> Self {
        match value {
            ReportedUserStatus::Known { status } => Self::Known(status),
            ReportedUserStatus::Unrecognized { raw } => Self::Unrecognized(raw),
        }
    }
}

/// A [`UserAgeRange`] exactly as the native side reported it.
///
/// Unknown bytes are kept, as for [`ReportedUserStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, uniffi::Enum)]
#[serde(from = "ReportedRepr<UserAgeRange>", into = "ReportedRepr<UserAgeRange>")]
pub enum ReportedAgeRange {
    /// An age range from the table.
    Known {
        /// The decoded age range.
        range: UserAgeRange,
    },
    /// A byte this bridge does not know.
    Unrecognized {
        /// The raw byte.
        raw: u8,
    },
}

impl ReportedAgeRange {
    /// Decodes a raw byte, keeping unknown values.
    #[must_use]
    pub fn from_raw(raw: u8) -> Self {
        match UserAgeRange::decode(raw) {
            Decoded::Known(range) => Self::Known { range },
            Decoded::Unrecognized(raw) => Self::Unrecognized { raw },
        }
    }

    /// The age range, or `None` for an unknown byte.
    #[must_use]
    pub const fn known(self) -> Option<UserAgeRange> {
        match self {
            Self::Known { range } => Some(range),
            Self::Unrecognized { .. } => None,
        }
    }

    /// The byte as it travels on the wire.
    #[must_use]
    pub fn raw(self) -> u8 {
        match self {
            Self::Known { range } => range.encode(),
            Self::Unrecognized { raw } => raw,
        }
    }
}

impl From<UserAgeRange> for ReportedAgeRange {
    fn from(range: UserAgeRange) -> Self {
        Self::Known { range }
    }
}

impl From<ReportedRepr<UserAgeRange>> for ReportedAgeRange {
    fn from(repr: ReportedRepr<UserAgeRange>) -> Self {
        match repr {
            ReportedRepr::Known(range) => Self::Known { range },
            ReportedRepr::Unrecognized(raw) => Self::from_raw(raw),
        }
    }
}

impl From<ReportedAgeRange> for ReportedRepr<UserAgeRange> {
    fn from(value: ReportedAgeRange) -> Self {
        match value {
            ReportedAgeRange::Known { range } => Self::Known(range),
            ReportedAgeRange::Unrecognized { raw } => Self::Unrecognized(raw),
        }
    }
}
