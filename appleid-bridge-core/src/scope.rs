use std::fmt;
use std::ops::BitOr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// A single kind of contact information that can be requested from the user.
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
pub enum ScopeFlag {
    /// The user's full name (bit 0).
    FullName,
    /// The user's email address (bit 1).
    Email,
}

impl ScopeFlag {
    /// Every known flag, in bit order.
    pub const ALL: [Self; 2] = [Self::FullName, Self::Email];

    /// The bit this flag occupies in the scope byte.
    #[must_use]
    pub const fn bit(self) -> u8 {
        match self {
            Self::FullName => 1 << 0,
            Self::Email => 1 << 1,
        }
    }
}

/// Set of scopes, carried as a single byte on the wire.
///
/// Bits above the known flags are reserved. They are kept as-is (a newer
/// producer may set them) but never match a known flag.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, uniffi::Record,
)]
#[serde(transparent)]
pub struct Scope {
    /// Raw scope byte, including any reserved bits.
    pub bits: u8,
}

impl Scope {
    /// No scopes.
    pub const NONE: Self = Self { bits: 0 };
    /// Only the full name scope.
    pub const FULL_NAME: Self = Self {
        bits: ScopeFlag::FullName.bit(),
    };
    /// Only the email scope.
    pub const EMAIL: Self = Self {
        bits: ScopeFlag::Email.bit(),
    };

    const KNOWN_MASK: u8 = ScopeFlag::FullName.bit() | ScopeFlag::Email.bit();

    /// Wraps a raw scope byte. Reserved bits are retained.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        Self { bits }
    }

    /// Builds a scope from a set of flags.
    pub fn from_flags(flags: impl IntoIterator<Item = ScopeFlag>) -> Self {
        Self {
            bits: flags.into_iter().fold(0, |bits, flag| bits | flag.bit()),
        }
    }

    /// Returns the raw byte, reserved bits included.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.bits
    }

    /// Returns only the bits of known flags.
    #[must_use]
    pub const fn known_bits(self) -> u8 {
        self.bits & Self::KNOWN_MASK
    }

    /// Returns the reserved bits that are set.
    #[must_use]
    pub const fn unknown_bits(self) -> u8 {
        self.bits & !Self::KNOWN_MASK
    }

    /// Whether `flag` is set.
    #[must_use]
    pub const fn contains(self, flag: ScopeFlag) -> bool {
        self.bits & flag.bit() != 0
    }

    /// Union of both sets, reserved bits included.
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self {
            bits: self.bits | other.bits,
        }
    }

    /// Whether no known flag is set.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.known_bits() == 0
    }

    /// The known flags that are set.
    pub fn flags(self) -> impl Iterator<Item = ScopeFlag> {
        ScopeFlag::ALL.into_iter().filter(move |flag| self.contains(*flag))
    }
}

impl From<ScopeFlag> for Scope {
    fn from(flag: ScopeFlag) -> Self {
        Self { bits: flag.bit() }
    }
}

impl BitOr for Scope {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl BitOr<ScopeFlag> for Scope {
    type Output = Self;

    fn bitor(self, rhs: ScopeFlag) -> Self {
        self.union(rhs.into())
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.bits == 0 {
            return f.write_str("none");
        }
        let mut first = true;
        for flag in self.flags() {
            if !first {
                f.write_str("|")?;
            }
            write!(f, "{flag}")?;
            first = false;
        }
        if self.unknown_bits() != 0 {
            if !first {
                f.write_str("|")?;
            }
            write!(f, "{:#04x}", self.unknown_bits())?;
        }
        Ok(())
    }
}

/// Whether `scope` includes `flag`.
#[uniffi::export]
#[must_use]
pub const fn scope_contains(scope: Scope, flag: ScopeFlag) -> bool {
    scope.contains(flag)
}

/// Union of two scopes. Reserved bits are carried over.
#[uniffi::export]
#[must_use]
pub const fn scope_union(lhs: Scope, rhs: Scope) -> Scope {
    lhs.union(rhs)
}

/// Builds a scope from a list of flags.
#[uniffi::export]
#[must_use]
pub fn scope_from_flags(flags: Vec<ScopeFlag>) -> Scope {
    Scope::from_flags(flags)
}
