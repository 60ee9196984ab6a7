use serde::{Deserialize, Serialize};

use crate::error::BridgeError;
use crate::BridgeResult;

/// The parts of a person's name.
///
/// Every part is optional. An absent part is `None`; `Some("")` is a present,
/// empty value and is kept as such.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize, uniffi::Record)]
pub struct NameFields {
    /// Prefix, e.g. "Dr.".
    pub name_prefix: Option<String>,
    /// Given name.
    pub given_name: Option<String>,
    /// Middle name.
    pub middle_name: Option<String>,
    /// Family name.
    pub family_name: Option<String>,
    /// Suffix, e.g. "Jr.".
    pub name_suffix: Option<String>,
    /// Nickname.
    pub nickname: Option<String>,
}

impl NameFields {
    /// Whether no part is present.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name_prefix.is_none()
            && self.given_name.is_none()
            && self.middle_name.is_none()
            && self.family_name.is_none()
            && self.name_suffix.is_none()
            && self.nickname.is_none()
    }
}

/// A structured name with an optional phonetic representation.
///
/// The phonetic representation has the same parts but no phonetic slot of
/// its own, so a value of this type is never nested more than one level deep.
/// [`PersonNameComponents::new`] rejects input that tries to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize, uniffi::Record)]
pub struct PersonNameComponents {
    /// The name itself.
    #[serde(flatten)]
    pub fields: NameFields,
    /// How the name is pronounced, if provided.
    pub phonetic_representation: Option<NameFields>,
}

impl PersonNameComponents {
    /// Builds a name from its parts and an optional phonetic representation.
    ///
    /// # Errors
    /// Returns [`BridgeError::InvalidComposite`] if `phonetic` carries a
    /// phonetic representation of its own.
    pub fn new(fields: NameFields, phonetic: Option<Self>) -> BridgeResult<Self> {
        let phonetic_representation = match phonetic {
            Some(Self {
                phonetic_representation: Some(_),
                ..
            }) => {
                return Err(BridgeError::InvalidComposite(
                    "a phonetic representation cannot have its own phonetic representation"
                        .to_string(),
                ));
            }
            Some(phonetic) => Some(phonetic.fields),
            None => None,
        };

        Ok(Self {
            fields,
            phonetic_representation,
        })
    }

    /// Prefix, e.g. "Dr.".
    #[must_use]
    pub fn name_prefix(&self) -> Option<&str> {
        self.fields.name_prefix.as_deref()
    }

    /// Given name.
    #[must_use]
    pub fn given_name(&self) -> Option<&str> {
        self.fields.given_name.as_deref()
    }

    /// Middle name.
    #[must_use]
    pub fn middle_name(&self) -> Option<&str> {
        self.fields.middle_name.as_deref()
    }

    /// Family name.
    #[must_use]
    pub fn family_name(&self) -> Option<&str> {
        self.fields.family_name.as_deref()
    }

    /// Suffix, e.g. "Jr.".
    #[must_use]
    pub fn name_suffix(&self) -> Option<&str> {
        self.fields.name_suffix.as_deref()
    }

    /// Nickname.
    #[must_use]
    pub fn nickname(&self) -> Option<&str> {
        self.fields.nickname.as_deref()
    }

    /// The phonetic representation as a name of its own (with no further nesting).
    #[must_use]
    pub fn phonetic_components(&self) -> Option<Self> {
        self.phonetic_representation.clone().map(|fields| Self {
            fields,
            phonetic_representation: None,
        })
    }
}

/// Builds a [`PersonNameComponents`] from foreign code.
///
/// # Errors
/// Returns an error if `phonetic` is itself nested.
#[uniffi::export]
pub fn new_person_name_components(
    fields: NameFields,
    phonetic: Option<PersonNameComponents>,
) -> Result<PersonNameComponents, BridgeError> {
    PersonNameComponents::new(fields, phonetic)
}
