//! `#[repr(C)]` mirrors of the native wrapper structs and their conversions.
//!
//! Field order and widths here are the contract with the native side and
//! must match the C header exactly. Enumerations travel as plain integers and
//! are decoded explicitly; no Rust enum layout ever crosses the boundary.

use std::ffi::{CStr, CString};
use std::mem::ManuallyDrop;
use std::os::raw::c_char;
use std::ptr;

use crate::codes::{ReportedAgeRange, ReportedUserStatus};
use crate::credential::{CredentialParts, CredentialResult};
use crate::error::BridgeError;
use crate::name::{NameFields, PersonNameComponents};
use crate::request::SignInRequest;
use crate::scope::Scope;
use crate::BridgeResult;

/// C layout of a person's name. Null pointers mean "absent".
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RawPersonNameComponents {
    /// NUL-terminated UTF-8, or null.
    pub name_prefix: *const c_char,
    /// NUL-terminated UTF-8, or null.
    pub given_name: *const c_char,
    /// NUL-terminated UTF-8, or null.
    pub middle_name: *const c_char,
    /// NUL-terminated UTF-8, or null.
    pub family_name: *const c_char,
    /// NUL-terminated UTF-8, or null.
    pub name_suffix: *const c_char,
    /// NUL-terminated UTF-8, or null.
    pub nickname: *const c_char,
    /// Phonetic representation, or null. Must itself have a null phonetic representation.
    pub phonetic_representation: *const Self,
}

/// C layout of an Apple ID credential. Null pointers mean "absent".
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RawCredential {
    /// NUL-terminated UTF-8. Never null.
    pub user_id: *const c_char,
    /// NUL-terminated UTF-8, or null.
    pub state: *const c_char,
    /// Scope bits.
    pub scopes: u8,
    /// NUL-terminated UTF-8, or null.
    pub authorization_code: *const c_char,
    /// NUL-terminated UTF-8, or null.
    pub identity_token: *const c_char,
    /// NUL-terminated UTF-8, or null. Only set with the email scope.
    pub email: *const c_char,
    /// Full name, or null. Only set with the full name scope.
    pub full_name: *const RawPersonNameComponents,
    /// Raw [`crate::UserDetectionStatus`].
    pub real_user_status: u8,
    /// Raw [`crate::UserAgeRange`].
    pub user_age_range: u8,
}

/// Copies a credential out of native memory.
///
/// Every string is copied; nothing is freed. The native side keeps ownership
/// of `raw` and everything it points to.
///
/// # Errors
/// - [`BridgeError::MissingField`] if `user_id` is null.
/// - [`BridgeError::InvalidText`] if a string is not UTF-8.
/// - [`BridgeError::InvalidComposite`] if the name is nested more than one level.
/// - [`BridgeError::ScopeMismatch`] if email or name is present without its scope.
///
/// # Safety
/// Every non-null pointer reachable from `raw` (up to two name levels) must
/// point to a valid, NUL-terminated string or a valid name struct for the
/// duration of the call.
pub unsafe fn read_credential(raw: &RawCredential) -> BridgeResult<CredentialResult> {
    let user_id = read_text(raw.user_id, "user_id")?.ok_or(BridgeError::MissingField("user_id"))?;

    let real_user_status = ReportedUserStatus::from_raw(raw.real_user_status);
    if let ReportedUserStatus::Unrecognized { raw } = real_user_status {
        log::warn!("unrecognized real user status {raw}, keeping raw value");
    }
    let user_age_range = ReportedAgeRange::from_raw(raw.user_age_range);
    if let ReportedAgeRange::Unrecognized { raw } = user_age_range {
        log::warn!("unrecognized user age range {raw}, keeping raw value");
    }

    CredentialResult::assemble(CredentialParts {
        user_id,
        state: read_text(raw.state, "state")?,
        scopes: Scope::from_bits(raw.scopes),
        authorization_code: read_text(raw.authorization_code, "authorization_code")?,
        identity_token: read_text(raw.identity_token, "identity_token")?,
        email: read_text(raw.email, "email")?,
        full_name: read_name(raw.full_name)?,
        real_user_status,
        user_age_range,
    })
}

/// Copies a nullable C string.
///
/// # Errors
/// Returns [`BridgeError::InvalidText`] naming `field` if the bytes are not UTF-8.
///
/// # Safety
/// `ptr` must be null or point to a NUL-terminated string.
pub unsafe fn read_text(ptr: *const c_char, field: &'static str) -> BridgeResult<Option<String>> {
    if ptr.is_null() {
        return Ok(None);
    }
    CStr::from_ptr(ptr)
        .to_str()
        .map(|text| Some(text.to_owned()))
        .map_err(|_| BridgeError::InvalidText(field))
}

unsafe fn read_name_fields(raw: &RawPersonNameComponents) -> BridgeResult<NameFields> {
    Ok(NameFields {
        name_prefix: read_text(raw.name_prefix, "name_prefix")?,
        given_name: read_text(raw.given_name, "given_name")?,
        middle_name: read_text(raw.middle_name, "middle_name")?,
        family_name: read_text(raw.family_name, "family_name")?,
        name_suffix: read_text(raw.name_suffix, "name_suffix")?,
        nickname: read_text(raw.nickname, "nickname")?,
    })
}

unsafe fn read_name(ptr: *const RawPersonNameComponents) -> BridgeResult<Option<PersonNameComponents>> {
    let Some(raw) = ptr.as_ref() else {
        return Ok(None);
    };
    let fields = read_name_fields(raw)?;

    let phonetic = match raw.phonetic_representation.as_ref() {
        Some(nested) => {
            // A third level is only flagged, never dereferenced.
            let further = (!nested.phonetic_representation.is_null()).then(NameFields::default);
            Some(PersonNameComponents {
                fields: read_name_fields(nested)?,
                phonetic_representation: further,
            })
        }
        None => None,
    };

    PersonNameComponents::new(fields, phonetic).map(Some)
}

fn c_text(value: Option<&str>, field: &'static str) -> BridgeResult<Option<CString>> {
    value
        .map(|text| {
            CString::new(text).map_err(|_| BridgeError::InvalidInput {
                attribute: field,
                reason: "contains a NUL byte".to_string(),
            })
        })
        .transpose()
}

fn into_raw_text(value: Option<CString>) -> *const c_char {
    value.map_or(ptr::null(), |text| text.into_raw().cast_const())
}

type NameTexts = [Option<CString>; 6];

fn c_name_fields(fields: &NameFields) -> BridgeResult<NameTexts> {
    Ok([
        c_text(fields.name_prefix.as_deref(), "name_prefix")?,
        c_text(fields.given_name.as_deref(), "given_name")?,
        c_text(fields.middle_name.as_deref(), "middle_name")?,
        c_text(fields.family_name.as_deref(), "family_name")?,
        c_text(fields.name_suffix.as_deref(), "name_suffix")?,
        c_text(fields.nickname.as_deref(), "nickname")?,
    ])
}

fn into_raw_name(
    texts: NameTexts,
    phonetic_representation: *const RawPersonNameComponents,
) -> *const RawPersonNameComponents {
    let [name_prefix, given_name, middle_name, family_name, name_suffix, nickname] =
        texts.map(into_raw_text);
    Box::into_raw(Box::new(RawPersonNameComponents {
        name_prefix,
        given_name,
        middle_name,
        family_name,
        name_suffix,
        nickname,
        phonetic_representation,
    }))
    .cast_const()
}

/// # Safety
/// `ptr` must be null or a string allocated by [`WireCredential::encode`]
/// that was not freed before.
unsafe fn free_text(ptr: *const c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr.cast_mut()));
    }
}

unsafe fn free_name(ptr: *const RawPersonNameComponents) {
    if ptr.is_null() {
        return;
    }
    let raw = Box::from_raw(ptr.cast_mut());
    free_text(raw.name_prefix);
    free_text(raw.given_name);
    free_text(raw.middle_name);
    free_text(raw.family_name);
    free_text(raw.name_suffix);
    free_text(raw.nickname);
    free_name(raw.phonetic_representation);
}

/// A credential encoded into its C layout, with all memory owned by Rust.
///
/// The pointers inside stay valid as long as this value lives and are freed
/// when it is dropped. Use [`WireCredential::into_raw`] to hand the memory to
/// a C consumer, which must give it back through
/// [`WireCredential::from_raw`] (or `appleid_bridge_free_credential`).
#[derive(Debug)]
pub struct WireCredential {
    raw: RawCredential,
}

impl WireCredential {
    /// Encodes `credential` into freshly allocated C memory.
    ///
    /// # Errors
    /// Returns [`BridgeError::InvalidInput`] if a string contains a NUL byte.
    pub fn encode(credential: &CredentialResult) -> BridgeResult<Self> {
        let parts = credential.parts();

        let user_id = c_text(Some(parts.user_id.as_str()), "user_id")?;
        let state = c_text(parts.state.as_deref(), "state")?;
        let authorization_code = c_text(parts.authorization_code.as_deref(), "authorization_code")?;
        let identity_token = c_text(parts.identity_token.as_deref(), "identity_token")?;
        let email = c_text(parts.email.as_deref(), "email")?;
        let full_name = parts
            .full_name
            .as_ref()
            .map(|name| -> BridgeResult<_> {
                let phonetic = name
                    .phonetic_representation
                    .as_ref()
                    .map(c_name_fields)
                    .transpose()?;
                Ok((c_name_fields(&name.fields)?, phonetic))
            })
            .transpose()?;

        // Nothing below can fail, so no partially built value ever leaks.
        let full_name = full_name.map_or(ptr::null(), |(texts, phonetic)| {
            let phonetic = phonetic.map_or(ptr::null(), |texts| into_raw_name(texts, ptr::null()));
            into_raw_name(texts, phonetic)
        });

        Ok(Self {
            raw: RawCredential {
                user_id: into_raw_text(user_id),
                state: into_raw_text(state),
                scopes: parts.scopes.bits(),
                authorization_code: into_raw_text(authorization_code),
                identity_token: into_raw_text(identity_token),
                email: into_raw_text(email),
                full_name,
                real_user_status: parts.real_user_status.raw(),
                user_age_range: parts.user_age_range.raw(),
            },
        })
    }

    /// Borrows the C layout. Pointers are valid while `self` lives.
    #[must_use]
    pub const fn as_raw(&self) -> &RawCredential {
        &self.raw
    }

    /// Releases ownership of the C memory.
    #[must_use]
    pub fn into_raw(self) -> RawCredential {
        ManuallyDrop::new(self).raw
    }

    /// Takes back ownership of memory released by [`WireCredential::into_raw`].
    ///
    /// # Safety
    /// `raw` must come from [`WireCredential::into_raw`] and must not be
    /// reclaimed twice.
    #[must_use]
    pub const unsafe fn from_raw(raw: RawCredential) -> Self {
        Self { raw }
    }
}

impl Drop for WireCredential {
    fn drop(&mut self) {
        // SAFETY: every pointer was allocated by `encode` and is owned by `self`.
        unsafe {
            free_text(self.raw.user_id);
            free_text(self.raw.state);
            free_text(self.raw.authorization_code);
            free_text(self.raw.identity_token);
            free_text(self.raw.email);
            free_name(self.raw.full_name);
        }
    }
}

/// A sign-in request in the form the native start call takes.
///
/// The string pointers stay valid while this value lives.
#[derive(Debug)]
pub struct WireSignInRequest {
    scopes: u8,
    nonce: Option<CString>,
    state: Option<CString>,
}

impl WireSignInRequest {
    /// Encodes `request`.
    ///
    /// # Errors
    /// Returns [`BridgeError::InvalidInput`] if the nonce or state contains a NUL byte.
    pub fn encode(request: &SignInRequest) -> BridgeResult<Self> {
        Ok(Self {
            scopes: request.requested_scopes.bits(),
            nonce: c_text(request.nonce.as_deref(), "nonce")?,
            state: c_text(request.state.as_deref(), "state")?,
        })
    }

    /// Requested scope bits.
    #[must_use]
    pub const fn scopes(&self) -> u8 {
        self.scopes
    }

    /// Nonce, or null.
    #[must_use]
    pub fn nonce_ptr(&self) -> *const c_char {
        self.nonce.as_deref().map_or(ptr::null(), CStr::as_ptr)
    }

    /// State, or null.
    #[must_use]
    pub fn state_ptr(&self) -> *const c_char {
        self.state.as_deref().map_or(ptr::null(), CStr::as_ptr)
    }
}
