//! `extern "C"` entry points called by the native side, and drivers for
//! the native calls that lead to them.

use std::ffi::CString;
use std::os::raw::c_char;

use crate::codes::AuthorizationErrorCode;
use crate::error::BridgeError;
use crate::ffi::wire::{
    read_credential, read_text, RawCredential, WireCredential, WireSignInRequest,
};
use crate::listener::{deliver_credential_state, deliver_malformed_credential, deliver_sign_in};
use crate::outcome::{CredentialStateOutcome, SignInOutcome};
use crate::request::SignInRequest;
use crate::BridgeResult;

/// Callback receiving a successful credential. The credential's memory
/// belongs to the caller and only needs to live for the duration of the call.
pub type SignedInCallback = unsafe extern "C" fn(RawCredential);

/// Callback receiving a failed sign-in's raw error code.
pub type SignInFailedCallback = extern "C" fn(i16);

/// Callback receiving a raw credential state and an optional error description.
pub type CredentialStateCallback = unsafe extern "C" fn(u8, *const c_char);

/// Native entry point starting a sign-in.
///
/// Takes the scope bits, a nullable nonce and a nullable state, plus the
/// callbacks. Returns `false` if a sign-in is already in progress.
pub type StartSignInFn = unsafe extern "C" fn(
    u8,
    *const c_char,
    *const c_char,
    SignedInCallback,
    SignInFailedCallback,
) -> bool;

/// Native entry point checking a user id's credential state.
pub type GetCredentialStateFn = unsafe extern "C" fn(*const c_char, CredentialStateCallback);

/// Receives a successful sign-in from the native side.
///
/// The credential is deep-copied before this returns. A credential that fails
/// to decode is reported through
/// [`crate::SignInListener::on_malformed_credential`].
///
/// # Safety
/// Every non-null pointer reachable from `credential` must be valid for the
/// duration of the call. See [`read_credential`].
#[no_mangle]
pub unsafe extern "C" fn appleid_bridge_on_signed_in(credential: RawCredential) {
    match read_credential(&credential) {
        Ok(credential) => deliver_sign_in(credential.into()),
        Err(e) => deliver_malformed_credential(&e),
    }
}

/// Receives a failed sign-in from the native side.
#[no_mangle]
pub extern "C" fn appleid_bridge_on_sign_in_failed(error_code: i16) {
    deliver_sign_in(SignInOutcome::from_raw_failure(error_code));
}

/// Receives the result of a credential-state check from the native side.
///
/// An error description that is not UTF-8 is dropped.
///
/// # Safety
/// `error_description` must be null or a valid NUL-terminated string for the
/// duration of the call.
#[no_mangle]
pub unsafe extern "C" fn appleid_bridge_on_credential_state(
    state: u8,
    error_description: *const c_char,
) {
    let description = read_text(error_description, "error_description").unwrap_or_else(|e| {
        log::warn!("dropping credential state description: {e}");
        None
    });
    deliver_credential_state(CredentialStateOutcome::from_raw(state, description));
}

/// Frees a credential encoded by [`WireCredential`] and released with
/// [`WireCredential::into_raw`].
///
/// Strings inside the credential are owned by it and are only freed here,
/// all together.
///
/// # Safety
/// `credential` must come from [`WireCredential::into_raw`] and must not be
/// freed twice.
#[no_mangle]
pub unsafe extern "C" fn appleid_bridge_free_credential(credential: RawCredential) {
    drop(WireCredential::from_raw(credential));
}

/// Asks the native side to start a sign-in, wiring its callbacks to this crate.
///
/// If the native side refuses because a sign-in is already running, the
/// listener receives a [`AuthorizationErrorCode::PluginBusy`] failure and this
/// returns `Ok(false)`.
///
/// # Errors
/// Returns [`BridgeError::InvalidInput`] if the nonce or state contains a NUL byte.
///
/// # Safety
/// `start` must be a valid native entry point that copies the strings it is
/// given before returning.
pub unsafe fn start_sign_in(start: StartSignInFn, request: &SignInRequest) -> BridgeResult<bool> {
    let wire = WireSignInRequest::encode(request)?;
    log::debug!("starting sign-in, scopes: {}", request.requested_scopes);

    let started = start(
        wire.scopes(),
        wire.nonce_ptr(),
        wire.state_ptr(),
        appleid_bridge_on_signed_in,
        appleid_bridge_on_sign_in_failed,
    );
    if !started {
        deliver_sign_in(SignInOutcome::from_error(AuthorizationErrorCode::PluginBusy));
    }
    Ok(started)
}

/// Asks the native side for the state of `user_id`'s credential. The result
/// arrives through [`crate::SignInListener::on_credential_state`].
///
/// # Errors
/// Returns [`BridgeError::InvalidInput`] if `user_id` is empty or contains a NUL byte.
///
/// # Safety
/// `get_state` must be a valid native entry point that copies `user_id`
/// before returning.
pub unsafe fn check_credential_state(
    get_state: GetCredentialStateFn,
    user_id: &str,
) -> BridgeResult<()> {
    if user_id.is_empty() {
        return Err(BridgeError::InvalidInput {
            attribute: "user_id",
            reason: "cannot be empty".to_string(),
        });
    }
    let user_id = CString::new(user_id).map_err(|_| BridgeError::InvalidInput {
        attribute: "user_id",
        reason: "contains a NUL byte".to_string(),
    })?;

    get_state(user_id.as_ptr(), appleid_bridge_on_credential_state);
    Ok(())
}
