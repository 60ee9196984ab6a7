#![cfg(feature = "ffi")]

//! Native callbacks reaching the installed listener.
//!
//! The listener is process-global, so everything runs inside one test.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;
use std::sync::{Arc, Mutex};

use appleid_bridge_core::ffi::{
    appleid_bridge_on_credential_state, appleid_bridge_on_sign_in_failed,
    appleid_bridge_on_signed_in, check_credential_state, start_sign_in, CredentialStateCallback,
    RawCredential, SignInFailedCallback, SignedInCallback,
};
use appleid_bridge_core::{
    set_sign_in_listener, AuthorizationErrorCode, CredentialState, CredentialStateOutcome,
    Decoded, Scope, SignInListener, SignInOutcome, SignInRequest,
};

#[derive(Debug)]
enum Event {
    SignIn(SignInOutcome),
    Malformed(String),
    State(CredentialStateOutcome),
}

#[derive(Default)]
struct Recorder {
    events: Mutex<Vec<Event>>,
}

impl Recorder {
    fn take(&self) -> Vec<Event> {
        std::mem::take(&mut *self.events.lock().unwrap())
    }
}

impl SignInListener for Recorder {
    fn on_sign_in(&self, outcome: SignInOutcome) {
        self.events.lock().unwrap().push(Event::SignIn(outcome));
    }

    fn on_malformed_credential(&self, reason: String) {
        self.events.lock().unwrap().push(Event::Malformed(reason));
    }

    fn on_credential_state(&self, outcome: CredentialStateOutcome) {
        self.events.lock().unwrap().push(Event::State(outcome));
    }
}

fn raw_credential(user_id: &CString) -> RawCredential {
    RawCredential {
        user_id: user_id.as_ptr(),
        state: ptr::null(),
        scopes: 0,
        authorization_code: ptr::null(),
        identity_token: ptr::null(),
        email: ptr::null(),
        full_name: ptr::null(),
        real_user_status: 0,
        user_age_range: 0,
    }
}

static SEEN_SCOPES: Mutex<Option<u8>> = Mutex::new(None);

unsafe extern "C" fn native_start_succeeding(
    scopes: u8,
    nonce: *const c_char,
    state: *const c_char,
    on_success: SignedInCallback,
    _on_error: SignInFailedCallback,
) -> bool {
    *SEEN_SCOPES.lock().unwrap() = Some(scopes);
    assert!(nonce.is_null());
    let state = CStr::from_ptr(state).to_owned();

    let user_id = CString::new("user-7").unwrap();
    on_success(RawCredential {
        state: state.as_ptr(),
        ..raw_credential(&user_id)
    });
    true
}

unsafe extern "C" fn native_start_busy(
    _scopes: u8,
    _nonce: *const c_char,
    _state: *const c_char,
    _on_success: SignedInCallback,
    _on_error: SignInFailedCallback,
) -> bool {
    false
}

unsafe extern "C" fn native_get_state(user_id: *const c_char, callback: CredentialStateCallback) {
    let state = if CStr::from_ptr(user_id).to_bytes() == b"user-7" { 1 } else { 2 };
    callback(state, ptr::null());
}

#[test]
fn test_native_callbacks_reach_listener() {
    let recorder = Arc::new(Recorder::default());
    set_sign_in_listener(recorder.clone());

    // success
    let user_id = CString::new("user-42").unwrap();
    unsafe { appleid_bridge_on_signed_in(raw_credential(&user_id)) };
    match recorder.take().as_slice() {
        [Event::SignIn(SignInOutcome::SignedIn { credential })] => {
            assert_eq!(credential.user_id(), "user-42");
        }
        other => panic!("unexpected events: {other:?}"),
    }

    // cancellation
    appleid_bridge_on_sign_in_failed(1001);
    match recorder.take().as_slice() {
        [Event::SignIn(SignInOutcome::Failed { failure })] => {
            assert!(failure.is_canceled());
        }
        other => panic!("unexpected events: {other:?}"),
    }

    // malformed credential is reported, not turned into a failure
    unsafe {
        appleid_bridge_on_signed_in(RawCredential {
            user_id: ptr::null(),
            ..raw_credential(&user_id)
        });
    }
    match recorder.take().as_slice() {
        [Event::Malformed(reason)] => assert!(reason.contains("user_id")),
        other => panic!("unexpected events: {other:?}"),
    }

    // credential state with a native error
    let description = CString::new("keychain unavailable").unwrap();
    unsafe { appleid_bridge_on_credential_state(255, description.as_ptr()) };
    match recorder.take().as_slice() {
        [Event::State(CredentialStateOutcome::PluginError { description })] => {
            assert_eq!(description.as_deref(), Some("keychain unavailable"));
        }
        other => panic!("unexpected events: {other:?}"),
    }

    // start drives the success callback synchronously
    let request = SignInRequest::new(Scope::EMAIL | Scope::FULL_NAME).with_state("xyz");
    let started = unsafe { start_sign_in(native_start_succeeding, &request) }.unwrap();
    assert!(started);
    assert_eq!(*SEEN_SCOPES.lock().unwrap(), Some(0b11));
    match recorder.take().as_slice() {
        [Event::SignIn(SignInOutcome::SignedIn { credential })] => {
            assert_eq!(credential.user_id(), "user-7");
            assert_eq!(credential.state().as_deref(), Some("xyz"));
        }
        other => panic!("unexpected events: {other:?}"),
    }

    // a busy native side yields a failure
    let started = unsafe { start_sign_in(native_start_busy, &request) }.unwrap();
    assert!(!started);
    match recorder.take().as_slice() {
        [Event::SignIn(SignInOutcome::Failed { failure })] => {
            assert_eq!(failure.code(), Decoded::Known(AuthorizationErrorCode::PluginBusy));
        }
        other => panic!("unexpected events: {other:?}"),
    }

    // state check round trip
    unsafe { check_credential_state(native_get_state, "user-7") }.unwrap();
    match recorder.take().as_slice() {
        [Event::State(outcome)] => assert_eq!(outcome.state(), Some(CredentialState::Authorized)),
        other => panic!("unexpected events: {other:?}"),
    }
    assert!(unsafe { check_credential_state(native_get_state, "") }.is_err());
    assert!(recorder.take().is_empty());

    // second listener is ignored
    set_sign_in_listener(Arc::new(Recorder::default()));
    appleid_bridge_on_sign_in_failed(1000);
    assert_eq!(recorder.take().len(), 1);
}
