//! Delivery of native callbacks to the foreign host.
//!
//! The native side calls back on whatever thread it likes. Each callback is
//! decoded into an owned value and handed to the installed [`SignInListener`]
//! before the native side regains control.

use std::sync::{Arc, OnceLock};

use crate::credential::CredentialFailure;
use crate::error::BridgeError;
use crate::outcome::{CredentialStateOutcome, SignInOutcome};

/// Receives sign-in and credential-state results on the foreign side.
///
/// Methods may be called from any thread.
#[uniffi::export(with_foreign)]
pub trait SignInListener: Send + Sync {
    /// A sign-in attempt finished.
    fn on_sign_in(&self, outcome: SignInOutcome);

    /// A sign-in attempt produced a credential the bridge could not accept.
    ///
    /// `reason` describes the defect. It never contains credential contents.
    fn on_malformed_credential(&self, reason: String);

    /// A credential-state check finished.
    fn on_credential_state(&self, outcome: CredentialStateOutcome);
}

static LISTENER: OnceLock<Arc<dyn SignInListener>> = OnceLock::new();

/// Installs the listener that receives every callback. Only the first call
/// has an effect.
#[uniffi::export]
pub fn set_sign_in_listener(listener: Arc<dyn SignInListener>) {
    if LISTENER.set(listener).is_err() {
        log::warn!("sign-in listener already set, ignoring");
    }
}

fn listener() -> Option<&'static Arc<dyn SignInListener>> {
    let listener = LISTENER.get();
    if listener.is_none() {
        log::error!("no sign-in listener set, dropping callback");
    }
    listener
}

/// Hands a sign-in outcome to the listener.
pub fn deliver_sign_in(outcome: SignInOutcome) {
    match &outcome {
        SignInOutcome::SignedIn { credential } => log::info!(
            "sign-in succeeded, scopes: {}",
            credential.parts().scopes
        ),
        SignInOutcome::Failed { failure } => {
            log::log!(failure_level(failure), "sign-in failed: {failure}");
        }
    }

    if let Some(listener) = listener() {
        listener.on_sign_in(outcome);
    }
}

/// Unknown codes are logged as warnings.
const fn failure_level(failure: &CredentialFailure) -> log::Level {
    if failure.code().is_unrecognized() {
        log::Level::Warn
    } else {
        log::Level::Info
    }
}

/// Reports a credential that failed to decode.
pub fn deliver_malformed_credential(error: &BridgeError) {
    log::error!("malformed credential from native side: {error}");

    if let Some(listener) = listener() {
        listener.on_malformed_credential(error.to_string());
    }
}

/// Hands a credential-state outcome to the listener.
pub fn deliver_credential_state(outcome: CredentialStateOutcome) {
    match &outcome {
        CredentialStateOutcome::State { state } => log::info!("credential state: {state}"),
        CredentialStateOutcome::PluginError { .. } => {
            log::warn!("credential state check failed natively");
        }
        CredentialStateOutcome::Unrecognized { raw } => {
            log::warn!("unrecognized credential state {raw}");
        }
    }

    if let Some(listener) = listener() {
        listener.on_credential_state(outcome);
    }
}
