//! Who is signed in.
//!
//! A user configured through `[session] user_id` or `CHRONOS_USER` always wins.
//! Otherwise the user recorded by [`Session::sign_in`] in the preferences store
//! is used.

use thiserror::Error;

use crate::prefs::{AppPreferences, SIGNED_IN_USER};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("No ID token received")]
    MissingCredential,
    #[error("not signed in; run `chronos login <user>` first")]
    NotSignedIn,
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

#[derive(Clone)]
pub struct Session {
    prefs: AppPreferences,
    configured_user: Option<String>,
}

impl Session {
    pub fn new(prefs: AppPreferences, configured_user: Option<String>) -> Self {
        let configured_user = configured_user.filter(|u| !u.trim().is_empty());
        Self {
            prefs,
            configured_user,
        }
    }

    pub fn sign_in(&self, credential: Option<&str>) -> Result<String, AuthError> {
        let user_id = credential
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .ok_or(AuthError::MissingCredential)?;
        self.prefs.set_string(SIGNED_IN_USER, user_id)?;
        tracing::info!(user_id, "signed in");
        Ok(user_id.to_string())
    }

    pub fn sign_out(&self) -> Result<(), AuthError> {
        self.prefs.remove_string(SIGNED_IN_USER)?;
        tracing::info!("signed out");
        Ok(())
    }

    pub fn current_user(&self) -> Result<String, AuthError> {
        if let Some(ref user) = self.configured_user {
            return Ok(user.clone());
        }
        self.prefs
            .get_string(SIGNED_IN_USER)?
            .ok_or(AuthError::NotSignedIn)
    }
}
