//! # Auth Session
//!
//! Login state shared between the transport and whoever drives the client.
//! Passed around explicitly as an `Arc<AuthSession>`; nothing reads it from
//! ambient storage.
use parking_lot::RwLock;
use secrecy::{ExposeSecret, SecretString};
use tracing::info;

use crate::models::Profile;

#[derive(Default)]
struct AuthState {
    token: Option<SecretString>,
    current_user: Option<Profile>,
}

#[derive(Default)]
pub struct AuthSession {
    state: RwLock<AuthState>,
}

impl AuthSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: SecretString) -> Self {
        let session = Self::new();
        session.login(token);

        session
    }

    pub fn login(&self, token: SecretString) {
        let mut state = self.state.write();
        state.token = Some(token);
        state.current_user = None;

        info!("Session token stored");
    }

    pub fn logout(&self) {
        let mut state = self.state.write();
        if state.token.take().is_some() {
            info!("Session cleared");
        }
        state.current_user = None;
    }

    pub fn is_logged_in(&self) -> bool {
        self.state.read().token.is_some()
    }

    /// Runs `f` on the raw token without letting it escape the lock.
    pub fn expose_token<R>(&self, f: impl FnOnce(&str) -> R) -> Option<R> {
        self.state
            .read()
            .token
            .as_ref()
            .map(|token| f(token.expose_secret()))
    }

    pub fn load_user(&self, profile: Profile) {
        self.state.write().current_user = Some(profile);
    }

    pub fn current_user(&self) -> Option<Profile> {
        self.state.read().current_user.clone()
    }
}

#[cfg(test)]
mod tests {
    use secrecy::SecretString;

    use super::AuthSession;
    use crate::models::Profile;

    #[test]
    fn test_login_logout() {
        let auth = AuthSession::new();
        assert!(!auth.is_logged_in());
        assert_eq!(auth.expose_token(str::len), None);

        auth.login(SecretString::from("abc".to_string()));
        auth.load_user(Profile {
            name: "Rina".to_string(),
            ..Profile::default()
        });

        assert!(auth.is_logged_in());
        assert_eq!(auth.expose_token(str::to_string).as_deref(), Some("abc"));
        assert_eq!(auth.current_user().unwrap().name, "Rina");

        auth.logout();
        assert!(!auth.is_logged_in());
        assert!(auth.current_user().is_none());
    }

    #[test]
    fn test_new_login_drops_old_profile() {
        let auth = AuthSession::with_token(SecretString::from("one".to_string()));
        auth.load_user(Profile::default());
        auth.login(SecretString::from("two".to_string()));

        assert!(auth.current_user().is_none());
    }
}
