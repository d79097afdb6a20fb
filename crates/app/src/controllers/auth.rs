//! Sign-in/sign-out flow.

use std::sync::{Arc, Mutex};

use tapdesk_auth::{AuthSession, UserProfile};
use tapdesk_core::ClientResult;
use tapdesk_events::{AppEvent, EventBus};

use super::emit;

pub struct AuthController<B> {
    session: Mutex<AuthSession>,
    bus: Arc<B>,
}

impl<B: EventBus<AppEvent>> AuthController<B> {
    pub fn new(bus: Arc<B>) -> Self {
        Self {
            session: Mutex::new(AuthSession::new()),
            bus,
        }
    }

    /// Sign in by email against the account directory.
    pub fn login(&self, email: &str) -> ClientResult<UserProfile> {
        let user = self.lock().login(email)?;
        emit(
            &*self.bus,
            AppEvent::LoggedIn {
                email: user.email.clone(),
                tier: user.tier,
            },
        );
        Ok(user)
    }

    /// Sign out the current user, if any.
    pub fn logout(&self) {
        let mut session = self.lock();
        if session.is_authenticated() {
            session.logout();
            emit(&*self.bus, AppEvent::LoggedOut);
        }
    }

    pub fn current_user(&self) -> Option<UserProfile> {
        self.lock().current().cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, AuthSession> {
        self.session.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
