//! Authentication context over an external identity provider.
//!
//! The provider (Firebase Authentication in the web app) is a port: it
//! signs users in and out, mints ID tokens, and pushes identity changes.
//! [`AuthContext`] turns those pushes into a three-state value the pages
//! can read, and hands out fresh bearer tokens for API writes.

use crate::models::AuthenticatedUser;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Email already in use")]
    EmailInUse,

    #[error("Not signed in")]
    NotSignedIn,

    #[error("Identity provider error: {0}")]
    Provider(String),
}

pub type Listener<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Handle for a registered listener. Dropping it (or calling
/// [`Subscription::unsubscribe`]) detaches the listener.
#[must_use = "the listener is removed when the subscription is dropped"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn unsubscribe(mut self) {
        self.cancel_now();
    }

    fn cancel_now(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel_now();
    }
}

type Registry<T> = Mutex<Vec<(u64, Listener<T>)>>;

/// Listener registry shared by the context and provider implementations.
pub struct Listeners<T> {
    entries: Arc<Registry<T>>,
    next_id: Arc<AtomicU64>,
}

impl<T> Clone for Listeners<T> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
            next_id: Arc::clone(&self.next_id),
        }
    }
}

impl<T> Default for Listeners<T> {
    fn default() -> Self {
        Self {
            entries: Arc::new(Mutex::new(Vec::new())),
            next_id: Arc::new(AtomicU64::new(0)),
        }
    }
}

impl<T: 'static> Listeners<T> {
    pub fn add(&self, listener: Listener<T>) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, listener));

        let entries: Weak<Registry<T>> = Arc::downgrade(&self.entries);
        Subscription::new(move || {
            if let Some(entries) = entries.upgrade() {
                entries
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .retain(|(entry_id, _)| *entry_id != id);
            }
        })
    }

    /// Call every listener. Listeners run outside the registry lock so they
    /// may subscribe or unsubscribe.
    pub fn emit(&self, value: &T) {
        let snapshot: Vec<Listener<T>> = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in snapshot {
            listener(value);
        }
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// External identity provider.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str)
        -> Result<AuthenticatedUser, AuthError>;

    async fn create_user(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthenticatedUser, AuthError>;

    /// Set the display name of the signed-in user.
    async fn update_display_name(&self, name: &str) -> Result<(), AuthError>;

    async fn sign_out(&self) -> Result<(), AuthError>;

    fn current_user(&self) -> Option<AuthenticatedUser>;

    /// A fresh ID token for the signed-in user.
    async fn id_token(&self) -> Result<String, AuthError>;

    /// Push identity changes to `listener`. Like Firebase's
    /// `onAuthStateChanged`, the current identity is delivered once on
    /// registration.
    fn subscribe(&self, listener: Listener<Option<AuthenticatedUser>>) -> Subscription;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    /// The provider has not reported yet.
    Loading,
    Authenticated(AuthenticatedUser),
    Anonymous,
}

impl AuthState {
    pub fn user(&self) -> Option<&AuthenticatedUser> {
        match self {
            AuthState::Authenticated(user) => Some(user),
            _ => None,
        }
    }
}

/// Store `next` and notify listeners unless it equals the current state.
fn publish(state: &Mutex<AuthState>, listeners: &Listeners<AuthState>, next: AuthState) {
    {
        let mut current = state.lock().unwrap_or_else(PoisonError::into_inner);
        if *current == next {
            return;
        }
        *current = next.clone();
    }
    tracing::debug!(uid = ?next.user().map(|u| &u.uid), "Auth state changed");
    listeners.emit(&next);
}

pub struct AuthContext {
    provider: Arc<dyn IdentityProvider>,
    state: Arc<Mutex<AuthState>>,
    listeners: Listeners<AuthState>,
    _provider_subscription: Subscription,
}

impl AuthContext {
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        let state = Arc::new(Mutex::new(AuthState::Loading));
        let listeners = Listeners::default();

        let provider_subscription = {
            let state = Arc::clone(&state);
            let listeners = listeners.clone();
            provider.subscribe(Arc::new(move |user: &Option<AuthenticatedUser>| {
                let next = match user {
                    Some(user) => AuthState::Authenticated(user.clone()),
                    None => AuthState::Anonymous,
                };
                publish(&state, &listeners, next);
            }))
        };

        Self {
            provider,
            state,
            listeners,
            _provider_subscription: provider_subscription,
        }
    }

    pub fn state(&self) -> AuthState {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn current_user(&self) -> Option<AuthenticatedUser> {
        self.state().user().cloned()
    }

    /// Called on every later state change; the current state is read with
    /// [`AuthContext::state`].
    pub fn on_auth_state_change(
        &self,
        callback: impl Fn(&AuthState) + Send + Sync + 'static,
    ) -> Subscription {
        self.listeners.add(Arc::new(callback))
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthenticatedUser, AuthError> {
        self.provider.sign_in(email.trim(), password).await
    }

    /// Create an account. A non-blank `name` becomes the display name.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthenticatedUser, AuthError> {
        let mut user = self.provider.create_user(email.trim(), password).await?;

        let name = name.trim();
        if !name.is_empty() {
            self.provider.update_display_name(name).await?;
            user.name = Some(name.to_string());

            // Profile updates raise no identity change; attach the name here.
            let current = self.state();
            if let Some(signed_in) = current.user().filter(|u| u.uid == user.uid) {
                let mut named = signed_in.clone();
                named.name = user.name.clone();
                publish(&self.state, &self.listeners, AuthState::Authenticated(named));
            }
        }

        tracing::info!(uid = %user.uid, "Account registered");
        Ok(user)
    }

    pub async fn logout(&self) -> Result<(), AuthError> {
        self.provider.sign_out().await
    }

    /// A fresh bearer token, or `None` when nobody is signed in. Do not keep
    /// the token across requests.
    pub async fn get_token(&self) -> Option<String> {
        self.provider.current_user()?;
        match self.provider.id_token().await {
            Ok(token) => Some(token),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to obtain ID token");
                None
            }
        }
    }
}

/// In-process identity provider for tests.
#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::collections::HashMap;

    #[derive(Default)]
    pub struct FakeIdentity {
        accounts: Mutex<HashMap<String, (String, AuthenticatedUser)>>,
        current: Mutex<Option<AuthenticatedUser>>,
        listeners: Listeners<Option<AuthenticatedUser>>,
        tokens_minted: AtomicU64,
        pub display_name_updates: Mutex<Vec<String>>,
    }

    impl FakeIdentity {
        pub fn new() -> Arc<Self> {
            Arc::new(Self::default())
        }

        pub fn with_account(self: Arc<Self>, uid: &str, email: &str, password: &str) -> Arc<Self> {
            let user = AuthenticatedUser {
                uid: uid.into(),
                email: Some(email.into()),
                name: None,
            };
            self.accounts
                .lock()
                .unwrap()
                .insert(email.into(), (password.into(), user));
            self
        }

        fn set_current(&self, user: Option<AuthenticatedUser>) {
            *self.current.lock().unwrap() = user.clone();
            self.listeners.emit(&user);
        }

        /// Simulate the provider dropping the session.
        pub fn expire_session(&self) {
            self.set_current(None);
        }
    }

    #[async_trait]
    impl IdentityProvider for FakeIdentity {
        async fn sign_in(
            &self,
            email: &str,
            password: &str,
        ) -> Result<AuthenticatedUser, AuthError> {
            let user = match self.accounts.lock().unwrap().get(email) {
                Some((stored, user)) if stored == password => user.clone(),
                _ => return Err(AuthError::InvalidCredentials),
            };
            self.set_current(Some(user.clone()));
            Ok(user)
        }

        async fn create_user(
            &self,
            email: &str,
            password: &str,
        ) -> Result<AuthenticatedUser, AuthError> {
            let user = {
                let mut accounts = self.accounts.lock().unwrap();
                if accounts.contains_key(email) {
                    return Err(AuthError::EmailInUse);
                }
                let user = AuthenticatedUser {
                    uid: format!("uid-{}", accounts.len() + 1),
                    email: Some(email.into()),
                    name: None,
                };
                accounts.insert(email.into(), (password.into(), user.clone()));
                user
            };
            self.set_current(Some(user.clone()));
            Ok(user)
        }

        async fn update_display_name(&self, name: &str) -> Result<(), AuthError> {
            let mut current = self.current.lock().unwrap();
            let user = current.as_mut().ok_or(AuthError::NotSignedIn)?;
            user.name = Some(name.into());
            self.display_name_updates.lock().unwrap().push(name.into());
            Ok(())
        }

        async fn sign_out(&self) -> Result<(), AuthError> {
            self.set_current(None);
            Ok(())
        }

        fn current_user(&self) -> Option<AuthenticatedUser> {
            self.current.lock().unwrap().clone()
        }

        async fn id_token(&self) -> Result<String, AuthError> {
            let uid = self
                .current_user()
                .ok_or(AuthError::NotSignedIn)?
                .uid;
            let n = self.tokens_minted.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(format!("token-{uid}-{n}"))
        }

        fn subscribe(&self, listener: Listener<Option<AuthenticatedUser>>) -> Subscription {
            listener(&self.current_user());
            self.listeners.add(listener)
        }
    }
}
