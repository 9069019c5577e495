use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::app::RoutesConfig;
use crate::auth::{AuthError, AuthStateObserver, IdentityProvider, User};
use crate::platform::runtime::spawn_detached;
use crate::session::endpoint::{SessionEndpoint, SessionProof};
use crate::session::error::BridgeError;
use crate::session::navigator::Navigator;
use crate::session::state::{BridgeOutcome, BridgeState};
use crate::session::status::{
    BridgeStatus, StatusDisplay, DEFAULT_SUCCESS_MESSAGE, IN_PROGRESS_MESSAGE,
    MISSING_INPUT_MESSAGE, SIGNED_OUT_PROMPT,
};
use crate::session::LOGGER;
use crate::util::{ObserverList, PartialObserver, Unsubscribe};

/// Keeps the server session in step with the identity provider.
///
/// Three triggers drive it: an explicit sign-in, identity-state notifications
/// (passive reconciliation) and an explicit sign-out. Only one session exchange runs at a
/// time; whichever trigger claims the `Bridging` state owns the exchange, the status line
/// and the landing navigation for that attempt, and every other trigger backs off.
pub struct SessionBridge {
    identity: Arc<dyn IdentityProvider>,
    endpoint: SessionEndpoint,
    navigator: Arc<dyn Navigator>,
    status_display: Option<Arc<dyn StatusDisplay>>,
    routes: RoutesConfig,
    state: Mutex<BridgeState>,
    status: Mutex<Option<BridgeStatus>>,
    navigated: AtomicBool,
    state_listeners: ObserverList<BridgeState>,
    subscription: Mutex<Option<Unsubscribe>>,
}

impl SessionBridge {
    pub fn builder(
        identity: Arc<dyn IdentityProvider>,
        endpoint: SessionEndpoint,
        navigator: Arc<dyn Navigator>,
    ) -> SessionBridgeBuilder {
        SessionBridgeBuilder {
            identity,
            endpoint,
            navigator,
            status_display: None,
            routes: RoutesConfig::default(),
        }
    }

    pub fn state(&self) -> BridgeState {
        *self.state.lock().unwrap()
    }

    /// The status line as last shown, if anything has been shown yet.
    pub fn status(&self) -> Option<BridgeStatus> {
        self.status.lock().unwrap().clone()
    }

    pub fn routes(&self) -> &RoutesConfig {
        &self.routes
    }

    /// Reports every state transition, in order.
    pub fn on_state_change(&self, observer: PartialObserver<BridgeState>) -> Unsubscribe {
        self.state_listeners.add(observer)
    }

    /// Subscribes to the identity provider so each notification reconciles the server
    /// session in the background.
    ///
    /// Providers replay their current state on subscription, so a live credential found at
    /// page load starts an exchange right away. Installing twice replaces the previous
    /// subscription.
    pub fn install(self: &Arc<Self>) {
        let bridge = Arc::downgrade(self);
        let observer = AuthStateObserver::new().with_next(move |user: &Option<Arc<User>>| {
            let Some(bridge) = bridge.upgrade() else {
                return;
            };
            let user = user.clone();
            spawn_detached(async move {
                if let Err(err) = bridge.handle_auth_state(user).await {
                    LOGGER.debug(format!("Passive reconciliation ended with: {err}"));
                }
            });
        });

        let unsubscribe = self.identity.on_auth_state_changed(observer);
        let previous = self.subscription.lock().unwrap().replace(unsubscribe);
        if let Some(previous) = previous {
            previous();
        }
    }

    /// Drops the identity subscription installed by [`SessionBridge::install`].
    pub fn uninstall(&self) {
        let subscription = self.subscription.lock().unwrap().take();
        if let Some(unsubscribe) = subscription {
            unsubscribe();
        }
    }

    /// Handles the sign-in control: verifies the credentials with the identity provider,
    /// then exchanges the resulting token for a server session.
    ///
    /// A submission while another attempt is running returns
    /// [`BridgeOutcome::Deduplicated`] and leaves the status line alone, whatever the input.
    /// Otherwise empty input fails with [`BridgeError::Validation`] before any request is
    /// made.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<BridgeOutcome, BridgeError> {
        let missing_input = email.trim().is_empty() || password.is_empty();
        {
            let mut state = self.state.lock().unwrap();
            if state.is_busy() {
                LOGGER.debug(format!("Sign-in ignored while {}", *state));
                return Ok(BridgeOutcome::Deduplicated);
            }
            if !missing_input {
                *state = BridgeState::Authenticating;
            }
        }
        if missing_input {
            LOGGER.debug("Sign-in submitted with missing input");
            self.show(BridgeStatus::error(MISSING_INPUT_MESSAGE));
            return Err(BridgeError::Validation);
        }
        self.state_listeners.notify(&BridgeState::Authenticating);
        self.show(BridgeStatus::neutral(IN_PROGRESS_MESSAGE));

        if let Err(err) = self
            .identity
            .sign_in_with_email_and_password(email, password)
            .await
        {
            LOGGER.warn(format!("Identity provider rejected sign-in: {err}"));
            return Err(self.fail_from(BridgeState::Authenticating, BridgeError::Provider(err)));
        }

        let proof = match self.identity.id_token(false).await {
            Ok(Some(token)) => SessionProof::new(token),
            Ok(None) => {
                return Err(self.fail_from(
                    BridgeState::Authenticating,
                    BridgeError::Provider(AuthError::NotSignedIn),
                ))
            }
            Err(err) => {
                LOGGER.warn(format!("Could not mint an ID token after sign-in: {err}"));
                return Err(self.fail_from(BridgeState::Authenticating, BridgeError::Provider(err)));
            }
        };

        // A passive reconciliation may have claimed the exchange while we were awaiting the
        // provider; in that case it owns the outcome.
        self.exchange(proof, |state| state == BridgeState::Authenticating)
            .await
    }

    /// Reacts to one identity-state notification.
    pub async fn handle_auth_state(
        &self,
        user: Option<Arc<User>>,
    ) -> Result<BridgeOutcome, BridgeError> {
        match user {
            Some(user) => {
                LOGGER.debug(format!("Credential present for user {}", user.uid()));
                self.reconcile().await
            }
            None => {
                self.handle_signed_out();
                Ok(BridgeOutcome::Idle)
            }
        }
    }

    /// Re-establishes the server session from the provider's live credential.
    ///
    /// Does nothing when an exchange is already running or has succeeded, or when the
    /// provider has no signed-in user. A stored credential the provider can no longer turn
    /// into a token is reported on the status line.
    pub async fn reconcile(&self) -> Result<BridgeOutcome, BridgeError> {
        if !self.state().accepts_exchange() {
            return Ok(BridgeOutcome::Deduplicated);
        }

        let proof = match self.identity.id_token(false).await {
            Ok(Some(token)) => SessionProof::new(token),
            Ok(None) => return Ok(BridgeOutcome::Idle),
            Err(err) => {
                LOGGER.warn(format!("Could not mint an ID token for reconciliation: {err}"));
                return Err(self.fail_idle(BridgeError::Provider(err)));
            }
        };

        self.exchange(proof, BridgeState::accepts_exchange).await
    }

    /// Signs out of the provider (best effort), then always leaves for the logout route so
    /// the server tears its session down.
    pub async fn sign_out(&self) {
        if let Err(err) = self.identity.sign_out().await {
            LOGGER.warn(format!("Identity provider sign-out failed: {err}"));
        }
        self.set_state(BridgeState::Anonymous);
        LOGGER.info(format!("Navigating to {}", self.routes.logout));
        self.navigator.navigate(&self.routes.logout);
    }

    fn handle_signed_out(&self) {
        let path = self.navigator.current_path();
        if !self.routes.is_entry_page(&path) {
            LOGGER.debug(format!("No credential present on {path}"));
            return;
        }

        let reset = {
            let mut state = self.state.lock().unwrap();
            if state.is_busy() {
                false
            } else {
                *state = BridgeState::Anonymous;
                true
            }
        };
        if reset {
            self.state_listeners.notify(&BridgeState::Anonymous);
            self.show(BridgeStatus::neutral(SIGNED_OUT_PROMPT));
        }
    }

    async fn exchange(
        &self,
        proof: SessionProof,
        may_claim: impl Fn(BridgeState) -> bool,
    ) -> Result<BridgeOutcome, BridgeError> {
        if !self.try_claim(may_claim) {
            LOGGER.debug("Session exchange already claimed; skipping");
            return Ok(BridgeOutcome::Deduplicated);
        }

        match self.endpoint.exchange(&proof).await {
            Ok(ack) => {
                if !self.replace_state(BridgeState::Bridging, BridgeState::Established) {
                    LOGGER.debug("Session exchange finished after sign-out; discarding it");
                    return Ok(BridgeOutcome::Superseded);
                }
                let message = ack
                    .message
                    .filter(|message| !message.is_empty())
                    .unwrap_or_else(|| DEFAULT_SUCCESS_MESSAGE.to_string());
                LOGGER.info("Server session established");
                self.show(BridgeStatus::success(message));
                let navigated = self.navigate_to_landing();
                Ok(BridgeOutcome::Established { navigated })
            }
            Err(err) => Err(self.fail_from(BridgeState::Bridging, err)),
        }
    }

    fn try_claim(&self, may_claim: impl Fn(BridgeState) -> bool) -> bool {
        {
            let mut state = self.state.lock().unwrap();
            if !may_claim(*state) {
                return false;
            }
            *state = BridgeState::Bridging;
        }
        self.state_listeners.notify(&BridgeState::Bridging);
        true
    }

    /// Leaves an entry page for the landing page, at most once per bridge.
    fn navigate_to_landing(&self) -> bool {
        if !self.routes.is_entry_page(&self.navigator.current_path()) {
            return false;
        }
        if self.navigated.swap(true, Ordering::SeqCst) {
            return false;
        }
        LOGGER.info(format!("Navigating to {}", self.routes.landing));
        self.navigator.navigate(&self.routes.landing);
        true
    }

    /// Ends the attempt that owns `owner`: shows the error, passes through `Failed` and
    /// returns to `Anonymous`. Leaves everything untouched if another trigger has since
    /// taken over.
    fn fail_from(&self, owner: BridgeState, error: BridgeError) -> BridgeError {
        {
            let mut state = self.state.lock().unwrap();
            if *state != owner {
                LOGGER.debug(format!("Dropping failure from superseded attempt: {error}"));
                return error;
            }
            *state = BridgeState::Failed;
        }
        LOGGER.error(format!("Sign-in attempt failed: {error}"));
        self.show(BridgeStatus::error(error.user_message()));
        self.state_listeners.notify(&BridgeState::Failed);
        self.set_state(BridgeState::Anonymous);
        error
    }

    /// Fails a passive attempt that never claimed the exchange. Only applies while no other
    /// trigger is running or has established the session.
    fn fail_idle(&self, error: BridgeError) -> BridgeError {
        let current = self.state();
        if !matches!(current, BridgeState::Anonymous | BridgeState::Failed) {
            LOGGER.debug(format!("Dropping passive failure while {current}: {error}"));
            return error;
        }
        LOGGER.error(format!("Session reconciliation failed: {error}"));
        self.show(BridgeStatus::error(error.user_message()));
        self.set_state(BridgeState::Anonymous);
        error
    }

    /// Moves from `expected` to `next`; returns false, changing nothing, if the state has
    /// moved on.
    fn replace_state(&self, expected: BridgeState, next: BridgeState) -> bool {
        {
            let mut state = self.state.lock().unwrap();
            if *state != expected {
                return false;
            }
            *state = next;
        }
        self.state_listeners.notify(&next);
        true
    }

    fn set_state(&self, next: BridgeState) {
        {
            let mut state = self.state.lock().unwrap();
            if *state == next {
                return;
            }
            *state = next;
        }
        self.state_listeners.notify(&next);
    }

    fn show(&self, status: BridgeStatus) {
        if let Some(display) = &self.status_display {
            display.show(&status.render());
        }
        *self.status.lock().unwrap() = Some(status);
    }
}

impl Drop for SessionBridge {
    fn drop(&mut self) {
        if let Ok(slot) = self.subscription.get_mut() {
            if let Some(unsubscribe) = slot.take() {
                unsubscribe();
            }
        }
    }
}

pub struct SessionBridgeBuilder {
    identity: Arc<dyn IdentityProvider>,
    endpoint: SessionEndpoint,
    navigator: Arc<dyn Navigator>,
    status_display: Option<Arc<dyn StatusDisplay>>,
    routes: RoutesConfig,
}

impl SessionBridgeBuilder {
    /// Pages without a status element simply skip this.
    pub fn with_status_display(mut self, display: Arc<dyn StatusDisplay>) -> Self {
        self.status_display = Some(display);
        self
    }

    pub fn with_routes(mut self, routes: RoutesConfig) -> Self {
        self.routes = routes;
        self
    }

    pub fn build(self) -> Arc<SessionBridge> {
        Arc::new(SessionBridge {
            identity: self.identity,
            endpoint: self.endpoint,
            navigator: self.navigator,
            status_display: self.status_display,
            routes: self.routes,
            state: Mutex::new(BridgeState::Anonymous),
            status: Mutex::new(None),
            navigated: AtomicBool::new(false),
            state_listeners: ObserverList::default(),
            subscription: Mutex::new(None),
        })
    }
}
