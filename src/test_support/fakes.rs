use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::auth::{AuthError, AuthResult, AuthStateObserver, IdentityProvider, User, UserInfo};
use crate::panels::{BarChart, ChartSink, Region};
use crate::session::{Navigator, RenderedStatus, StatusDisplay};
use crate::util::{ObserverList, Unsubscribe};

pub const SCRIPTED_ID_TOKEN: &str = "scripted-id-token";

/// Navigator that records every navigation instead of leaving the page.
pub struct RecordingNavigator {
    path: Mutex<String>,
    visits: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn at(path: &str) -> Arc<Self> {
        Arc::new(Self {
            path: Mutex::new(path.to_string()),
            visits: Mutex::new(Vec::new()),
        })
    }

    pub fn visits(&self) -> Vec<String> {
        self.visits.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn current_path(&self) -> String {
        self.path.lock().unwrap().clone()
    }

    fn navigate(&self, path: &str) {
        self.visits.lock().unwrap().push(path.to_string());
    }
}

#[derive(Default)]
pub struct RecordingStatus {
    shown: Mutex<Vec<RenderedStatus>>,
}

impl RecordingStatus {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn history(&self) -> Vec<RenderedStatus> {
        self.shown.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<RenderedStatus> {
        self.shown.lock().unwrap().last().cloned()
    }
}

impl StatusDisplay for RecordingStatus {
    fn show(&self, status: &RenderedStatus) {
        self.shown.lock().unwrap().push(status.clone());
    }
}

/// Region that keeps every markup it was given.
#[derive(Default)]
pub struct MemoryRegion {
    writes: Mutex<Vec<String>>,
}

impl MemoryRegion {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn history(&self) -> Vec<String> {
        self.writes.lock().unwrap().clone()
    }

    pub fn current(&self) -> String {
        self.writes.lock().unwrap().last().cloned().unwrap_or_default()
    }
}

impl Region for MemoryRegion {
    fn set_html(&self, markup: &str) {
        self.writes.lock().unwrap().push(markup.to_string());
    }
}

#[derive(Default)]
pub struct RecordingChart {
    charts: Mutex<Vec<BarChart>>,
}

impl RecordingChart {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn charts(&self) -> Vec<BarChart> {
        self.charts.lock().unwrap().clone()
    }
}

impl ChartSink for RecordingChart {
    fn draw_bar_chart(&self, chart: &BarChart) {
        self.charts.lock().unwrap().push(chart.clone());
    }
}

/// Identity provider whose answers are set up by the test.
///
/// Successful sign-ins make a user current and notify observers, like the real provider.
/// Every signed-in user mints [`SCRIPTED_ID_TOKEN`].
#[derive(Default)]
pub struct ScriptedIdentity {
    user: Mutex<Option<Arc<User>>>,
    sign_in_error: Mutex<Option<AuthError>>,
    sign_out_error: Mutex<Option<AuthError>>,
    listeners: ObserverList<Option<Arc<User>>>,
    sign_in_calls: AtomicUsize,
    sign_out_calls: AtomicUsize,
}

impl ScriptedIdentity {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn signed_in(email: &str) -> Arc<Self> {
        let identity = Self::default();
        *identity.user.lock().unwrap() = Some(Arc::new(scripted_user(email)));
        Arc::new(identity)
    }

    pub fn fail_sign_in(&self, error: AuthError) {
        *self.sign_in_error.lock().unwrap() = Some(error);
    }

    pub fn fail_sign_out(&self, error: AuthError) {
        *self.sign_out_error.lock().unwrap() = Some(error);
    }

    pub fn sign_in_calls(&self) -> usize {
        self.sign_in_calls.load(Ordering::SeqCst)
    }

    pub fn sign_out_calls(&self) -> usize {
        self.sign_out_calls.load(Ordering::SeqCst)
    }
}

fn scripted_user(email: &str) -> User {
    User::new(UserInfo {
        uid: format!("uid-{email}"),
        email: Some(email.to_string()),
        display_name: None,
        provider_id: "password".to_string(),
    })
}

#[async_trait]
impl IdentityProvider for ScriptedIdentity {
    async fn sign_in_with_email_and_password(
        &self,
        email: &str,
        _password: &str,
    ) -> AuthResult<Arc<User>> {
        self.sign_in_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = self.sign_in_error.lock().unwrap().clone() {
            return Err(error);
        }
        let user = Arc::new(scripted_user(email));
        *self.user.lock().unwrap() = Some(Arc::clone(&user));
        self.listeners.notify(&Some(Arc::clone(&user)));
        Ok(user)
    }

    async fn id_token(&self, _force_refresh: bool) -> AuthResult<Option<String>> {
        Ok(self
            .user
            .lock()
            .unwrap()
            .as_ref()
            .map(|_| SCRIPTED_ID_TOKEN.to_string()))
    }

    async fn sign_out(&self) -> AuthResult<()> {
        self.sign_out_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = self.sign_out_error.lock().unwrap().clone() {
            return Err(error);
        }
        *self.user.lock().unwrap() = None;
        self.listeners.notify(&None);
        Ok(())
    }

    fn on_auth_state_changed(&self, observer: AuthStateObserver) -> Unsubscribe {
        if let Some(next) = observer.next.clone() {
            next(&self.user.lock().unwrap().clone());
        }
        self.listeners.add(observer)
    }
}
