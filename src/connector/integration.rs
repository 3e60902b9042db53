//! Integration connector implementation
//!
//! Drives the OAuth lifecycle of one integration:
//!
//! ```text
//! Disconnected --connect--> Connecting --exchange ok--> Connected
//!       ^                        |                          |
//!       +---- exchange failed ---+                          |
//!       +--------------------- disconnect ok ---------------+
//! ```

use super::surface::{AuthorizationSurface, SurfaceHandle};
use crate::api::IntegrationApi;
use crate::error::{Error, Result};
use crate::notify::{LogNotifier, Notifier};
use crate::types::{
    has_credentials, ConnectionState, Identity, IntegrationCredentials, IntegrationKind,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Default interval between authorization surface polls
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Change the parent must apply to the credentials it owns
#[derive(Debug, Clone, PartialEq)]
pub enum CredentialsUpdate {
    /// OAuth completed; these credentials now belong to `kind`
    Connected {
        kind: IntegrationKind,
        credentials: IntegrationCredentials,
    },
    /// The integration was disconnected; drop its credentials
    Cleared { kind: IntegrationKind },
}

/// Callback through which the connector reports to its parent
pub type UpdateCallback = Box<dyn FnMut(CredentialsUpdate) + Send>;

/// Result of one poll tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// Still waiting for the authorization surface to close
    Pending,
    /// The surface closed and the credential exchange ran
    Completed(ConnectionState),
    /// Nothing to poll
    Idle,
}

/// OAuth connect/disconnect lifecycle for one integration
pub struct IntegrationConnector {
    kind: IntegrationKind,
    identity: Identity,
    api: Arc<dyn IntegrationApi>,
    surface: Arc<dyn AuthorizationSurface>,
    notifier: Arc<dyn Notifier>,
    on_update: Option<UpdateCallback>,
    poll_interval: Duration,
    state: ConnectionState,
    credentials: Option<IntegrationCredentials>,
    pending: Option<Box<dyn SurfaceHandle>>,
}

impl IntegrationConnector {
    /// Create a disconnected connector
    pub fn new(
        kind: IntegrationKind,
        identity: Identity,
        api: Arc<dyn IntegrationApi>,
        surface: Arc<dyn AuthorizationSurface>,
    ) -> Self {
        Self {
            kind,
            identity,
            api,
            surface,
            notifier: Arc::new(LogNotifier),
            on_update: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
            state: ConnectionState::Disconnected,
            credentials: None,
            pending: None,
        }
    }

    /// Route user-facing alerts to `notifier`
    #[must_use]
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Set the interval between authorization surface polls
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Register the parent's update callback
    #[must_use]
    pub fn on_update(mut self, callback: impl FnMut(CredentialsUpdate) + Send + 'static) -> Self {
        self.on_update = Some(Box::new(callback));
        self
    }

    pub fn kind(&self) -> IntegrationKind {
        self.kind
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn credentials(&self) -> Option<&IntegrationCredentials> {
        self.credentials.as_ref()
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Whether a connect is in flight
    pub fn is_connecting(&self) -> bool {
        self.state == ConnectionState::Connecting
    }

    /// Whether an authorization surface is open and being watched
    pub fn is_polling(&self) -> bool {
        self.pending.is_some()
    }

    /// Run the whole connect flow: authorize, open the surface, poll it
    /// until it closes, then exchange for credentials.
    pub async fn connect(&mut self) -> Result<ConnectionState> {
        self.begin_connect().await?;

        // The timer is dropped when this loop returns, so it is cancelled exactly once.
        let mut ticker = interval_at(Instant::now() + self.poll_interval, self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            match self.poll_surface().await? {
                PollOutcome::Pending => continue,
                PollOutcome::Completed(state) => return Ok(state),
                PollOutcome::Idle => return Ok(self.state),
            }
        }
    }

    /// First half of [`connect`](Self::connect): request the authorization
    /// URL, open it, and enter `Connecting`.
    ///
    /// On failure the connector is back in `Disconnected` and nothing is
    /// left to poll.
    pub async fn begin_connect(&mut self) -> Result<()> {
        if self.state != ConnectionState::Disconnected {
            let err = Error::invalid_state("connect", self.state);
            return Err(self.report(err));
        }
        if let Err(err) = self.identity.validate() {
            return Err(self.report(err));
        }

        self.transition(ConnectionState::Connecting);

        let url = match self.api.authorize(self.kind, &self.identity).await {
            Ok(url) => url,
            Err(err) => {
                self.transition(ConnectionState::Disconnected);
                return Err(self.report(err));
            }
        };

        let title = format!("{} Authorization", self.kind);
        match self.surface.open(&url, &title) {
            Ok(handle) => {
                debug!(integration = %self.kind, "authorization surface opened");
                self.pending = Some(handle);
                Ok(())
            }
            Err(err) => {
                self.transition(ConnectionState::Disconnected);
                Err(self.report(err))
            }
        }
    }

    /// One poll tick. The first tick that sees the surface closed runs the
    /// credential exchange; every later tick is `Idle`.
    pub async fn poll_surface(&mut self) -> Result<PollOutcome> {
        if self.state != ConnectionState::Connecting {
            return Ok(PollOutcome::Idle);
        }
        let Some(handle) = self.pending.as_ref() else {
            return Ok(PollOutcome::Idle);
        };
        if !handle.is_closed() {
            return Ok(PollOutcome::Pending);
        }

        self.pending = None;
        debug!(integration = %self.kind, "authorization surface closed");
        self.exchange_credentials().await.map(PollOutcome::Completed)
    }

    async fn exchange_credentials(&mut self) -> Result<ConnectionState> {
        let fetched = self
            .api
            .fetch_credentials(self.kind, &self.identity)
            .await
            .and_then(|credentials| {
                credentials
                    .filter(|c| !c.is_empty())
                    .ok_or_else(|| Error::CredentialsUnavailable {
                        integration: self.kind.to_string(),
                    })
            });

        match fetched {
            Ok(credentials) => {
                self.credentials = Some(credentials.clone());
                self.transition(ConnectionState::Connected);
                self.notify_parent(CredentialsUpdate::Connected {
                    kind: self.kind,
                    credentials,
                });
                Ok(ConnectionState::Connected)
            }
            Err(err) => {
                // Credentials the parent handed over while pending still count
                let settled = ConnectionState::from_credentials(self.credentials.as_ref());
                self.transition(settled);
                Err(self.report(err))
            }
        }
    }

    /// Revoke the connection. On backend failure nothing changes locally.
    pub async fn disconnect(&mut self) -> Result<()> {
        if self.state != ConnectionState::Connected {
            let err = Error::invalid_state("disconnect", self.state);
            return Err(self.report(err));
        }
        if let Err(err) = self.identity.validate() {
            return Err(self.report(err));
        }

        if let Err(err) = self.api.disconnect(self.kind, &self.identity).await {
            return Err(self.report(err));
        }

        self.credentials = None;
        self.transition(ConnectionState::Disconnected);
        self.notify_parent(CredentialsUpdate::Cleared { kind: self.kind });
        Ok(())
    }

    /// Re-derive the connection state from credentials held by the parent.
    ///
    /// Call this whenever the parent's credentials change. A pending
    /// connect is left to finish on its own.
    pub fn sync_credentials(
        &mut self,
        credentials: Option<&IntegrationCredentials>,
    ) -> ConnectionState {
        self.credentials = credentials.filter(|c| !c.is_empty()).cloned();
        if self.state != ConnectionState::Connecting {
            let derived = ConnectionState::from_credentials(self.credentials.as_ref());
            if derived != self.state {
                self.transition(derived);
            }
        }
        self.state
    }

    /// Whether the connector currently holds usable credentials
    pub fn has_credentials(&self) -> bool {
        has_credentials(self.credentials.as_ref())
    }

    fn transition(&mut self, next: ConnectionState) {
        info!(integration = %self.kind, from = %self.state, to = %next, "connection state changed");
        self.state = next;
    }

    fn notify_parent(&mut self, update: CredentialsUpdate) {
        if let Some(callback) = self.on_update.as_mut() {
            callback(update);
        }
    }

    /// Surface `err` to the user and hand it back to the caller
    fn report(&self, err: Error) -> Error {
        let message = err.user_message(None);
        warn!(integration = %self.kind, error = %err, "connector action failed");
        self.notifier.alert(&message);
        err
    }
}

impl std::fmt::Debug for IntegrationConnector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntegrationConnector")
            .field("kind", &self.kind)
            .field("identity", &self.identity)
            .field("state", &self.state)
            .field("has_credentials", &self.has_credentials())
            .field("polling", &self.pending.is_some())
            .field("poll_interval", &self.poll_interval)
            .finish_non_exhaustive()
    }
}
