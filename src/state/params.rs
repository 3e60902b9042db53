//! Parent-owned integration parameters

use crate::connector::CredentialsUpdate;
use crate::types::{ConnectionState, Identity, IntegrationCredentials, IntegrationKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The integration a parent view is working with and its credentials
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntegrationParams {
    /// Integration the credentials belong to
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<IntegrationKind>,

    /// Credentials from the last successful connect
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials: Option<IntegrationCredentials>,

    /// Identity the credentials were issued for
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity: Option<Identity>,

    /// When `kind`/`credentials` last changed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl IntegrationParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply an update reported by a connector. Returns whether anything changed.
    ///
    /// A `Cleared` update for a different integration than the stored one
    /// is ignored.
    pub fn apply(&mut self, update: CredentialsUpdate) -> bool {
        match update {
            CredentialsUpdate::Connected { kind, credentials } => {
                self.kind = Some(kind);
                self.credentials = Some(credentials);
                self.updated_at = Some(Utc::now());
                true
            }
            CredentialsUpdate::Cleared { kind } => {
                if self.kind.is_some_and(|current| current != kind) {
                    return false;
                }
                let changed = self.kind.is_some() || self.credentials.is_some();
                self.kind = None;
                self.credentials = None;
                self.updated_at = Some(Utc::now());
                changed
            }
        }
    }

    /// Credentials usable for `kind`, if the stored ones belong to it
    pub fn credentials_for(&self, kind: IntegrationKind) -> Option<&IntegrationCredentials> {
        if self.kind == Some(kind) {
            self.credentials.as_ref()
        } else {
            None
        }
    }

    /// Connection state derived from the stored credentials
    pub fn connection_state(&self) -> ConnectionState {
        ConnectionState::from_credentials(self.credentials.as_ref())
    }
}
