//! Common types used throughout integration-hub
//!
//! This module contains shared type definitions, type aliases,
//! and utility types used across multiple modules.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type (insertion-ordered)
pub type JsonObject = serde_json::Map<String, JsonValue>;

/// One record returned by an integration. Field order is the backend's order.
pub type LoadedItem = JsonObject;

/// Opaque pagination token, passed back to the backend verbatim
pub type PageCursor = String;

// ============================================================================
// Integration Kind
// ============================================================================

/// A supported third-party data source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntegrationKind {
    Notion,
    Airtable,
    HubSpot,
}

impl IntegrationKind {
    /// All supported integrations, in display order
    pub const ALL: [IntegrationKind; 3] = [
        IntegrationKind::Notion,
        IntegrationKind::Airtable,
        IntegrationKind::HubSpot,
    ];

    /// Name shown to the user
    pub fn display_name(self) -> &'static str {
        match self {
            IntegrationKind::Notion => "Notion",
            IntegrationKind::Airtable => "Airtable",
            IntegrationKind::HubSpot => "HubSpot",
        }
    }

    /// Segment used in backend paths (`/integrations/{segment}/...`)
    pub fn path_segment(self) -> &'static str {
        match self {
            IntegrationKind::Notion => "notion",
            IntegrationKind::Airtable => "airtable",
            IntegrationKind::HubSpot => "hubspot",
        }
    }
}

impl fmt::Display for IntegrationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for IntegrationKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|kind| {
                kind.display_name().eq_ignore_ascii_case(needle)
                    || kind.path_segment().eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| Error::UnknownIntegration {
                name: needle.to_string(),
            })
    }
}

// ============================================================================
// Identity
// ============================================================================

/// The (user, organization) pair an integration is authorized for
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: String,
    pub org_id: String,
}

impl Identity {
    pub fn new(user_id: impl Into<String>, org_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            org_id: org_id.into(),
        }
    }

    /// Ensure both ids are present
    pub fn validate(&self) -> Result<()> {
        if self.user_id.trim().is_empty() {
            return Err(Error::missing_identity("user_id"));
        }
        if self.org_id.trim().is_empty() {
            return Err(Error::missing_identity("org_id"));
        }
        Ok(())
    }

    /// Form fields sent to the authorize/credentials/disconnect endpoints
    pub fn form_fields(&self) -> [(&'static str, &str); 2] {
        [("user_id", self.user_id.as_str()), ("org_id", self.org_id.as_str())]
    }
}

// ============================================================================
// Credentials
// ============================================================================

/// Token bundle returned by the backend after the OAuth exchange.
///
/// Never inspected by this crate; only checked for emptiness and
/// forwarded back to the backend as a JSON string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IntegrationCredentials(JsonValue);

impl IntegrationCredentials {
    pub fn new(value: JsonValue) -> Self {
        Self(value)
    }

    /// Null, `""`, `{}` and `[]` carry no credentials
    pub fn is_empty(&self) -> bool {
        match &self.0 {
            JsonValue::Null => true,
            JsonValue::String(s) => s.is_empty(),
            JsonValue::Object(map) => map.is_empty(),
            JsonValue::Array(items) => items.is_empty(),
            _ => false,
        }
    }

    pub fn as_value(&self) -> &JsonValue {
        &self.0
    }

    pub fn into_value(self) -> JsonValue {
        self.0
    }

    /// Serialized form sent in the `credentials` form field
    pub fn to_form_value(&self) -> String {
        self.0.to_string()
    }
}

impl From<JsonValue> for IntegrationCredentials {
    fn from(value: JsonValue) -> Self {
        Self(value)
    }
}

/// Whether an optional credential slot holds usable credentials
pub fn has_credentials(credentials: Option<&IntegrationCredentials>) -> bool {
    credentials.is_some_and(|c| !c.is_empty())
}

// ============================================================================
// Connection State
// ============================================================================

/// Lifecycle of one integration connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

impl ConnectionState {
    /// Derive the settled state from the presence of credentials
    pub fn from_credentials(credentials: Option<&IntegrationCredentials>) -> Self {
        if has_credentials(credentials) {
            ConnectionState::Connected
        } else {
            ConnectionState::Disconnected
        }
    }

    /// Status line shown to the user
    pub fn status_label(self) -> &'static str {
        match self {
            ConnectionState::Disconnected => "Not Connected",
            ConnectionState::Connecting => "Connecting...",
            ConnectionState::Connected => "Connected",
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConnectionState::Disconnected => "Disconnected",
            ConnectionState::Connecting => "Connecting",
            ConnectionState::Connected => "Connected",
        };
        f.write_str(name)
    }
}

// ============================================================================
// Utilities
// ============================================================================

/// Extension trait for Option<String> to handle empty strings
pub trait OptionStringExt {
    /// Returns None if the string is empty
    fn none_if_empty(self) -> Option<String>;
}

impl OptionStringExt for Option<String> {
    fn none_if_empty(self) -> Option<String> {
        self.filter(|s| !s.is_empty())
    }
}

impl OptionStringExt for String {
    fn none_if_empty(self) -> Option<String> {
        if self.is_empty() {
            None
        } else {
            Some(self)
        }
    }
}
