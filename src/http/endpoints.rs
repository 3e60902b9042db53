//! Backend endpoint paths

use crate::types::IntegrationKind;

/// A backend endpoint, parameterized by integration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// Start the OAuth flow
    Authorize,
    /// Collect credentials stored by the OAuth callback
    Credentials,
    /// Forget stored credentials
    Disconnect,
    /// Fetch one page of items
    Items,
}

impl Endpoint {
    /// Path relative to the backend base URL
    pub fn path(self, kind: IntegrationKind) -> String {
        let segment = kind.path_segment();
        match self {
            Endpoint::Authorize => format!("/integrations/{segment}/authorize"),
            Endpoint::Credentials => format!("/integrations/{segment}/credentials"),
            Endpoint::Disconnect => format!("/integrations/{segment}/disconnect"),
            Endpoint::Items => format!("/integrations/{segment}/get_{segment}_items"),
        }
    }
}
