//! Tests for IntegrationParams and ParamsStore

use super::*;
use crate::connector::CredentialsUpdate;
use crate::types::{ConnectionState, Identity, IntegrationCredentials, IntegrationKind};
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::tempdir;

fn creds() -> IntegrationCredentials {
    IntegrationCredentials::new(json!({"access_token": "tok"}))
}

fn connected(kind: IntegrationKind) -> CredentialsUpdate {
    CredentialsUpdate::Connected {
        kind,
        credentials: creds(),
    }
}

// ============================================================================
// IntegrationParams Tests
// ============================================================================

#[test]
fn test_params_apply_connected() {
    let mut params = IntegrationParams::new();
    assert_eq!(params.connection_state(), ConnectionState::Disconnected);

    assert!(params.apply(connected(IntegrationKind::HubSpot)));

    assert_eq!(params.kind, Some(IntegrationKind::HubSpot));
    assert_eq!(params.credentials, Some(creds()));
    assert!(params.updated_at.is_some());
    assert_eq!(params.connection_state(), ConnectionState::Connected);
}

#[test]
fn test_params_apply_cleared() {
    let mut params = IntegrationParams::new();
    params.identity = Some(Identity::new("u", "o"));
    params.apply(connected(IntegrationKind::Notion));

    assert!(params.apply(CredentialsUpdate::Cleared {
        kind: IntegrationKind::Notion
    }));

    assert!(params.kind.is_none());
    assert!(params.credentials.is_none());
    assert_eq!(params.identity, Some(Identity::new("u", "o")));
    assert_eq!(params.connection_state(), ConnectionState::Disconnected);
}

#[test]
fn test_params_cleared_for_other_integration_is_ignored() {
    let mut params = IntegrationParams::new();
    params.apply(connected(IntegrationKind::Notion));

    assert!(!params.apply(CredentialsUpdate::Cleared {
        kind: IntegrationKind::Airtable
    }));
    assert_eq!(params.kind, Some(IntegrationKind::Notion));
}

#[test]
fn test_params_credentials_for() {
    let mut params = IntegrationParams::new();
    params.apply(connected(IntegrationKind::HubSpot));

    assert_eq!(
        params.credentials_for(IntegrationKind::HubSpot),
        Some(&creds())
    );
    assert!(params.credentials_for(IntegrationKind::Notion).is_none());
}

#[test]
fn test_params_serde_shape() {
    let mut params = IntegrationParams::new();
    params.apply(connected(IntegrationKind::HubSpot));

    let value = serde_json::to_value(&params).unwrap();
    assert_eq!(value["type"], "HubSpot");
    assert_eq!(value["credentials"]["access_token"], "tok");
    assert!(value.get("identity").is_none());

    let empty: IntegrationParams = serde_json::from_str("{}").unwrap();
    assert_eq!(empty, IntegrationParams::default());
}

// ============================================================================
// ParamsStore Tests
// ============================================================================

#[test]
fn test_store_in_memory() {
    let store = ParamsStore::in_memory();
    assert!(store.is_in_memory());
}

#[test]
fn test_store_new() {
    let store = ParamsStore::new("/tmp/params.json");
    assert!(!store.is_in_memory());
    assert_eq!(store.path().to_str().unwrap(), "/tmp/params.json");
}

#[tokio::test]
async fn test_store_in_memory_apply() {
    let store = ParamsStore::in_memory();

    assert!(store.apply(connected(IntegrationKind::HubSpot)).await.unwrap());
    assert_eq!(
        store.params().await.connection_state(),
        ConnectionState::Connected
    );

    store.clear().await.unwrap();
    assert_eq!(store.params().await, IntegrationParams::default());
}

#[tokio::test]
async fn test_store_persists_and_reloads() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("params.json");

    let store = ParamsStore::from_file(&path).unwrap();
    store
        .set_identity(Identity::new("TestUser", "TestOrg"))
        .await
        .unwrap();
    store
        .apply(connected(IntegrationKind::Airtable))
        .await
        .unwrap();
    assert!(path.exists());
    assert!(!path.with_extension("tmp").exists());

    let reloaded = ParamsStore::from_file(&path).unwrap();
    let params = reloaded.params().await;
    assert_eq!(params.kind, Some(IntegrationKind::Airtable));
    assert_eq!(params.credentials, Some(creds()));
    assert_eq!(params.identity, Some(Identity::new("TestUser", "TestOrg")));
}

#[tokio::test]
async fn test_store_missing_file_starts_empty() {
    let dir = tempdir().unwrap();
    let store = ParamsStore::from_file(dir.path().join("absent.json")).unwrap();
    assert_eq!(store.params().await, IntegrationParams::default());
}

#[test]
fn test_store_corrupt_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("params.json");
    std::fs::write(&path, "{not json").unwrap();

    let err = ParamsStore::from_file(&path).unwrap_err();
    assert!(err.to_string().contains("Failed to parse params file"));
}

#[tokio::test]
async fn test_store_clone_shares_params() {
    let store = ParamsStore::in_memory();
    let clone = store.clone();

    clone
        .apply(connected(IntegrationKind::HubSpot))
        .await
        .unwrap();

    assert_eq!(store.params().await.kind, Some(IntegrationKind::HubSpot));
}
