//! CLI runner - executes commands

use crate::api::IntegrationApi;
use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::Config;
use crate::connector::{ConsoleSurface, CredentialsUpdate, IntegrationConnector};
use crate::error::{Error, Result};
use crate::http::HttpClient;
use crate::loader::PaginatedDataLoader;
use crate::notify::{ConsoleNotifier, Notifier};
use crate::output::{render_json, Table};
use crate::state::{ParamsStore, DEFAULT_PARAMS_PATH};
use crate::types::{ConnectionState, Identity, IntegrationKind, JsonValue, LoadedItem};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::debug;

/// CLI runner
pub struct Runner {
    cli: Cli,
    notifier: Arc<dyn Notifier>,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self {
            cli,
            notifier: Arc::new(ConsoleNotifier),
        }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Integrations => self.integrations(),
            Commands::Connect { integration } => self.connect(*integration).await,
            Commands::Disconnect => self.disconnect().await,
            Commands::Status => self.status().await,
            Commands::Load { integration, pages } => self.load(*integration, *pages).await,
        }
    }

    /// Defaults, then the config file, then environment, then flags
    fn load_config(&self) -> Result<Config> {
        let config = match &self.cli.config {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        };
        let mut config = config.with_env_overrides()?;

        if let Some(base_url) = &self.cli.base_url {
            config.base_url = base_url.clone();
            config.validate()?;
        }

        debug!(base_url = %config.base_url, page_limit = config.page_limit, "configuration loaded");
        Ok(config)
    }

    fn open_store(&self) -> Result<ParamsStore> {
        let path = self
            .cli
            .params_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PARAMS_PATH));
        ParamsStore::from_file(path)
    }

    fn build_api(config: &Config) -> Result<Arc<dyn IntegrationApi>> {
        Ok(Arc::new(HttpClient::from_config(config)?))
    }

    /// Flags win over the identity stored with the last connect
    async fn resolve_identity(&self, store: &ParamsStore) -> Identity {
        let stored = store.params().await.identity.unwrap_or_default();
        Identity::new(
            self.cli.user.clone().unwrap_or(stored.user_id),
            self.cli.org.clone().unwrap_or(stored.org_id),
        )
    }

    /// List supported integrations
    fn integrations(&self) -> Result<()> {
        let rows: Vec<LoadedItem> = IntegrationKind::ALL
            .into_iter()
            .filter_map(|kind| {
                json!({
                    "integration": kind.display_name(),
                    "path_segment": kind.path_segment(),
                })
                .as_object()
                .cloned()
            })
            .collect();

        match self.cli.format {
            OutputFormat::Json => println!("{}", render_json(&rows)?),
            OutputFormat::Table => {
                if let Some(table) = Table::from_items(&rows) {
                    print!("{}", table.render_text());
                }
            }
        }
        Ok(())
    }

    /// Authorize an integration and store the credentials it reports
    async fn connect(&self, kind: IntegrationKind) -> Result<()> {
        let config = self.load_config()?;
        let store = self.open_store()?;
        let identity = self.resolve_identity(&store).await;
        let (updates_tx, mut updates) = mpsc::unbounded_channel();

        let mut connector = IntegrationConnector::new(
            kind,
            identity.clone(),
            Self::build_api(&config)?,
            Arc::new(ConsoleSurface),
        )
        .with_notifier(self.notifier.clone())
        .with_poll_interval(config.poll_interval())
        .on_update(move |update| {
            let _ = updates_tx.send(update);
        });

        let params = store.params().await;
        if connector.sync_credentials(params.credentials_for(kind)) == ConnectionState::Connected {
            return self.print_status(kind, ConnectionState::Connected);
        }

        let outcome = connector.connect().await;
        drop(connector);
        Self::apply_updates(&store, &mut updates).await?;

        let state = outcome.map_err(|_| Error::Other(format!("Connecting {kind} failed")))?;
        store.set_identity(identity).await?;
        self.print_status(kind, state)
    }

    /// Disconnect the stored integration
    async fn disconnect(&self) -> Result<()> {
        let config = self.load_config()?;
        let store = self.open_store()?;
        let params = store.params().await;
        let Some(kind) = params.kind else {
            return Err(Error::invalid_state(
                "disconnect",
                ConnectionState::Disconnected,
            ));
        };
        let identity = self.resolve_identity(&store).await;
        let (updates_tx, mut updates) = mpsc::unbounded_channel();

        let mut connector = IntegrationConnector::new(
            kind,
            identity,
            Self::build_api(&config)?,
            Arc::new(ConsoleSurface),
        )
        .with_notifier(self.notifier.clone())
        .on_update(move |update| {
            let _ = updates_tx.send(update);
        });
        connector.sync_credentials(params.credentials.as_ref());

        let outcome = connector.disconnect().await;
        let state = connector.state();
        drop(connector);
        Self::apply_updates(&store, &mut updates).await?;

        outcome.map_err(|_| Error::Other(format!("Disconnecting {kind} failed")))?;
        self.print_status(kind, state)
    }

    /// Show the stored connection state
    async fn status(&self) -> Result<()> {
        let store = self.open_store()?;
        let params = store.params().await;
        let state = params.connection_state();

        match self.cli.format {
            OutputFormat::Json => {
                let value = json!({
                    "integration": params.kind,
                    "state": state,
                    "status": state.status_label(),
                    "user_id": params.identity.as_ref().map(|i| i.user_id.as_str()),
                    "org_id": params.identity.as_ref().map(|i| i.org_id.as_str()),
                    "updated_at": params.updated_at,
                });
                self.print_json(&value)?;
            }
            OutputFormat::Table => {
                let integration = params
                    .kind
                    .map_or_else(|| "-".to_string(), |kind| kind.to_string());
                println!("Integration: {integration}");
                println!("Status:      {}", state.status_label());
                if let Some(identity) = &params.identity {
                    println!("User:        {}", identity.user_id);
                    println!("Org:         {}", identity.org_id);
                }
                if let Some(updated_at) = params.updated_at {
                    println!("Updated:     {}", updated_at.to_rfc3339());
                }
            }
        }
        Ok(())
    }

    /// Load pages of items with the stored credentials
    async fn load(&self, integration: Option<IntegrationKind>, pages: usize) -> Result<()> {
        let config = self.load_config()?;
        let store = self.open_store()?;
        let params = store.params().await;
        let kind = integration
            .or(params.kind)
            .ok_or(Error::MissingCredentials)?;

        let mut loader = PaginatedDataLoader::new(kind, Self::build_api(&config)?)
            .with_notifier(self.notifier.clone())
            .with_page_limit(config.page_limit);

        let max_pages = (pages > 0).then_some(pages);
        let outcome = loader
            .load_all(params.credentials_for(kind), max_pages)
            .await;

        // Pages fetched before a failure are still shown
        if outcome.is_ok() || !loader.items().is_empty() {
            print!("{}", render_loaded(self.cli.format, &loader)?);
        }
        outcome.map_err(|_| Error::Other(format!("Loading {kind} data failed")))?;
        Ok(())
    }

    /// Hand connector reports to the params store. Ends once the connector
    /// (the only sender) has been dropped.
    async fn apply_updates(
        store: &ParamsStore,
        updates: &mut UnboundedReceiver<CredentialsUpdate>,
    ) -> Result<()> {
        while let Some(update) = updates.recv().await {
            store.apply(update).await?;
        }
        Ok(())
    }

    fn print_status(&self, kind: IntegrationKind, state: ConnectionState) -> Result<()> {
        match self.cli.format {
            OutputFormat::Json => self.print_json(&json!({
                "integration": kind,
                "state": state,
                "status": state.status_label(),
            })),
            OutputFormat::Table => {
                println!("{kind}: {}", state.status_label());
                Ok(())
            }
        }
    }

    fn print_json(&self, value: &JsonValue) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }
}

/// Text or JSON rendering of everything a loader holds
fn render_loaded(format: OutputFormat, loader: &PaginatedDataLoader) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(format!("{}\n", render_json(loader.items())?)),
        OutputFormat::Table => {
            let view = loader.view();
            let mut out = match &view.table {
                Some(table) => table.render_text(),
                None => "No items.\n".to_string(),
            };
            if view.show_load_more {
                out.push_str(&format!(
                    "\n{} items from {} page(s); more are available (use --pages 0 to load all).\n",
                    loader.items().len(),
                    loader.state().pages_loaded()
                ));
            }
            Ok(out)
        }
    }
}
