//! CLI module
//!
//! Command-line parent view for the integration components. Credentials
//! reported by a connector are kept in a params file between invocations.
//!
//! # Commands
//!
//! - `integrations` - List supported integrations
//! - `connect` - Run the OAuth flow for an integration
//! - `disconnect` - Revoke the stored integration
//! - `status` - Show the stored connection state
//! - `load` - Fetch pages of items with the stored credentials

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
