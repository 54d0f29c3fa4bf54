//! Microsoft Graph mailbox traversal benchmark
//!
//! Measures what it costs to walk a mailbox through the Graph REST
//! API: every folder below a root is visited depth-first, every
//! message in it is listed through the paginated delta endpoint and
//! fetched in full with its attachments. The run reports elapsed
//! wall-clock time and process memory.
//!
//! Requests are issued one at a time by an app-only
//! ([client credentials]) authenticated [`GraphClient`].
//!
//! [client credentials]: https://learn.microsoft.com/entra/identity-platform/v2-oauth2-client-creds-grant-flow

mod auth;
mod bench;
mod client;
mod config;
mod error;
mod folder;
mod page;
mod retry;
mod walker;

pub use auth::{AccessToken, ClientSecretCredential, GRAPH_SCOPE};
pub use bench::{Benchmark, BenchmarkReport, MemoryProbe, run};
pub use client::{ApiClient, GraphClient};
pub use config::{BenchmarkConfig, HttpConfig, tenant_from_user_id};
pub use error::{Error, Result};
pub use folder::{FolderRef, MailFolder};
pub use page::{MessageRef, Page};
pub use retry::RetryPolicy;
pub use walker::{Visit, WalkStats, Walker};
