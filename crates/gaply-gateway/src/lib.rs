//! Gaply Gateway
//!
//! HTTP gateway for the Gaply research-paper assistant. It authenticates
//! requests, keeps paper metadata in PostgreSQL, brokers uploads to object
//! storage and forwards heavy NLP work to a separate compute worker.
//!
//! # Features
//!
//! - **Search**: OpenAlex work search enriched with Unpaywall open-access data
//!   and local ingestion status, plus "did you mean" suggestions
//! - **Auth**: HMAC bearer tokens with a service-role gate for worker routes
//! - **Store**: sqlx accessors for papers, chunks, jobs, gaps and edits
//! - **Worker client**: typed calls for ingestion, paraphrasing, proofreading,
//!   summarization, gap-finding and journal checks
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use gaply_gateway::{
//!     Config, Database, JwtVerifier, OpenAlexClient, SearchPipeline, UnpaywallClient,
//!     server::{AppState, serve},
//! };
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let db = Database::connect(&config.database_url).await?;
//!     let pipeline = SearchPipeline::new(
//!         Arc::new(OpenAlexClient::new(&config)?),
//!         Arc::new(UnpaywallClient::new(&config)?),
//!         Arc::new(db),
//!     );
//!     let state = AppState::new(pipeline, JwtVerifier::new(&config.jwt_secret), config.allowed_origins);
//!     serve(state, config.port).await
//! }
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod search;
pub mod server;
pub mod storage;

pub use auth::{AuthError, AuthUser, JwtVerifier};
pub use client::{OpenAlexClient, UnpaywallClient, WorkerClient, WorkerError};
pub use config::Config;
pub use db::{Database, StoreError};
pub use error::{ApiError, ClientError, SearchError};
pub use search::SearchPipeline;
pub use storage::{StorageClient, StorageError};
