// ABOUTME: Library entry point for the TrainerRoad data-export client
// ABOUTME: Exposes the client, query resolution, normalizers, and filter engine

#![deny(unsafe_code)]

//! # TrainerRoad Export
//!
//! Unofficial data-export client for the TrainerRoad training platform. It
//! authenticates against the app login flow (or falls back to the public
//! per-day aggregate endpoint), fetches structured training data, normalizes
//! the platform's inconsistent payload shapes into stable records, and runs
//! a uniform filter/sort/project pipeline over any record collection.
//!
//! ## Architecture
//!
//! - **`client`**: cookie-jar-owning HTTP surface with the login handshake
//!   and batched detail fetches
//! - **`context`**: decides private vs. public mode for one invocation and
//!   fetches the matching base data
//! - **`normalize`**: pure mappers from raw payloads to compact records
//! - **`timezone`**: canonical date handling across upstream timestamp shapes
//! - **`filters`**: the generic record pipeline behind every list command
//!
//! ## Example
//!
//! ```rust,no_run
//! use trainerroad_export::client::TrainerRoadClient;
//! use trainerroad_export::config::Settings;
//! use trainerroad_export::context::{resolve_query_context, QueryIntent};
//! use trainerroad_export::errors::ExportResult;
//!
//! #[tokio::main]
//! async fn main() -> ExportResult<()> {
//!     let mut client = TrainerRoadClient::new(Settings::from_env());
//!     client.load_session().await;
//!     let intent = QueryIntent { target: None, force_public: false };
//!     let context = resolve_query_context(client, &intent).await?;
//!     println!("resolved {} mode for {}", context.mode_label(), context.target_username);
//!     Ok(())
//! }
//! ```

/// HTTP/session client for the platform's app API
pub mod client;

/// Environment-derived defaults collected into one settings value
pub mod config;

/// Fixed endpoints, header names, and static lookup tables
pub mod constants;

/// Private-vs-public query resolution
pub mod context;

/// Unified error taxonomy
pub mod errors;

/// Generic record filter/sort/project engine
pub mod filters;

/// Tracing subscriber setup for binaries
pub mod logging;

/// Raw payload DTOs and normalized record shapes
pub mod models;

/// Pure payload-to-record normalizers
pub mod normalize;

/// Cookie jar and file-backed session persistence
pub mod session;

/// Timezone resolution and canonical date utilities
pub mod timezone;
