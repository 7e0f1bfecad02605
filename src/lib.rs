//! # Proteus - Contract-Driven Mock API Server
//!
//! Proteus serves schema-conformant mock responses for a parsed API contract,
//! with enough statefulness that a frontend built against it behaves like a
//! real backend: create-then-fetch returns the same object, and deleted
//! records stay deleted.
//!
//! ## Features
//!
//! - **Schema-driven generation**: `$ref`/`oneOf`/`allOf`/`enum` resolution
//!   with cycle-safe recursive value generation
//! - **Domain-aware data**: entity heuristics make products look like
//!   products and users look like users
//! - **Stateful CRUD**: in-memory record store with tombstoned deletes
//! - **Scenarios**: `demo`, `realistic`, `large`, and `errors` size/error
//!   policies, reproducible under a fixed seed
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use proteus::domain::Contract;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let contract = Contract::from_file("contract.yaml")?;
//!     let app = proteus::create_app(&contract, proteus::MockServerOptions::default());
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod domain;

use crate::adapters::dispatcher::RequestDispatcher;
use crate::adapters::health_handler::HealthHandler;
use crate::domain::{ContextInferencer, Contract, Scenario};
use axum::{routing::get, Router};
use std::sync::Arc;

/// Construction-time options for the mock engine.
#[derive(Default)]
pub struct MockServerOptions {
    pub scenario: Scenario,
    /// Seed for the generation RNG; `None` seeds from entropy.
    pub seed: Option<u64>,
    /// Override for entity/domain detection tables.
    pub inferencer: Option<ContextInferencer>,
}

/// Creates the Axum application router with one mock route per contract
/// endpoint, plus health endpoints.
pub fn create_app(contract: &Contract, options: MockServerOptions) -> Router {
    let inferencer = Arc::new(options.inferencer.unwrap_or_default());
    let dispatcher = Arc::new(RequestDispatcher::new(
        contract,
        options.scenario,
        options.seed,
        inferencer,
    ));
    let health_handler = Arc::new(HealthHandler::new(
        options.scenario,
        contract.endpoints.len(),
    ));

    let health_router = Router::new()
        .route("/health", get({
            let handler = health_handler.clone();
            move || {
                let h = handler.clone();
                async move { h.health().await }
            }
        }))
        .route("/health/ready", get({
            let handler = health_handler.clone();
            move || {
                let h = handler.clone();
                async move { h.ready().await }
            }
        }))
        .route("/health/live", get({
            let handler = health_handler.clone();
            move || {
                let h = handler.clone();
                async move { h.live().await }
            }
        }));

    let router = health_router.merge(dispatcher.router(contract));

    router.layer(
        tower_http::cors::CorsLayer::new()
            .allow_origin(tower_http::cors::Any)
            .allow_methods(tower_http::cors::Any)
            .allow_headers(tower_http::cors::Any),
    )
}
