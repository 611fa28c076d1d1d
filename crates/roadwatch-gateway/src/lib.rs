//! Session gateway for the roadwatch client.
//!
//! Every role-specific surface of the road-damage reporting client goes
//! through this crate. It:
//!
//! - owns the stored bearer token, role claim and display name
//! - gates surfaces by role before anything role-specific happens
//! - attaches `Authorization: Bearer <token>` to outbound requests
//! - retries once on transport failure
//! - ends the session and redirects to login on 401/403
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Surfaces (pages / commands)                │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     SessionGateway                          │
//! │  require_role · establish_session · destroy_session ·      │
//! │  dispatch_authenticated                                     │
//! └─────────────────────────────────────────────────────────────┘
//!          │                   │                    │
//!          ▼                   ▼                    ▼
//!   ┌─────────────┐     ┌─────────────┐      ┌─────────────┐
//!   │SessionStore │     │  Transport  │      │  Navigator  │
//!   │ token/role/ │     │  (reqwest)  │      │ redirect +  │
//!   │ user_name   │     │             │      │ alert       │
//!   └─────────────┘     └─────────────┘      └─────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use roadwatch_core::Role;
//! use roadwatch_gateway::{ApiRequest, GatewayConfig, HttpTransport, Navigator, SessionGateway};
//! use roadwatch_store::MemoryStore;
//!
//! struct Console;
//!
//! impl Navigator for Console {
//!     fn redirect(&self, target: &str) {
//!         eprintln!("-> {target}");
//!     }
//!
//!     fn alert(&self, message: &str) {
//!         eprintln!("! {message}");
//!     }
//! }
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = GatewayConfig::default();
//! let transport = HttpTransport::new(config.request_timeout())?;
//! let gateway = SessionGateway::new(
//!     Arc::new(MemoryStore::new()),
//!     transport,
//!     Arc::new(Console),
//!     config,
//! );
//!
//! if gateway.require_role(Role::Official).is_granted() {
//!     let response = gateway
//!         .dispatch_authenticated(ApiRequest::get("/api/official/work-reports"))
//!         .await?;
//!     println!("{}", response.text());
//! }
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod gateway;
pub mod navigator;
pub mod request;
pub mod transport;

pub use config::GatewayConfig;
pub use error::{GatewayError, Result, TransportError};
pub use gateway::{RoleCheck, SessionGateway, ACCESS_DENIED};
pub use navigator::Navigator;
pub use request::{ApiRequest, ApiResponse};
pub use transport::{HttpTransport, Transport};

#[cfg(any(test, feature = "test-utils"))]
pub use navigator::{NavigationEvent, RecordingNavigator};
#[cfg(any(test, feature = "test-utils"))]
pub use transport::ScriptedTransport;

// Re-export key types for convenience
pub use reqwest::{Method, StatusCode};
