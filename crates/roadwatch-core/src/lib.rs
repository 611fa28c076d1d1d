//! Core types for roadwatch.
//!
//! This crate provides the foundational types shared by the session gateway,
//! the session store and the login client:
//!
//! - **Roles**: the closed set of role tags a session may carry
//! - **Sessions**: the bearer token, role claim and display name of the
//!   logged-in user
//! - **Error types**: common error definitions shared across crates
//!
//! # Example
//!
//! ```
//! use roadwatch_core::{BearerToken, Role, Session};
//!
//! let role: Role = "official".parse().unwrap();
//! let session = Session::new(BearerToken::new("abc"), role, "Test Official");
//!
//! assert_eq!(session.role, Role::Official);
//! assert_eq!(session.token.authorization_value(), "Bearer abc");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod role;
pub mod session;

pub use error::{CoreError, Result};
pub use role::Role;
pub use session::{BearerToken, Session};
