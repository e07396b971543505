//! Credential and session subsystem
//!
//! ```text
//! auth/
//! ├── types.rs          # accounts, identities, request/response bodies
//! ├── errors.rs         # error taxonomy and HTTP mapping
//! ├── config.rs         # configuration
//! ├── service.rs        # registration and login flows (facade)
//! ├── core/             # business logic
//! │   ├── input_validator.rs
//! │   ├── password_service.rs
//! │   ├── token_service.rs
//! │   └── user_service.rs
//! ├── storage/          # persistence boundary
//! │   ├── trait.rs
//! │   ├── memory.rs
//! │   └── postgres.rs
//! └── api/              # HTTP layer
//!     ├── routes.rs
//!     ├── handlers.rs
//!     └── middleware.rs # auth gate
//! ```
//!
//! Layering is API → service → storage, with storage behind the
//! `UserStorage` trait.

pub mod api;
pub mod config;
pub mod core;
pub mod errors;
pub mod service;
pub mod storage;
pub mod types;

pub use api::create_auth_routes;
pub use config::AuthConfig;
pub use errors::{ApiError, AuthError, ErrorKind};
pub use service::AuthService;
pub use storage::{MemoryStorage, PostgresStorage, UserStorage};
pub use types::{Identity, LoginRequest, SignupRequest, User};
