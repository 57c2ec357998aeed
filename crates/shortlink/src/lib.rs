//! # shortlink
//!
//! A URL shortener with GitHub sign-in, built on `shortlink-router`.
//!
//! ## Routes
//!
//! | Method | Path | Result |
//! |--------|------|--------|
//! | GET | `/` | Home page with the create form |
//! | POST | `/health-check` | `It's ALIVE!` |
//! | GET | `/oauth/signin` | Redirect to GitHub |
//! | GET | `/oauth/signout` | Clears the session |
//! | GET | `/oauth/callback` | Completes sign-in |
//! | POST | `/links` | Creates a link from JSON or a form |
//! | GET | `/links/:id` | Link as JSON |
//! | GET | `/realm/:code` | Link page |
//! | GET | `/s/:code` | Counts a click and redirects |
//! | GET | `/static/*` | Files from the static directory |
//!
//! Anything else gets the router's 404 fallback.
//!
//! ## Example
//!
//! ```ignore
//! let state = AppState::new(store, oauth, "static");
//! let router = Arc::new(build_router(state)?);
//! let listener = TcpListener::bind("127.0.0.1:8000").await?;
//! serve(listener, router, shutdown_signal()).await?;
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod server;
pub mod state;
pub mod views;

pub use config::{Config, StoreBackend};
pub use error::{AppError, Result};
pub use routes::build_router;
pub use server::{handle_request, serve, shutdown_signal};
pub use state::{open_store, AppState};
