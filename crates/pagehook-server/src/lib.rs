//! # pagehook-server
//!
//! HTTP layer for Pagehook built on Axum.
//!
//! Every request goes through the same pipeline: resolve the session
//! cookie, extract request parameters, load the plugins active for the
//! requested page into a fresh hook registry, and drive the page
//! lifecycle to either a rendered body or a redirect.

pub mod app;
pub mod extract;
pub mod lifecycle;
pub mod response;
pub mod session;
pub mod state;

pub use app::build_app;
pub use lifecycle::{Lifecycle, LifecycleOutcome};
pub use session::InMemorySessionStore;
pub use state::AppState;
