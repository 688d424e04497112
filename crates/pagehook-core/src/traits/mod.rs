//! Collaborator traits defined in `pagehook-core` and implemented by
//! other crates. The core lifecycle never calls these itself; they exist
//! for plugin code running inside lifecycle hooks.

pub mod row_store;
pub mod session;

pub use row_store::{Row, RowStore};
pub use session::SessionStore;
