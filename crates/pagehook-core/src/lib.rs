//! # pagehook-core
//!
//! Core crate for Pagehook. Contains configuration schemas, the request
//! path and lifecycle-phase types, collaborator traits (session store,
//! row store), and the unified error system.
//!
//! This crate has **no** internal dependencies on other Pagehook crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
