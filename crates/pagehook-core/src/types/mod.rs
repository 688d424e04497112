//! Core type definitions used across the Pagehook workspace.

pub mod pagination;
pub mod phase;
pub mod request;
pub mod route;

pub use pagination::Pager;
pub use phase::LifecyclePhase;
pub use request::{RequestParams, UploadedFile};
pub use route::RoutePath;
