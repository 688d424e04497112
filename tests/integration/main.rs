//! End-to-end tests through the HTTP surface.

mod helpers;

mod auth_test;
mod pages_test;
mod plugins_test;
