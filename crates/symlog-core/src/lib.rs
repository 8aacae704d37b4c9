//! Core types, store traits and services for the symlog health tracker.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! Storage backends implement the traits in [`store`]; the HTTP layer drives
//! the services in [`service`].

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod clock;
pub mod episode;
pub mod error;
pub mod service;
pub mod store;
pub mod user;

pub use error::{Error, Result};
