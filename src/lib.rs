//! Terminal client for GitHub Projects v2.
//!
//! `github` talks GraphQL, `mapper` turns responses into the `model`
//! types, `sync` caches and retries the combined fetch, and `store`
//! exposes observable state plus the write operations. `app`, `ui`,
//! `event` and `cli` are the terminal front end.

#![recursion_limit = "256"]

pub mod app;
pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod event;
pub mod github;
pub mod logging;
pub mod mapper;
pub mod model;
pub mod store;
pub mod sync;
pub mod ui;
