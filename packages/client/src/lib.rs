//! Terminal client for a cowatch session.
//!
//! Keeps a local player model in step with the shared session: user commands
//! are sent to the server, broadcasts from other participants are reconciled
//! by [`controller::SyncController`], and the connection is retried on loss.

pub mod api;
pub mod controller;
pub mod domain;
pub mod error;
pub mod formatter;
pub mod input;
pub mod player;
pub mod runner;
pub mod session;
pub mod ui;

pub use error::ClientError;
pub use runner::run_client;
