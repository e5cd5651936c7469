//! # Server Module
//!
//! The asynchronous HTTP/1.1 connection engine.
//!
//! ## Overview
//!
//! The engine listens for TCP connections, frames HTTP/1.1 requests and
//! responses, and drives every accepted connection as a session on a shared
//! reactor executed by a configurable pool of worker threads. Sessions run
//! truly concurrently across threads; I/O suspends a session without
//! blocking a worker.
//!
//! Per-session state machine:
//!
//! ```text
//! Idle -> ReadingRequest -> Dispatching -> WritingResponse
//!          ^                                   |
//!          +------------- KeepAlive -----------+--- Closing -> Shutdown
//! ```
//!
//! ## Lifecycle
//!
//! [`serve`] binds the listener and blocks until it is accepting, then
//! returns a [`ServerHandle`]. [`ServerHandle::stop`] shuts the reactor
//! down and joins every worker thread; dropping the handle without an
//! explicit stop performs the same sequence.

pub mod config;
mod engine;
mod http1;
mod session;

pub use config::ServerConfig;
pub use engine::{serve, ServerHandle};
pub use http1::SERVER_NAME;
