//! # restkit
//!
//! A minimal web-service toolkit: a pattern-based request router with typed
//! handler binding and content negotiation, layered on an asynchronous
//! HTTP/1.1 listener/session engine.
//!
//! ## Architecture
//!
//! - [`content_type`] — negotiation between wire media-type tokens and the
//!   closed encoding set (`application/json`, `text/plain`)
//! - [`codec`] — serialization bridge between typed values and wire text
//! - [`router`] — path-template compilation, route table, and dispatch
//! - [`typed`] — typed handler adapter over the router's raw shape
//! - [`server`] — TCP listener, HTTP/1.1 sessions, worker pool, and
//!   start/stop lifecycle
//!
//! ## Quick Start
//!
//! ```no_run
//! use http::{Method, StatusCode};
//! use restkit::{Response, Router, ServerConfig};
//!
//! let mut router = Router::new();
//! router
//!     .add_route("/ping", Method::GET, |_req, _params| {
//!         Ok(Response::plain(StatusCode::OK, "pong"))
//!     })
//!     .unwrap();
//!
//! let handle = restkit::serve(router, &ServerConfig::default()).unwrap();
//! handle.wait();
//! ```
//!
//! Routes are registered once at startup, before [`serve`] is called; the
//! route table is read concurrently by sessions afterwards and never
//! mutated. Handlers close over whatever shared state they need and own
//! their internal synchronization — the engine may invoke a handler from
//! many worker threads at once.

pub mod codec;
pub mod content_type;
pub mod router;
pub mod server;
pub mod typed;
pub mod types;

pub use content_type::ContentType;
pub use router::{RegisterError, Router};
pub use server::{serve, ServerConfig, ServerHandle};
pub use typed::{NoBody, Payload, Reply, TypedHandler};
pub use types::{Params, Request, Response};
