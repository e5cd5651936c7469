//! # Router Module
//!
//! Path-template compilation, route storage, and request dispatch.
//!
//! ## Overview
//!
//! The router is responsible for:
//! - Compiling path templates (literal segments plus `{:name}` placeholders)
//!   into anchored matchers at registration time
//! - Matching incoming requests against the compiled table
//! - Extracting query-string and path parameters into [`Params`](crate::Params)
//! - Invoking the bound handler and converting its failures into structured
//!   error responses
//!
//! ## Precedence
//!
//! Route entries are scanned in registration order and the first matching
//! template wins. When two templates could match the same concrete path
//! (e.g. `/a/{:id}` and `/{:x}/5`), register the more specific one first.
//!
//! ## Example
//!
//! ```rust
//! use http::{Method, StatusCode};
//! use restkit::{Response, Router};
//!
//! let mut router = Router::new();
//! router
//!     .add_route("/tasks/{:id}", Method::GET, |_req, params| {
//!         let id = &params["id"];
//!         Ok(Response::plain(StatusCode::OK, format!("task {id}")))
//!     })
//!     .unwrap();
//! ```

mod core;

pub use core::{RawHandler, RegisterError, Router};
