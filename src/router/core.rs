//! Router core: the route table and the dispatch hot path.

use std::collections::HashMap;

use http::{Method, StatusCode};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use crate::types::{Params, Request, Response};

/// Template placeholder syntax: `{:identifier}`.
static PARAM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{:([A-Za-z_][A-Za-z0-9_]*)\}").expect("param regex is valid"));

/// The raw handler shape every registered route compiles down to.
///
/// Handlers may be invoked from many worker threads concurrently; the
/// router never serializes calls to them.
pub type RawHandler = Box<dyn Fn(&Request, &Params) -> anyhow::Result<Response> + Send + Sync>;

/// Registration-time failure. Surfaced immediately at startup, never
/// deferred to request time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegisterError {
    /// Template was empty or did not begin with `/`.
    #[error("Path must start with '/'")]
    InvalidTemplate,
}

struct RouteEntry {
    template: String,
    pattern: Regex,
    /// Parameter names in template order; aligned positionally with the
    /// pattern's capture groups.
    param_names: Vec<String>,
    handlers: HashMap<Method, RawHandler>,
}

/// Request router: owns the route table, matches paths, extracts
/// parameters, and dispatches to bound handlers.
///
/// Registration is single-threaded and happens before the engine starts
/// accepting traffic; dispatch reads the table concurrently from many
/// sessions without mutating it.
#[derive(Default)]
pub struct Router {
    routes: Vec<RouteEntry>,
    by_template: HashMap<String, usize>,
}

impl Router {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `handler` to `template` for `method`.
    ///
    /// Registering a second method on an already-known template extends its
    /// method map; registering the same template and method again replaces
    /// the previous handler.
    ///
    /// # Errors
    ///
    /// [`RegisterError::InvalidTemplate`] if the template is empty or does
    /// not start with `/`.
    pub fn add_route<F>(
        &mut self,
        template: &str,
        method: Method,
        handler: F,
    ) -> Result<(), RegisterError>
    where
        F: Fn(&Request, &Params) -> anyhow::Result<Response> + Send + Sync + 'static,
    {
        self.add_raw(template, method, Box::new(handler))
    }

    pub(crate) fn add_raw(
        &mut self,
        template: &str,
        method: Method,
        handler: RawHandler,
    ) -> Result<(), RegisterError> {
        if !template.starts_with('/') {
            return Err(RegisterError::InvalidTemplate);
        }

        let idx = match self.by_template.get(template) {
            Some(&idx) => idx,
            None => {
                let (pattern, param_names) = compile_template(template);
                self.routes.push(RouteEntry {
                    template: template.to_string(),
                    pattern,
                    param_names,
                    handlers: HashMap::new(),
                });
                let idx = self.routes.len() - 1;
                self.by_template.insert(template.to_string(), idx);
                idx
            }
        };

        debug!(template, method = %method, "route registered");
        self.routes[idx].handlers.insert(method, handler);
        Ok(())
    }

    /// Number of distinct templates in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Resolve `req` to a response.
    ///
    /// Never panics and never returns an error: every failure mode maps to
    /// an HTTP status here, so one bad request cannot take the engine down.
    #[must_use]
    pub fn dispatch(&self, req: &Request) -> Response {
        let (path, query) = split_query(&req.path);
        let mut params = parse_query(query);

        for entry in &self.routes {
            let Some(caps) = entry.pattern.captures(path) else {
                continue;
            };

            // Alignment of capture groups with template parameter names is
            // a compile-time invariant of the pattern; a mismatch here is a
            // routing bug, not a client error.
            if caps.len() != entry.param_names.len() + 1 {
                warn!(
                    template = %entry.template,
                    path,
                    captures = caps.len(),
                    "capture count mismatch in compiled route"
                );
                return Response::plain(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
            }

            for (name, cap) in entry.param_names.iter().zip(caps.iter().skip(1)) {
                if let Some(m) = cap {
                    params.insert(name.clone(), m.as_str().to_string());
                }
            }

            let Some(handler) = entry.handlers.get(&req.method) else {
                debug!(
                    template = %entry.template,
                    method = %req.method,
                    "method not bound for matched route"
                );
                return Response::plain(StatusCode::METHOD_NOT_ALLOWED, "");
            };

            return match handler(req, &params) {
                Ok(response) => response,
                Err(err) => {
                    warn!(template = %entry.template, error = %err, "handler failed");
                    Response::plain(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
                }
            };
        }

        debug!(path, method = %req.method, "no route matched");
        Response::plain(StatusCode::NOT_FOUND, "Not found")
    }
}

/// Split a request target at the first `?` into the match path and the raw
/// query string.
fn split_query(target: &str) -> (&str, Option<&str>) {
    match target.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (target, None),
    }
}

/// Query parsing contract: pairs split on `&`, key and value on the first
/// `=`, a pair without `=` maps to the empty value, later duplicates win.
/// No percent-decoding is applied.
fn parse_query(query: Option<&str>) -> Params {
    let mut params = Params::new();
    let Some(query) = query else {
        return params;
    };
    for pair in query.split('&') {
        match pair.split_once('=') {
            Some((key, value)) => params.insert(key.to_string(), value.to_string()),
            None => params.insert(pair.to_string(), String::new()),
        };
    }
    params
}

/// Compile a path template into an anchored regex plus its parameter names.
///
/// `{:name}` placeholders become `([^/]+)` capture groups matching one
/// non-slash segment; every other character is matched literally.
fn compile_template(template: &str) -> (Regex, Vec<String>) {
    let mut pattern = String::with_capacity(template.len() + 8);
    pattern.push('^');
    let mut param_names = Vec::new();

    let mut last = 0;
    for caps in PARAM_RE.captures_iter(template) {
        let whole = caps.get(0).expect("capture 0 always present");
        pattern.push_str(&regex::escape(&template[last..whole.start()]));
        pattern.push_str("([^/]+)");
        param_names.push(caps[1].to_string());
        last = whole.end();
    }
    pattern.push_str(&regex::escape(&template[last..]));
    pattern.push('$');

    let pattern = Regex::new(&pattern).expect("escaped template always compiles");
    (pattern, param_names)
}
