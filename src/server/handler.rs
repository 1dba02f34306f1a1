//! The route table.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::parser::{HttpRequest, Method};
use crate::server::{Error, HttpResponse};

pub type ResponseFuture = Pin<Box<dyn Future<Output = Result<HttpResponse, Error>> + Send>>;

/// A registered handler. Cloning it is cheap, so dispatch can release the
/// route table before the handler runs.
pub type Handler = Arc<dyn Fn(HttpRequest) -> ResponseFuture + Send + Sync>;

/// One path with the methods its handler answers.
pub struct Route {
    pub path: String,
    pub methods: Vec<Method>,
    pub handler: Handler,
}

impl Route {
    pub fn new<F, Fut>(path: impl Into<String>, methods: Vec<Method>, handler: F) -> Self
    where
        F: Fn(HttpRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<HttpResponse, Error>> + Send + 'static,
    {
        let handler: Handler = Arc::new(move |req| -> ResponseFuture { Box::pin(handler(req)) });
        Self {
            path: path.into(),
            methods,
            handler,
        }
    }

    /// Exact match on the path without query string.
    pub fn matches(&self, path: &str) -> bool {
        self.path == path
    }

    pub fn serves(&self, method: Method) -> bool {
        self.methods.contains(&method)
    }
}

/// What the route table says about one request.
pub enum Dispatch {
    /// Run this handler. `strip_body` is set for a HEAD answered by `GET`.
    Handle { handler: Handler, strip_body: bool },
    /// OPTIONS on a known path.
    Options { allow: Vec<Method> },
    /// Known path, unserved method.
    MethodNotAllowed { allow: Vec<Method> },
    NotFound,
}

/// Resolve a request against the table.
///
/// A HEAD request falls back to the path's `GET` handler; an OPTIONS
/// request is answered from the table unless a route registers OPTIONS
/// itself.
pub fn dispatch(routes: &[Route], method: Method, path: &str) -> Dispatch {
    let candidates: Vec<&Route> = routes.iter().filter(|route| route.matches(path)).collect();
    if candidates.is_empty() {
        return Dispatch::NotFound;
    }

    let find = |method: Method| candidates.iter().find(|route| route.serves(method));

    if let Some(route) = find(method) {
        return Dispatch::Handle {
            handler: route.handler.clone(),
            strip_body: false,
        };
    }

    match method {
        Method::HEAD => match find(Method::GET) {
            Some(route) => Dispatch::Handle {
                handler: route.handler.clone(),
                strip_body: true,
            },
            None => Dispatch::MethodNotAllowed { allow: allowed_methods(&candidates) },
        },
        Method::OPTIONS => Dispatch::Options { allow: allowed_methods(&candidates) },
        _ => Dispatch::MethodNotAllowed { allow: allowed_methods(&candidates) },
    }
}

/// Methods served on a path, including the implied HEAD and OPTIONS.
fn allowed_methods(candidates: &[&Route]) -> Vec<Method> {
    let mut allow: Vec<Method> = candidates
        .iter()
        .flat_map(|route| route.methods.iter().copied())
        .collect();
    if allow.contains(&Method::GET) {
        allow.push(Method::HEAD);
    }
    allow.push(Method::OPTIONS);
    allow.sort_by_key(|method| method.as_str());
    allow.dedup();
    allow
}

/// `Allow` header value, alphabetical, e.g. `GET, HEAD, OPTIONS, POST`.
pub fn allow_header(allow: &[Method]) -> String {
    allow
        .iter()
        .map(|method| method.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
