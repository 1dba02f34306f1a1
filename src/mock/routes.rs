//! Route registration for the mock server.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, info};
use tokio::net::TcpListener;

use crate::auth::{unauthorized_response, CredentialStore};
use crate::mock::config::MockConfig;
use crate::mock::greeting::{capitalize, greet};
use crate::mock::profile::Profile;
use crate::parser::{HttpRequest, Method};
use crate::server::{Error, HttpResponse, HttpServer, StatusCode};

/// An [`HttpServer`] with the greeting routes of one [`Profile`] registered.
pub struct MockServer {
    server: HttpServer,
    profile: Profile,
}

impl MockServer {
    /// Build the server and register the profile's routes.
    pub async fn new(config: MockConfig) -> Result<Self, Error> {
        config.validate()?;

        let store = Arc::new(config.credential_store()?);
        let delay = config.slow_delay();
        let profile = config.profile;
        let server = HttpServer::new(config.server);

        match profile {
            Profile::Echo => register_echo_routes(&server).await,
            _ => register_greeting_routes(&server, profile, delay, store).await,
        }

        Ok(Self { server, profile })
    }

    /// The underlying HTTP server.
    pub fn server(&self) -> &HttpServer {
        &self.server
    }

    pub fn profile(&self) -> Profile {
        self.profile
    }

    /// Bind the configured address and serve until Ctrl+C.
    pub async fn run(&self) -> Result<(), Error> {
        info!("Serving the {profile} profile", profile = self.profile);
        self.server.start().await
    }

    /// Serve on an already bound listener.
    pub async fn serve(&self, listener: TcpListener) -> Result<(), Error> {
        self.server.serve(listener).await
    }
}

async fn register_greeting_routes(
    server: &HttpServer,
    profile: Profile,
    delay: Duration,
    store: Arc<CredentialStore>,
) {
    server.add_route("/", vec![Method::GET], |_req| async {
        Ok(HttpResponse::html(StatusCode::Ok, "Hello World!"))
    }).await;

    server.add_route("/", vec![Method::POST], |req| async move {
        Ok(HttpResponse::html(StatusCode::Ok, form_greeting(&req)))
    }).await;

    if profile.serves_slow_get() {
        server.add_route("/slow", vec![Method::GET], move |_req| async move {
            tokio::time::sleep(delay).await;
            Ok(HttpResponse::html(StatusCode::Ok, "Hello slow world!"))
        }).await;
    }

    if profile.serves_slow_post() {
        server.add_route("/slow", vec![Method::POST], move |_req| async move {
            tokio::time::sleep(delay).await;
            Ok(HttpResponse::html(StatusCode::Ok, "Hello World!"))
        }).await;
    }

    for path in profile.secured_paths() {
        let store = store.clone();
        server.add_route(*path, vec![Method::GET], move |req| {
            let store = store.clone();
            async move { Ok(secured_greeting(&store, &req)) }
        }).await;
    }
}

async fn register_echo_routes(server: &HttpServer) {
    server.add_route("/", vec![Method::GET], |req| async move {
        log_headers(&req);
        Ok(HttpResponse::html(StatusCode::Ok, "Hello GET World!"))
    }).await;

    server.add_route("/", vec![Method::POST], |req| async move {
        log_headers(&req);
        let form = req.form();
        debug!(
            "First name: {first}, last name: {last}",
            first = form.get("firstName").map_or("<missing>", String::as_str),
            last = form.get("lastName").map_or("<missing>", String::as_str),
        );
        Ok(HttpResponse::html(StatusCode::Ok, "Hello POST World!"))
    }).await;
}

fn form_greeting(req: &HttpRequest) -> String {
    let form = req.form();
    greet(
        form.get("firstName").map(String::as_str),
        form.get("lastName").map(String::as_str),
    )
}

fn secured_greeting(store: &CredentialStore, req: &HttpRequest) -> HttpResponse {
    match store.authenticate(req) {
        Ok(username) => {
            HttpResponse::html(StatusCode::Ok, format!("Hello {}!", capitalize(username)))
        }
        Err(e) => {
            debug!("Denied {path}: {e}", path = req.route_path());
            unauthorized_response()
        }
    }
}

fn log_headers(req: &HttpRequest) {
    let mut names: Vec<&String> = req.headers.keys().collect();
    names.sort();
    for name in names {
        let value = if name.eq_ignore_ascii_case("Authorization") {
            "<redacted>"
        } else {
            req.headers[name].as_str()
        };
        debug!("{name}: {value}");
    }
}
