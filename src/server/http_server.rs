//! The accept loop and per-connection dispatch.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, error, info, warn};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::signal;
use tokio::sync::{RwLock, Semaphore, mpsc};
use tokio::task::JoinSet;

use crate::parser::{HttpRequest, Method, find_head_end, parse_request};
use crate::server::config::ServerConfig;
use crate::server::error::Error;
use crate::server::handler::{Dispatch, Route, allow_header, dispatch};
use crate::server::response::{HttpResponse, StatusCode};

/// How long in-flight connections get to finish after Ctrl+C.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(30);

/// Pause after a failed `accept` before trying again.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// A route table served over TCP, one request per connection.
pub struct HttpServer {
    pub config: ServerConfig,
    pub routes: Arc<RwLock<Vec<Route>>>,
}

impl HttpServer {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            routes: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Register `handler` for `methods` on `path`.
    ///
    /// HEAD and OPTIONS need not be listed: HEAD is served by the path's
    /// `GET` handler and OPTIONS from the table.
    pub async fn add_route<F, Fut>(&self, path: impl Into<String>, methods: Vec<Method>, handler: F)
    where
        F: Fn(HttpRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<HttpResponse, Error>> + Send + 'static,
    {
        self.routes.write().await.push(Route::new(path, methods, handler));
    }

    /// Log the banner and one line per path with its methods.
    async fn log_route_table(&self) {
        info!("\n{}", include_str!("../banner.txt"));

        let routes = self.routes.read().await;
        info!("Serving {count} route(s):", count = routes.len());
        for route in routes.iter() {
            info!("  {path:<10} {methods}", path = route.path, methods = allow_header(&route.methods));
        }
    }

    /// Bind the configured address and serve until Ctrl+C.
    pub async fn start(&self) -> Result<(), Error> {
        self.log_route_table().await;

        let listener = TcpListener::bind(&self.config.addr).await?;
        info!("Server listening on http://{addr}", addr = self.config.addr);

        self.serve(listener).await
    }

    /// Accept connections on an already bound listener until Ctrl+C.
    pub async fn serve(&self, listener: TcpListener) -> Result<(), Error> {
        let permits = Arc::new(Semaphore::new(self.config.max_connections));
        let mut connections = JoinSet::new();
        let mut shutdown = spawn_shutdown_listener();

        loop {
            tokio::select! {
                // A closed channel means Ctrl+C could not be hooked; keep serving
                Some(()) = shutdown.recv() => {
                    info!("Stopping accept loop");
                    break;
                }

                accepted = listener.accept() => match accepted {
                    Ok((socket, peer)) => {
                        self.spawn_connection(socket, peer, &permits, &mut connections).await;
                    }
                    Err(e) => {
                        // Usually EMFILE or a reset before accept; neither is fatal
                        warn!("accept failed: {e}");
                        tokio::time::sleep(ACCEPT_BACKOFF).await;
                    }
                },
            }
        }

        drain_connections(connections).await;
        Ok(())
    }

    /// Answer a connection on its own task, or with a 503 beyond the cap.
    async fn spawn_connection(
        &self,
        mut socket: TcpStream,
        peer: SocketAddr,
        permits: &Arc<Semaphore>,
        connections: &mut JoinSet<()>,
    ) {
        let Ok(permit) = permits.clone().try_acquire_owned() else {
            warn!("{peer}: rejected, {max} connections open", max = self.config.max_connections);
            let response = HttpResponse::html(StatusCode::ServiceUnavailable, "Server is at capacity, please try again later");
            if let Err(e) = socket.write_all(&response.to_bytes()).await {
                debug!("{peer}: could not send 503: {e}");
            }
            return;
        };

        let routes = self.routes.clone();
        let read_limit = self.config.read_buffer_size;

        connections.spawn(async move {
            let _permit = permit;

            match Self::handle_connection(&mut socket, routes, read_limit).await {
                Ok(()) => {}
                // Already answered with a 4xx
                Err(e @ (Error::NotFound(_) | Error::MethodNotAllowed(..) | Error::ParseError(_) | Error::PayloadTooLarge(_))) => {
                    debug!("{peer}: {e}");
                }
                // Timeout tests hang up on /slow
                Err(Error::IoError(e)) => warn!("{peer}: connection dropped: {e}"),
                Err(e) => error!("{peer}: {e}"),
            }
        });
    }

    /// Read one request from the socket.
    ///
    /// Reads until the head is complete and `Content-Length` body bytes have
    /// arrived, or the peer stops sending. Returns `None` if the peer closed
    /// the connection without sending anything.
    async fn read_request(
        socket: &mut (impl AsyncRead + Unpin),
        max_size: usize,
    ) -> Result<Option<Vec<u8>>, Error> {
        let mut buf = Vec::new();
        let mut chunk = vec![0; max_size.clamp(1, 4096)];

        loop {
            let n = socket.read(&mut chunk).await?;
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);

            if buf.len() > max_size {
                return Err(Error::PayloadTooLarge(max_size));
            }

            let Some(head_end) = find_head_end(&buf) else {
                continue;
            };

            // A head that does not parse is answered by the caller
            let expected = match parse_request(&buf).map(|req| req.content_length()) {
                Ok(Ok(len)) => len.unwrap_or(0),
                _ => break,
            };

            if head_end + expected > max_size {
                return Err(Error::PayloadTooLarge(max_size));
            }
            if buf.len() - head_end >= expected {
                break;
            }
        }

        Ok((!buf.is_empty()).then_some(buf))
    }

    /// Read, route and answer one request.
    ///
    /// Requests the server rejects are answered before the matching error is
    /// returned, so the caller only has to log it.
    pub async fn handle_connection(
        socket: &mut (impl AsyncRead + AsyncWrite + Unpin),
        routes: Arc<RwLock<Vec<Route>>>,
        read_buffer_size: usize,
    ) -> Result<(), Error> {
        let buf = match Self::read_request(&mut *socket, read_buffer_size).await {
            Ok(Some(buf)) => buf,
            // Closed without a request
            Ok(None) => return Ok(()),
            Err(Error::PayloadTooLarge(limit)) => {
                let response = HttpResponse::html(StatusCode::PayloadTooLarge, format!("Request exceeds {limit} bytes"));
                socket.write_all(&response.to_bytes()).await?;
                return Err(Error::PayloadTooLarge(limit));
            }
            Err(e) => return Err(e),
        };

        let request = match parse_request(&buf) {
            Ok(req) => req,
            Err(e) => {
                let response = HttpResponse::html(StatusCode::BadRequest, format!("Error parsing request: {e}"));
                socket.write_all(&response.to_bytes()).await?;
                return Err(Error::ParseError(e));
            }
        };

        let method = request.method;
        let path = request.route_path().to_string();
        debug!("{method} {path} ({len} body bytes)", len = request.body.len());

        // The guard is released here, before any handler runs
        let outcome = dispatch(&routes.read().await, method, &path);

        let (response, result) = match outcome {
            Dispatch::Handle { handler, strip_body } => match handler(request).await {
                Ok(response) if strip_body => (response.without_body(), Ok(())),
                Ok(response) => (response, Ok(())),
                Err(e) => (
                    HttpResponse::html(StatusCode::InternalServerError, format!("Internal server error: {e}")),
                    Err(e),
                ),
            },
            Dispatch::Options { allow } => (
                HttpResponse::new(StatusCode::Ok).with_header("Allow", allow_header(&allow)),
                Ok(()),
            ),
            Dispatch::MethodNotAllowed { allow } => {
                let allow = allow_header(&allow);
                let response = HttpResponse::html(
                    StatusCode::MethodNotAllowed,
                    format!("Method {method} not allowed for path: {path}. Allowed methods: {allow}"),
                )
                .with_header("Allow", allow);
                (response, Err(Error::MethodNotAllowed(method, path.clone())))
            }
            Dispatch::NotFound => (
                HttpResponse::html(StatusCode::NotFound, format!("Not found: {path}")),
                Err(Error::NotFound(path.clone())),
            ),
        };

        info!("{method} {path} -> {status}", status = response.status.as_u16());
        socket.write_all(&response.to_bytes()).await?;
        result
    }
}

/// A channel that yields once when Ctrl+C arrives.
fn spawn_shutdown_listener() -> mpsc::Receiver<()> {
    let (tx, rx) = mpsc::channel(1);
    tokio::spawn(async move {
        match signal::ctrl_c().await {
            Ok(()) => {
                info!("Ctrl+C received, shutting down");
                let _ = tx.send(()).await;
            }
            Err(e) => error!("cannot listen for Ctrl+C: {e}"),
        }
    });
    rx
}

/// Wait up to [`SHUTDOWN_GRACE`] for open connections, then give up on them.
async fn drain_connections(mut connections: JoinSet<()>) {
    info!("Draining {open} open connection(s)", open = connections.len());

    let drained = tokio::time::timeout(SHUTDOWN_GRACE, async {
        while let Some(joined) = connections.join_next().await {
            if let Err(e) = joined {
                error!("connection task failed: {e}");
            }
        }
    })
    .await;

    if drained.is_err() {
        warn!("Aborting {open} connection(s) still open", open = connections.len());
        connections.abort_all();
    }
    info!("Server stopped");
}
