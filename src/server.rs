use crate::{
    config::ServerConfig,
    handler::{RequestHandler, RequestHeaders},
    shutdown::ShutdownHandle,
};
use anyhow::{Context, Result, anyhow, bail};
use log::{debug, error, info};
use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
    time::Duration,
};
use tiny_http::{HTTPVersion, Method, Request, Server};

/// How long one wait for a request may block before the shutdown flag is
/// checked again.
const POLL_INTERVAL: Duration = Duration::from_millis(200);

pub struct MusicServer {
    server: Arc<Server>,
    handler: RequestHandler,
    shutdown: ShutdownHandle,
}

impl MusicServer {
    /// Binds the listener. A port already in use is a fatal error.
    pub fn bind(config: &ServerConfig) -> Result<Self> {
        let root = config
            .root
            .canonicalize()
            .with_context(|| format!("Could not open root directory {}", config.root.display()))?;

        if !root.is_dir() {
            bail!("Not a directory: {}", root.display());
        }

        let addr = config.socket_addr();
        let server = Server::http(addr)
            .map(Arc::new)
            .map_err(|error| anyhow!("Could not bind {addr}: {error}"))?;

        Ok(Self {
            shutdown: ShutdownHandle::new(Arc::clone(&server)),
            server,
            handler: RequestHandler::new(root),
        })
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.server.server_addr().to_ip()
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown.clone()
    }

    /// Handles requests one at a time until the shutdown handle is triggered.
    pub fn serve(&self) -> Result<()> {
        info!(
            "Serving {} at: {}",
            self.handler.root().display(),
            self.local_addr()
                .map_or_else(|| "unknown address".into(), |addr| addr.to_string()),
        );

        while !self.shutdown.is_requested() {
            let request = match self.server.recv_timeout(POLL_INTERVAL) {
                Ok(Some(request)) => request,
                Ok(None) => continue,
                Err(_) if self.shutdown.is_requested() => break,
                Err(error) => {
                    error!("Error while waiting for request: {error}");
                    continue;
                }
            };

            if let Err(error) = self.handle(request) {
                error!("Error while processing request: {error:#}");
            }
        }

        info!("Server stopped");

        Ok(())
    }

    fn handle(&self, request: Request) -> Result<()> {
        let header_value = |name: &'static str| {
            request
                .headers()
                .iter()
                .find(|header| header.field.equiv(name))
                .map(|header| header.value.as_str())
        };
        let headers = RequestHeaders {
            range: header_value("Range"),
            if_modified_since: header_value("If-Modified-Since"),
        };

        let reply = self.handler.reply(request.method(), request.url(), headers);

        debug!(
            "{}",
            access_line(
                request.remote_addr().map(SocketAddr::ip),
                request.method(),
                request.url(),
                request.http_version(),
                reply.status(),
                reply.body_size(),
            )
        );

        request.respond(reply.into_response()?)?;

        Ok(())
    }
}

/// `<client>: "<request line>" <status> <size>`, `-` for unknown parts.
pub fn access_line(
    client: Option<IpAddr>,
    method: &Method,
    url: &str,
    version: &HTTPVersion,
    status: u16,
    size: Option<u64>,
) -> String {
    format!(
        "{}: \"{method} {url} HTTP/{}.{}\" {status} {}",
        client.map_or_else(|| "-".into(), |client| client.to_string()),
        version.0,
        version.1,
        size.map_or_else(|| "-".into(), |size| size.to_string()),
    )
}
