use dotenv::dotenv;
use std::{
    env::var,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::PathBuf,
};

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_ROOT: &str = "Music";

#[derive(Clone, Debug, PartialEq)]
pub struct ServerConfig {
    pub bind: IpAddr,
    pub port: u16,
    pub root: PathBuf,
}

impl ServerConfig {
    /// Reads the configuration from the environment (and `.env`), falling back
    /// to port 8080 on all interfaces serving `./Music`.
    pub fn get() -> Self {
        dotenv().ok();

        Self {
            bind: var("MUSIC_SERVER_BIND")
                .ok()
                .and_then(|bind| bind.trim().parse::<IpAddr>().ok())
                .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED)),
            port: var("MUSIC_SERVER_PORT")
                .ok()
                .and_then(|port| port.trim().parse::<u16>().ok())
                .unwrap_or(DEFAULT_PORT),
            root: var("MUSIC_SERVER_ROOT")
                .ok()
                .map(|root| root.trim().to_owned())
                .filter(|root| !root.is_empty())
                .map_or_else(|| PathBuf::from(DEFAULT_ROOT), PathBuf::from),
        }
    }

    /// Command line values win over the environment.
    pub fn with_overrides(
        mut self,
        bind: Option<IpAddr>,
        port: Option<u16>,
        root: Option<PathBuf>,
    ) -> Self {
        if let Some(bind) = bind {
            self.bind = bind;
        }

        if let Some(port) = port {
            self.port = port;
        }

        if let Some(root) = root {
            self.root = root;
        }

        self
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }
}
