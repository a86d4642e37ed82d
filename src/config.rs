//! Environment-driven configuration. A `.env` file in the working directory is
//! loaded first when present; real environment variables win over it.

use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::PathBuf,
};

use anyhow::Context;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://todos.db";
pub const DEFAULT_PORT: u16 = 5001;
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";
pub const DEFAULT_API_URL: &str = "http://localhost:5001/api/todos";
pub const DEFAULT_TUI_LOG: &str = "todo-pad-tui.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub database_url: String,
    pub addr: SocketAddr,
    pub cors_origin: String,
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        load_dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let host: IpAddr = match lookup("HOST") {
            Some(h) => h.parse().with_context(|| format!("invalid HOST {h:?}"))?,
            None => IpAddr::V4(Ipv4Addr::LOCALHOST),
        };
        let port: u16 = match lookup("PORT") {
            Some(p) => p.parse().with_context(|| format!("invalid PORT {p:?}"))?,
            None => DEFAULT_PORT,
        };
        Ok(Self {
            database_url: lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            addr: SocketAddr::new(host, port),
            cors_origin: lookup("CORS_ORIGIN").unwrap_or_else(|| DEFAULT_CORS_ORIGIN.to_string()),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_url: String,
    /// Where the terminal client writes its log when `RUST_LOG` is set.
    pub log_file: PathBuf,
}

impl ClientConfig {
    pub fn from_env() -> Self {
        load_dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            api_url: lookup("TODO_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            log_file: PathBuf::from(lookup("TODO_TUI_LOG").unwrap_or_else(|| DEFAULT_TUI_LOG.to_string())),
        }
    }
}

fn load_dotenv() {
    let _ = dotenvy::dotenv();
}
