use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use clap::Parser;
use common::SEPOLIA_CHAIN_ID;
use url::Url;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_MAX_TRANSACTIONS: usize = 100;

/// HTTP service producing EVM signature requests and validating signatures.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// Interface to bind the HTTP listener on.
    #[clap(long, env = "BIND_HOST", default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub host: IpAddr,

    /// Port to bind the HTTP listener on.
    #[clap(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Chain ID stamped onto every sign request.
    #[clap(long, env = "CHAIN_ID", default_value_t = SEPOLIA_CHAIN_ID)]
    pub chain_id: u64,

    /// Public URL advertised in the plugin manifest; defaults to localhost.
    #[clap(long, env = "PLUGIN_URL")]
    pub plugin_url: Option<Url>,

    /// Account that owns the agent, advertised in the plugin manifest.
    #[clap(long, env = "ACCOUNT_ID")]
    pub account_id: Option<String>,

    /// Upper bound on numSuccess + numFail for a single sendTransaction call.
    #[clap(long, env = "MAX_TRANSACTIONS", default_value_t = DEFAULT_MAX_TRANSACTIONS)]
    pub max_transactions: usize,
}

impl Args {
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn into_config(self) -> AgentConfig {
        let plugin_url = match self.plugin_url {
            Some(url) => String::from(url).trim_end_matches('/').to_string(),
            None => localhost_url(self.port),
        };
        AgentConfig {
            chain_id: self.chain_id,
            plugin_url,
            account_id: self.account_id,
            max_transactions: self.max_transactions,
        }
    }
}

/// Settings the request handlers read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentConfig {
    pub chain_id: u64,
    pub plugin_url: String,
    pub account_id: Option<String>,
    pub max_transactions: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            chain_id: SEPOLIA_CHAIN_ID,
            plugin_url: localhost_url(DEFAULT_PORT),
            account_id: None,
            max_transactions: DEFAULT_MAX_TRANSACTIONS,
        }
    }
}

fn localhost_url(port: u16) -> String {
    format!("http://localhost:{port}")
}
