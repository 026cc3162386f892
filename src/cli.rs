use std::net::SocketAddr;

use clap::Parser;
use url::Url;

use crate::cache::DEFAULT_TTL;
use crate::disk::DEFAULT_API_BASE;

#[derive(Parser, Debug)]
#[command(name = "diskproxy")]
#[command(version)]
#[command(about = "Proxy for cloud-storage public links with zip bundling", long_about = None)]
#[command(after_help = "Examples:\n  \
  diskproxy                                  serve on 127.0.0.1:8080\n  \
  diskproxy -l 0.0.0.0:3000 --cache-ttl 60   custom bind address and listing TTL\n  \
  diskproxy -v                               enable debug logging")]
pub struct Cli {
    /// Address to listen on
    #[arg(short, long, default_value = "127.0.0.1:8080")]
    pub listen: SocketAddr,

    /// Base URL of the provider's public-resources API
    #[arg(long, default_value = DEFAULT_API_BASE)]
    pub api_base: Url,

    /// Listing cache time-to-live in seconds
    #[arg(long, default_value_t = DEFAULT_TTL.as_secs())]
    pub cache_ttl: u64,

    /// Increase log verbosity (-v => debug, -vv => trace)
    #[arg(short, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn log_level(&self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::INFO,
            1 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }
}
