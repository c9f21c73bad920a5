//! Relay configuration
//!
//! Parsed from command-line flags, falling back to environment variables
//! and then to defaults.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use clap::builder::TypedValueParser;
use clap::Parser;

/// Default listening port
pub const DEFAULT_PORT: u16 = 6969;

/// Default event channel capacity (closest to an unbuffered hand-off)
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1;

/// Largest accepted event channel capacity
pub const MAX_CHANNEL_CAPACITY: u64 = 65536;

#[derive(Debug, Clone, Parser)]
#[command(name = "chat_relay", version, about = "Multi-client TCP chat relay")]
pub struct Config {
    /// Address to listen on
    #[arg(long, env = "CHAT_RELAY_HOST", default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(short, long, env = "CHAT_RELAY_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Events a connection may queue before it waits on the dispatcher
    #[arg(
        long,
        env = "CHAT_RELAY_CHANNEL_CAPACITY",
        default_value_t = DEFAULT_CHANNEL_CAPACITY,
        value_parser = clap::value_parser!(u64)
            .range(1..=MAX_CHANNEL_CAPACITY)
            .try_map(|v: u64| usize::try_from(v))
    )]
    pub channel_capacity: usize,
}

impl Config {
    /// Socket address the listener binds to
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::try_parse_from(["chat_relay"]).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.channel_capacity, DEFAULT_CHANNEL_CAPACITY);
        assert_eq!(config.bind_addr().to_string(), "0.0.0.0:6969");
    }

    #[test]
    fn test_flags() {
        let config = Config::try_parse_from([
            "chat_relay",
            "--host",
            "127.0.0.1",
            "--port",
            "7000",
            "--channel-capacity",
            "16",
        ])
        .unwrap();
        assert_eq!(config.bind_addr().to_string(), "127.0.0.1:7000");
        assert_eq!(config.channel_capacity, 16);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(Config::try_parse_from(["chat_relay", "--channel-capacity", "0"]).is_err());
    }

    #[test]
    fn test_capacity_upper_bound() {
        let config = Config::try_parse_from(["chat_relay", "--channel-capacity", "65536"]).unwrap();
        assert_eq!(config.channel_capacity, 65536);
        assert!(Config::try_parse_from(["chat_relay", "--channel-capacity", "65537"]).is_err());
        assert!(Config::try_parse_from([
            "chat_relay",
            "--channel-capacity",
            "18446744073709551615",
        ])
        .is_err());
    }

    #[test]
    fn test_command_is_valid() {
        use clap::CommandFactory;
        Config::command().debug_assert();
    }
}
