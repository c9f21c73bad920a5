//! Basic type definitions for the chat relay
//!
//! Provides the `ClientId` newtype: the remote address-and-port of a live
//! connection, used as the unique identity key for that client.

use std::net::SocketAddr;

/// Identity key of a connected client (newtype pattern)
///
/// Wraps the transport-layer remote address. Its `Display` form
/// (`203.0.113.5:54321`) is the name other clients see in broadcasts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClientId(pub SocketAddr);

impl From<SocketAddr> for ClientId {
    fn from(addr: SocketAddr) -> Self {
        Self(addr)
    }
}

impl std::fmt::Display for ClientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_id_display_v4() {
        let id = ClientId::from("127.0.0.1:1111".parse::<SocketAddr>().unwrap());
        assert_eq!(id.to_string(), "127.0.0.1:1111");
    }

    #[test]
    fn test_client_id_display_v6() {
        let id = ClientId::from("[::1]:4242".parse::<SocketAddr>().unwrap());
        assert_eq!(id.to_string(), "[::1]:4242");
    }

    #[test]
    fn test_client_id_distinct_ports() {
        let a = ClientId::from("10.0.0.1:1000".parse::<SocketAddr>().unwrap());
        let b = ClientId::from("10.0.0.1:1001".parse::<SocketAddr>().unwrap());
        assert_ne!(a, b);
    }
}
