//! Client registry
//!
//! Maps identity keys to client handles. Owned and mutated only by the
//! dispatcher, so it needs no locking.

use std::collections::HashMap;

use crate::client::ClientHandle;
use crate::types::ClientId;

/// Registry of currently connected clients
///
/// Holds exactly one entry per live connection once the dispatcher has
/// processed its `Connected` event.
#[derive(Debug, Default)]
pub struct Registry {
    clients: HashMap<ClientId, ClientHandle>,
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a client under its identity key
    ///
    /// Returns the handle previously stored under the same key, if any.
    pub fn register(&mut self, handle: ClientHandle) -> Option<ClientHandle> {
        self.clients.insert(handle.id, handle)
    }

    /// Remove a client; a no-op if it is not registered
    pub fn remove(&mut self, client_id: ClientId) -> Option<ClientHandle> {
        self.clients.remove(&client_id)
    }

    /// Check if a client is registered
    pub fn contains(&self, client_id: ClientId) -> bool {
        self.clients.contains_key(&client_id)
    }

    /// Number of registered clients
    pub fn len(&self) -> usize {
        self.clients.len()
    }

    /// Check if no clients are registered
    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    /// Identity keys of all registered clients
    pub fn ids(&self) -> impl Iterator<Item = ClientId> + '_ {
        self.clients.keys().copied()
    }

    /// Write `message` to every registered client except `exclude`
    ///
    /// Best effort: a failed write is dropped and the remaining peers are
    /// still written to. Writes happen one after another, so a stalled
    /// peer delays the rest. Returns how many peers accepted the write.
    pub async fn broadcast(&mut self, message: &[u8], exclude: ClientId) -> usize {
        let mut delivered = 0;
        for (id, client) in self.clients.iter_mut() {
            if *id == exclude {
                continue;
            }
            if client.send(message).await.is_ok() {
                delivered += 1;
            }
        }
        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{duplex, AsyncReadExt, DuplexStream};

    fn client(port: u16) -> (ClientHandle, DuplexStream) {
        let (writer, peer) = duplex(256);
        let id = ClientId(format!("127.0.0.1:{}", port).parse().unwrap());
        (ClientHandle::new(id, Box::new(writer)), peer)
    }

    #[test]
    fn test_register_and_remove() {
        let mut registry = Registry::new();
        let (alice, _alice_peer) = client(1111);
        let alice_id = alice.id;

        assert!(registry.register(alice).is_none());
        assert!(registry.contains(alice_id));
        assert_eq!(registry.len(), 1);

        assert!(registry.remove(alice_id).is_some());
        assert!(!registry.contains(alice_id));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut registry = Registry::new();
        let (alice, _alice_peer) = client(1111);
        let alice_id = alice.id;
        registry.register(alice);

        assert!(registry.remove(alice_id).is_some());
        assert!(registry.remove(alice_id).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_register_same_id_overwrites() {
        let mut registry = Registry::new();
        let (first, _first_peer) = client(1111);
        let (second, _second_peer) = client(1111);

        registry.register(first);
        assert!(registry.register(second).is_some());
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn test_broadcast_excludes_sender() {
        let mut registry = Registry::new();
        let (alice, mut alice_peer) = client(1111);
        let (bob, mut bob_peer) = client(2222);
        let alice_id = alice.id;
        registry.register(alice);
        registry.register(bob);

        let delivered = registry.broadcast(b"ping", alice_id).await;
        assert_eq!(delivered, 1);

        let mut buf = [0u8; 4];
        bob_peer.read_exact(&mut buf).await.unwrap();
        assert_eq!(&buf, b"ping");

        // Nothing was written to the sender
        drop(registry);
        let mut rest = Vec::new();
        alice_peer.read_to_end(&mut rest).await.unwrap();
        assert!(rest.is_empty());
    }

    #[tokio::test]
    async fn test_broadcast_survives_dead_peer() {
        let mut registry = Registry::new();
        let (alice, _alice_peer) = client(1111);
        let (bob, bob_peer) = client(2222);
        let (carol, mut carol_peer) = client(3333);
        let alice_id = alice.id;
        registry.register(alice);
        registry.register(bob);
        registry.register(carol);

        drop(bob_peer);

        let delivered = registry.broadcast(b"ping", alice_id).await;
        assert_eq!(delivered, 1);

        let mut buf = [0u8; 4];
        carol_peer.read_exact(&mut buf).await.unwrap();
        assert_eq!(&buf, b"ping");
    }
}
