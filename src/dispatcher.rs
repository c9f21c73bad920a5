//! Dispatcher actor implementation
//!
//! The single owner of the client registry. Every registry mutation and
//! every broadcast decision happens inside `Dispatcher::run`, one event at
//! a time, so no locks are needed.

use tokio::sync::mpsc;
use tracing::{debug, info, trace, warn};

use crate::client::ClientHandle;
use crate::event::{self, Event};
use crate::registry::Registry;
use crate::types::ClientId;

/// The dispatcher actor
///
/// Consumes events from every connection reader through one FIFO channel,
/// which keeps each reader's events in the order it produced them.
pub struct Dispatcher {
    /// Connected clients: ClientId -> ClientHandle
    registry: Registry,
    /// Event receiver channel
    receiver: mpsc::Receiver<Event>,
}

impl Dispatcher {
    /// Create a new Dispatcher with the given event receiver
    pub fn new(receiver: mpsc::Receiver<Event>) -> Self {
        Self {
            registry: Registry::new(),
            receiver,
        }
    }

    /// Run the dispatcher event loop
    ///
    /// Processes events until every sender is dropped. A write to a stalled
    /// peer holds up the loop for as long as that write takes.
    pub async fn run(mut self) {
        info!("Dispatcher started");

        while let Some(event) = self.receiver.recv().await {
            self.handle_event(event).await;
        }

        info!("Dispatcher shutting down");
    }

    /// Process a single event
    async fn handle_event(&mut self, event: Event) {
        trace!("Event from {}", event.client_id());
        match event {
            Event::Connected(handle) => {
                self.handle_connected(handle).await;
            }
            Event::Disconnected { client_id } => {
                self.handle_disconnected(client_id).await;
            }
            Event::Chat { client_id, payload } => {
                self.handle_chat(client_id, &payload).await;
            }
        }
    }

    /// Handle new client connection
    async fn handle_connected(&mut self, handle: ClientHandle) {
        let client_id = handle.id;
        info!("Client {} connected", client_id);

        if self.registry.register(handle).is_some() {
            warn!("Client {} was already registered, replacing it", client_id);
        }

        self.registry
            .broadcast(&event::connected_notice(client_id), client_id)
            .await;

        debug!("Total clients: {}", self.registry.len());
    }

    /// Handle client disconnection
    async fn handle_disconnected(&mut self, client_id: ClientId) {
        info!("Client {} disconnected", client_id);

        self.registry
            .broadcast(&event::disconnected_notice(client_id), client_id)
            .await;

        if self.registry.remove(client_id).is_none() {
            debug!("Client {} was not registered", client_id);
        }

        debug!("Total clients: {}", self.registry.len());
    }

    /// Handle chat message
    async fn handle_chat(&mut self, client_id: ClientId, payload: &[u8]) {
        let line = event::chat_line(client_id, payload);
        let delivered = self.registry.broadcast(&line, client_id).await;
        debug!("Relayed {} bytes from {} to {} peers", payload.len(), client_id, delivered);
    }
}
