// src/bus.rs

//! In-process publish/subscribe channel for delivery events.
//!
//! Persistence happens once, in the coordinator; delivery happens once per
//! interested live connection, through a handler each connection registers
//! here for its lifetime. Publishing is a synchronous fan-out in
//! registration order. Handlers are infallible queue pushes; one whose
//! connection has gone away swallows the push, so a dead subscriber never
//! blocks delivery to the rest.

use tokio::sync::Mutex;
use uuid::Uuid;

use crate::models::DeliveryEvent;

pub type SubscriptionId = Uuid;

type Handler = Box<dyn Fn(&DeliveryEvent) + Send + Sync>;

#[derive(Default)]
pub struct MessageBus {
    subscribers: Mutex<Vec<(SubscriptionId, Handler)>>,
}

impl MessageBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler invoked for every published event until the
    /// returned token is revoked.
    pub async fn subscribe<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&DeliveryEvent) + Send + Sync + 'static,
    {
        let id = Uuid::new_v4();
        self.subscribers.lock().await.push((id, Box::new(handler)));
        id
    }

    /// Idempotent removal; revoking an unknown token does nothing.
    pub async fn unsubscribe(&self, id: SubscriptionId) {
        self.subscribers.lock().await.retain(|(sub_id, _)| *sub_id != id);
    }

    /// Invokes every currently subscribed handler once, in registration
    /// order, passing the event by reference.
    pub async fn publish(&self, event: &DeliveryEvent) {
        let subscribers = self.subscribers.lock().await;
        for (_, handler) in subscribers.iter() {
            handler(event);
        }
    }
}
