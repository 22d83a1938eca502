//! In-process pub/sub broker.

use async_trait::async_trait;
use dashmap::DashMap;
use domains::models::LikeBroadcast;
use domains::ports::{ActivityBus, BusSubscription};
use tokio::sync::mpsc;
use tracing::debug;

const CHANNEL_CAPACITY: usize = 64;

/// One subscriber per (channel, event) pair, which is all the engine ever
/// binds.
pub struct MemoryBus {
    subscribers: DashMap<(String, String), mpsc::Sender<LikeBroadcast>>,
}

impl MemoryBus {
    pub fn new() -> Self {
        Self {
            subscribers: DashMap::new(),
        }
    }

    /// Delivers a message to the channel's subscriber, if any. Returns
    /// whether it was delivered.
    pub fn publish(&self, channel: &str, event: &str, message: LikeBroadcast) -> bool {
        match self
            .subscribers
            .get(&(channel.to_owned(), event.to_owned()))
        {
            Some(sender) => {
                let delivered = sender.try_send(message).is_ok();
                debug!(channel, event, delivered, "publish");
                delivered
            }
            None => false,
        }
    }
}

impl Default for MemoryBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ActivityBus for MemoryBus {
    async fn subscribe(&self, channel: &str, event: &str) -> anyhow::Result<BusSubscription> {
        let (sender, receiver) = mpsc::channel(CHANNEL_CAPACITY);
        self.subscribers
            .insert((channel.to_owned(), event.to_owned()), sender);
        Ok(BusSubscription { messages: receiver })
    }

    async fn unsubscribe(&self, channel: &str, event: &str) -> anyhow::Result<()> {
        self.subscribers
            .remove(&(channel.to_owned(), event.to_owned()));
        Ok(())
    }
}
