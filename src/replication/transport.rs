//! Broadcast transport.
//!
//! `Transport` is the seam to whatever carries frames between peers. It
//! promises nothing: frames may be lost, duplicated or reordered, and the
//! inbox above it restores order.
//!
//! `MemoryBus` is an in-process implementation with named channels
//! (`room:<name>`). Each endpoint has its own queue and never hears its own
//! frames; a frame nobody else is subscribed to is reported as dropped.
//! Hooks to drop, duplicate or shuffle queued frames let delivery faults be
//! reproduced in tests and in the simulator.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::trace;

use crate::core::rng::GameRng;
use crate::error::TransportError;

/// Fire-and-forget frame broadcast.
pub trait Transport {
    /// Send `frame` to every other subscriber of the channel.
    ///
    /// Success means the frame was handed off, not that it arrived.
    fn publish(&mut self, frame: Vec<u8>) -> Result<(), TransportError>;

    /// Next frame delivered to this endpoint, if any.
    fn try_recv(&mut self) -> Option<Vec<u8>>;
}

/// Channel name for a room.
#[must_use]
pub fn channel_name(room: &str) -> String {
    format!("room:{}", room)
}

#[derive(Debug)]
struct Subscriber {
    channel: String,
    queue: VecDeque<Vec<u8>>,
    closed: bool,
}

#[derive(Debug, Default)]
struct Bus {
    subscribers: Vec<Subscriber>,
}

/// In-memory broadcast bus. Clones share the same channels.
#[derive(Clone, Debug, Default)]
pub struct MemoryBus {
    inner: Arc<Mutex<Bus>>,
}

impl MemoryBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Bus> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Subscribe a new endpoint to `room`'s channel.
    #[must_use]
    pub fn join(&self, room: &str) -> MemoryEndpoint {
        let channel = channel_name(room);
        let mut bus = self.lock();
        bus.subscribers.push(Subscriber {
            channel: channel.clone(),
            queue: VecDeque::new(),
            closed: false,
        });
        MemoryEndpoint {
            bus: self.clone(),
            id: bus.subscribers.len() - 1,
            channel,
        }
    }

    /// Frames waiting across all endpoints.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.lock().subscribers.iter().map(|s| s.queue.len()).sum()
    }

    /// Shuffle every endpoint's queue. Returns how many frames changed
    /// position.
    pub fn shuffle_in_flight(&self, rng: &mut GameRng) -> usize {
        let mut moved = 0;
        for subscriber in self.lock().subscribers.iter_mut() {
            let mut order: Vec<usize> = (0..subscriber.queue.len()).collect();
            rng.shuffle(&mut order);
            moved += order.iter().enumerate().filter(|&(to, &from)| to != from).count();

            let frames: Vec<_> = subscriber.queue.drain(..).collect();
            subscriber.queue.extend(order.into_iter().map(|from| frames[from].clone()));
        }
        moved
    }

    /// Deliver every queued frame twice.
    pub fn duplicate_in_flight(&self) {
        for subscriber in self.lock().subscribers.iter_mut() {
            let frames: Vec<_> = subscriber.queue.iter().cloned().collect();
            subscriber.queue.extend(frames);
        }
    }

    /// Lose the frame at `index` in `endpoint`'s queue.
    pub fn drop_in_flight(&self, endpoint: &MemoryEndpoint, index: usize) -> Option<Vec<u8>> {
        self.lock()
            .subscribers
            .get_mut(endpoint.id)
            .and_then(|s| s.queue.remove(index))
    }
}

/// One subscriber on a `MemoryBus`.
#[derive(Debug)]
pub struct MemoryEndpoint {
    bus: MemoryBus,
    id: usize,
    channel: String,
}

impl MemoryEndpoint {
    #[must_use]
    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Frames waiting for this endpoint.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.bus
            .lock()
            .subscribers
            .get(self.id)
            .map_or(0, |s| s.queue.len())
    }

    /// Stop sending and receiving. Later publishes fail.
    pub fn close(&self) {
        if let Some(subscriber) = self.bus.lock().subscribers.get_mut(self.id) {
            subscriber.closed = true;
            subscriber.queue.clear();
        }
    }
}

impl Transport for MemoryEndpoint {
    fn publish(&mut self, frame: Vec<u8>) -> Result<(), TransportError> {
        let mut bus = self.bus.lock();
        if bus.subscribers.get(self.id).map_or(true, |s| s.closed) {
            return Err(TransportError::Closed(self.channel.clone()));
        }

        let mut delivered = 0;
        for (id, subscriber) in bus.subscribers.iter_mut().enumerate() {
            if id != self.id && !subscriber.closed && subscriber.channel == self.channel {
                subscriber.queue.push_back(frame.clone());
                delivered += 1;
            }
        }
        if delivered == 0 {
            return Err(TransportError::Dropped);
        }
        trace!(channel = %self.channel, bytes = frame.len(), delivered, "published frame");
        Ok(())
    }

    fn try_recv(&mut self) -> Option<Vec<u8>> {
        self.bus
            .lock()
            .subscribers
            .get_mut(self.id)
            .and_then(|s| s.queue.pop_front())
    }
}
