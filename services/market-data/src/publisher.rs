//! Market data publisher.
//!
//! Keeps the subscriber registry and fans frames out to every active
//! subscriber. Each subscriber owns a bounded outbound queue; a subscriber
//! whose queue is full simply misses that frame rather than stalling the
//! publisher, and subscribers whose receiving side has gone away are swept
//! on the next broadcast.
//!
//! Depth snapshots and quotes are published on a periodic tick; trades are
//! pushed by the submit path the moment they execute. Snapshots and quotes
//! are taken under the book lock inside the engine, which is released
//! before any frame is queued.

use exchange_types::Trade;
use matching_engine::MatchingEngine;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::events::MarketDataMessage;

/// Outbound queue depth per subscriber. When the queue is full the
/// subscriber misses frames; it is never blocked on.
const OUTBOUND_QUEUE_CAPACITY: usize = 256;

/// Lifecycle of one subscriber connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriberState {
    /// Registered, transport handshake not finished; receives nothing yet.
    Connecting,
    /// Receiving frames.
    Active,
    /// Transport gone; removed on the next sweep.
    Closed,
}

struct Subscriber {
    id: u64,
    state: SubscriberState,
    sender: mpsc::Sender<String>,
}

pub struct MarketDataPublisher {
    engine: Arc<MatchingEngine>,
    interval: Duration,
    subscribers: Mutex<Vec<Subscriber>>,
    next_subscriber_id: AtomicU64,
    frames_dropped: AtomicU64,
}

impl MarketDataPublisher {
    pub fn new(engine: Arc<MatchingEngine>, interval: Duration) -> Self {
        Self {
            engine,
            interval,
            subscribers: Mutex::new(Vec::new()),
            next_subscriber_id: AtomicU64::new(1),
            frames_dropped: AtomicU64::new(0),
        }
    }

    /// Register a new subscriber in the CONNECTING state. The caller pumps
    /// the returned receiver into its transport and calls [`activate`]
    /// once the connection is ready; there is no historical backfill.
    ///
    /// [`activate`]: MarketDataPublisher::activate
    pub fn subscribe(&self) -> (u64, mpsc::Receiver<String>) {
        let (sender, receiver) = mpsc::channel(OUTBOUND_QUEUE_CAPACITY);
        let id = self.next_subscriber_id.fetch_add(1, Ordering::Relaxed);
        let mut subscribers = self.subscribers.lock().expect("subscriber list poisoned");
        subscribers.push(Subscriber {
            id,
            state: SubscriberState::Connecting,
            sender,
        });
        info!(
            subscriber_id = id,
            total = subscribers.len(),
            "market data client connected"
        );
        (id, receiver)
    }

    /// Move a subscriber to ACTIVE; it starts receiving frames on the next
    /// broadcast.
    pub fn activate(&self, id: u64) {
        let mut subscribers = self.subscribers.lock().expect("subscriber list poisoned");
        if let Some(subscriber) = subscribers.iter_mut().find(|s| s.id == id) {
            subscriber.state = SubscriberState::Active;
        }
    }

    /// Remove a subscriber (peer disconnect or adapter policy).
    pub fn unsubscribe(&self, id: u64) {
        let mut subscribers = self.subscribers.lock().expect("subscriber list poisoned");
        subscribers.retain(|s| s.id != id);
        info!(
            subscriber_id = id,
            total = subscribers.len(),
            "market data client disconnected"
        );
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .lock()
            .expect("subscriber list poisoned")
            .len()
    }

    /// Frames dropped so far because a subscriber's queue was full.
    pub fn frames_dropped(&self) -> u64 {
        self.frames_dropped.load(Ordering::Relaxed)
    }

    /// Publish a depth snapshot and a quote for every configured symbol.
    pub fn publish_market_data(&self) {
        for symbol in self.engine.symbols() {
            if let Some(snapshot) = self.engine.snapshot(symbol) {
                self.send_message(MarketDataMessage::order_book(snapshot));
            }
            if let Some(quote) = self.engine.quote(symbol) {
                self.send_message(MarketDataMessage::quote(&quote));
            }
        }
    }

    /// Publish a trade at execution time.
    pub fn publish_trade(&self, trade: &Trade) {
        self.send_message(MarketDataMessage::trade(trade));
    }

    fn send_message(&self, message: MarketDataMessage) {
        match message.encode() {
            Ok(frame) => self.broadcast(frame),
            Err(err) => error!(%err, "failed to encode market data message"),
        }
    }

    /// Queue a frame on every active subscriber. Never blocks: full queues
    /// skip the frame, closed queues mark the subscriber for removal.
    fn broadcast(&self, frame: String) {
        let mut subscribers = self.subscribers.lock().expect("subscriber list poisoned");

        for subscriber in subscribers.iter_mut() {
            if subscriber.state != SubscriberState::Active {
                continue;
            }
            match subscriber.sender.try_send(frame.clone()) {
                Ok(()) => {}
                Err(mpsc::error::TrySendError::Full(_)) => {
                    self.frames_dropped.fetch_add(1, Ordering::Relaxed);
                    debug!(subscriber_id = subscriber.id, "subscriber lagging, frame skipped");
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    subscriber.state = SubscriberState::Closed;
                }
            }
        }

        let before = subscribers.len();
        subscribers.retain(|s| s.state != SubscriberState::Closed);
        if subscribers.len() != before {
            info!(
                removed = before - subscribers.len(),
                total = subscribers.len(),
                "swept closed market data clients"
            );
        }
    }

    /// Drive the periodic publication tick until the task is aborted.
    pub async fn run(self: Arc<Self>) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        info!(interval_ms = self.interval.as_millis() as u64, "market data publisher started");
        loop {
            ticker.tick().await;
            self.publish_market_data();
        }
    }
}
