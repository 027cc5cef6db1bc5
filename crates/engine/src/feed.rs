// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A broadcast primitive: many subscribers, each seeing every value
//! published after they subscribed, with no value ever silently dropped.
//! One coordinator (`publish`) fans a value out to every subscriber's own
//! bounded channel, awaiting each in turn; a subscriber that stops reading
//! makes `publish` wait for it rather than skip it. Unsubscribing (dropping
//! the `Subscription`) closes that subscriber's channel, which unblocks any
//! in-flight send to it on the next attempt rather than deadlocking the
//! fan-out.

use parking_lot::Mutex;
use tokio::sync::mpsc;

pub struct Feed<T: Clone + Send + 'static> {
    capacity: usize,
    subscribers: Mutex<Vec<mpsc::Sender<T>>>,
}

impl<T: Clone + Send + 'static> Feed<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            subscribers: Mutex::new(Vec::new()),
        }
    }

    /// Delivers `value` to every currently subscribed channel, blocking on
    /// each one that is full until it drains or closes. Subscribers that
    /// have since unsubscribed are pruned rather than delivered to.
    pub async fn publish(&self, value: T) {
        let senders: Vec<mpsc::Sender<T>> = self.subscribers.lock().clone();
        let mut closed = Vec::new();
        for tx in &senders {
            if tx.send(value.clone()).await.is_err() {
                closed.push(tx.clone());
            }
        }
        if !closed.is_empty() {
            self.subscribers
                .lock()
                .retain(|tx| !closed.iter().any(|dead| dead.same_channel(tx)));
        }
    }

    pub fn subscribe(&self) -> Subscription<T> {
        let (tx, rx) = mpsc::channel(self.capacity);
        self.subscribers.lock().push(tx);
        Subscription { rx }
    }
}

/// One subscriber's view of a [`Feed`]. Dropping it unsubscribes: any
/// `publish` currently blocked sending to it observes the channel close and
/// moves on to the next subscriber instead of waiting forever.
pub struct Subscription<T: Clone + Send + 'static> {
    rx: mpsc::Receiver<T>,
}

impl<T: Clone + Send + 'static> Subscription<T> {
    pub async fn recv(&mut self) -> Option<T> {
        self.rx.recv().await
    }
}

#[cfg(test)]
#[path = "feed_tests.rs"]
mod tests;
