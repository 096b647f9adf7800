//! Minimal synchronous publish/subscribe used for all state fan-out.
//!
//! A [`Channel`] carries one payload type and delivers every emission to all
//! registered listeners, synchronously and in registration order. Listeners
//! are identified by a unique name per channel so they can be removed later.

use std::fmt::{self, Debug};

use thiserror::Error;

/// Why a subscribe or unsubscribe call was rejected.
#[derive(Debug, Error, Copy, Clone, Eq, PartialEq)]
pub enum SubscribeConflict {
    /// A listener with the same id is already registered on the channel.
    #[error("a listener with that id is already registered")]
    DuplicateId,
    /// No listener with the given id is registered on the channel.
    #[error("no listener with that id is registered")]
    UnknownId,
}

/// Error returned when modifying the listener set of a [`Channel`] fails.
#[derive(Error, Clone, Eq, PartialEq)]
#[error("cannot update subscription of {listener:?} on topic {topic:?}: {conflict}")]
pub struct SubscribeError {
    #[source]
    conflict: SubscribeConflict,
    topic: &'static str,
    listener: String,
}

impl Debug for SubscribeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl SubscribeError {
    fn new(conflict: SubscribeConflict, topic: &'static str, listener: &str) -> Self {
        Self {
            conflict,
            topic,
            listener: listener.to_owned(),
        }
    }

    /// Get the conflict that caused the rejection.
    pub fn conflict(&self) -> SubscribeConflict {
        self.conflict
    }

    /// Get the topic of the channel the call was made against.
    pub fn topic(&self) -> &'static str {
        self.topic
    }

    /// Get the listener id the call was made with.
    pub fn listener(&self) -> &str {
        &self.listener
    }
}

struct Subscriber<T> {
    id: String,
    notify: Box<dyn FnMut(&T)>,
}

/// A single named topic carrying payloads of type `T`.
pub struct Channel<T> {
    topic: &'static str,
    subscribers: Vec<Subscriber<T>>,
}

impl<T> Channel<T> {
    /// Construct a channel with the given topic name. The name is only used
    /// for diagnostics; the payload type is what ties publishers to
    /// listeners.
    pub fn new(topic: &'static str) -> Self {
        Self {
            topic,
            subscribers: Vec::new(),
        }
    }

    /// The topic name of this channel.
    pub fn topic(&self) -> &'static str {
        self.topic
    }

    /// Register a listener under a unique id. Rejected if the id is already
    /// in use on this channel.
    pub fn subscribe<F>(&mut self, id: impl Into<String>, notify: F) -> Result<(), SubscribeError>
    where
        F: FnMut(&T) + 'static,
    {
        let id = id.into();
        if self.subscribers.iter().any(|sub| sub.id == id) {
            return Err(SubscribeError::new(
                SubscribeConflict::DuplicateId,
                self.topic,
                &id,
            ));
        }
        self.subscribers.push(Subscriber {
            id,
            notify: Box::new(notify),
        });
        Ok(())
    }

    /// Remove the listener registered under `id`. Rejected if no such
    /// listener exists.
    pub fn unsubscribe(&mut self, id: &str) -> Result<(), SubscribeError> {
        match self.subscribers.iter().position(|sub| sub.id == id) {
            Some(index) => {
                self.subscribers.remove(index);
                Ok(())
            }
            None => Err(SubscribeError::new(
                SubscribeConflict::UnknownId,
                self.topic,
                id,
            )),
        }
    }

    /// Deliver `payload` to every listener, in registration order.
    pub fn emit(&mut self, payload: &T) {
        for sub in &mut self.subscribers {
            (sub.notify)(payload);
        }
    }
}
