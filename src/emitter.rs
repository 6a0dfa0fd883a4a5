use crate::channel::SignalChannel;
use crate::errors::Error;
use crate::traits::Emitter;
use std::cell::Cell;
use std::sync::Arc;
use tracing::warn;

/// The [Emitter] handed to a work routine.
///
/// Forwards every push into the channel, up to and including the first complete signal.
/// Anything pushed after that is dropped, so the complete signal is always the last one in the channel.
pub(crate) struct ChannelEmitter<T> {
    channel: Arc<SignalChannel<T>>,
    completed: Cell<bool>,
}

impl<T> ChannelEmitter<T> {
    pub(crate) fn new(channel: Arc<SignalChannel<T>>) -> Self {
        Self {
            channel,
            completed: Cell::new(false),
        }
    }

    /// Push the complete signal, unless the work routine already did.
    pub(crate) fn complete_if_open(&self) {
        if !self.completed.get() {
            self.push_complete();
        }
    }

    fn is_open(&self, what: &'static str) -> bool {
        if self.completed.get() {
            warn!(signal = what, "push after complete signal dropped");
            false
        } else {
            true
        }
    }
}

impl<T> Emitter<T> for ChannelEmitter<T> {
    fn push_value(&self, value: T) {
        if self.is_open("value") {
            self.channel.push_value(value);
        }
    }

    fn push_error(&self, error: Error) {
        if self.is_open("error") {
            self.channel.push_error(error);
        }
    }

    fn push_complete(&self) {
        if self.is_open("complete") {
            self.completed.set(true);
            self.channel.push_complete();
        }
    }
}
