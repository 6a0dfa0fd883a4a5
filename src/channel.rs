use crate::errors::Error;
use crate::signal::Signal;
use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use tracing::trace;

/// FIFO queue of [Signal]s, shared between a producer thread and a consumer thread.
///
/// Every push appends under the lock and wakes one waiting taker.
/// The lock is never held while a signal is dispatched, so a slow callback doesn't block the producer.
///
/// The channel doesn't know whether the stream completed.
/// Making sure [SignalChannel::push_complete] is the last push is up to the producer.
pub struct SignalChannel<T> {
    /// Queue of signals, in delivery order.
    queue: Mutex<VecDeque<Signal<T>>>,
    /// Notified on every push.
    available: Condvar,
}

impl<T> SignalChannel<T> {
    /// Create an empty channel.
    pub fn new() -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            available: Condvar::new(),
        }
    }

    /// Append a value signal.
    pub fn push_value(&self, value: T) {
        self.push(Signal::Value(value))
    }

    /// Append an error signal.
    pub fn push_error(&self, error: Error) {
        self.push(Signal::Error(error))
    }

    /// Append the complete signal.
    pub fn push_complete(&self) {
        self.push(Signal::Complete)
    }

    fn push(&self, signal: Signal<T>) {
        let kind = signal.kind();
        let len = {
            let mut queue = self.lock();
            queue.push_back(signal);
            queue.len()
        };
        self.available.notify_one();
        trace!(%kind, len, "signal pushed");
    }

    /// Remove the front signal, blocking until one is available.
    pub fn take_next(&self) -> Signal<T> {
        let mut queue = self
            .available
            .wait_while(self.lock(), |queue| queue.is_empty())
            .unwrap_or_else(PoisonError::into_inner);
        let Some(signal) = queue.pop_front() else {
            unreachable!("wait_while returned on an empty queue");
        };
        trace!(kind = %signal.kind(), len = queue.len(), "signal taken");
        signal
    }

    /// Remove the front signal, if there is one.
    pub fn try_take_next(&self) -> Option<Signal<T>> {
        self.lock().pop_front()
    }

    /// Number of queued signals.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` if no signals are queued.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // The queue is only touched by push_back/pop_front, neither of which can leave it half-updated,
    // so a poisoned lock still guards a consistent queue.
    fn lock(&self) -> MutexGuard<'_, VecDeque<Signal<T>>> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T> Default for SignalChannel<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::SignalChannel;
    use crate::errors::{new_error, ErrorForTesting};
    use crate::signal::{Signal, SignalKind};
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn it_works() {
        let channel = SignalChannel::new();
        channel.push_value("bla");
        assert_eq!(1, channel.len());
        match channel.take_next() {
            Signal::Value(v) => assert_eq!("bla", v),
            other => panic!("unexpected signal {:?}", other),
        }
        assert!(channel.is_empty());
    }

    #[test]
    fn empty_queue_yields_nothing() {
        let channel = SignalChannel::<String>::new();
        assert!(channel.try_take_next().is_none());
    }

    #[test]
    fn signals_come_out_in_push_order() {
        let channel = SignalChannel::new();
        channel.push_error(new_error(ErrorForTesting::from("first")));
        channel.push_value(1);
        channel.push_value(2);
        channel.push_complete();

        let kinds: Vec<SignalKind> = std::iter::from_fn(|| channel.try_take_next())
            .map(|signal| signal.kind())
            .collect();
        assert_eq!(
            vec![
                SignalKind::Error,
                SignalKind::Value,
                SignalKind::Value,
                SignalKind::Complete
            ],
            kinds
        );
    }

    #[test]
    fn error_payload_is_unchanged() {
        let channel = SignalChannel::<()>::new();
        channel.push_error(new_error(ErrorForTesting::from("payload")));
        match channel.take_next() {
            Signal::Error(e) => assert_eq!(
                Some(&ErrorForTesting::from("payload")),
                e.downcast_ref::<ErrorForTesting>()
            ),
            other => panic!("unexpected signal {:?}", other),
        }
    }

    #[test]
    fn take_next_blocks_until_push() {
        let channel = Arc::new(SignalChannel::new());
        let taker = {
            let channel = channel.clone();
            thread::spawn(move || match channel.take_next() {
                Signal::Value(v) => v,
                other => panic!("unexpected signal {:?}", other),
            })
        };

        thread::sleep(Duration::from_millis(20));
        assert!(!taker.is_finished(), "taker should wait for a signal");
        channel.push_value(42);
        assert_eq!(42, taker.join().expect("taker thread completes"));
    }
}
