#![crate_name = "rx_thread"]
#![deny(missing_docs)]

//! # A Tiny Example
//! ```
//! use rx_thread::*;
//!
//! let pipe = RxThread::new();
//! let consumer = pipe
//!     .subscribe_consumer(|n: i32| println!("received {}", n))
//!     .expect("subscribed");
//! pipe.submit(|emitter: &dyn Emitter<i32>| {
//!     for n in 1..=3 {
//!         emitter.push_value(n);
//!     }
//! })
//! .expect("submitted");
//! consumer.join().expect("consumer finished");
//! ```
//!
//! What this does:
//! - `RxThread::new`: creates a pipe, with an empty channel.
//! - `subscribe_consumer`: starts a consumer thread, which waits for signals.
//! - `submit`: starts a producer thread, which runs the closure and then completes the stream.
//! - `join`: waits until the consumer thread has seen the end of the stream.
//!
//! # Signals
//! A producer emits a sequence of signals, each of which is
//! a `value signal`,
//! an `error signal`,
//! or a `complete signal`.
//!
//! A `value signal` carries a produced value.
//! An `error signal` carries an [Error]. The stream continues after an error.
//! A `complete signal` ends the stream. It is emitted exactly once, after everything else.
//!
//! Signals are delivered in the order they were emitted.
//!
//! # Subscribers
//! There are two ways to receive signals.
//!
//! A [Consumer] only sees values.
//! Error signals are dropped, and the complete signal ends the consumer thread without telling the consumer.
//! Any `FnMut(T)` closure is a consumer.
//!
//! An [Observer] sees every signal.
//! ```
//! use rx_thread::{new_error, Emitter, Error, Observer, RxThread};
//! use std::io;
//! use std::sync::mpsc;
//!
//! struct Printer {
//!     done: mpsc::Sender<usize>,
//!     seen: usize,
//! }
//!
//! impl Observer<String> for Printer {
//!     fn on_accept(&mut self, line: String) {
//!         self.seen += 1;
//!         println!("line: {}", line);
//!     }
//!
//!     fn on_error(&mut self, error: Error) {
//!         self.seen += 1;
//!         println!("error: {}", error);
//!     }
//!
//!     fn on_complete(self) {
//!         self.done.send(self.seen).unwrap();
//!     }
//! }
//!
//! let (done, seen) = mpsc::channel();
//! let pipe = RxThread::new();
//! pipe.subscribe(Printer { done, seen: 0 }).unwrap();
//! pipe.submit(|emitter: &dyn Emitter<String>| {
//!     emitter.push_value(String::from("first"));
//!     emitter.push_error(new_error(io::Error::new(io::ErrorKind::Other, "hiccup")));
//!     emitter.push_value(String::from("second"));
//! })
//! .unwrap();
//!
//! // The handles were dropped, so both threads run detached.
//! // The observer tells us when it is done.
//! assert_eq!(3, seen.recv().unwrap());
//! ```
//!
//! # Executors
//! By default, the producer and the consumer each get a dedicated thread.
//! Use [RxThread::with_config] to name those threads, or [RxThread::with_executor] to run them on a
//! [ThreadPool](threadpool::ThreadPool) instead.
//!
//! # Task Handles
//! [RxThread::submit], [RxThread::subscribe] and [RxThread::subscribe_consumer] return a [TaskHandle].
//! Dropping it lets the task run detached.
//! [TaskHandle::join] waits for the task, and reports a panic in the work routine or callback as [RxError::Panicked].
//!
//! A pipe takes one producer and one subscriber.
//! ```
//! use rx_thread::{Emitter, RxError, RxThread};
//!
//! let pipe = RxThread::<i32>::new();
//! let producer = pipe.submit(|_: &dyn Emitter<i32>| {}).unwrap();
//! assert!(matches!(
//!     pipe.submit(|_: &dyn Emitter<i32>| {}),
//!     Err(RxError::AlreadySubmitted)
//! ));
//! producer.join().unwrap();
//! ```

mod channel;
mod config;
mod emitter;
mod errors;
mod executor;
mod rx_thread;
mod signal;
mod traits;

pub use channel::SignalChannel;
pub use config::Config;
pub use errors::{new_error, Error, Result, Role, RxError};
pub use executor::{DedicatedThread, Executor, Job, TaskHandle};
pub use rx_thread::RxThread;
pub use signal::{Signal, SignalKind};
pub use traits::{Consumer, Emitter, Observer, Work};
