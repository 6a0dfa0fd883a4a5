use crate::channel::SignalChannel;
use crate::config::Config;
use crate::emitter::ChannelEmitter;
use crate::errors::{Result, Role, RxError};
use crate::executor::{spawn, supervise, DedicatedThread, Executor, TaskHandle};
use crate::signal::Signal;
use crate::traits::{Consumer, Observer, Work};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

/// A cross-thread signal pipe.
///
/// One work routine ([RxThread::submit]) produces signals on a producer task.
/// One subscriber ([RxThread::subscribe] or [RxThread::subscribe_consumer]) receives them on a consumer task.
/// The two tasks only meet in the channel, which they share ownership of:
/// dropping the [RxThread] doesn't stop or invalidate either task.
///
/// Each pipe accepts a single producer and a single subscriber.
/// Further calls fail with [RxError::AlreadySubmitted] or [RxError::AlreadySubscribed].
///
/// ```
/// use rx_thread::{Emitter, RxThread};
/// use std::sync::mpsc;
///
/// let pipe = RxThread::new();
/// let (tx, rx) = mpsc::channel();
///
/// let consumer = pipe
///     .subscribe_consumer(move |word: &'static str| tx.send(word).unwrap())
///     .unwrap();
/// pipe.submit(|emitter: &dyn Emitter<&'static str>| {
///     emitter.push_value("hello");
///     emitter.push_value("world");
/// })
/// .unwrap();
///
/// consumer.join().unwrap();
/// assert_eq!(vec!["hello", "world"], rx.try_iter().collect::<Vec<_>>());
/// ```
pub struct RxThread<T, E = DedicatedThread> {
    channel: Arc<SignalChannel<T>>,
    submitted: AtomicBool,
    subscribed: AtomicBool,
    config: Config,
    executor: E,
}

impl<T: Send + 'static> RxThread<T> {
    /// Create a pipe that runs its tasks on dedicated threads.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Create a pipe that runs its tasks on dedicated threads, configured by `config`.
    pub fn with_config(config: Config) -> Self {
        Self::with_executor(config, DedicatedThread)
    }
}

impl<T: Send + 'static> Default for RxThread<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, E> RxThread<T, E>
where
    T: Send + 'static,
    E: Executor,
{
    /// Create a pipe that runs its tasks on `executor`.
    ///
    /// ```
    /// use rx_thread::{Config, Emitter, RxThread};
    /// use threadpool::ThreadPool;
    ///
    /// let pool = ThreadPool::with_name("rx-thread example".into(), 2);
    /// let pipe = RxThread::with_executor(Config::default(), pool);
    /// let consumer = pipe.subscribe_consumer(|n: u64| println!("got {}", n)).unwrap();
    /// pipe.submit(|emitter: &dyn Emitter<u64>| (1..=3).for_each(|n| emitter.push_value(n)))
    ///     .unwrap();
    /// consumer.join().unwrap();
    /// ```
    pub fn with_executor(config: Config, executor: E) -> Self {
        Self {
            channel: Arc::new(SignalChannel::new()),
            submitted: AtomicBool::new(false),
            subscribed: AtomicBool::new(false),
            config,
            executor,
        }
    }

    /// The configuration of this pipe.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Number of signals produced but not yet taken by the subscriber.
    pub fn pending(&self) -> usize {
        self.channel.len()
    }

    /// Start the producer task.
    ///
    /// The task runs `work` with an [Emitter](crate::Emitter), then pushes the complete signal.
    /// If `work` panics, the complete signal is still pushed, and the panic is reported through the returned handle.
    pub fn submit<W>(&self, work: W) -> Result<TaskHandle>
    where
        W: Work<T>,
    {
        claim(&self.submitted, RxError::AlreadySubmitted)?;
        let channel = self.channel.clone();
        let body = move || {
            let emitter = ChannelEmitter::new(channel);
            let outcome = supervise(Role::Producer, || work.on_work(&emitter));
            emitter.complete_if_open();
            outcome
        };
        self.start(&self.submitted, Role::Producer, body)
    }

    /// Start a consumer task that dispatches every signal to `observer`.
    ///
    /// Values go to [Observer::on_accept], errors to [Observer::on_error].
    /// The complete signal invokes [Observer::on_complete] and ends the task.
    pub fn subscribe<O>(&self, observer: O) -> Result<TaskHandle>
    where
        O: Observer<T>,
    {
        claim(&self.subscribed, RxError::AlreadySubscribed)?;
        let channel = self.channel.clone();
        let body = move || {
            supervise(Role::Consumer, move || drain_to_observer(&channel, observer))
        };
        self.start(&self.subscribed, Role::Consumer, body)
    }

    /// Start a consumer task that dispatches values to `consumer`.
    ///
    /// Error signals are dropped: a [Consumer] has no way to receive them.
    /// The complete signal ends the task without notifying the consumer.
    pub fn subscribe_consumer<C>(&self, consumer: C) -> Result<TaskHandle>
    where
        C: Consumer<T>,
    {
        claim(&self.subscribed, RxError::AlreadySubscribed)?;
        let channel = self.channel.clone();
        let body = move || {
            supervise(Role::Consumer, move || drain_to_consumer(&channel, consumer))
        };
        self.start(&self.subscribed, Role::Consumer, body)
    }

    fn start<F>(&self, flag: &AtomicBool, role: Role, body: F) -> Result<TaskHandle>
    where
        F: FnOnce() -> Result<()> + Send + 'static,
    {
        spawn(&self.executor, &self.config, role, body).inspect_err(|e| {
            debug!(%role, error = e.as_label(), "task could not be started");
            // Nothing ran, so the caller may try again.
            flag.store(false, Ordering::Release);
        })
    }
}

/// Mark a one-shot flag as taken.
fn claim(flag: &AtomicBool, taken: RxError) -> Result<()> {
    flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
        .map(drop)
        .map_err(|_| taken)
}

fn drain_to_observer<T, O>(channel: &SignalChannel<T>, mut observer: O)
where
    O: Observer<T>,
{
    loop {
        match channel.take_next() {
            Signal::Value(value) => observer.on_accept(value),
            Signal::Error(error) => observer.on_error(error),
            Signal::Complete => return observer.on_complete(),
        }
    }
}

fn drain_to_consumer<T, C>(channel: &SignalChannel<T>, mut consumer: C)
where
    C: Consumer<T>,
{
    loop {
        match channel.take_next() {
            Signal::Value(value) => consumer.on_accept(value),
            Signal::Error(error) => debug!(%error, "consumer ignores error signal"),
            Signal::Complete => return,
        }
    }
}
