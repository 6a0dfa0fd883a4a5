//! Where producer and consumer tasks run.
//!
//! ## Dedicated Threads
//! [DedicatedThread] starts a fresh OS thread per task.
//! This is the default, and the only executor that honours [Config].
//!
//! ## Thread Pool
//! A [ThreadPool] can run the tasks instead.
//! A consumer occupies its pool thread until it sees the complete signal,
//! so the pool needs a free thread for the producer while a consumer is waiting.
//!
//! Either way, each task reports its outcome through a [TaskHandle].
//! Dropping the handle detaches the task.

use crate::config::Config;
use crate::errors::{Result, Role, RxError};
use std::any::Any;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread;
use threadpool::ThreadPool;
use tracing::{debug, error};

/// A unit of work handed to an [Executor].
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Executors run the tasks of a pipe.
pub trait Executor {
    /// Start running `job`. Must not wait for it to finish.
    fn execute(&self, config: &Config, role: Role, job: Job) -> io::Result<()>;
}

/// Executor that runs each task on its own, newly spawned, thread.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct DedicatedThread;

impl Executor for DedicatedThread {
    fn execute(&self, config: &Config, role: Role, job: Job) -> io::Result<()> {
        let name = config.task_name(role);
        // thread::Builder panics on interior NUL bytes.
        if name.contains('\0') {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "thread name contains a NUL byte",
            ));
        }
        let mut builder = thread::Builder::new().name(name);
        if let Some(bytes) = config.stack_size {
            builder = builder.stack_size(bytes);
        }
        // The join handle is dropped: the task reports through its TaskHandle instead.
        builder.spawn(job).map(drop)
    }
}

impl Executor for ThreadPool {
    fn execute(&self, _: &Config, _: Role, job: Job) -> io::Result<()> {
        ThreadPool::execute(self, job);
        Ok(())
    }
}

/// Outcome slot, shared by a task and its handle.
struct Slot {
    outcome: Mutex<Option<Result<()>>>,
    done: Condvar,
}

impl Slot {
    fn lock(&self) -> MutexGuard<'_, Option<Result<()>>> {
        self.outcome.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Task-side end of the slot.
///
/// If the task is dropped without finishing (for example, an executor discards the job),
/// the handle sees [RxError::Disconnected].
struct Completer {
    slot: Arc<Slot>,
}

impl Completer {
    fn finish(self, outcome: Result<()>) {
        self.set(outcome);
    }

    fn set(&self, outcome: Result<()>) {
        let mut guard = self.slot.lock();
        if guard.is_none() {
            *guard = Some(outcome);
            self.slot.done.notify_all();
        }
    }
}

impl Drop for Completer {
    fn drop(&mut self) {
        self.set(Err(RxError::Disconnected));
    }
}

/// Handle to a running producer or consumer task.
///
/// Dropping the handle detaches the task: it keeps running, and its outcome is discarded.
pub struct TaskHandle {
    slot: Arc<Slot>,
}

impl TaskHandle {
    /// Block until the task ends.
    ///
    /// Returns [RxError::Panicked] if the work routine or a callback panicked.
    pub fn join(self) -> Result<()> {
        let mut guard = self
            .slot
            .done
            .wait_while(self.slot.lock(), |outcome| outcome.is_none())
            .unwrap_or_else(PoisonError::into_inner);
        guard.take().unwrap_or(Err(RxError::Disconnected))
    }

    /// Returns `true` once the task has ended.
    pub fn is_finished(&self) -> bool {
        self.slot.lock().is_some()
    }
}

/// Run `body` as a task of the given role, on `executor`.
pub(crate) fn spawn<E, F>(executor: &E, config: &Config, role: Role, body: F) -> Result<TaskHandle>
where
    E: Executor + ?Sized,
    F: FnOnce() -> Result<()> + Send + 'static,
{
    let slot = Arc::new(Slot {
        outcome: Mutex::new(None),
        done: Condvar::new(),
    });
    let completer = Completer { slot: slot.clone() };

    let job: Job = Box::new(move || {
        debug!(%role, "task started");
        let outcome = body();
        match &outcome {
            Ok(()) => debug!(%role, "task finished"),
            Err(e) => debug!(%role, error = e.as_label(), "task failed"),
        }
        completer.finish(outcome);
    });
    executor.execute(config, role, job)?;
    Ok(TaskHandle { slot })
}

/// Run `f`, turning a panic into [RxError::Panicked].
pub(crate) fn supervise<F, R>(role: Role, f: F) -> Result<R>
where
    F: FnOnce() -> R,
{
    panic::catch_unwind(AssertUnwindSafe(f)).map_err(|payload| {
        let message = panic_message(payload.as_ref());
        error!(%role, %message, "task panicked");
        RxError::Panicked { role, message }
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        String::from(*s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        String::from("non-string panic payload")
    }
}

#[cfg(test)]
mod tests {
    use super::{spawn, supervise, DedicatedThread, Executor, Job};
    use crate::config::Config;
    use crate::errors::{Role, RxError};
    use std::io;
    use std::sync::mpsc;
    use std::thread;
    use threadpool::ThreadPool;

    /// Executor that throws every job away.
    struct Discarding;

    impl Executor for Discarding {
        fn execute(&self, _: &Config, _: Role, job: Job) -> io::Result<()> {
            drop(job);
            Ok(())
        }
    }

    /// Executor that can't start anything.
    struct Refusing;

    impl Executor for Refusing {
        fn execute(&self, _: &Config, _: Role, _: Job) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::Other, "no threads today"))
        }
    }

    #[test]
    fn dedicated_thread_runs_the_job() {
        let (tx, rx) = mpsc::channel();
        let handle = spawn(&DedicatedThread, &Config::default(), Role::Producer, move || {
            tx.send(String::from("ran")).expect("send succeeds");
            Ok(())
        })
        .expect("spawn succeeds");

        handle.join().expect("job succeeded");
        assert_eq!("ran", rx.recv().expect("job ran"));
    }

    #[test]
    fn dedicated_thread_uses_configured_name() {
        let (tx, rx) = mpsc::channel();
        let config = Config::default().with_thread_name("named");
        let handle = spawn(&DedicatedThread, &config, Role::Consumer, move || {
            tx.send(thread::current().name().map(String::from))
                .expect("send succeeds");
            Ok(())
        })
        .expect("spawn succeeds");

        handle.join().expect("job succeeded");
        assert_eq!(
            Some(String::from("named-consumer")),
            rx.recv().expect("job ran")
        );
    }

    #[test]
    fn thread_name_with_nul_is_refused() {
        let config = Config::default().with_thread_name("a\0b");
        match spawn(&DedicatedThread, &config, Role::Producer, || Ok(())) {
            Err(RxError::Spawn(e)) => assert_eq!(io::ErrorKind::InvalidInput, e.kind()),
            Err(e) => panic!("unexpected error {:?}", e),
            Ok(_) => panic!("spawn should fail"),
        }
    }

    #[test]
    fn thread_pool_runs_the_job() {
        let pool = ThreadPool::with_name("rx-thread executor test".into(), 1);
        let handle = spawn(&pool, &Config::default(), Role::Producer, || Ok(()))
            .expect("spawn succeeds");
        handle.join().expect("job succeeded");
    }

    #[test]
    fn panic_is_reported_through_the_handle() {
        let handle = spawn(&DedicatedThread, &Config::default(), Role::Consumer, || {
            supervise(Role::Consumer, || panic!("callback exploded"))
        })
        .expect("spawn succeeds");

        match handle.join() {
            Err(RxError::Panicked { role, message }) => {
                assert_eq!(Role::Consumer, role);
                assert_eq!("callback exploded", message);
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn formatted_panic_message_is_kept() {
        match supervise(Role::Producer, || panic!("failed at step {}", 3)) {
            Err(RxError::Panicked { message, .. }) => assert_eq!("failed at step 3", message),
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn supervise_passes_through_the_result() {
        assert_eq!(7, supervise(Role::Producer, || 7).expect("no panic"));
    }

    #[test]
    fn discarded_job_disconnects_the_handle() {
        let handle = spawn(&Discarding, &Config::default(), Role::Producer, || Ok(()))
            .expect("spawn succeeds");
        assert!(handle.is_finished());
        assert!(matches!(handle.join(), Err(RxError::Disconnected)));
    }

    #[test]
    fn refused_spawn_is_an_error() {
        match spawn(&Refusing, &Config::default(), Role::Producer, || Ok(())) {
            Err(RxError::Spawn(e)) => assert_eq!("no threads today", e.to_string()),
            Err(e) => panic!("unexpected error {:?}", e),
            Ok(_) => panic!("spawn should fail"),
        }
    }
}
