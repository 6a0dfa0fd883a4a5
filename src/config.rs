//! Settings for the tasks a pipe spawns.

use crate::errors::Role;

/// Configuration of an [RxThread](crate::RxThread).
///
/// Only [DedicatedThread](crate::DedicatedThread) honours these settings.
/// A [ThreadPool](threadpool::ThreadPool) executor runs tasks on threads it already has.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    /// Prefix for thread names.
    ///
    /// Producer threads are named `{thread_name}-producer`, consumer threads `{thread_name}-consumer`.
    pub thread_name: String,
    /// Stack size for spawned threads, in bytes.
    /// `None` uses the standard library default.
    pub stack_size: Option<usize>,
}

impl Config {
    /// Use a different thread-name prefix.
    pub fn with_thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }

    /// Use a specific stack size for spawned threads.
    pub fn with_stack_size(mut self, bytes: usize) -> Self {
        self.stack_size = Some(bytes);
        self
    }

    pub(crate) fn task_name(&self, role: Role) -> String {
        format!("{}-{}", self.thread_name, role)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            thread_name: String::from("rx-thread"),
            stack_size: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Config;
    use crate::errors::Role;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!("rx-thread", config.thread_name);
        assert_eq!(None, config.stack_size);
    }

    #[test]
    fn task_names_carry_the_role() {
        let config = Config::default().with_thread_name("ticker");
        assert_eq!("ticker-producer", config.task_name(Role::Producer));
        assert_eq!("ticker-consumer", config.task_name(Role::Consumer));
    }

    #[test]
    fn stack_size() {
        assert_eq!(
            Some(64 * 1024),
            Config::default().with_stack_size(64 * 1024).stack_size
        );
    }
}
