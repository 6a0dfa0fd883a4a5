use std::error;
use std::io;
use thiserror::Error;

/// Error payload carried by an error signal.
///
/// The pipe never looks inside it: whatever the work routine pushes, the observer receives.
pub type Error = Box<dyn error::Error + Send + Sync + 'static>;

/// Box a concrete error into an [Error].
pub fn new_error<E>(error: E) -> Error
where
    E: error::Error + Send + Sync + 'static,
{
    Box::new(error)
}

/// Errors produced by the pipe itself.
///
/// These never travel through the channel.
/// They are returned from [RxThread](crate::RxThread) calls and [TaskHandle::join](crate::TaskHandle::join).
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RxError {
    /// A work routine was already submitted to this pipe.
    #[error("a producer was already submitted to this pipe")]
    AlreadySubmitted,
    /// A consumer or observer was already subscribed to this pipe.
    #[error("a subscriber is already attached to this pipe")]
    AlreadySubscribed,
    /// The executor could not start the task.
    #[error("failed to spawn task: {0}")]
    Spawn(#[from] io::Error),
    /// The work routine or a callback panicked.
    #[error("{role} panicked: {message}")]
    Panicked {
        /// Which side of the pipe panicked.
        role: Role,
        /// The panic payload, if it was a string.
        message: String,
    },
    /// The task went away without reporting an outcome.
    #[error("task was dropped before reporting its outcome")]
    Disconnected,
}

impl RxError {
    /// Short stable label, for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            RxError::AlreadySubmitted => "already_submitted",
            RxError::AlreadySubscribed => "already_subscribed",
            RxError::Spawn(_) => "spawn_failed",
            RxError::Panicked { .. } => "panicked",
            RxError::Disconnected => "disconnected",
        }
    }
}

/// The side of the pipe a task runs.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Role {
    /// The task running the work routine.
    Producer,
    /// The task draining the channel into a consumer or observer.
    Consumer,
}

impl Role {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Role::Producer => "producer",
            Role::Consumer => "consumer",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result type for operations on the pipe.
pub type Result<T> = std::result::Result<T, RxError>;


#[cfg(test)]
pub type ErrorForTesting = for_testing::Error;
