use crate::errors::Error;
use std::fmt;

/// A single transmitted signal.
///
/// Each signal is one of:
/// - a `value signal`, carrying a produced value,
/// - an `error signal`, carrying an [Error] (the stream continues afterwards),
/// - a `complete signal`, which ends the stream.
pub enum Signal<T> {
    /// A produced value.
    Value(T),
    /// A produced error. Not terminal.
    Error(Error),
    /// End of the stream. Always the last signal in a channel.
    Complete,
}

/// Tag of a [Signal], without its payload.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum SignalKind {
    /// See [Signal::Value].
    Value,
    /// See [Signal::Error].
    Error,
    /// See [Signal::Complete].
    Complete,
}

impl<T> Signal<T> {
    /// The tag of this signal.
    pub fn kind(&self) -> SignalKind {
        match self {
            Signal::Value(_) => SignalKind::Value,
            Signal::Error(_) => SignalKind::Error,
            Signal::Complete => SignalKind::Complete,
        }
    }

    /// Returns `true` if no signal may follow this one.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Signal::Complete)
    }
}

impl<T: fmt::Debug> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Signal::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Signal::Error(e) => f.debug_tuple("Error").field(e).finish(),
            Signal::Complete => f.write_str("Complete"),
        }
    }
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            SignalKind::Value => "value",
            SignalKind::Error => "error",
            SignalKind::Complete => "complete",
        })
    }
}
