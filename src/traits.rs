use crate::errors::Error;

/// Producer-side handle, handed to a [Work] routine.
pub trait Emitter<T> {
    /// Emit a value signal.
    fn push_value(&self, value: T);
    /// Emit an error signal. The stream continues.
    fn push_error(&self, error: Error);
    /// Emit the complete signal.
    ///
    /// The producer task does this automatically once the work routine returns,
    /// so work routines rarely need to.
    fn push_complete(&self);
}

/// A work routine, run once on the producer task.
pub trait Work<T>: Send + 'static {
    /// Produce signals using the emitter.
    fn on_work(self, emitter: &dyn Emitter<T>);
}

impl<T, F> Work<T> for F
where
    F: FnOnce(&dyn Emitter<T>) + Send + 'static,
{
    fn on_work(self, emitter: &dyn Emitter<T>) {
        self(emitter)
    }
}

/// Value-only callback.
///
/// Error signals are not delivered to a consumer.
/// Use an [Observer] if errors matter.
pub trait Consumer<T>: Send + 'static {
    /// Accept a value signal.
    fn on_accept(&mut self, value: T);
}

impl<T, F> Consumer<T> for F
where
    F: FnMut(T) + Send + 'static,
{
    fn on_accept(&mut self, value: T) {
        self(value)
    }
}

/// Callback for every kind of signal.
pub trait Observer<T>: Send + 'static {
    /// Accept a value signal.
    fn on_accept(&mut self, value: T);
    /// Accept an error signal. More signals may follow.
    fn on_error(&mut self, error: Error);
    /// Accept the complete signal. Nothing follows.
    fn on_complete(self);
}
