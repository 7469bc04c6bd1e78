//! One-shot task scheduling with cancel-on-drop handles.
//!
//! The animation drivers never talk to the browser directly. They hold a
//! [`Scheduler`] and keep at most one returned task alive per instance;
//! dropping that task cancels it, so tearing a driver down is just dropping
//! it.

/// Schedules one-shot work. Dropping a returned task cancels it if it has not
/// run yet.
pub trait Scheduler: Clone + 'static {
    type Task: 'static;

    /// Runs `task` once after `delay_ms` milliseconds.
    fn after<F>(&self, delay_ms: u32, task: F) -> Self::Task
    where
        F: FnOnce() + 'static;

    /// Runs `task` once on the next display refresh, passing the frame
    /// timestamp in milliseconds.
    fn next_frame<F>(&self, task: F) -> Self::Task
    where
        F: FnOnce(f64) + 'static;
}
