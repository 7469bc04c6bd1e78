pub mod content;
pub mod counter;
pub mod format;
pub mod logging;
pub mod schedule;
pub mod sections;
pub mod typewriter;
pub mod viewport;

#[cfg(target_arch = "wasm32")]
pub mod frontend;
