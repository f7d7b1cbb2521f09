//! Tokio Runtime Bridge
//!
//! GPUI uses its own executor, but the viewport controller and the HTTP store
//! run on tokio (timers, `spawn_blocking`, reqwest). This module owns the
//! process-wide tokio runtime and lets GPUI code hand work to it.
//!
//! ## Pattern
//!
//! ```text
//! GPUI entity
//!       │ spawn_named_in_tokio(controller.run())
//!       ▼
//! tokio::Runtime::spawn()
//!       │ watch::Sender<ViewportSnapshot>
//!       ▼
//! GPUI task awaiting snapshot changes
//! ```

use std::future::Future;
use std::sync::OnceLock;
use tokio::runtime::Runtime;

/// Global tokio runtime instance
static TOKIO_RUNTIME: OnceLock<Runtime> = OnceLock::new();

/// Get or initialize the global tokio runtime
fn get_runtime() -> &'static Runtime {
    TOKIO_RUNTIME.get_or_init(|| {
        Runtime::new().expect("Failed to create tokio runtime")
    })
}

/// Execute a future in the tokio runtime and wait for the result
///
/// Used from GPUI tasks for one-shot store calls such as listing collections.
pub async fn run_in_tokio<F, T>(future: F) -> T
where
    F: Future<Output = T> + Send + 'static,
    T: Send + 'static,
{
    let handle = get_runtime().spawn(future);
    match handle.await {
        Ok(result) => result,
        Err(e) => std::panic::resume_unwind(e.into_panic()),
    }
}

/// Spawn a detached task with a name (for debugging)
///
/// Used for long-running loops like the viewport controller. The task runs
/// independently and its result is not awaited.
pub fn spawn_named_in_tokio<F>(name: &'static str, future: F)
where
    F: Future<Output = ()> + Send + 'static,
{
    tracing::debug!("Spawning tokio task: {}", name);
    get_runtime().spawn(async move {
        future.await;
        tracing::debug!("Tokio task completed: {}", name);
    });
}

/// Block on a future synchronously (use sparingly, mainly for initialization)
///
/// **Warning**: This blocks the current thread. Use only during app startup
/// or when you absolutely need synchronous execution.
pub fn block_on<F, T>(future: F) -> T
where
    F: Future<Output = T>,
{
    get_runtime().block_on(future)
}
