//! Async runtime integration for Horizon Autocomplete.
//!
//! The engine is a single logical actor: it processes one user event to
//! completion before the next. Asynchronous work (filter requests, blur and
//! input-change hooks) runs as Tokio tasks that report back to the actor over
//! an [`update_channel`]. This module provides the pieces for that:
//!
//! - [`AsyncRuntime`]: a managed Tokio runtime, used when the engine is created
//!   outside of any Tokio context
//! - [`AsyncCancellationToken`]: cooperative cancellation handed to every
//!   caller-supplied async function
//! - [`UpdateSender`]/[`UpdateReceiver`]: the channel tasks report results on
//!
//! # Example: Cooperative Cancellation
//!
//! ```
//! use horizon_autocomplete_core::async_runtime::{AsyncCancellationToken, AsyncRuntime, AsyncRuntimeConfig};
//!
//! let runtime = AsyncRuntime::new(AsyncRuntimeConfig::default().with_worker_threads(1)).unwrap();
//! let token = AsyncCancellationToken::new();
//! let task_token = token.clone();
//!
//! let task = runtime.handle().spawn(async move {
//!     task_token.cancelled().await;
//!     "stopped"
//! });
//!
//! token.cancel();
//! assert_eq!(runtime.handle().block_on(task).unwrap(), "stopped");
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use tokio::runtime::{Builder, Handle, Runtime};
use tokio::sync::mpsc;

use crate::error::AsyncRuntimeError;
use crate::logging::targets;

/// Global async runtime instance.
static GLOBAL_RUNTIME: OnceLock<AsyncRuntime> = OnceLock::new();

/// Configuration for the async runtime.
#[derive(Debug, Clone)]
pub struct AsyncRuntimeConfig {
    /// Number of worker threads for multi-threaded runtime.
    /// Defaults to the number of CPU cores.
    pub worker_threads: Option<usize>,
    /// Name prefix for runtime threads.
    pub thread_name: String,
}

impl Default for AsyncRuntimeConfig {
    fn default() -> Self {
        Self {
            worker_threads: None,
            thread_name: "horizon-autocomplete".to_string(),
        }
    }
}

impl AsyncRuntimeConfig {
    /// Set the number of worker threads.
    pub fn with_worker_threads(mut self, count: usize) -> Self {
        self.worker_threads = Some(count);
        self
    }

    /// Set the thread name prefix.
    pub fn with_thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }
}

/// A cancellation token for async requests.
///
/// Every request the engine issues carries a fresh token. Superseding the
/// request cancels the token; the caller's function may observe it (by
/// polling [`is_cancelled`](Self::is_cancelled) or awaiting
/// [`cancelled`](Self::cancelled)) to abort underlying work. Cancellation is a
/// one-way transition.
#[derive(Debug, Clone)]
pub struct AsyncCancellationToken {
    inner: Arc<AsyncCancellationState>,
}

#[derive(Debug)]
struct AsyncCancellationState {
    cancelled: AtomicBool,
    notify: tokio::sync::Notify,
}

impl AsyncCancellationToken {
    /// Create a new cancellation token.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(AsyncCancellationState {
                cancelled: AtomicBool::new(false),
                notify: tokio::sync::Notify::new(),
            }),
        }
    }

    /// Check if cancellation has been requested.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::Acquire)
    }

    /// Request cancellation.
    ///
    /// This sets the cancellation flag and notifies any waiters.
    pub fn cancel(&self) {
        if !self.inner.cancelled.swap(true, Ordering::Release) {
            self.inner.notify.notify_waiters();
        }
    }

    /// Wait asynchronously until cancellation is requested.
    ///
    /// Returns immediately if already cancelled.
    pub async fn cancelled(&self) {
        loop {
            let notified = self.inner.notify.notified();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }
}

impl Default for AsyncCancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

/// The async runtime manager.
///
/// Owns a multi-threaded Tokio runtime for engines created outside of any
/// Tokio context.
pub struct AsyncRuntime {
    /// Kept alive so the runtime does not shut down.
    #[allow(dead_code)]
    runtime: Runtime,
    /// Handle to the runtime for spawning tasks.
    handle: Handle,
}

impl AsyncRuntime {
    /// Get the global async runtime.
    ///
    /// The global runtime is lazily initialized with default settings.
    ///
    /// # Panics
    ///
    /// Panics if the runtime cannot be created on first access.
    pub fn global() -> &'static AsyncRuntime {
        GLOBAL_RUNTIME.get_or_init(|| {
            AsyncRuntime::new(AsyncRuntimeConfig::default())
                .expect("Failed to create global async runtime")
        })
    }

    /// Initialize the global async runtime with custom configuration.
    ///
    /// Call this before creating any engine outside a Tokio context. Returns
    /// an error if already initialized.
    pub fn init_global(
        config: AsyncRuntimeConfig,
    ) -> Result<&'static AsyncRuntime, AsyncRuntimeError> {
        let runtime = AsyncRuntime::new(config)?;
        GLOBAL_RUNTIME
            .set(runtime)
            .map_err(|_| AsyncRuntimeError::AlreadyInitialized)?;
        Ok(Self::global())
    }

    /// A handle to the ambient Tokio runtime, falling back to the global one.
    ///
    /// Engines created inside `#[tokio::main]`/`#[tokio::test]` spawn onto the
    /// caller's runtime; engines created elsewhere use [`AsyncRuntime::global`].
    pub fn current_or_global() -> Handle {
        Handle::try_current().unwrap_or_else(|_| {
            tracing::debug!(target: targets::RUNTIME, "no ambient tokio runtime, using global runtime");
            Self::global().handle().clone()
        })
    }

    /// Create a new async runtime with the given configuration.
    pub fn new(config: AsyncRuntimeConfig) -> Result<Self, AsyncRuntimeError> {
        let mut builder = Builder::new_multi_thread();
        builder.thread_name(&config.thread_name).enable_time();

        if let Some(workers) = config.worker_threads {
            builder.worker_threads(workers);
        }

        let runtime = builder
            .build()
            .map_err(|e| AsyncRuntimeError::CreationFailed(e.to_string()))?;
        tracing::debug!(target: targets::RUNTIME, thread_name = %config.thread_name, "async runtime created");

        let handle = runtime.handle().clone();
        Ok(Self { runtime, handle })
    }

    /// Get a handle to the Tokio runtime.
    pub fn handle(&self) -> &Handle {
        &self.handle
    }
}

impl std::fmt::Debug for AsyncRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsyncRuntime")
            .field("flavor", &self.handle.runtime_flavor())
            .finish_non_exhaustive()
    }
}

/// Create the channel async tasks use to report back to their owner.
///
/// The channel is unbounded so a completing task never waits on the actor.
pub fn update_channel<T: Send + 'static>() -> (UpdateSender<T>, UpdateReceiver<T>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (UpdateSender { inner: tx }, UpdateReceiver { inner: rx })
}

/// Sender half of an update channel.
#[derive(Debug)]
pub struct UpdateSender<T> {
    inner: mpsc::UnboundedSender<T>,
}

impl<T> Clone for UpdateSender<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Send> UpdateSender<T> {
    /// Send a value on the channel.
    ///
    /// Returns `false` if the receiver has been dropped.
    pub fn send(&self, value: T) -> bool {
        self.inner.send(value).is_ok()
    }
}

/// Receiver half of an update channel.
#[derive(Debug)]
pub struct UpdateReceiver<T> {
    inner: mpsc::UnboundedReceiver<T>,
}

impl<T> UpdateReceiver<T> {
    /// Receive a value from the channel.
    pub async fn recv(&mut self) -> Option<T> {
        self.inner.recv().await
    }

    /// Try to receive a value without waiting.
    pub fn try_recv(&mut self) -> Option<T> {
        self.inner.try_recv().ok()
    }
}
