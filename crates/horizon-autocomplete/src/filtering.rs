//! Async filtering controller.
//!
//! Three independent async channels exist: the filter, the blur hook and the
//! input-change hook. Each channel has at most one *current* request. Issuing
//! a request on a channel cancels the previous one's token and bumps the
//! channel's generation; a completion is only acted on if its generation is
//! still current. This makes the most recently *issued* filter request win,
//! whatever order requests resolve in.
//!
//! Every request runs as its own Tokio task and reports exactly one
//! [`Completion`] on the controller's update channel. Nothing is applied until
//! the owner drains the channel ([`AsyncController::try_next`] or
//! [`AsyncController::next`]), so state only changes between user events.

use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use horizon_autocomplete_core::logging::targets;
use horizon_autocomplete_core::{
    update_channel, AsyncCancellationToken, AsyncError, AsyncRuntime, UpdateReceiver, UpdateSender,
};
use tokio::runtime::Handle;

/// What a caller-supplied async function receives.
#[derive(Debug, Clone)]
pub struct AsyncRequest {
    /// The input text the request was issued for.
    pub text: String,
    /// Fired when the request is superseded.
    pub token: AsyncCancellationToken,
}

/// Async filter: resolves to the new resident item set.
pub type FilterFn<T> =
    Arc<dyn Fn(AsyncRequest) -> BoxFuture<'static, Result<Vec<T>, AsyncError>> + Send + Sync>;

/// Async side-effect hook (blur, input change).
pub type HookFn = Arc<dyn Fn(AsyncRequest) -> BoxFuture<'static, Result<(), AsyncError>> + Send + Sync>;

/// Wrap an async closure as a [`FilterFn`].
///
/// ```
/// use horizon_autocomplete::filtering::filter_fn;
///
/// let filter = filter_fn(|request| async move {
///     Ok(vec![request.text.to_uppercase()])
/// });
/// # let _ = filter;
/// ```
pub fn filter_fn<T, F, Fut>(f: F) -> FilterFn<T>
where
    F: Fn(AsyncRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Vec<T>, AsyncError>> + Send + 'static,
{
    Arc::new(move |request| f(request).boxed())
}

/// Wrap an async closure as a [`HookFn`].
pub fn hook_fn<F, Fut>(f: F) -> HookFn
where
    F: Fn(AsyncRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), AsyncError>> + Send + 'static,
{
    Arc::new(move |request| f(request).boxed())
}

/// The independent async channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AsyncChannel {
    /// The async filter.
    Filter,
    /// The blur hook.
    Blur,
    /// The input-change hook.
    InputChange,
}

/// Log an event on the target of `channel`.
///
/// `tracing` targets must be constants, so the match picks the callsite.
macro_rules! channel_event {
    ($level:ident, $channel:expr, $($rest:tt)+) => {
        match $channel {
            AsyncChannel::Filter => tracing::$level!(target: targets::FILTER, $($rest)+),
            AsyncChannel::Blur | AsyncChannel::InputChange => {
                tracing::$level!(target: targets::HOOK, $($rest)+)
            }
        }
    };
}

/// The successful result of a request.
#[derive(Debug)]
pub enum Payload<T> {
    /// A filter result.
    Items(Vec<T>),
    /// A hook finished.
    Done,
}

/// The single message a request task reports.
#[derive(Debug)]
pub struct Completion<T> {
    channel: AsyncChannel,
    generation: u64,
    result: Result<Payload<T>, AsyncError>,
}

/// Per-channel bookkeeping.
#[derive(Debug, Default)]
struct RequestSlot {
    generation: u64,
    token: Option<AsyncCancellationToken>,
}

impl RequestSlot {
    /// Supersede the current request and start a new one.
    fn issue(&mut self) -> (u64, AsyncCancellationToken) {
        if let Some(previous) = self.token.take() {
            previous.cancel();
        }
        self.generation += 1;
        let token = AsyncCancellationToken::new();
        self.token = Some(token.clone());
        (self.generation, token)
    }

    /// Mark a completion as received; returns whether it is current.
    fn complete(&mut self, generation: u64) -> bool {
        let current = generation == self.generation;
        if current {
            self.token = None;
        }
        current
    }

    fn is_in_flight(&self) -> bool {
        self.token.is_some()
    }
}

/// Owns the async channels of one autocomplete.
pub struct AsyncController<T> {
    runtime: Option<Handle>,
    debounce: Duration,
    sender: UpdateSender<Completion<T>>,
    receiver: UpdateReceiver<Completion<T>>,
    filter: RequestSlot,
    blur: RequestSlot,
    input_change: RequestSlot,
    pending: usize,
}

impl<T: Send + 'static> AsyncController<T> {
    /// Create a controller.
    ///
    /// With no `runtime`, tasks are spawned on the ambient Tokio runtime, or
    /// the global [`AsyncRuntime`] outside of one.
    pub fn new(runtime: Option<Handle>, debounce: Duration) -> Self {
        let (sender, receiver) = update_channel();
        Self {
            runtime,
            debounce,
            sender,
            receiver,
            filter: RequestSlot::default(),
            blur: RequestSlot::default(),
            input_change: RequestSlot::default(),
            pending: 0,
        }
    }

    fn slot_mut(&mut self, channel: AsyncChannel) -> &mut RequestSlot {
        match channel {
            AsyncChannel::Filter => &mut self.filter,
            AsyncChannel::Blur => &mut self.blur,
            AsyncChannel::InputChange => &mut self.input_change,
        }
    }

    fn slot(&self, channel: AsyncChannel) -> &RequestSlot {
        match channel {
            AsyncChannel::Filter => &self.filter,
            AsyncChannel::Blur => &self.blur,
            AsyncChannel::InputChange => &self.input_change,
        }
    }

    /// Number of tasks whose completion has not been drained yet.
    pub fn pending(&self) -> usize {
        self.pending
    }

    /// Whether `channel` has a current request that has not completed.
    pub fn is_in_flight(&self, channel: AsyncChannel) -> bool {
        self.slot(channel).is_in_flight()
    }

    /// Issue a filter request for `text`, superseding any in-flight one.
    #[tracing::instrument(skip(self, filter), target = "horizon_autocomplete::filter", level = "debug")]
    pub fn issue_filter(&mut self, filter: &FilterFn<T>, text: &str) {
        let filter = filter.clone();
        let delay = self.debounce;
        self.issue(AsyncChannel::Filter, text, delay, move |request| {
            async move { filter(request).await.map(Payload::Items) }.boxed()
        });
    }

    /// Run a hook for `text` on `channel`, superseding that channel's in-flight hook.
    pub fn issue_hook(&mut self, channel: AsyncChannel, hook: &HookFn, text: &str) {
        let hook = hook.clone();
        self.issue(channel, text, Duration::ZERO, move |request| {
            async move { hook(request).await.map(|()| Payload::Done) }.boxed()
        });
    }

    fn issue<F>(&mut self, channel: AsyncChannel, text: &str, delay: Duration, call: F)
    where
        F: FnOnce(AsyncRequest) -> BoxFuture<'static, Result<Payload<T>, AsyncError>> + Send + 'static,
    {
        let (generation, token) = self.slot_mut(channel).issue();
        let request = AsyncRequest {
            text: text.to_string(),
            token: token.clone(),
        };
        let sender = self.sender.clone();
        let handle = self
            .runtime
            .get_or_insert_with(AsyncRuntime::current_or_global)
            .clone();

        channel_event!(debug, channel, ?channel, generation, "issuing async request");
        self.pending += 1;

        handle.spawn(async move {
            let result = run_request(token, delay, call, request).await;
            sender.send(Completion {
                channel,
                generation,
                result,
            });
        });
    }

    /// Take the next completion without waiting and interpret it.
    ///
    /// Returns `None` when nothing has completed yet.
    pub fn try_next(&mut self) -> Option<Outcome<T>> {
        let completion = self.receiver.try_recv()?;
        Some(self.interpret(completion))
    }

    /// Wait for the next completion and interpret it.
    ///
    /// Returns `None` immediately when no task is pending.
    pub async fn next(&mut self) -> Option<Outcome<T>> {
        if self.pending == 0 {
            return None;
        }
        let completion = self.receiver.recv().await?;
        Some(self.interpret(completion))
    }

    fn interpret(&mut self, completion: Completion<T>) -> Outcome<T> {
        self.pending = self.pending.saturating_sub(1);
        let Completion {
            channel,
            generation,
            result,
        } = completion;

        if !self.slot_mut(channel).complete(generation) {
            channel_event!(trace, channel, ?channel, generation, "discarding superseded result");
            return Outcome::Discarded;
        }

        match result {
            Err(err) if err.is_cancelled() => {
                channel_event!(trace, channel, ?channel, generation, "request cancelled");
                Outcome::Discarded
            }
            Err(err) => {
                channel_event!(error, channel, ?channel, generation, error = %err, "async request failed");
                Outcome::Failed
            }
            Ok(Payload::Items(items)) => Outcome::Items(items),
            Ok(Payload::Done) => Outcome::HookFinished(channel),
        }
    }
}

impl<T> Drop for AsyncController<T> {
    fn drop(&mut self) {
        for slot in [&self.filter, &self.blur, &self.input_change] {
            if let Some(token) = &slot.token {
                token.cancel();
            }
        }
    }
}

impl<T> fmt::Debug for AsyncController<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncController")
            .field("debounce", &self.debounce)
            .field("pending", &self.pending)
            .field("filter_generation", &self.filter.generation)
            .finish_non_exhaustive()
    }
}

/// How a drained completion affects the owner.
#[derive(Debug)]
pub enum Outcome<T> {
    /// The current filter request resolved; these become the resident items.
    Items(Vec<T>),
    /// The current hook request on this channel finished.
    HookFinished(AsyncChannel),
    /// Superseded or cancelled; no effect.
    Discarded,
    /// Failed; already logged, no effect.
    Failed,
}

/// Debounce, then run the caller's function unless cancelled first.
async fn run_request<T, F>(
    token: AsyncCancellationToken,
    delay: Duration,
    call: F,
    request: AsyncRequest,
) -> Result<Payload<T>, AsyncError>
where
    F: FnOnce(AsyncRequest) -> BoxFuture<'static, Result<Payload<T>, AsyncError>>,
{
    if !delay.is_zero() {
        tokio::select! {
            _ = token.cancelled() => return Err(AsyncError::Cancelled),
            _ = tokio::time::sleep(delay) => {}
        }
    }
    if token.is_cancelled() {
        return Err(AsyncError::Cancelled);
    }

    let work = AssertUnwindSafe(async move { call(request).await }).catch_unwind();
    tokio::select! {
        _ = token.cancelled() => Err(AsyncError::Cancelled),
        result = work => result.unwrap_or_else(|_| Err(AsyncError::failed("async function panicked"))),
    }
}
