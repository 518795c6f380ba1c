//! View-state coordinator: owns the city input and the fetch lifecycle.
//!
//! State is published as immutable [`ViewState`] snapshots over a
//! `tokio::sync::watch` channel. Each `fetch` is tagged with a generation;
//! only the newest generation may write a result, so a slow earlier request
//! can never overwrite a later one.

use std::sync::{
    Arc, Mutex, PoisonError,
    atomic::{AtomicU64, Ordering},
};

use tokio::{
    sync::watch,
    task::{AbortHandle, JoinHandle},
};

use crate::{
    error::WeatherError,
    model::WeatherReport,
    provider::WeatherClient,
    state::{Phase, ViewState},
};

#[derive(Debug, Clone)]
pub struct WeatherCoordinator {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    client: Arc<dyn WeatherClient>,
    api_key: String,
    state: watch::Sender<ViewState>,
    generation: AtomicU64,
    in_flight: Mutex<Option<(u64, AbortHandle)>>,
}

/// Completion handle for one `fetch` call.
///
/// Dropping it does not cancel the request; the result is still applied.
#[derive(Debug)]
pub struct FetchHandle {
    task: Option<JoinHandle<()>>,
}

impl FetchHandle {
    fn done() -> Self {
        Self { task: None }
    }

    /// False when the fetch resolved synchronously (blank input).
    pub fn is_pending(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Wait until the request has resolved or was superseded.
    pub async fn finished(self) {
        let Some(task) = self.task else { return };
        match task.await {
            Err(e) if e.is_panic() => {
                tracing::error!(error = %e, "weather fetch task panicked");
            }
            _ => {}
        }
    }
}

impl WeatherCoordinator {
    pub fn new(client: Arc<dyn WeatherClient>, api_key: impl Into<String>) -> Self {
        let (state, _) = watch::channel(ViewState::default());

        Self {
            inner: Arc::new(Inner {
                client,
                api_key: api_key.into(),
                state,
                generation: AtomicU64::new(0),
                in_flight: Mutex::new(None),
            }),
        }
    }

    /// Current snapshot.
    pub fn state(&self) -> ViewState {
        self.inner.state.borrow().clone()
    }

    /// Receiver notified on every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.inner.state.subscribe()
    }

    pub fn city(&self) -> String {
        self.inner.state.borrow().city_input.clone()
    }

    /// Store the pending city input. Never changes the phase.
    pub fn set_city(&self, text: impl Into<String>) {
        let text = text.into();
        self.inner.state.send_if_modified(|state| {
            if state.city_input == text {
                return false;
            }
            state.city_input = text;
            true
        });
    }

    /// Request weather for the stored city.
    ///
    /// Returns immediately. A blank city fails synchronously with
    /// [`WeatherError::Validation`]; otherwise the phase becomes `Loading` and
    /// the request runs on the Tokio runtime. Any earlier in-flight request is
    /// superseded.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn fetch(&self) -> FetchHandle {
        // Numbering and the first transition share the channel lock with
        // `apply`, so an older call can never publish after a newer one.
        let mut generation = 0;
        let mut city = String::new();
        self.inner.state.send_modify(|state| {
            generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
            city = state.city_input.clone();
            state.phase = if city.trim().is_empty() {
                Phase::Error(WeatherError::Validation)
            } else {
                Phase::Loading
            };
        });

        if city.trim().is_empty() {
            tracing::debug!(generation, "fetch rejected: blank city");
            self.inner.abort_older_than(generation);
            return FetchHandle::done();
        }

        tracing::debug!(generation, %city, "fetch started");

        let inner = Arc::clone(&self.inner);
        let task = tokio::spawn(async move {
            let result = inner.client.fetch_current(&city, &inner.api_key).await;
            inner.apply(generation, result);
        });

        self.inner.track(generation, task.abort_handle());
        FetchHandle { task: Some(task) }
    }
}

impl Inner {
    fn apply(&self, generation: u64, result: Result<WeatherReport, WeatherError>) {
        // The generation check runs under the channel's lock so a newer
        // fetch cannot slip in between check and write.
        let applied = self.state.send_if_modified(|state| {
            if self.generation.load(Ordering::SeqCst) != generation {
                return false;
            }
            state.phase = match result {
                Ok(report) => Phase::Success(report),
                Err(err) => {
                    tracing::debug!(generation, error = %err, "fetch failed");
                    Phase::Error(err)
                }
            };
            true
        });

        if !applied {
            tracing::debug!(generation, "discarding result of superseded fetch");
        }
    }

    /// Remember the task for `generation`, aborting whichever of it and the
    /// tracked task is older.
    fn track(&self, generation: u64, handle: AbortHandle) {
        let mut slot = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        match slot.take() {
            Some((tracked, tracked_handle)) if tracked > generation => {
                handle.abort();
                *slot = Some((tracked, tracked_handle));
            }
            Some((_, tracked_handle)) => {
                tracked_handle.abort();
                *slot = Some((generation, handle));
            }
            None => *slot = Some((generation, handle)),
        }
    }

    fn abort_older_than(&self, generation: u64) {
        let mut slot = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some((tracked, handle)) = slot.take() {
            if tracked < generation {
                handle.abort();
            } else {
                *slot = Some((tracked, handle));
            }
        }
    }
}
