use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use super::{Controller, ControllerSnapshot, Phase, Submission};
use crate::TRACING_TARGET_CONTROLLER;
use crate::error::Error;
use crate::identifier::FontIdentifier;
use crate::types::FileSelection;

/// Controller shared between the presentation layer and analysis tasks.
///
/// The lock is never held while the identifier runs, so selections made
/// during an analysis are applied immediately and the analysis result is
/// discarded once it resolves.
#[derive(Debug, Clone)]
pub struct SharedController {
    inner: Arc<Mutex<Controller>>,
}

impl SharedController {
    /// Wraps a controller.
    pub fn new(controller: Controller) -> Self {
        Self {
            inner: Arc::new(Mutex::new(controller)),
        }
    }

    /// Handles a file selection.
    pub async fn select_file(&self, selection: FileSelection) -> Phase {
        self.inner.lock().await.select_file(selection)
    }

    /// Current phase.
    pub async fn phase(&self) -> Phase {
        self.inner.lock().await.phase()
    }

    /// Owned view of the current state.
    pub async fn snapshot(&self) -> ControllerSnapshot {
        self.inner.lock().await.snapshot()
    }

    /// Runs a read-only closure against the controller.
    pub async fn inspect<R>(&self, f: impl FnOnce(&Controller) -> R) -> R {
        f(&*self.inner.lock().await)
    }

    /// Submits the selected file and waits for the outcome.
    ///
    /// The identifier runs on its own task; a panic there is reported as an
    /// unexpected error rather than propagated. Returns `None` if submitting
    /// is disabled, otherwise the phase after the outcome was applied, which
    /// is unchanged when the submission went stale in the meantime.
    ///
    /// Dropping the returned future aborts the identifier task and resolves
    /// the submission with [`Error::cancelled`].
    pub async fn analyze<I>(&self, identifier: Arc<I>) -> Option<Phase>
    where
        I: FontIdentifier + ?Sized + 'static,
    {
        let Submission {
            generation,
            request,
        } = self.inner.lock().await.submit()?;
        let mut pending = PendingAnalysis::new(self.inner.clone(), generation);

        let mut task = AbortOnDrop(tokio::spawn(async move {
            identifier.identify(&request).await
        }));
        let outcome = match (&mut task.0).await {
            Ok(outcome) => outcome,
            Err(join_error) => {
                tracing::error!(
                    target: TRACING_TARGET_CONTROLLER,
                    generation,
                    error = %join_error,
                    "Analysis task did not complete"
                );
                Err(Error::from_join_error(join_error))
            }
        };

        let mut controller = self.inner.lock().await;
        pending.disarm();
        controller.resolve(generation, outcome);
        Some(controller.phase())
    }
}

/// Aborts the wrapped task when dropped.
struct AbortOnDrop<T>(JoinHandle<T>);

impl<T> Drop for AbortOnDrop<T> {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Resolves a submission as cancelled unless disarmed first.
struct PendingAnalysis {
    inner: Arc<Mutex<Controller>>,
    generation: u64,
    armed: bool,
}

impl PendingAnalysis {
    fn new(inner: Arc<Mutex<Controller>>, generation: u64) -> Self {
        Self {
            inner,
            generation,
            armed: true,
        }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for PendingAnalysis {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }

        let generation = self.generation;
        tracing::debug!(
            target: TRACING_TARGET_CONTROLLER,
            generation,
            "Analysis dropped before it resolved"
        );

        // The lock is async; when it is busy the resolution is deferred to a task.
        match self.inner.try_lock() {
            Ok(mut controller) => {
                controller.resolve(generation, Err(Error::cancelled()));
            }
            Err(_) => match Handle::try_current() {
                Ok(handle) => {
                    let inner = self.inner.clone();
                    handle.spawn(async move {
                        inner.lock().await.resolve(generation, Err(Error::cancelled()));
                    });
                }
                Err(_) => tracing::warn!(
                    target: TRACING_TARGET_CONTROLLER,
                    generation,
                    "No runtime to resolve the dropped analysis"
                ),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex as StdMutex;
    use std::time::Duration;

    use tokio::sync::oneshot;

    use super::*;
    use crate::error::{CANCELLED_MESSAGE, ErrorKind, Result};
    use crate::mock::{MockIdentifier, sample_response};
    use crate::preview::PreviewRegistry;
    use crate::request::AnalysisRequest;
    use crate::retry::RetryingIdentifier;
    use crate::types::FontAnalysisResponse;

    /// Identifier whose attempts resolve only when the test says so.
    struct GatedIdentifier {
        gates: StdMutex<VecDeque<oneshot::Receiver<Result<FontAnalysisResponse>>>>,
    }

    impl GatedIdentifier {
        fn new(count: usize) -> (Arc<Self>, Vec<oneshot::Sender<Result<FontAnalysisResponse>>>) {
            let (senders, receivers): (Vec<_>, VecDeque<_>) =
                (0..count).map(|_| oneshot::channel()).unzip();
            let identifier = Self {
                gates: StdMutex::new(receivers),
            };
            (Arc::new(identifier), senders)
        }

        fn waiting(&self) -> usize {
            self.gates.lock().unwrap().len()
        }
    }

    #[async_trait::async_trait]
    impl FontIdentifier for GatedIdentifier {
        async fn identify(&self, _request: &AnalysisRequest) -> Result<FontAnalysisResponse> {
            let gate = self.gates.lock().unwrap().pop_front().expect("unexpected attempt");
            gate.await.unwrap_or_else(|_| Err(Error::unexpected()))
        }
    }

    struct PanickingIdentifier;

    #[async_trait::async_trait]
    impl FontIdentifier for PanickingIdentifier {
        async fn identify(&self, _request: &AnalysisRequest) -> Result<FontAnalysisResponse> {
            panic!("decoder crashed")
        }
    }

    fn shared() -> SharedController {
        SharedController::new(Controller::new(Arc::new(PreviewRegistry::new())))
    }

    fn png() -> FileSelection {
        FileSelection::new("image/png", vec![1, 2, 3])
    }

    async fn wait_for(controller: &SharedController, phase: Phase) {
        while controller.phase().await != phase {
            tokio::task::yield_now().await;
        }
    }

    async fn wait_until_taken(identifier: &GatedIdentifier, remaining: usize) {
        while identifier.waiting() != remaining {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn analyze_without_file_is_noop() {
        let controller = shared();
        let identifier = Arc::new(MockIdentifier::default());

        assert_eq!(controller.analyze(identifier.clone()).await, None);
        assert_eq!(identifier.attempts(), 0);
        assert_eq!(controller.phase().await, Phase::Idle);
    }

    #[tokio::test]
    async fn analyze_stores_result() {
        let controller = shared();
        controller.select_file(png()).await;

        let phase = controller
            .analyze(Arc::new(MockIdentifier::default()))
            .await;
        assert_eq!(phase, Some(Phase::Done));

        let snapshot = controller.snapshot().await;
        assert_eq!(snapshot.result, Some(sample_response()));
    }

    #[tokio::test(start_paused = true)]
    async fn analyze_reports_terminal_failure() {
        let controller = shared();
        controller.select_file(png()).await;

        let identifier = RetryingIdentifier::new(MockIdentifier::always_failing(ErrorKind::Network));
        let phase = controller.analyze(Arc::new(identifier)).await;

        assert_eq!(phase, Some(Phase::Errored));
        let error = controller.inspect(|c| c.error().map(str::to_owned)).await;
        assert_eq!(
            error.as_deref(),
            Some("Failed to identify font after multiple attempts.")
        );
    }

    #[tokio::test]
    async fn panicking_identifier_becomes_error_state() {
        let controller = shared();
        controller.select_file(png()).await;

        let phase = controller.analyze(Arc::new(PanickingIdentifier)).await;
        assert_eq!(phase, Some(Phase::Errored));
        let error = controller.inspect(|c| c.error().map(str::to_owned)).await;
        assert_eq!(error.as_deref(), Some("decoder crashed"));
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_analysis_is_cancelled_and_stops_retrying() {
        let controller = shared();
        controller.select_file(png()).await;

        let mock = Arc::new(MockIdentifier::always_failing(ErrorKind::Network));
        let identifier = Arc::new(RetryingIdentifier::new(mock.clone()));
        let timed_out =
            tokio::time::timeout(Duration::from_millis(500), controller.analyze(identifier)).await;
        assert!(timed_out.is_err());

        tokio::time::sleep(Duration::from_secs(10)).await;

        let snapshot = controller.snapshot().await;
        assert_eq!(snapshot.phase, Phase::Errored);
        assert_eq!(snapshot.error.as_deref(), Some(CANCELLED_MESSAGE));
        assert!(controller.inspect(|c| c.can_submit()).await);
        assert_eq!(mock.attempts(), 1);
    }

    #[tokio::test]
    async fn cancellation_waits_for_a_held_lock() {
        let controller = shared();
        controller.select_file(png()).await;
        let submission = controller.inner.lock().await.submit().unwrap();

        let guard = controller.inner.lock().await;
        drop(PendingAnalysis::new(
            controller.inner.clone(),
            submission.generation,
        ));
        assert_eq!(guard.phase(), Phase::Analyzing);
        drop(guard);

        wait_for(&controller, Phase::Errored).await;
        let error = controller.inspect(|c| c.error().map(str::to_owned)).await;
        assert_eq!(error.as_deref(), Some(CANCELLED_MESSAGE));
    }

    #[tokio::test]
    async fn completed_analysis_is_not_cancelled() {
        let controller = shared();
        controller.select_file(png()).await;

        let phase = controller
            .analyze(Arc::new(MockIdentifier::default()))
            .await;
        assert_eq!(phase, Some(Phase::Done));

        tokio::task::yield_now().await;
        assert_eq!(controller.phase().await, Phase::Done);
    }

    #[tokio::test]
    async fn stale_resolution_does_not_overwrite_newer_selection() {
        let controller = shared();
        controller.select_file(png()).await;

        let (identifier, mut gates) = GatedIdentifier::new(1);
        let pending = tokio::spawn({
            let controller = controller.clone();
            async move { controller.analyze(identifier).await }
        });
        wait_for(&controller, Phase::Analyzing).await;

        let newer = FileSelection::new("image/jpeg", vec![9, 9]).with_file_name("newer.jpg");
        assert_eq!(controller.select_file(newer).await, Phase::Ready);

        gates.remove(0).send(Ok(sample_response())).unwrap();
        assert_eq!(pending.await.unwrap(), Some(Phase::Ready));

        let snapshot = controller.snapshot().await;
        assert_eq!(snapshot.phase, Phase::Ready);
        assert_eq!(snapshot.file_name.as_deref(), Some("newer.jpg"));
        assert!(snapshot.result.is_none());
    }

    #[tokio::test]
    async fn stale_resolution_does_not_overwrite_newer_analysis() {
        let controller = shared();
        controller.select_file(png()).await;

        let (identifier, mut gates) = GatedIdentifier::new(2);
        let first = tokio::spawn({
            let controller = controller.clone();
            let identifier = identifier.clone();
            async move { controller.analyze(identifier).await }
        });
        wait_until_taken(&identifier, 1).await;

        controller.select_file(png()).await;
        let second = tokio::spawn({
            let controller = controller.clone();
            let identifier = identifier.clone();
            async move { controller.analyze(identifier).await }
        });
        wait_until_taken(&identifier, 0).await;

        let first_gate = gates.remove(0);
        first_gate
            .send(Err(Error::new(ErrorKind::Network)))
            .unwrap();
        assert_eq!(first.await.unwrap(), Some(Phase::Analyzing));
        assert_eq!(controller.phase().await, Phase::Analyzing);

        gates.remove(0).send(Ok(sample_response())).unwrap();
        assert_eq!(second.await.unwrap(), Some(Phase::Done));
    }
}
