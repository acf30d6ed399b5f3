//! Tests for the simplify orchestrator call flow.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::*;
use crate::simplify::{ProgressEvent, TermExplanation};

struct MockBackend {
    calls: AtomicUsize,
    delay: Duration,
    reply: Result<SimplifyResult, SimplifyError>,
}

impl MockBackend {
    fn ok(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            delay,
            reply: Ok(sample_result()),
        })
    }

    fn failing(error: SimplifyError) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            delay: Duration::ZERO,
            reply: Err(error),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SimplifyBackend for MockBackend {
    async fn process(&self, _: &SimplifyRequest) -> Result<SimplifyResult, SimplifyError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.reply.clone()
    }
}

fn sample_result() -> SimplifyResult {
    SimplifyResult {
        simplified_text: "You might have a small infection.".into(),
        translated_text: None,
        explanations: vec![TermExplanation {
            term: "infection".into(),
            explanation: "germs making you sick".into(),
        }],
        audio_filename: Some("a1.mp3".into()),
    }
}

fn orchestrator(backend: Arc<MockBackend>) -> Orchestrator {
    Orchestrator::new(backend, OrchestratorConfig::default())
}

#[tokio::test(start_paused = true)]
async fn failures_are_not_cached() {
    let backend = MockBackend::failing(SimplifyError::Server { status: 502 });
    let orch = orchestrator(backend.clone());

    for _ in 0..2 {
        let err = orch
            .simplify_and_speak("fever", Language::English)
            .await
            .unwrap_err();
        assert_eq!(err, SimplifyError::Server { status: 502 });
    }
    assert_eq!(backend.calls(), 2);
    assert_eq!(orch.cached_len(), 0);
}

#[tokio::test(start_paused = true)]
async fn empty_text_never_reaches_backend() {
    let backend = MockBackend::ok(Duration::ZERO);
    let orch = orchestrator(backend.clone());

    let err = orch.simplify_and_speak("", Language::Kannada).await.unwrap_err();
    assert!(matches!(err, SimplifyError::InputValidation(_)));
    assert_eq!(backend.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn caller_cancel_aborts_without_caching() {
    let backend = MockBackend::ok(Duration::from_secs(30));
    let orch = Arc::new(orchestrator(backend.clone()));
    let cancel = CancellationToken::new();

    let call = {
        let orch = orch.clone();
        let cancel = cancel.clone();
        tokio::spawn(async move {
            orch.simplify_and_speak_cancellable("fever", Language::Kannada, cancel)
                .await
        })
    };

    tokio::time::sleep(Duration::from_secs(3)).await;
    cancel.cancel();

    let err = call.await.unwrap().unwrap_err();
    assert_eq!(err, SimplifyError::Cancelled);
    assert_eq!(orch.cached_len(), 0);
}

#[tokio::test(start_paused = true)]
async fn cancelled_call_emits_no_late_progress() {
    let backend = MockBackend::ok(Duration::from_secs(60));
    let (tx, mut rx) = mpsc::unbounded_channel();
    let orch = orchestrator(backend).with_progress_sink(Arc::new(tx));
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = orch
        .simplify_and_speak_cancellable("fever", Language::Kannada, cancel)
        .await
        .unwrap_err();
    assert_eq!(err, SimplifyError::Cancelled);

    tokio::time::sleep(Duration::from_secs(30)).await;
    assert!(rx.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn coalesced_callers_share_one_backend_call() {
    let backend = MockBackend::ok(Duration::from_secs(5));
    let config = OrchestratorConfig {
        coalesce_inflight: true,
        ..Default::default()
    };
    let orch = Arc::new(Orchestrator::new(backend.clone(), config));

    let spawn_call = |orch: Arc<Orchestrator>| {
        tokio::spawn(async move { orch.simplify_and_speak("cough", Language::English).await })
    };
    let first = spawn_call(orch.clone());
    let second = spawn_call(orch.clone());

    let a = first.await.unwrap().unwrap();
    let b = second.await.unwrap().unwrap();

    assert_eq!(backend.calls(), 1);
    assert!(Arc::ptr_eq(&a, &b));
}

fn coalescing(backend: Arc<MockBackend>, request_timeout: Duration) -> Arc<Orchestrator> {
    let config = OrchestratorConfig {
        coalesce_inflight: true,
        request_timeout,
        ..Default::default()
    };
    Arc::new(Orchestrator::new(backend, config))
}

#[tokio::test(start_paused = true)]
async fn cancelled_waiter_leaves_gate_immediately() {
    let backend = MockBackend::ok(Duration::from_secs(100));
    let orch = coalescing(backend.clone(), DEFAULT_REQUEST_TIMEOUT);

    let first = {
        let orch = orch.clone();
        tokio::spawn(async move { orch.simplify_and_speak("cough", Language::English).await })
    };
    tokio::time::sleep(Duration::from_secs(1)).await;

    let cancel = CancellationToken::new();
    cancel.cancel();
    let started = tokio::time::Instant::now();
    let err = orch
        .simplify_and_speak_cancellable("cough", Language::English, cancel)
        .await
        .unwrap_err();

    assert_eq!(err, SimplifyError::Cancelled);
    assert!(started.elapsed() < Duration::from_secs(1));
    assert!(first.await.unwrap().is_ok());
    assert_eq!(backend.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn gate_wait_counts_against_deadline() {
    let backend = MockBackend::ok(Duration::from_secs(100));
    let orch = coalescing(backend.clone(), Duration::from_secs(30));

    let first = {
        let orch = orch.clone();
        tokio::spawn(async move { orch.simplify_and_speak("cough", Language::English).await })
    };
    tokio::time::sleep(Duration::from_secs(10)).await;

    // Waits 20s behind the first call, then gets only the 10s left.
    let started = tokio::time::Instant::now();
    let err = orch
        .simplify_and_speak("cough", Language::English)
        .await
        .unwrap_err();

    assert_eq!(err, SimplifyError::Timeout(Duration::from_secs(30)));
    assert!(started.elapsed() >= Duration::from_secs(30));
    assert!(started.elapsed() < Duration::from_secs(31));
    assert!(matches!(first.await.unwrap(), Err(SimplifyError::Timeout(_))));
    assert_eq!(backend.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn uncoalesced_callers_both_hit_backend() {
    let backend = MockBackend::ok(Duration::from_secs(5));
    let orch = Arc::new(orchestrator(backend.clone()));

    let (a, b) = tokio::join!(
        orch.simplify_and_speak("cough", Language::English),
        orch.simplify_and_speak("cough", Language::English),
    );

    assert_eq!(a.unwrap(), b.unwrap());
    assert_eq!(backend.calls(), 2);
    assert_eq!(orch.cached_len(), 1);
}

#[test]
fn audio_url_uses_base() {
    let backend = MockBackend::ok(Duration::ZERO);
    let orch = Orchestrator::new(
        backend,
        OrchestratorConfig {
            api_base_url: "http://localhost:3001/".into(),
            ..Default::default()
        },
    );
    assert_eq!(orch.audio_url("abc.mp3"), "http://localhost:3001/audio/abc.mp3");
}

#[test]
fn audio_url_is_relative_without_base() {
    let orch = orchestrator(MockBackend::ok(Duration::ZERO));
    assert_eq!(orch.audio_url("x y.mp3"), "/audio/x y.mp3");
}

#[tokio::test(start_paused = true)]
async fn progress_event_reports_threshold() {
    let backend = MockBackend::ok(Duration::from_secs(12));
    let (tx, mut rx) = mpsc::unbounded_channel();
    let orch = orchestrator(backend).with_progress_sink(Arc::new(tx));

    orch.simplify_and_speak("fever", Language::Kannada).await.unwrap();

    let ProgressEvent::StillProcessing { elapsed } = rx.try_recv().unwrap();
    assert!(elapsed >= DEFAULT_PROGRESS_AFTER);
    assert!(elapsed < Duration::from_secs(12));
    assert!(rx.try_recv().is_err());
}
