//! Orchestrator behavior against mock backends on a paused clock.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;
use tokio::sync::mpsc;
use tokio::time::Instant;
use triage_core::simplify::{
    CacheKey, Language, Orchestrator, OrchestratorConfig, ProgressEvent, SimplifyBackend,
    SimplifyError, SimplifyRequest, SimplifyResult, TermExplanation,
};

/// Replies after a fixed delay and counts calls.
struct DelayedBackend {
    calls: AtomicUsize,
    delay: Duration,
    reply: SimplifyResult,
    translate: bool,
}

impl DelayedBackend {
    fn new(delay: Duration, reply: SimplifyResult) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            delay,
            reply,
            translate: false,
        })
    }

    /// Fills `translated_text` for languages other than English.
    fn translating(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            delay,
            reply: infection_result(),
            translate: true,
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SimplifyBackend for DelayedBackend {
    async fn process(&self, request: &SimplifyRequest) -> Result<SimplifyResult, SimplifyError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        let mut reply = self.reply.clone();
        if self.translate && *request.language() != Language::English {
            let translated = format!("[{}] {}", request.language(), reply.simplified_text);
            reply.translated_text = Some(translated);
        }
        Ok(reply)
    }
}

/// Never answers.
struct SilentBackend;

#[async_trait]
impl SimplifyBackend for SilentBackend {
    async fn process(&self, _: &SimplifyRequest) -> Result<SimplifyResult, SimplifyError> {
        std::future::pending().await
    }
}

fn infection_result() -> SimplifyResult {
    SimplifyResult {
        simplified_text: "You might have a small infection.".into(),
        translated_text: None,
        explanations: vec![TermExplanation {
            term: "infection".into(),
            explanation: "When germs get into your body and make you sick.".into(),
        }],
        audio_filename: None,
    }
}

fn english(delay: Duration) -> Arc<DelayedBackend> {
    DelayedBackend::new(delay, infection_result())
}

#[tokio::test(start_paused = true)]
async fn repeat_call_is_served_from_cache() {
    let backend = english(Duration::from_millis(300));
    let orch = Orchestrator::new(backend.clone(), OrchestratorConfig::default());

    let first = orch.simplify_and_speak("fever", Language::English).await.unwrap();
    let second = orch.simplify_and_speak("fever", Language::English).await.unwrap();

    assert_eq!(backend.calls(), 1);
    assert!(Arc::ptr_eq(&first, &second));
}

#[tokio::test(start_paused = true)]
async fn warm_cache_serves_concurrent_callers() {
    let backend = english(Duration::from_secs(2));
    let orch = Orchestrator::new(backend.clone(), OrchestratorConfig::default());
    let first = orch.simplify_and_speak("fever", Language::English).await.unwrap();

    let hits = join_all((0..8).map(|_| orch.simplify_and_speak("fever", Language::English))).await;

    assert_eq!(backend.calls(), 1);
    for hit in hits {
        assert!(Arc::ptr_eq(&first, &hit.unwrap()));
    }
}

#[tokio::test(start_paused = true)]
async fn languages_are_cached_separately() {
    let backend = DelayedBackend::translating(Duration::ZERO);
    let orch = Orchestrator::new(backend.clone(), OrchestratorConfig::default());

    let en = orch.simplify_and_speak("fever", Language::English).await.unwrap();
    let kn = orch.simplify_and_speak("fever", Language::Kannada).await.unwrap();

    assert_eq!(backend.calls(), 2);
    assert!(en.translated_text.is_none());
    assert_eq!(kn.translated_text.as_deref(), Some("[kn] You might have a small infection."));
    assert_eq!(orch.cached_len(), 2);
}

#[tokio::test(start_paused = true)]
async fn spelled_out_code_shares_cache_entry() {
    let backend = english(Duration::ZERO);
    let orch = Orchestrator::new(backend.clone(), OrchestratorConfig::default());

    let named = orch.simplify_and_speak("fever", Language::Kannada).await.unwrap();
    let spelled = orch
        .simplify_and_speak("fever", Language::Other("kn".into()))
        .await
        .unwrap();

    assert_eq!(backend.calls(), 1);
    assert_eq!(orch.cached_len(), 1);
    assert!(Arc::ptr_eq(&named, &spelled));
}

#[tokio::test(start_paused = true)]
async fn clear_cache_forces_new_call() {
    let backend = english(Duration::ZERO);
    let orch = Orchestrator::new(backend.clone(), OrchestratorConfig::default());

    let before = orch.simplify_and_speak("fever", Language::English).await.unwrap();
    orch.clear_cache();
    assert_eq!(orch.cached_len(), 0);
    let after = orch.simplify_and_speak("fever", Language::English).await.unwrap();

    assert_eq!(backend.calls(), 2);
    assert!(!Arc::ptr_eq(&before, &after));
    assert_eq!(before, after);
}

#[tokio::test(start_paused = true)]
async fn silent_backend_times_out_at_deadline() {
    let orch = Arc::new(Orchestrator::new(
        Arc::new(SilentBackend),
        OrchestratorConfig::default(),
    ));
    let started = Instant::now();
    let call = {
        let orch = orch.clone();
        tokio::spawn(async move { orch.simplify_and_speak("fever", Language::Kannada).await })
    };

    tokio::time::sleep(Duration::from_secs(119)).await;
    assert!(!call.is_finished());

    let err = call.await.unwrap().unwrap_err();
    assert_eq!(err, SimplifyError::Timeout(Duration::from_secs(120)));
    assert!(started.elapsed() >= Duration::from_secs(120));
    assert!(err.to_string().contains("timed out after 120s"));
    assert_eq!(orch.cached_len(), 0);
}

#[tokio::test(start_paused = true)]
async fn custom_deadline_is_honoured() {
    let config = OrchestratorConfig {
        request_timeout: Duration::from_secs(3),
        ..OrchestratorConfig::default()
    };
    let orch = Orchestrator::new(Arc::new(SilentBackend), config);
    let started = Instant::now();

    let err = orch.simplify_and_speak("fever", Language::Kannada).await.unwrap_err();

    assert_eq!(err, SimplifyError::Timeout(Duration::from_secs(3)));
    assert!(started.elapsed() < Duration::from_secs(4));
}

#[tokio::test(start_paused = true)]
async fn slow_call_signals_progress_once() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let orch = Orchestrator::new(english(Duration::from_secs(15)), OrchestratorConfig::default())
        .with_progress_sink(Arc::new(tx));

    orch.simplify_and_speak("fever", Language::English).await.unwrap();

    let ProgressEvent::StillProcessing { elapsed } = rx.try_recv().unwrap();
    assert!(elapsed >= Duration::from_secs(10));
    assert!(elapsed < Duration::from_secs(11));
    assert!(rx.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn fast_call_signals_no_progress() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let orch = Orchestrator::new(english(Duration::from_secs(5)), OrchestratorConfig::default())
        .with_progress_sink(Arc::new(tx));

    orch.simplify_and_speak("fever", Language::English).await.unwrap();
    tokio::time::sleep(Duration::from_secs(60)).await;

    assert!(rx.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn timed_out_call_signalled_progress_once() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let orch = Orchestrator::new(Arc::new(SilentBackend), OrchestratorConfig::default())
        .with_progress_sink(Arc::new(tx));

    let err = orch.simplify_and_speak("fever", Language::English).await.unwrap_err();
    assert!(matches!(err, SimplifyError::Timeout(_)));

    assert!(rx.try_recv().is_ok());
    assert!(rx.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn example_result_is_returned_verbatim_and_cached() {
    let backend = DelayedBackend::new(Duration::ZERO, infection_result());
    let orch = Orchestrator::new(backend, OrchestratorConfig::default());
    let text = "You may have a mild infection.";

    let result = orch.simplify_and_speak(text, Language::Kannada).await.unwrap();

    assert_eq!(*result, infection_result());
    let key = CacheKey::new(text, Language::from("kn"));
    let cached = orch.cache().get(&key).unwrap();
    assert!(Arc::ptr_eq(&cached, &result));
}
