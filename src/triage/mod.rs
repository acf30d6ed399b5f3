//! Analyze-then-simplify flow.
//!
//! Classifies the symptoms, then sends the assessment summary through the
//! orchestrator. One run at a time; repeating the last analyzed symptoms is a
//! no-op.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;

use crate::classifier::{Assessment, SymptomClassifier};
use crate::simplify::{Language, Orchestrator, SimplifyError, SimplifyResult};

#[derive(Debug, Error)]
pub enum TriageError {
    #[error("Please describe your symptoms")]
    EmptySymptoms,

    #[error("An analysis is already in progress")]
    Busy,

    #[error(transparent)]
    Simplify(#[from] SimplifyError),
}

#[derive(Debug, Clone)]
pub enum TriageOutcome {
    /// Same symptoms as the previous analysis; nothing was done.
    Unchanged,
    Analyzed {
        assessment: Assessment,
        simplified: Arc<SimplifyResult>,
    },
}

pub struct TriageFlow {
    classifier: Arc<dyn SymptomClassifier>,
    orchestrator: Arc<Orchestrator>,
    busy: AtomicBool,
    last_symptoms: Mutex<Option<String>>,
}

/// Clears the busy flag on drop.
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl TriageFlow {
    pub fn new(classifier: Arc<dyn SymptomClassifier>, orchestrator: Arc<Orchestrator>) -> Self {
        Self {
            classifier,
            orchestrator,
            busy: AtomicBool::new(false),
            last_symptoms: Mutex::new(None),
        }
    }

    pub fn orchestrator(&self) -> &Orchestrator {
        &self.orchestrator
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    pub async fn run(&self, symptoms: &str, language: Language) -> Result<TriageOutcome, TriageError> {
        let symptoms = symptoms.trim();
        if symptoms.is_empty() {
            return Err(TriageError::EmptySymptoms);
        }

        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(TriageError::Busy);
        }
        let _busy = BusyGuard(&self.busy);

        if self.last_symptoms.lock().as_deref() == Some(symptoms) {
            tracing::debug!("symptoms unchanged, skipping analysis");
            return Ok(TriageOutcome::Unchanged);
        }

        let assessment = self.classifier.classify(symptoms);
        *self.last_symptoms.lock() = Some(symptoms.to_string());
        tracing::info!(
            candidates = assessment.conditions.len(),
            top = assessment.top().map(|c| c.condition.as_str()).unwrap_or("none"),
            "symptoms analyzed"
        );

        let simplified = self
            .orchestrator
            .simplify_and_speak(&assessment.summary, language)
            .await?;

        Ok(TriageOutcome::Analyzed {
            assessment,
            simplified,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;
    use crate::classifier::KeywordClassifier;
    use crate::simplify::{OrchestratorConfig, SimplifyBackend, SimplifyRequest};

    struct EchoBackend {
        calls: AtomicUsize,
        delay: Duration,
        fail: Option<SimplifyError>,
    }

    impl EchoBackend {
        fn new(delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                delay,
                fail: None,
            })
        }

        fn failing(err: SimplifyError) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                delay: Duration::ZERO,
                fail: Some(err),
            })
        }
    }

    #[async_trait]
    impl SimplifyBackend for EchoBackend {
        async fn process(&self, request: &SimplifyRequest) -> Result<SimplifyResult, SimplifyError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            if let Some(err) = &self.fail {
                return Err(err.clone());
            }
            Ok(SimplifyResult {
                simplified_text: request.text().to_uppercase(),
                translated_text: None,
                explanations: Vec::new(),
                audio_filename: Some("a.mp3".into()),
            })
        }
    }

    fn flow(backend: Arc<EchoBackend>) -> TriageFlow {
        let orchestrator = Orchestrator::new(backend, OrchestratorConfig::default());
        TriageFlow::new(
            Arc::new(KeywordClassifier::new().unwrap()),
            Arc::new(orchestrator),
        )
    }

    #[tokio::test]
    async fn blank_symptoms_are_rejected() {
        let backend = EchoBackend::new(Duration::ZERO);
        let flow = flow(backend.clone());
        let err = flow.run("   ", Language::English).await.unwrap_err();
        assert!(matches!(err, TriageError::EmptySymptoms));
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn analyzes_then_simplifies_summary() {
        let backend = EchoBackend::new(Duration::ZERO);
        let flow = flow(backend.clone());
        match flow.run("cough and sneezing", Language::English).await.unwrap() {
            TriageOutcome::Analyzed {
                assessment,
                simplified,
            } => {
                assert_eq!(assessment.conditions[0].condition, "Common Cold");
                assert_eq!(simplified.simplified_text, assessment.summary.to_uppercase());
            }
            TriageOutcome::Unchanged => panic!("expected analysis"),
        }
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn repeated_symptoms_are_unchanged() {
        let backend = EchoBackend::new(Duration::ZERO);
        let flow = flow(backend.clone());
        flow.run("headache", Language::Kannada).await.unwrap();
        let again = flow.run("  headache ", Language::Kannada).await.unwrap();
        assert!(matches!(again, TriageOutcome::Unchanged));
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_run_is_busy() {
        let backend = EchoBackend::new(Duration::from_secs(5));
        let flow = Arc::new(flow(backend));

        let first = {
            let flow = Arc::clone(&flow);
            tokio::spawn(async move { flow.run("fever", Language::English).await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(flow.is_busy());

        let err = flow.run("rash", Language::English).await.unwrap_err();
        assert!(matches!(err, TriageError::Busy));

        assert!(first.await.unwrap().is_ok());
        assert!(!flow.is_busy());
    }

    #[tokio::test]
    async fn failure_releases_busy_flag() {
        let flow = flow(EchoBackend::failing(SimplifyError::Server { status: 500 }));
        let err = flow.run("fever", Language::English).await.unwrap_err();
        assert!(matches!(
            err,
            TriageError::Simplify(SimplifyError::Server { status: 500 })
        ));
        assert!(!flow.is_busy());
    }
}
