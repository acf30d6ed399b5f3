//! `simplify`, `analyze` and `triage` subcommands.
//!
//! Results go to stdout; progress and diagnostics go to stderr.

use std::sync::Arc;

use serde_json::json;
use tokio_util::sync::CancellationToken;

use super::{CliError, RequestArgs};
use crate::classifier::{Assessment, KeywordClassifier, SymptomClassifier};
use crate::config::EnvConfig;
use crate::simplify::{
    HttpBackend, Orchestrator, ProgressEvent, ProgressSink, SimplifyResult,
};
use crate::triage::{TriageFlow, TriageOutcome};

/// Prints progress events to stderr.
pub struct StderrProgress;

impl ProgressSink for StderrProgress {
    fn notify(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::StillProcessing { elapsed } => eprintln!(
                "Still processing: the text-to-speech service is still working ({}s elapsed)...",
                elapsed.as_secs()
            ),
        }
    }
}

fn build_orchestrator(env: &EnvConfig) -> Result<Orchestrator, CliError> {
    let backend = HttpBackend::new(&env.orchestrator.api_base_url)?;
    Ok(Orchestrator::new(Arc::new(backend), env.orchestrator.clone())
        .with_progress_sink(Arc::new(StderrProgress)))
}

/// Cancelled on Ctrl-C so an outstanding call ends with `Cancelled`.
fn ctrl_c_token() -> CancellationToken {
    let token = CancellationToken::new();
    let child = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            child.cancel();
        }
    });
    token
}

pub async fn run_simplify(args: &[String], env: &EnvConfig) -> Result<(), CliError> {
    let args = RequestArgs::parse(args)?;
    let language = args.language.clone().unwrap_or_else(|| env.language.clone());
    let orchestrator = build_orchestrator(env)?;

    eprintln!("Simplifying medical text and generating audio. This may take a minute...");
    let result = orchestrator
        .simplify_and_speak_cancellable(&args.text, language, ctrl_c_token())
        .await?;

    if args.json {
        println!("{}", result_json(&result, &orchestrator));
    } else {
        print_result(&result, &orchestrator);
    }
    Ok(())
}

pub async fn run_analyze(args: &[String]) -> Result<(), CliError> {
    let args = RequestArgs::parse(args)?;
    let assessment = KeywordClassifier::new()?.classify(args.text.trim());
    if args.json {
        println!("{}", json!(assessment));
    } else {
        print_assessment(&assessment);
    }
    Ok(())
}

pub async fn run_triage(args: &[String], env: &EnvConfig) -> Result<(), CliError> {
    let args = RequestArgs::parse(args)?;
    let language = args.language.clone().unwrap_or_else(|| env.language.clone());
    let flow = TriageFlow::new(
        Arc::new(KeywordClassifier::new()?),
        Arc::new(build_orchestrator(env)?),
    );

    match flow.run(&args.text, language).await? {
        TriageOutcome::Unchanged => {
            eprintln!("Showing previous results since symptoms haven't changed.");
        }
        TriageOutcome::Analyzed {
            assessment,
            simplified,
        } => {
            if args.json {
                let output = json!({
                    "assessment": assessment,
                    "simplified": result_json(&simplified, flow.orchestrator()),
                });
                println!("{output}");
            } else {
                print_assessment(&assessment);
                println!();
                print_result(&simplified, flow.orchestrator());
            }
        }
    }
    Ok(())
}

fn result_json(result: &SimplifyResult, orchestrator: &Orchestrator) -> serde_json::Value {
    let mut value = json!(result);
    if let Some(name) = &result.audio_filename {
        value["audio_url"] = json!(orchestrator.audio_url(name));
    }
    value
}

fn print_result(result: &SimplifyResult, orchestrator: &Orchestrator) {
    println!("Simplified: {}", result.simplified_text);
    if let Some(translated) = &result.translated_text {
        println!("Translated: {translated}");
    }
    if !result.explanations.is_empty() {
        println!("Terms:");
        for e in &result.explanations {
            println!("  {}: {}", e.term, e.explanation);
        }
    }
    if let Some(name) = &result.audio_filename {
        println!("Audio: {}", orchestrator.audio_url(name));
    }
}

fn print_assessment(assessment: &Assessment) {
    println!("{:<36} {:>6}", "CONDITION", "PROB");
    println!("{}", "-".repeat(43));
    for c in &assessment.conditions {
        println!("{:<36} {:>5.0}%", c.condition, c.probability * 100.0);
    }
    println!();
    println!("{}", assessment.summary);
}
