use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use camino::Utf8Path;
use estimator_config::Config;
use estimator_extraction::{ExtractedDocument, extract_text};
use estimator_llm::{LlmBackend, LlmInvocation, LlmResult};
use estimator_recovery::{Coerced, apply_metrics, check_response_length, coerce, normalize, repair};
use estimator_report::write_reports;
use estimator_utils::error::{EstimatorError, ExtractionError, FieldIssue, RecoveryError};
use estimator_utils::logging::{StageTimings, log_stage_error, log_stage_start, stage_span};
use estimator_utils::redaction::redact_secrets;
use estimator_utils::types::Stage;
use serde_json::json;
use tracing::{Instrument, debug, info, warn};

use crate::debug::{
    DebugArtifacts, NORMALIZED_FILE, PROMPT_FILE, REPAIRED_FILE, RESPONSE_FILE,
    VALIDATION_REPORT_FILE, attempt_response_file,
};
use crate::{Estimation, RunOutcome};

/// Whether a failed attempt is worth a fresh model response.
///
/// Transient transport problems, short responses and recovery failures are;
/// auth, quota and configuration problems are not.
#[must_use]
pub fn should_regenerate(err: &EstimatorError) -> bool {
    match err {
        EstimatorError::Llm(e) => e.is_transient(),
        EstimatorError::Recovery(_) => true,
        _ => false,
    }
}

/// Run a synchronous stage inside its span, recording the duration on
/// success and logging the failure otherwise.
fn run_stage<T, E: fmt::Display>(
    timings: &mut StageTimings,
    stage: Stage,
    attempt: u32,
    f: impl FnOnce() -> Result<T, E>,
) -> Result<T, E> {
    let span = stage_span(stage, attempt);
    let _entered = span.enter();
    log_stage_start(stage, attempt);

    let started = Instant::now();
    let out = f();
    match &out {
        Ok(_) => timings.record(stage, started.elapsed()),
        Err(e) => log_stage_error(stage, &e.to_string(), started.elapsed()),
    }
    out
}

/// Drives one estimation run: extraction, prompt, bounded regeneration,
/// recovery and reports.
pub struct EstimationEngine<'a> {
    config: &'a Config,
    backend: Arc<dyn LlmBackend>,
    debug: Option<DebugArtifacts>,
}

impl fmt::Debug for EstimationEngine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EstimationEngine")
            .field("provider", &self.backend.provider())
            .field("model", &self.config.model())
            .field("debug", &self.debug)
            .finish()
    }
}

impl<'a> EstimationEngine<'a> {
    #[must_use]
    pub fn new(config: &'a Config, backend: Arc<dyn LlmBackend>) -> Self {
        let debug = config
            .debug()
            .then(|| DebugArtifacts::new(config.debug_dir()));
        Self {
            config,
            backend,
            debug,
        }
    }

    /// Engine with the backend named by the configuration.
    ///
    /// # Errors
    ///
    /// Fails when the provider is unknown or its credential is missing.
    pub fn from_config(config: &'a Config) -> Result<Self, EstimatorError> {
        let backend = estimator_llm::from_config(config)?;
        Ok(Self::new(config, Arc::from(backend)))
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        self.config
    }

    /// Full pipeline on the configured document.
    pub async fn run(&self) -> Result<RunOutcome, EstimatorError> {
        let mut timings = StageTimings::new();

        let document = self.extract(&self.config.document_path(), &mut timings)?;
        let mut estimation = self.estimate_text(&document.text, &mut timings).await?;
        estimation.source = Some(document.path.clone());

        let artifacts = self.write_reports(&estimation, &mut timings)?;
        Ok(RunOutcome {
            estimation,
            artifacts,
            timings,
        })
    }

    /// Recovery and reports on a previously saved model response; the model
    /// is not called.
    pub fn recover_file(&self, response_file: &Utf8Path) -> Result<RunOutcome, EstimatorError> {
        let raw = std::fs::read_to_string(response_file).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                EstimatorError::from(ExtractionError::DocumentNotFound {
                    path: response_file.to_string(),
                })
            } else {
                EstimatorError::from(ExtractionError::ExtractionFailed {
                    path: response_file.to_string(),
                    reason: e.to_string(),
                })
            }
        })?;

        let mut timings = StageTimings::new();
        let mut estimation = self.recover_response(&raw, 1, &mut timings)?;
        estimation.source = Some(response_file.to_owned());

        let artifacts = self.write_reports(&estimation, &mut timings)?;
        Ok(RunOutcome {
            estimation,
            artifacts,
            timings,
        })
    }

    fn extract(
        &self,
        path: &Utf8Path,
        timings: &mut StageTimings,
    ) -> Result<ExtractedDocument, EstimatorError> {
        let document = run_stage(timings, Stage::Extraction, 1, || extract_text(path))?;
        info!(
            path = %document.path,
            format = document.format.as_str(),
            chars = document.char_count(),
            "Document extracted"
        );
        Ok(document)
    }

    /// Prompt, model and recovery for already extracted text, with
    /// regeneration up to `max_attempts`.
    pub async fn estimate_text(
        &self,
        document_text: &str,
        timings: &mut StageTimings,
    ) -> Result<Estimation, EstimatorError> {
        let prompt = {
            let span = stage_span(Stage::Prompt, 1);
            let _entered = span.enter();
            timings.measure(Stage::Prompt, || estimator_prompt::build_prompt(document_text))
        };
        if let Some(debug) = &self.debug {
            debug.write(PROMPT_FILE, &prompt);
        }

        let max_attempts = self.config.max_attempts().max(1);
        let mut attempt = 1;
        loop {
            match self.attempt(&prompt, attempt, timings).await {
                Ok(mut estimation) => {
                    estimation.attempts = attempt;
                    return Ok(estimation);
                }
                Err(err) if !should_regenerate(&err) => return Err(err),
                Err(err) if attempt >= max_attempts => {
                    return Err(if attempt > 1 {
                        EstimatorError::AttemptsExhausted {
                            attempts: attempt,
                            source: Box::new(err),
                        }
                    } else {
                        err
                    });
                }
                Err(err) => {
                    warn!(
                        attempt,
                        max_attempts,
                        stage = %err.stage(),
                        error = %redact_secrets(&err.to_string()),
                        "Attempt failed, requesting a fresh response"
                    );
                    attempt += 1;
                }
            }
        }
    }

    async fn attempt(
        &self,
        prompt: &str,
        attempt: u32,
        timings: &mut StageTimings,
    ) -> Result<Estimation, EstimatorError> {
        let llm = self.invoke(prompt, attempt, timings).await?;

        if let Some(debug) = &self.debug {
            debug.write(&attempt_response_file(attempt), &llm.raw_response);
            debug.write(RESPONSE_FILE, &llm.raw_response);
        }
        if llm.hit_token_limit() {
            warn!(
                attempt,
                finish_reason = ?llm.finish_reason,
                "Model stopped at the token limit; the JSON is likely truncated"
            );
        }

        let mut estimation = self.recover_response(&llm.raw_response, attempt, timings)?;
        estimation.llm = Some(llm);
        Ok(estimation)
    }

    async fn invoke(
        &self,
        prompt: &str,
        attempt: u32,
        timings: &mut StageTimings,
    ) -> Result<LlmResult, EstimatorError> {
        let inv = LlmInvocation::from_prompt(
            prompt,
            self.config.model(),
            self.config.timeout(),
            self.config.max_tokens(),
            self.config.temperature(),
        )
        .with_attempt(attempt);

        let span = stage_span(Stage::Model, attempt);
        log_stage_start(Stage::Model, attempt);
        let started = Instant::now();

        match self.backend.invoke(inv).instrument(span).await {
            Ok(result) => {
                timings.record(Stage::Model, started.elapsed());
                info!(
                    attempt,
                    provider = %result.provider,
                    model = %result.model_used,
                    chars = result.raw_response.chars().count(),
                    tokens_input = ?result.tokens_input,
                    tokens_output = ?result.tokens_output,
                    "Model responded"
                );
                Ok(result)
            }
            Err(e) => {
                log_stage_error(Stage::Model, &e.to_string(), started.elapsed());
                Err(e.into())
            }
        }
    }

    /// Length check, normalize, repair, coerce and metrics on raw model text.
    fn recover_response(
        &self,
        raw: &str,
        attempt: u32,
        timings: &mut StageTimings,
    ) -> Result<Estimation, EstimatorError> {
        if let Err(err) = check_response_length(raw, self.config.min_response_chars()) {
            warn!(attempt, error = %err, "Model response rejected");
            return Err(err.into());
        }

        let normalized = run_stage(timings, Stage::Normalize, attempt, || normalize(raw))?;
        if let Some(debug) = &self.debug {
            debug.write(NORMALIZED_FILE, &normalized);
        }

        let repaired = match run_stage(timings, Stage::Repair, attempt, || repair(&normalized)) {
            Ok(repaired) => repaired,
            Err(err) => {
                if let (Some(debug), RecoveryError::UnrepairableJson { attempted, .. }) =
                    (&self.debug, &err)
                {
                    debug.write(REPAIRED_FILE, attempted);
                }
                return Err(err.into());
            }
        };
        if let Some(debug) = &self.debug {
            debug.write(REPAIRED_FILE, &repaired.text);
        }
        if !repaired.steps.is_empty() {
            let steps: Vec<String> = repaired.steps.iter().map(ToString::to_string).collect();
            info!(attempt, steps = ?steps, "Response repaired");
        }

        let coerced = run_stage(timings, Stage::Validate, attempt, || coerce(&repaired.value));
        if let Some(debug) = &self.debug {
            debug.write_json(
                VALIDATION_REPORT_FILE,
                &validation_report(attempt, &repaired.steps, &coerced),
            );
        }
        let Coerced { document, issues } = coerced?;
        for issue in &issues {
            debug!(path = %issue.path, kind = ?issue.kind, "{}", issue.message);
        }
        if !issues.is_empty() {
            info!(attempt, issues = issues.len(), "Schema issues recovered locally");
        }

        let document = timings.measure(Stage::Metrics, || apply_metrics(document));

        Ok(Estimation {
            document,
            issues,
            repair_steps: repaired.steps,
            attempts: attempt,
            llm: None,
            source: None,
        })
    }

    fn write_reports(
        &self,
        estimation: &Estimation,
        timings: &mut StageTimings,
    ) -> Result<Vec<estimator_report::WrittenArtifact>, EstimatorError> {
        let json_path = self.config.output_path();
        let xlsx_path = self.config.xlsx_path();
        run_stage(timings, Stage::Report, estimation.attempts, || {
            write_reports(&estimation.document, &json_path, &xlsx_path)
        })
        .map_err(EstimatorError::from)
    }
}

fn validation_report(
    attempt: u32,
    steps: &[estimator_recovery::RepairStep],
    coerced: &Result<Coerced, RecoveryError>,
) -> serde_json::Value {
    let steps: Vec<String> = steps.iter().map(ToString::to_string).collect();
    let (status, error, issues): (&str, Option<String>, &[FieldIssue]) = match coerced {
        Ok(coerced) => ("recovered", None, &coerced.issues),
        Err(err) => ("failed", Some(err.to_string()), err.issues()),
    };
    json!({
        "attempt": attempt,
        "status": status,
        "error": error,
        "repairSteps": steps,
        "issues": issues,
    })
}
