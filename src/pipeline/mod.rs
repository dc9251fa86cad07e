//! Repair Orchestration Pipeline
//!
//! The bounded attempt loop that turns a place description into a validated
//! grid: request, parse, validate, and on failure re-prompt with corrections
//! until the attempt budget runs out. Failure is soft; the caller always
//! receives a result, degraded if necessary. Only authentication errors
//! escape, since credentials are not self-correcting.
//!
//! The loop is an explicit tagged-state machine, not recursion; the attempt
//! bound is auditable at a single comparison.

use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;
use tracing::{debug, info, warn};

use crate::ai::prompt::GridPrompts;
use crate::ai::provider::{
    ChatMessage, CompletionClient, CompletionRequest, HttpCompletionClient, ProviderSettings,
};
use crate::ai::{ResponseParser, ResponsePayload, with_timeout};
use crate::constants;
use crate::schema::SchemaRegistry;
use crate::types::{
    GenerationMetadata, GenerationRequest, GenerationResult, Grid, GridsmithError, Result,
    Violation,
};
use crate::validate::{GridValidator, ValidationOutcome};

// =============================================================================
// Options
// =============================================================================

/// Fire-and-forget progress sink; invoked at each state transition
pub type ProgressCallback = Arc<dyn Fn(&str) + Send + Sync>;

/// Per-call options for [`generate`]
///
/// The credential is scoped to this one call; nothing stores it afterwards.
pub struct GenerateOptions {
    /// Target grid width in cells
    pub width: usize,
    /// Target grid height in cells
    pub height: usize,
    /// API credential for the completion service
    pub credential: SecretString,
    /// Optional archetype name to steer interpretation
    pub archetype_hint: Option<String>,
    /// Optional progress sink for status lines
    pub on_progress: Option<ProgressCallback>,
    /// Override for total attempts, including the first
    pub max_attempts: Option<usize>,
    /// Override for the per-attempt timeout
    pub timeout: Option<Duration>,
    /// Override for the model name
    pub model: Option<String>,
    /// Override for the completion endpoint base URL
    pub api_base: Option<String>,
    /// Override for the sampling temperature
    pub temperature: Option<f32>,
    /// Override for the per-response token cap
    pub max_tokens: Option<usize>,
}

impl GenerateOptions {
    pub fn new(credential: SecretString) -> Self {
        Self {
            width: constants::grid::DEFAULT_WIDTH,
            height: constants::grid::DEFAULT_HEIGHT,
            credential,
            archetype_hint: None,
            on_progress: None,
            max_attempts: None,
            timeout: None,
            model: None,
            api_base: None,
            temperature: None,
            max_tokens: None,
        }
    }
}

impl std::fmt::Debug for GenerateOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerateOptions")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("credential", &"[REDACTED]")
            .field("archetype_hint", &self.archetype_hint)
            .field("has_progress", &self.on_progress.is_some())
            .field("max_attempts", &self.max_attempts)
            .field("timeout", &self.timeout)
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .finish()
    }
}

// =============================================================================
// State Machine
// =============================================================================

/// What the next corrective message should say
#[derive(Debug, Clone)]
enum RepairAction {
    /// Transport failed; re-issue the same conversation unchanged
    Reissue,
    /// Parse failed; send the format-emphasizing corrective prompt
    Format,
    /// Validation failed; send the violation-list corrective prompt
    Violations(Vec<Violation>),
}

/// Loop states; `Success` and `Failed` are terminal
enum State {
    Requesting,
    Parsing { raw: String },
    Validating { payload: ResponsePayload },
    Repairing { action: RepairAction },
    Success(GenerationResult),
    Failed,
}

// =============================================================================
// RepairOrchestrator
// =============================================================================

/// Bounded request/parse/validate/repair loop over one completion client
pub struct RepairOrchestrator<C: CompletionClient> {
    client: C,
    max_attempts: usize,
    timeout: Duration,
    on_progress: Option<ProgressCallback>,
}

impl<C: CompletionClient> RepairOrchestrator<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            max_attempts: constants::pipeline::MAX_ATTEMPTS,
            timeout: Duration::from_secs(constants::network::DEFAULT_TIMEOUT_SECS),
            on_progress: None,
        }
    }

    /// Override total attempts, including the first
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Override the per-attempt timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Attach a progress sink
    pub fn with_progress(mut self, on_progress: ProgressCallback) -> Self {
        self.on_progress = Some(on_progress);
        self
    }

    /// Run the loop for one request
    ///
    /// Returns `Err` only for `Auth`; every other failure mode resolves to
    /// the degraded fallback result.
    pub async fn run(&self, request: &GenerationRequest) -> Result<GenerationResult> {
        let vocabulary = SchemaRegistry::vocabulary();
        let prompts = GridPrompts::initial(request, &vocabulary);
        let mut conversation = CompletionRequest::new(self.client.model(), prompts.system);
        conversation.push(ChatMessage::user(prompts.user));

        let mut attempts_used = 0usize;
        let mut state = State::Requesting;

        loop {
            state = match state {
                State::Requesting => {
                    self.emit("contacting model…");
                    attempts_used += 1;
                    info!(
                        attempt = attempts_used,
                        max_attempts = self.max_attempts,
                        client = self.client.name(),
                        "requesting completion"
                    );
                    let outcome = with_timeout(
                        self.timeout,
                        self.client.complete(&conversation),
                        "completion request",
                    )
                    .await;
                    match outcome {
                        Ok(raw) => State::Parsing { raw },
                        Err(e) if e.is_auth() => {
                            warn!(error = %e, "credential rejected, aborting");
                            return Err(e);
                        }
                        Err(e) => {
                            warn!(attempt = attempts_used, error = %e, "transport failure");
                            self.next_or_failed(attempts_used, RepairAction::Reissue)
                        }
                    }
                }
                State::Parsing { raw } => {
                    self.emit("reading response…");
                    conversation.push(ChatMessage::assistant(raw.clone()));
                    match ResponseParser::extract(&raw) {
                        Ok(payload) => State::Validating { payload },
                        Err(e) => {
                            warn!(attempt = attempts_used, error = %e, "unparseable response");
                            self.next_or_failed(attempts_used, RepairAction::Format)
                        }
                    }
                }
                State::Validating { payload } => {
                    self.emit("validating response…");
                    match GridValidator::validate(&payload, request) {
                        ValidationOutcome::Valid(result) => State::Success(result),
                        ValidationOutcome::Invalid(violations) => {
                            debug!(
                                attempt = attempts_used,
                                violations = violations.len(),
                                "validation rejected the grid"
                            );
                            self.next_or_failed(attempts_used, RepairAction::Violations(violations))
                        }
                    }
                }
                State::Repairing { action } => {
                    self.emit("retrying with corrections…");
                    match action {
                        RepairAction::Reissue => {}
                        RepairAction::Format => {
                            conversation.push(ChatMessage::user(GridPrompts::format_repair(request)));
                        }
                        RepairAction::Violations(violations) => {
                            conversation
                                .push(ChatMessage::user(GridPrompts::repair(request, &violations)));
                        }
                    }
                    State::Requesting
                }
                State::Success(result) => {
                    info!(attempts = attempts_used, "generation succeeded");
                    self.emit("grid ready");
                    return Ok(result);
                }
                State::Failed => {
                    warn!(
                        attempts = attempts_used,
                        "attempts exhausted, returning fallback grid"
                    );
                    self.emit("all attempts failed, using fallback grid");
                    return Ok(GenerationResult {
                        grid: Grid::fallback(request.width, request.height),
                        metadata: GenerationMetadata::fallback(attempts_used),
                    });
                }
            };
        }
    }

    fn next_or_failed(&self, attempts_used: usize, action: RepairAction) -> State {
        if attempts_used >= self.max_attempts {
            State::Failed
        } else {
            State::Repairing { action }
        }
    }

    fn emit(&self, status: &str) {
        if let Some(callback) = &self.on_progress {
            callback(status);
        }
    }
}

// =============================================================================
// Public Entry Point
// =============================================================================

/// Generate a validated tile grid from a free-text place description
///
/// Fails fast with `Auth` on a blank or rejected credential and with
/// `Config` on out-of-range dimensions; every other failure mode resolves to
/// the deterministic fallback result.
pub async fn generate(description: &str, options: GenerateOptions) -> Result<GenerationResult> {
    if !SchemaRegistry::dimensions_in_range(options.width, options.height) {
        return Err(GridsmithError::Config(format!(
            "dimensions {} x {} outside supported range {}..={}",
            options.width,
            options.height,
            constants::grid::MIN_DIMENSION,
            constants::grid::MAX_DIMENSION
        )));
    }

    let mut settings = ProviderSettings::new(options.credential);
    if let Some(timeout) = options.timeout {
        settings.timeout = timeout;
    }
    if let Some(model) = options.model {
        settings.model = model;
    }
    if let Some(api_base) = options.api_base {
        settings.api_base = api_base;
    }
    if let Some(temperature) = options.temperature {
        settings.temperature = temperature;
    }
    if let Some(max_tokens) = options.max_tokens {
        settings.max_tokens = max_tokens;
    }
    let client = HttpCompletionClient::new(settings)?;

    let mut request = GenerationRequest::new(description, options.width, options.height);
    request.archetype_hint = options.archetype_hint;

    let mut orchestrator = RepairOrchestrator::new(client);
    if let Some(max_attempts) = options.max_attempts {
        orchestrator = orchestrator.with_max_attempts(max_attempts);
    }
    if let Some(timeout) = options.timeout {
        orchestrator = orchestrator.with_timeout(timeout);
    }
    if let Some(on_progress) = options.on_progress {
        orchestrator = orchestrator.with_progress(on_progress);
    }

    orchestrator.run(&request).await
}

// =============================================================================
// Tests
// =============================================================================
