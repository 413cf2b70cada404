//! Correction pipeline — ordered provider attempts with local fallback.
//!
//! `correct()` never returns an error: every remote failure is logged and
//! absorbed, and the deterministic local corrector backstops the chain.
//! Remote candidates are attempted strictly sequentially, so at most one
//! network call is in flight per invocation.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::CorrectionConfig;
use crate::correction::local::{self, LocalOptions};
use crate::correction::provider::{
    CorrectionProvider, GeminiProvider, OpenAiProvider, ProviderKind,
};
use crate::error::ProviderError;

/// Per-call options.
#[derive(Debug, Clone, Copy)]
pub struct CorrectionOptions {
    /// When false, skip all remote providers and use the local corrector.
    pub use_real_api: bool,
    /// Rewrite informal/promotional vocabulary on the local path.
    pub improve_marketing: bool,
    /// Explicit provider override — the sole remote candidate when set.
    pub provider: Option<ProviderKind>,
}

impl Default for CorrectionOptions {
    fn default() -> Self {
        Self {
            use_real_api: true,
            improve_marketing: true,
            provider: None,
        }
    }
}

/// Which path produced the corrected text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorrectionSource {
    Gemini,
    OpenAi,
    /// Deterministic local corrector.
    Mock,
    /// Total failure; the input text is echoed back.
    Error,
}

impl From<ProviderKind> for CorrectionSource {
    fn from(kind: ProviderKind) -> Self {
        match kind {
            ProviderKind::Gemini => Self::Gemini,
            ProviderKind::OpenAi => Self::OpenAi,
        }
    }
}

impl std::fmt::Display for CorrectionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Gemini => "gemini",
            Self::OpenAi => "openai",
            Self::Mock => "mock",
            Self::Error => "error",
        };
        write!(f, "{s}")
    }
}

/// Uniform result shape regardless of which path succeeded.
///
/// `corrected_text` is always populated — on total failure it falls back
/// to the original input.
#[derive(Debug, Clone)]
pub struct CorrectionResult {
    pub corrected_text: String,
    pub success: bool,
    pub source: CorrectionSource,
    pub error: Option<String>,
}

/// The pipeline: ordered remote candidates plus the local fallback.
pub struct CorrectionPipeline {
    providers: Vec<Arc<dyn CorrectionProvider>>,
    simulate_local_latency: bool,
}

impl CorrectionPipeline {
    /// Build the standard pipeline from configuration.
    pub fn new(config: &CorrectionConfig) -> Result<Self, ProviderError> {
        Ok(Self {
            providers: vec![
                Arc::new(GeminiProvider::new(config)?),
                Arc::new(OpenAiProvider::new(config)?),
            ],
            simulate_local_latency: true,
        })
    }

    /// Build a pipeline from explicit providers (tests inject mocks here).
    pub fn with_providers(providers: Vec<Arc<dyn CorrectionProvider>>) -> Self {
        Self {
            providers,
            simulate_local_latency: false,
        }
    }

    /// Correct `text`. Always resolves with usable text; never errors.
    pub async fn correct(&self, text: &str, options: CorrectionOptions) -> CorrectionResult {
        if text.trim().is_empty() {
            return CorrectionResult {
                corrected_text: text.to_string(),
                success: false,
                source: CorrectionSource::Error,
                error: Some("Invalid input: message must be a non-empty string".to_string()),
            };
        }

        if options.use_real_api {
            for provider in self.candidates(options.provider) {
                match provider.attempt(text).await {
                    Ok(corrected) => {
                        debug!(provider = %provider.kind(), "Remote correction succeeded");
                        return CorrectionResult {
                            corrected_text: corrected,
                            success: true,
                            source: provider.kind().into(),
                            error: None,
                        };
                    }
                    Err(e) => {
                        warn!(provider = %provider.kind(), error = %e, "Provider failed, falling back");
                    }
                }
            }
        }

        let local_options = LocalOptions {
            improve_marketing: options.improve_marketing,
            simulate_latency: self.simulate_local_latency,
        };
        let corrected = local::correct(text, local_options).await;
        if corrected.is_empty() {
            // The local transform cannot produce empty output from
            // non-empty input; treat it as the total-failure path anyway.
            return CorrectionResult {
                corrected_text: text.to_string(),
                success: false,
                source: CorrectionSource::Error,
                error: Some("Local correction produced no text".to_string()),
            };
        }
        CorrectionResult {
            corrected_text: corrected,
            success: true,
            source: CorrectionSource::Mock,
            error: None,
        }
    }

    /// Ordered remote candidates: the explicit override alone when given
    /// (attempted even without a credential — the failure falls through),
    /// otherwise the fixed priority order filtered by availability.
    fn candidates(&self, requested: Option<ProviderKind>) -> Vec<Arc<dyn CorrectionProvider>> {
        match requested {
            Some(kind) => self
                .providers
                .iter()
                .filter(|p| p.kind() == kind)
                .cloned()
                .collect(),
            None => ProviderKind::PRIORITY
                .iter()
                .filter_map(|kind| {
                    self.providers
                        .iter()
                        .find(|p| p.kind() == *kind && p.is_available())
                        .cloned()
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;

    struct ScriptedProvider {
        kind: ProviderKind,
        available: bool,
        reply: Result<String, ()>,
        calls: AtomicUsize,
    }

    impl ScriptedProvider {
        fn ok(kind: ProviderKind, reply: &str) -> Self {
            Self {
                kind,
                available: true,
                reply: Ok(reply.to_string()),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing(kind: ProviderKind) -> Self {
            Self {
                kind,
                available: true,
                reply: Err(()),
                calls: AtomicUsize::new(0),
            }
        }

        fn unavailable(kind: ProviderKind) -> Self {
            Self {
                kind,
                available: false,
                reply: Err(()),
                calls: AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CorrectionProvider for ScriptedProvider {
        fn kind(&self) -> ProviderKind {
            self.kind
        }

        fn is_available(&self) -> bool {
            self.available
        }

        async fn attempt(&self, _text: &str) -> Result<String, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply.clone().map_err(|_| ProviderError::RequestFailed {
                provider: self.kind.name().to_string(),
                reason: "scripted failure".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn empty_input_resolves_with_failure_result() {
        let pipeline = CorrectionPipeline::with_providers(vec![]);
        for input in ["", "   ", "\n\t"] {
            let result = pipeline.correct(input, CorrectionOptions::default()).await;
            assert!(!result.success);
            assert_eq!(result.source, CorrectionSource::Error);
            assert_eq!(result.corrected_text, input);
            assert!(result.error.is_some());
        }
    }

    #[tokio::test]
    async fn real_api_disabled_never_touches_providers() {
        let gemini = Arc::new(ScriptedProvider::ok(ProviderKind::Gemini, "remote"));
        let pipeline = CorrectionPipeline::with_providers(vec![gemini.clone()]);

        let options = CorrectionOptions {
            use_real_api: false,
            ..CorrectionOptions::default()
        };
        let result = pipeline.correct("teh deal", options).await;

        assert_eq!(gemini.call_count(), 0);
        assert!(result.success);
        assert_eq!(result.source, CorrectionSource::Mock);
        assert_eq!(result.corrected_text, "The premium package");
    }

    #[tokio::test]
    async fn first_successful_provider_wins() {
        let gemini = Arc::new(ScriptedProvider::ok(ProviderKind::Gemini, "from gemini"));
        let openai = Arc::new(ScriptedProvider::ok(ProviderKind::OpenAi, "from openai"));
        let pipeline = CorrectionPipeline::with_providers(vec![gemini.clone(), openai.clone()]);

        let result = pipeline.correct("text", CorrectionOptions::default()).await;
        assert!(result.success);
        assert_eq!(result.source, CorrectionSource::Gemini);
        assert_eq!(result.corrected_text, "from gemini");
        assert_eq!(openai.call_count(), 0);
    }

    #[tokio::test]
    async fn failure_advances_to_next_candidate() {
        let gemini = Arc::new(ScriptedProvider::failing(ProviderKind::Gemini));
        let openai = Arc::new(ScriptedProvider::ok(ProviderKind::OpenAi, "from openai"));
        let pipeline = CorrectionPipeline::with_providers(vec![gemini.clone(), openai]);

        let result = pipeline.correct("text", CorrectionOptions::default()).await;
        assert_eq!(gemini.call_count(), 1);
        assert_eq!(result.source, CorrectionSource::OpenAi);
        assert_eq!(result.corrected_text, "from openai");
    }

    #[tokio::test]
    async fn all_remote_failures_fall_back_to_local() {
        let gemini = Arc::new(ScriptedProvider::failing(ProviderKind::Gemini));
        let openai = Arc::new(ScriptedProvider::failing(ProviderKind::OpenAi));
        let pipeline = CorrectionPipeline::with_providers(vec![gemini, openai]);

        let result = pipeline.correct("i recieve it", CorrectionOptions::default()).await;
        assert!(result.success);
        assert_eq!(result.source, CorrectionSource::Mock);
        assert_eq!(result.corrected_text, "I receive it");
    }

    #[tokio::test]
    async fn unavailable_providers_are_skipped() {
        let gemini = Arc::new(ScriptedProvider::unavailable(ProviderKind::Gemini));
        let openai = Arc::new(ScriptedProvider::ok(ProviderKind::OpenAi, "openai text"));
        let pipeline = CorrectionPipeline::with_providers(vec![gemini.clone(), openai]);

        let result = pipeline.correct("text", CorrectionOptions::default()).await;
        assert_eq!(gemini.call_count(), 0);
        assert_eq!(result.source, CorrectionSource::OpenAi);
    }

    #[tokio::test]
    async fn explicit_override_is_sole_candidate() {
        let gemini = Arc::new(ScriptedProvider::ok(ProviderKind::Gemini, "gemini text"));
        let openai = Arc::new(ScriptedProvider::failing(ProviderKind::OpenAi));
        let pipeline = CorrectionPipeline::with_providers(vec![gemini.clone(), openai.clone()]);

        let options = CorrectionOptions {
            provider: Some(ProviderKind::OpenAi),
            ..CorrectionOptions::default()
        };
        let result = pipeline.correct("teh text", options).await;

        // The override was attempted, failed, and fell straight to local —
        // the other provider was never consulted.
        assert_eq!(openai.call_count(), 1);
        assert_eq!(gemini.call_count(), 0);
        assert_eq!(result.source, CorrectionSource::Mock);
        assert_eq!(result.corrected_text, "The text");
    }

    #[tokio::test]
    async fn override_even_when_unavailable_is_attempted() {
        let gemini = Arc::new(ScriptedProvider::unavailable(ProviderKind::Gemini));
        let pipeline = CorrectionPipeline::with_providers(vec![gemini.clone()]);

        let options = CorrectionOptions {
            provider: Some(ProviderKind::Gemini),
            ..CorrectionOptions::default()
        };
        let result = pipeline.correct("text", options).await;
        assert_eq!(gemini.call_count(), 1);
        assert_eq!(result.source, CorrectionSource::Mock);
    }

    #[tokio::test]
    async fn marketing_toggle_respected_on_local_path() {
        let pipeline = CorrectionPipeline::with_providers(vec![]);
        let options = CorrectionOptions {
            use_real_api: false,
            improve_marketing: false,
            ..CorrectionOptions::default()
        };
        let result = pipeline.correct("the deal", options).await;
        assert_eq!(result.corrected_text, "The deal");
    }
}
