//! Text-correction domain: multi-provider pipeline with local fallback,
//! plus the real-time suggestion lookup.

pub mod local;
pub mod pipeline;
pub mod provider;
pub mod suggest;

pub use pipeline::{CorrectionOptions, CorrectionPipeline, CorrectionResult, CorrectionSource};
pub use provider::{CorrectionProvider, GeminiProvider, OpenAiProvider, ProviderKind};
pub use suggest::{Suggestion, apply_suggestion, get_suggestions};
