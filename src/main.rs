use std::sync::Arc;

use webmark::config::CorrectionConfig;
use webmark::correction::{CorrectionOptions, CorrectionPipeline, get_suggestions};
use webmark::session::{LibSqlStore, Session, SessionStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let text = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    if text.is_empty() {
        eprintln!("Usage: webmark <text to correct>");
        std::process::exit(2);
    }

    let db_path =
        std::env::var("WEBMARK_DB_PATH").unwrap_or_else(|_| "./data/webmark.db".to_string());
    let store: Arc<dyn SessionStore> =
        Arc::new(LibSqlStore::new_local(std::path::Path::new(&db_path)).await?);
    let session = Session::new(store);
    session.hydrate().await?;

    let config = CorrectionConfig::from_env();
    eprintln!("✍️  WebMark v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Database: {}", db_path);
    match session.profile() {
        Some(profile) => eprintln!("   Session: {} (onboarded: {})", profile.username, session.is_onboarded()),
        None => eprintln!("   Session: logged out"),
    }
    eprintln!(
        "   Providers: gemini={} openai={}",
        if config.gemini_key.is_some() { "configured" } else { "-" },
        if config.openai_key.is_some() { "configured" } else { "-" },
    );

    let pipeline = CorrectionPipeline::new(&config)?;
    let result = pipeline.correct(&text, CorrectionOptions::default()).await;

    println!("{}", result.corrected_text);
    eprintln!("   Source: {} (success: {})", result.source, result.success);
    if let Some(error) = result.error {
        eprintln!("   Error: {}", error);
    }

    if let Some(suggestion) = get_suggestions(&text) {
        eprintln!(
            "   Suggestion for \"{}\": {}",
            suggestion.word,
            suggestion.suggestions.join(", ")
        );
    }

    Ok(())
}
