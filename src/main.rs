//! `parcel-scout "<task>"` - runs one research agent and prints its result.
//!
//! Providers and the agent variant come from `PARCEL_SCOUT__*` environment
//! variables (see `config`). Capabilities are served from
//! `PARCEL_SCOUT__RESEARCH__FIXTURES_PATH` when set, otherwise from the
//! built-in sample data. Logs go to stderr; the `AgentResult` JSON goes to
//! stdout. Ctrl-C stops the run at the next iteration boundary.

use std::sync::Arc;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

use parcel_scout::adapters::research::{FixtureError, StaticResearch};
use parcel_scout::adapters::{
    AnthropicConfig, AnthropicProvider, CancellationFlag, FailoverModelProvider, OpenAIConfig,
    OpenAIProvider, TracingEventSink,
};
use parcel_scout::application::AgentOrchestrator;
use parcel_scout::config::{AiConfig, AiProvider, AppConfig, ConfigError, LogConfig, ValidationError};
use parcel_scout::domain::agent::AgentError;
use parcel_scout::ports::{ModelProvider, ProviderError};

#[derive(Debug, Error)]
enum CliError {
    #[error("usage: parcel-scout \"<task description>\"")]
    Usage,

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid configuration: {0}")]
    Validation(#[from] ValidationError),

    #[error("failed to build model provider: {0}")]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Agent(#[from] AgentError),

    #[error(transparent)]
    Fixtures(#[from] FixtureError),

    #[error("failed to serialize result: {0}")]
    Output(#[from] serde_json::Error),
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let input = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    if input.trim().is_empty() {
        return Err(CliError::Usage);
    }

    let config = AppConfig::load()?;
    init_tracing(&config.log);
    config.validate()?;

    let variant = config.agent.variant()?;
    let provider = build_provider(&config.ai)?;
    let capabilities = match &config.research.fixtures_path {
        Some(path) => StaticResearch::from_path(path)?,
        None => StaticResearch::sample(),
    }
    .into_capabilities();

    let cancel = CancellationFlag::new();
    let orchestrator = AgentOrchestrator::new(provider, capabilities, variant)?
        .with_cancellation(Arc::new(cancel.clone()));

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, cancelling at next iteration");
            cancel.cancel();
        }
    });

    let result = orchestrator.run(&input, &TracingEventSink::new()).await;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn init_tracing(log: &LogConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.filter));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if log.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Primary provider, wrapped in failover when a fallback is configured.
fn build_provider(ai: &AiConfig) -> Result<Arc<dyn ModelProvider>, CliError> {
    let primary = single_provider(ai, ai.primary_provider)?;

    match ai.fallback_provider {
        Some(fallback) => {
            let secondary = single_provider(ai, fallback)?;
            Ok(Arc::new(FailoverModelProvider::new(primary, secondary)))
        }
        None => Ok(primary),
    }
}

fn single_provider(ai: &AiConfig, kind: AiProvider) -> Result<Arc<dyn ModelProvider>, CliError> {
    match kind {
        AiProvider::Anthropic => {
            let key = ai
                .anthropic_api_key
                .clone()
                .ok_or(ValidationError::MissingRequired("ANTHROPIC_API_KEY"))?;
            let config = AnthropicConfig::new(key)
                .with_model(&ai.anthropic_model)
                .with_timeout(ai.timeout());
            Ok(Arc::new(AnthropicProvider::new(config)?))
        }
        AiProvider::OpenAI => {
            let key = ai
                .openai_api_key
                .clone()
                .ok_or(ValidationError::MissingRequired("OPENAI_API_KEY"))?;
            let config = OpenAIConfig::new(key)
                .with_model(&ai.openai_model)
                .with_timeout(ai.timeout());
            Ok(Arc::new(OpenAIProvider::new(config)?))
        }
    }
}
