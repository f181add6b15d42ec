//! Failover Model Provider - switches to a secondary provider on rate limits.
//!
//! The switch is one-way and happens at most once. After a rate limit from
//! the primary, the same call is retried on the secondary and every later
//! call goes straight to it. Any other failure, and any failure after the
//! switch, is returned unchanged.
//!
//! The switch belongs to one run. [`ModelProvider::for_run`] hands each run
//! a fresh wrapper over the same two providers, so a failover in one run
//! never leaks into the next.
//!
//! # Example
//!
//! ```ignore
//! let primary: Arc<dyn ModelProvider> = Arc::new(AnthropicProvider::new(anthropic)?);
//! let secondary: Arc<dyn ModelProvider> = Arc::new(OpenAIProvider::new(openai)?);
//!
//! let provider = FailoverModelProvider::new(primary, secondary);
//! ```

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::domain::agent::Message;
use crate::domain::tools::ToolDefinition;
use crate::ports::{
    provider_for_run, CallOptions, ModelProvider, ModelResponse, ProviderError, ProviderInfo,
};

/// Model provider wrapper with a single rate-limit failover.
pub struct FailoverModelProvider {
    primary: Arc<dyn ModelProvider>,
    secondary: Arc<dyn ModelProvider>,
    failed_over: AtomicBool,
}

impl FailoverModelProvider {
    pub fn new(primary: Arc<dyn ModelProvider>, secondary: Arc<dyn ModelProvider>) -> Self {
        Self {
            primary,
            secondary,
            failed_over: AtomicBool::new(false),
        }
    }

    /// True once calls are being routed to the secondary.
    pub fn has_failed_over(&self) -> bool {
        self.failed_over.load(Ordering::SeqCst)
    }

    fn active(&self) -> &dyn ModelProvider {
        if self.has_failed_over() {
            self.secondary.as_ref()
        } else {
            self.primary.as_ref()
        }
    }

    /// Claims the one permitted failover for a rate-limit error.
    fn try_fail_over(&self, err: &ProviderError) -> bool {
        if !err.is_rate_limit() {
            return false;
        }
        let switched = self
            .failed_over
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok();

        if switched {
            tracing::warn!(
                primary = %self.primary.provider_info().name,
                secondary = %self.secondary.provider_info().name,
                error = %err,
                "Primary provider rate limited, failing over"
            );
        }
        switched
    }
}

#[async_trait]
impl ModelProvider for FailoverModelProvider {
    async fn call_model(
        &self,
        messages: &[Message],
        tools: &[ToolDefinition],
        options: &CallOptions,
    ) -> Result<ModelResponse, ProviderError> {
        match self.active().call_model(messages, tools, options).await {
            Ok(response) => Ok(response),
            Err(err) if self.try_fail_over(&err) => {
                self.secondary.call_model(messages, tools, options).await
            }
            Err(err) => Err(err),
        }
    }

    async fn chat(
        &self,
        system_prompt: &str,
        messages: &[Message],
        options: &CallOptions,
    ) -> Result<String, ProviderError> {
        match self.active().chat(system_prompt, messages, options).await {
            Ok(text) => Ok(text),
            Err(err) if self.try_fail_over(&err) => {
                self.secondary.chat(system_prompt, messages, options).await
            }
            Err(err) => Err(err),
        }
    }

    fn provider_info(&self) -> ProviderInfo {
        self.active().provider_info()
    }

    fn for_run(&self) -> Option<Arc<dyn ModelProvider>> {
        Some(Arc::new(Self::new(
            provider_for_run(&self.primary),
            provider_for_run(&self.secondary),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockModelProvider;

    fn named(name: &str) -> MockModelProvider {
        MockModelProvider::new().with_provider_info(ProviderInfo::new(name, "m", 1000))
    }

    fn user() -> Vec<Message> {
        vec![Message::user("Hello")]
    }

    #[tokio::test]
    async fn primary_success_does_not_touch_secondary() {
        let primary = named("primary").with_text("Hi there!");
        let secondary = named("secondary").with_text("Fallback");
        let provider = FailoverModelProvider::new(Arc::new(primary.clone()), Arc::new(secondary.clone()));

        let response = provider
            .call_model(&user(), &[], &CallOptions::default())
            .await
            .unwrap();

        assert_eq!(response.texts().collect::<String>(), "Hi there!");
        assert_eq!(secondary.call_count(), 0);
        assert!(!provider.has_failed_over());
    }

    #[tokio::test]
    async fn rate_limit_retries_same_call_on_secondary() {
        let primary = named("primary").with_error(ProviderError::rate_limited(30));
        let secondary = named("secondary").with_text("Fallback");
        let provider = FailoverModelProvider::new(Arc::new(primary.clone()), Arc::new(secondary.clone()));

        let response = provider
            .call_model(&user(), &[], &CallOptions::default())
            .await
            .unwrap();

        assert_eq!(response.texts().collect::<String>(), "Fallback");
        assert_eq!(secondary.calls()[0].messages, user());
        assert!(provider.has_failed_over());
        assert_eq!(provider.provider_info().name, "secondary");
    }

    #[tokio::test]
    async fn rate_limit_text_in_other_errors_triggers_failover() {
        let primary = named("primary").with_error(ProviderError::unavailable("Server error 503: overloaded"));
        let secondary = named("secondary").with_text("ok");
        let provider = FailoverModelProvider::new(Arc::new(primary), Arc::new(secondary));

        assert!(provider
            .call_model(&user(), &[], &CallOptions::default())
            .await
            .is_ok());
        assert!(provider.has_failed_over());
    }

    #[tokio::test]
    async fn switch_is_permanent() {
        let primary = named("primary").with_error(ProviderError::rate_limited(5));
        let secondary = named("secondary").with_text("one").with_text("two");
        let provider = FailoverModelProvider::new(Arc::new(primary.clone()), Arc::new(secondary.clone()));

        for _ in 0..2 {
            provider
                .call_model(&user(), &[], &CallOptions::default())
                .await
                .unwrap();
        }

        assert_eq!(primary.call_count(), 1);
        assert_eq!(secondary.call_count(), 2);
    }

    #[tokio::test]
    async fn non_rate_limit_error_is_returned() {
        let primary = named("primary").with_error(ProviderError::AuthenticationFailed);
        let secondary = named("secondary").with_text("Fallback");
        let provider = FailoverModelProvider::new(Arc::new(primary), Arc::new(secondary.clone()));

        let result = provider.call_model(&user(), &[], &CallOptions::default()).await;

        assert_eq!(result.unwrap_err(), ProviderError::AuthenticationFailed);
        assert_eq!(secondary.call_count(), 0);
        assert!(!provider.has_failed_over());
    }

    #[tokio::test]
    async fn second_rate_limit_is_returned_as_is() {
        let primary = named("primary").with_error(ProviderError::rate_limited(30));
        let secondary = named("secondary")
            .with_error(ProviderError::rate_limited(10))
            .with_text("never reached");
        let provider = FailoverModelProvider::new(Arc::new(primary), Arc::new(secondary.clone()));

        let result = provider.call_model(&user(), &[], &CallOptions::default()).await;

        assert_eq!(result.unwrap_err(), ProviderError::rate_limited(10));
        assert_eq!(secondary.call_count(), 1);
    }

    #[tokio::test]
    async fn each_run_starts_on_primary() {
        let primary = named("primary")
            .with_error(ProviderError::rate_limited(30))
            .with_text("primary again");
        let secondary = named("secondary").with_text("fallback");
        let shared = FailoverModelProvider::new(Arc::new(primary.clone()), Arc::new(secondary.clone()));

        let first = shared.for_run().unwrap();
        first
            .call_model(&user(), &[], &CallOptions::default())
            .await
            .unwrap();
        assert_eq!(first.provider_info().name, "secondary");

        let second = shared.for_run().unwrap();
        assert_eq!(second.provider_info().name, "primary");
        let response = second
            .call_model(&user(), &[], &CallOptions::default())
            .await
            .unwrap();

        assert_eq!(response.texts().collect::<String>(), "primary again");
        assert_eq!(primary.call_count(), 2);
        assert_eq!(secondary.call_count(), 1);
        assert!(!shared.has_failed_over());
    }

    #[tokio::test]
    async fn chat_fails_over_too() {
        let primary = named("primary").with_error(ProviderError::rate_limited(30));
        let secondary = named("secondary").with_text("summary");
        let provider = FailoverModelProvider::new(Arc::new(primary), Arc::new(secondary));

        let text = provider
            .chat("sys", &user(), &CallOptions::default())
            .await
            .unwrap();
        assert_eq!(text, "summary");
    }
}
