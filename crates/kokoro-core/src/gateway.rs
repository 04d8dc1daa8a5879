use crate::gateway::budget::RequestBudget;
use crate::gateway::error::{FunctionCallError, GatewayError};
use crate::llm_config::LlmConfig;
use async_openai::Client;
use async_openai::types::{
    ChatCompletionNamedToolChoice, ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
    ChatCompletionTool, ChatCompletionToolChoiceOption, ChatCompletionToolType, CreateChatCompletionRequestArgs,
    CreateChatCompletionResponse, FunctionName, FunctionObject,
};
use async_trait::async_trait;
use std::error::Error;
use std::time::Duration;
use tracing::instrument;
use typed_builder::TypedBuilder;

pub mod budget;
pub mod error;
pub mod functions;

pub use functions::{AffirmationBatch, EntryAnalysis};

/// Number of affirmations generated per request.
pub const AFFIRMATION_COUNT: usize = 5;

/// The LLM boundary. One implementation talks to OpenAI; tests swap in an
/// instrumented double. The gateway performs no retries; callers own the
/// retry policy (the explicit process trigger is the retry path).
#[async_trait]
pub trait Gateway: Send + Sync {
    async fn analyze(&self, content: &str, mood: &str) -> Result<EntryAnalysis, GatewayError>;

    async fn generate_affirmations(
        &self,
        context: &str,
        count: usize,
        style: &str,
        tone: &str,
    ) -> Result<Vec<String>, GatewayError>;
}

/// A forced function call the model must answer with.
pub trait FunctionResponse: serde::de::DeserializeOwned {
    fn function_name() -> &'static str;
    fn function_description() -> &'static str;

    fn function_definition() -> serde_json::Value;

    fn fix_escapes(&mut self);
}

#[derive(TypedBuilder, Debug, Clone)]
pub struct CallConfig {
    #[builder(default = Duration::from_secs(60))]
    timeout: Duration,
}

pub struct OpenAiGateway {
    config: LlmConfig,
    budget: RequestBudget,
}

impl OpenAiGateway {
    #[must_use]
    pub fn new(config: LlmConfig) -> Self {
        let budget = RequestBudget::new(config.max_rpm(), config.max_concurrent());
        Self { config, budget }
    }

    #[instrument(skip_all)]
    async fn call_function<T: FunctionResponse>(
        &self,
        call: CallConfig,
        messages: Vec<ChatCompletionRequestMessage>,
    ) -> Result<T, GatewayError> {
        let name = T::function_name();

        let request = CreateChatCompletionRequestArgs::default()
            .model(self.config.model())
            .messages(messages)
            .max_tokens(1024u32)
            .tools(vec![ChatCompletionTool {
                r#type: ChatCompletionToolType::Function,
                function: FunctionObject {
                    name: name.to_string(),
                    description: Some(T::function_description().to_string()),
                    parameters: Some(T::function_definition()),
                    strict: None,
                },
            }])
            .tool_choice(ChatCompletionToolChoiceOption::Named(ChatCompletionNamedToolChoice {
                r#type: ChatCompletionToolType::Function,
                function: FunctionName { name: name.to_string() },
            }))
            .build()?;

        let http_client = reqwest::Client::builder().timeout(call.timeout).build().map_err(|error| {
            tracing::error!(error = &error as &dyn Error, "failed to build http client for the model call");
            GatewayError::HttpClientBuild(error)
        })?;

        let client = Client::with_config(self.config.openai_config()).with_http_client(http_client);

        let _permit = self.budget.acquire().await;
        tracing::debug!(function = name, "sending model request");
        let chat_completion = client.chat().create(request).await.map_err(|error| {
            tracing::warn!(error = &error as &dyn Error, "model call failed");
            GatewayError::Api(error)
        })?;

        check_function_call(&chat_completion)
    }
}

#[async_trait]
impl Gateway for OpenAiGateway {
    #[instrument(skip_all)]
    async fn analyze(&self, content: &str, mood: &str) -> Result<EntryAnalysis, GatewayError> {
        let messages = vec![
            ChatCompletionRequestUserMessageArgs::default()
                .content(functions::analysis_prompt(content, mood))
                .build()?
                .into(),
        ];

        self.call_function(CallConfig::builder().build(), messages).await
    }

    #[instrument(skip_all)]
    async fn generate_affirmations(
        &self,
        context: &str,
        count: usize,
        style: &str,
        tone: &str,
    ) -> Result<Vec<String>, GatewayError> {
        let messages = vec![
            ChatCompletionRequestUserMessageArgs::default()
                .content(functions::affirmation_prompt(context, count, style, tone))
                .build()?
                .into(),
        ];

        let batch: AffirmationBatch = self.call_function(CallConfig::builder().build(), messages).await?;
        Ok(batch.affirmations)
    }
}

#[instrument(skip_all)]
fn check_function_call<T: FunctionResponse>(chat_completion: &CreateChatCompletionResponse) -> Result<T, GatewayError> {
    let choice = chat_completion.choices.first().ok_or(GatewayError::EmptyResponse)?;
    let message = &choice.message;

    let function_call = message
        .tool_calls
        .as_ref()
        .ok_or(FunctionCallError::Missing)?
        .first()
        .ok_or(FunctionCallError::Missing)?;

    if function_call.function.name != T::function_name() {
        tracing::warn!(
            expected_function = T::function_name(),
            called_function = &function_call.function.name,
            "assistant tried to call the wrong function"
        );
        return Err(FunctionCallError::WrongFunction.into());
    }

    let mut res: T = serde_json::from_str(&function_call.function.arguments).map_err(|error| {
        tracing::warn!(
            error = &error as &dyn Error,
            arguments = function_call.function.arguments,
            "failed to parse function call arguments"
        );
        FunctionCallError::InvalidSyntax
    })?;
    res.fix_escapes();
    Ok(res)
}
