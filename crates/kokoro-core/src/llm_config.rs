use async_openai::config::OpenAIConfig;
use kokoro_utils::args::llm::LlmService as LlmServiceArgs;

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_MAX_RPM: usize = 500;
pub const DEFAULT_MAX_CONCURRENT: usize = 200;

#[derive(Debug, Clone)]
pub struct LlmConfig {
    api_key: Option<String>,
    api_base: Option<String>,
    model: String,
    max_rpm: usize,
    max_concurrent: usize,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: None,
            model: DEFAULT_MODEL.to_owned(),
            max_rpm: DEFAULT_MAX_RPM,
            max_concurrent: DEFAULT_MAX_CONCURRENT,
        }
    }
}

impl From<LlmServiceArgs> for LlmConfig {
    fn from(args: LlmServiceArgs) -> Self {
        Self::new(
            args.openai_key,
            args.openai_api_base,
            args.llm_model,
            args.llm_max_rpm,
            args.llm_max_concurrent,
        )
    }
}

impl LlmConfig {
    #[must_use]
    pub fn new(
        api_key: Option<String>,
        api_base: Option<String>,
        model: Option<String>,
        max_rpm: Option<usize>,
        max_concurrent: Option<usize>,
    ) -> Self {
        let defaults = Self::default();
        Self {
            api_key,
            api_base,
            model: model.unwrap_or(defaults.model),
            max_rpm: max_rpm.unwrap_or(defaults.max_rpm),
            max_concurrent: max_concurrent.unwrap_or(defaults.max_concurrent),
        }
    }

    #[must_use]
    pub fn openai_config(&self) -> OpenAIConfig {
        let mut config = OpenAIConfig::new();
        if let Some(key) = &self.api_key {
            config = config.with_api_key(key.clone());
        }
        if let Some(base) = &self.api_base {
            config = config.with_api_base(base.clone());
        }
        config
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    #[must_use]
    pub fn max_rpm(&self) -> usize {
        self.max_rpm
    }

    #[must_use]
    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }
}
