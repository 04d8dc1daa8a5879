use clap::Args;

#[derive(Debug, Clone, Args)]
pub struct LlmService {
    #[arg(long, env = "OPENAI_API_KEY", required = false)]
    pub openai_key: Option<String>,

    #[arg(long, required = false, help = "Override the OpenAI-compatible API base url")]
    pub openai_api_base: Option<String>,

    #[arg(long, required = false, help = "Model used for journal analysis and affirmations")]
    pub llm_model: Option<String>,

    #[arg(long, required = false, help = "Max model requests per minute")]
    pub llm_max_rpm: Option<usize>,

    #[arg(long, required = false, help = "Max concurrent in-flight model requests")]
    pub llm_max_concurrent: Option<usize>,
}
