use thiserror::Error;

/// Negative outcomes of a gateway call. `Api`, `EmptyResponse` and
/// `FunctionCall` are well-formed failures reported by the model side;
/// `HttpClientBuild` is a local fault. The background processor resolves
/// every variant into the entry's `failed` state.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error(transparent)]
    Api(#[from] async_openai::error::OpenAIError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    FunctionCall(#[from] FunctionCallError),

    #[error("no response from the model")]
    EmptyResponse,

    #[error("failed to build http client: {0}")]
    HttpClientBuild(#[source] reqwest::Error),
}

#[derive(Error, Debug)]
pub enum FunctionCallError {
    #[error("the model called the wrong function")]
    WrongFunction,

    #[error("the model returned invalid function arguments")]
    InvalidSyntax,

    #[error("no function call in the model response even though one was forced")]
    Missing,
}
