use thiserror::Error;

#[derive(Error, Debug)]
pub enum AiError {
    #[error("Game state provider error: {0}")]
    Provider(String),

    #[error("Executive gateway error: {0}")]
    Gateway(String),

    #[error("Generator error: {0}")]
    Generator(String),

    #[error("Generator timed out after {0} ms")]
    GeneratorTimeout(u64),

    #[error("Malformed generator output: {0}")]
    MalformedOutput(String),

    #[error("LLM error: {0}")]
    LlmError(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AiError>;
