use collision_estimator::DomainError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Estimate(#[from] DomainError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown command ':{0}'. Available: :precision, :cutoff, :bucket-mode, :hash-mode, :show, :quit")]
    UnknownCommand(String),

    #[error("Command ':{command}' needs a value")]
    MissingArgument { command: String },

    #[error("Expected '<buckets> <hashes>' or a ':' command")]
    MalformedLine,

    #[error("Calculation task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
