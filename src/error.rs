use thiserror::Error;

#[derive(Error, Debug)]
pub enum CrapError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{tool} failed with exit code {}: {output}", exit_code(.code))]
    ToolFailed {
        tool: String,
        code: Option<i32>,
        output: String,
    },

    #[error("{tool} did not finish within {secs}s")]
    ToolTimeout { tool: String, secs: u64 },

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Unknown coverage format")]
    UnknownFormat,

    #[error("Invalid code unit: {0}")]
    InvalidUnit(String),

    #[error("Config error: {0}")]
    Config(String),
}

fn exit_code(code: &Option<i32>) -> String {
    match code {
        Some(c) => c.to_string(),
        None => "none (terminated by signal)".to_string(),
    }
}

pub type Result<T> = std::result::Result<T, CrapError>;
