use thiserror::Error;

#[derive(Error, Debug)]
pub enum SynthesisError {
    #[error("Speech vendor returned {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("Failed to reach speech vendor: {0}")]
    Transport(anyhow::Error),

    #[error("Failed to build synthesis markup: {0}")]
    Markup(anyhow::Error),
}

impl From<reqwest::Error> for SynthesisError {
    fn from(source: reqwest::Error) -> Self {
        Self::Transport(anyhow::anyhow!(source))
    }
}
