/// Errors that can occur across the Augur workspace.
///
/// Each variant is a distinct failure class. The analysis engine only ever
/// branches on [`AugurError::is_size_limit`]; the completion-client adapter
/// is responsible for producing the right variant up front, so nothing
/// downstream inspects error message text.
///
/// # Examples
///
/// ```
/// use augur_core::AugurError;
///
/// let err = AugurError::Config("missing API key".into());
/// assert!(err.to_string().contains("missing API key"));
/// assert!(!err.is_size_limit());
/// ```
#[derive(Debug, thiserror::Error)]
pub enum AugurError {
    /// Filesystem I/O failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or missing configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Unusable input, such as an empty or whitespace-only diff.
    /// Never retried.
    #[error("input error: {0}")]
    Input(String),

    /// The request exceeded a provider-imposed size or throughput quota.
    /// The only recoverable class: it triggers re-splitting.
    #[error("size/rate limit exceeded: {0}")]
    SizeLimit(String),

    /// The completion response was not valid JSON or failed schema checks.
    #[error("schema validation error: {0}")]
    Schema(String),

    /// Network, HTTP, or authentication failure talking to the
    /// completion API. Aborts the pipeline.
    #[error("transport error: {0}")]
    Transport(String),

    /// JSON serialization / deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML deserialization failure.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl AugurError {
    /// Returns `true` for the recoverable size/rate-limit class.
    ///
    /// # Examples
    ///
    /// ```
    /// use augur_core::AugurError;
    ///
    /// assert!(AugurError::SizeLimit("413".into()).is_size_limit());
    /// assert!(!AugurError::Transport("401".into()).is_size_limit());
    /// assert!(!AugurError::Schema("bad enum".into()).is_size_limit());
    /// ```
    pub fn is_size_limit(&self) -> bool {
        matches!(self, AugurError::SizeLimit(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_converts() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: AugurError = io_err.into();
        assert!(err.to_string().contains("gone"));
    }

    #[test]
    fn config_error_displays_message() {
        let err = AugurError::Config("bad value".into());
        assert_eq!(err.to_string(), "configuration error: bad value");
    }

    #[test]
    fn size_limit_is_the_only_recoverable_class() {
        assert!(AugurError::SizeLimit("too big".into()).is_size_limit());
        assert!(!AugurError::Input("empty".into()).is_size_limit());
        assert!(!AugurError::Schema("not json".into()).is_size_limit());
        assert!(!AugurError::Transport("timeout".into()).is_size_limit());
        assert!(!AugurError::Config("bad".into()).is_size_limit());
    }

    #[test]
    fn input_error_displays_message() {
        let err = AugurError::Input("diff is empty".into());
        assert_eq!(err.to_string(), "input error: diff is empty");
    }
}
