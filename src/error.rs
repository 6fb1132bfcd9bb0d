/// The library's error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    Config(String),

    #[error("Failed to read env file: {0}")]
    EnvFile(#[from] dotenvy::Error),

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Upstream returned status {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    #[error("Invalid JSON response: {source}\nBody: {body}")]
    Decode {
        #[source]
        source: serde_json::Error,
        body: String,
    },

    #[error("{0}")]
    Io(#[from] std::io::Error),
}

/// Coarse classification of an [`Error`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Config,
    Transport,
    UpstreamStatus,
    Decode,
    Io,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Config(_) | Error::EnvFile(_) => ErrorKind::Config,
            Error::Transport(_) => ErrorKind::Transport,
            Error::UpstreamStatus { .. } => ErrorKind::UpstreamStatus,
            Error::Decode { .. } => ErrorKind::Decode,
            Error::Io(_) => ErrorKind::Io,
        }
    }

    /// Process exit code reported by the `ip-check` binary.
    pub fn exit_code(&self) -> u8 {
        match self.kind() {
            ErrorKind::Io => 1,
            ErrorKind::Config => 2,
            ErrorKind::Transport => 3,
            ErrorKind::UpstreamStatus => 4,
            ErrorKind::Decode => 5,
        }
    }
}

// Bare messages only ever describe bad configuration.
impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Config(s.to_string())
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Config(s)
    }
}

/// The library's `Result` type alias.
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_and_exit_code() {
        let err = Error::from("missing credentials");
        assert_eq!(err.kind(), ErrorKind::Config);
        assert_eq!(err.exit_code(), 2);

        let err = Error::UpstreamStatus {
            status: 403,
            body: "denied".into(),
        };
        assert_eq!(err.kind(), ErrorKind::UpstreamStatus);
        assert_eq!(err.exit_code(), 4);
        assert_eq!(err.to_string(), "Upstream returned status 403: denied");
    }

    #[test]
    fn decode_error_keeps_body() {
        let source = serde_json::from_str::<serde_json::Value>("<html>").unwrap_err();
        let err = Error::Decode {
            source,
            body: "<html>".into(),
        };
        assert_eq!(err.kind(), ErrorKind::Decode);
        assert!(err.to_string().ends_with("Body: <html>"));
    }
}
