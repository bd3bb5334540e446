use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProxyError {
    #[error(transparent)]
    Network(#[from] reqwest::Error),

    #[error("{message}")]
    Decode { message: String, snippet: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

impl ProxyError {
    /// 錯誤訊息連同底層原因，例如 `...: tcp connect error: Connection refused`
    pub fn describe(self) -> String {
        format!("{:#}", anyhow::Error::from(self))
    }

    /// 給終端使用者看的錯誤訊息
    pub fn user_friendly_message(&self) -> String {
        match self {
            ProxyError::Network(e) if e.is_timeout() => {
                "Upstream API did not answer in time".to_string()
            }
            ProxyError::Network(e) if e.is_connect() => {
                "Could not connect to the upstream API".to_string()
            }
            ProxyError::Network(_) | ProxyError::Decode { .. } => {
                "Upstream API request failed".to_string()
            }
            ProxyError::Io(e) => format!("File or socket error: {}", e),
            ProxyError::ConfigValidationError { field, .. }
            | ProxyError::InvalidConfigValueError { field, .. } => {
                format!("Configuration problem with '{}'", field)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ProxyError::Network(_) | ProxyError::Decode { .. } => {
                "Check network access and the upstream endpoint URLs"
            }
            ProxyError::Io(_) => "Check that the file exists and the bind address is free",
            ProxyError::ConfigValidationError { .. }
            | ProxyError::InvalidConfigValueError { .. } => {
                "Fix the configuration file or command-line flags and restart"
            }
        }
    }

    /// 設定錯誤與執行期錯誤使用不同的退出碼
    pub fn exit_code(&self) -> i32 {
        match self {
            ProxyError::ConfigValidationError { .. }
            | ProxyError::InvalidConfigValueError { .. } => 2,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, ProxyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_errors_exit_with_code_two() {
        let err = ProxyError::ConfigValidationError {
            field: "jobs.endpoint".to_string(),
            message: "missing".to_string(),
        };
        assert_eq!(err.exit_code(), 2);
        assert!(err.user_friendly_message().contains("jobs.endpoint"));
    }

    #[test]
    fn test_describe_includes_source_chain() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "Connection refused");
        let err = ProxyError::Io(io);
        assert_eq!(err.describe(), "IO error: Connection refused: Connection refused");

        let err = ProxyError::Decode {
            message: "not json".to_string(),
            snippet: String::new(),
        };
        assert_eq!(err.describe(), "not json");
    }

    #[test]
    fn test_decode_error_displays_message_only() {
        let err = ProxyError::Decode {
            message: "not json".to_string(),
            snippet: "<html>".to_string(),
        };
        assert_eq!(err.to_string(), "not json");
        assert_eq!(err.exit_code(), 1);
        assert_eq!(err.user_friendly_message(), "Upstream API request failed");
        assert_eq!(
            err.recovery_suggestion(),
            "Check network access and the upstream endpoint URLs"
        );
    }
}
