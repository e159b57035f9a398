// Error types for backend operations

/// Errors surfaced by the backend capability traits.
///
/// The library adds no failure modes of its own beyond what the backend
/// reports; the one recognized recoverable condition is [`Error::ClassExists`],
/// which the schema reconciler redirects into its update path. Everything
/// else propagates unchanged to the caller.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("class already exists: {class}")]
    ClassExists { class: String },

    #[error("backend error {code}: {message}")]
    Api { code: i32, message: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// True when this is the distinguished "class already exists" signal.
    pub fn is_class_exists(&self) -> bool {
        matches!(self, Error::ClassExists { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_exists_is_distinguished() {
        let conflict = Error::ClassExists {
            class: "Song".to_string(),
        };
        assert!(conflict.is_class_exists());

        let api = Error::Api {
            code: 141,
            message: "script failed".to_string(),
        };
        assert!(!api.is_class_exists());
    }

    #[test]
    fn display_includes_class_name() {
        let err = Error::ClassExists {
            class: "Album".to_string(),
        };
        assert_eq!(err.to_string(), "class already exists: Album");
    }
}
