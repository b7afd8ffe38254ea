use exif::Error as ExifError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("EXIF error: {0}")]
    Exif(#[from] ExifError),

    #[error("Worker pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("Invalid hemisphere reference: {0:?}")]
    InvalidReference(char),

    #[error("Malformed timestamp: {0:?}")]
    MalformedTimestamp(String),

    #[error("Unreadable image {path}: {reason}")]
    UnreadableImage { path: String, reason: String },

    #[error("Geocode resolver unavailable: {0}")]
    ResolverUnavailable(String),

    #[error("Cannot open manifest {path}: {source}")]
    InvalidManifest {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl AppError {
    /// Wraps any per-file failure as the one error kind that skips an entry.
    pub fn unreadable(path: &str, cause: impl std::fmt::Display) -> Self {
        AppError::UnreadableImage {
            path: path.to_string(),
            reason: cause.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_build_failure_has_its_own_variant() {
        // The second global init always fails, whoever did the first.
        let _ = rayon::ThreadPoolBuilder::new().build_global();
        let err: AppError = rayon::ThreadPoolBuilder::new().build_global().unwrap_err().into();
        assert!(matches!(err, AppError::ThreadPool(_)));
        assert!(err.to_string().starts_with("Worker pool error"));
    }

    #[test]
    fn unreadable_keeps_path_and_cause() {
        match AppError::unreadable("a/b.jpg", "no EXIF") {
            AppError::UnreadableImage { path, reason } => {
                assert_eq!(path, "a/b.jpg");
                assert_eq!(reason, "no EXIF");
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
