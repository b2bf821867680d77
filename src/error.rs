//! Error types.
//!
//! - `TransformError` is what the smoothing core returns (typed, matchable).
//! - `AppError` is what the binary reports: a message plus a process exit code.

use thiserror::Error;

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

/// Failures of the smoothing transform.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransformError {
    /// An exclusion-range endpoint could not be placed on the wavelength axis.
    #[error("wavelength {wavelength} is not a sample of the wavelength axis")]
    Lookup { wavelength: f64 },

    /// A continuum segment could not be fitted.
    #[error("cannot fit segment [{start}, {end}) (λ={lambda_start}..{lambda_end}): {reason}")]
    Fit {
        start: usize,
        end: usize,
        lambda_start: f64,
        lambda_end: f64,
        reason: String,
    },

    /// The inputs violate an invariant the transform relies on.
    #[error("invalid input: {0}")]
    Config(String),
}

impl From<TransformError> for AppError {
    fn from(err: TransformError) -> Self {
        let code = match err {
            TransformError::Lookup { .. } | TransformError::Config(_) => 2,
            TransformError::Fit { .. } => 4,
        };
        AppError::new(code, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transform_errors_map_to_exit_codes() {
        let lookup: AppError = TransformError::Lookup { wavelength: 0.5 }.into();
        assert_eq!(lookup.exit_code(), 2);
        assert!(lookup.to_string().contains("0.5"));

        let fit: AppError = TransformError::Fit {
            start: 3,
            end: 5,
            lambda_start: 1.0,
            lambda_end: 2.0,
            reason: "too short".to_string(),
        }
        .into();
        assert_eq!(fit.exit_code(), 4);
        assert!(fit.to_string().contains("[3, 5)"));
    }
}
