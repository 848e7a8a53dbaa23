//! Exit code constants for the estimator CLI.
//!
//! # Exit Code Table
//!
//! | Code | Constant | Description |
//! |------|----------|-------------|
//! | 0 | `SUCCESS` | Estimation completed and artifacts written |
//! | 1 | `INTERNAL` | General/internal failure |
//! | 2 | `CLI_ARGS` | Invalid CLI arguments or configuration |
//! | 3 | `DOCUMENT_ERROR` | Input document missing, unsupported or empty |
//! | 65 | `RECOVERY_FAILURE` | Model output could not be recovered |
//! | 70 | `MODEL_FAILURE` | Model request failed or returned nothing usable |
//! | 74 | `REPORT_FAILURE` | Output artifacts could not be written |

/// Process exit status.
///
/// Use the named constants, or [`as_i32()`](Self::as_i32) for
/// `std::process::exit()`.
///
/// ```rust
/// use estimator_utils::exit_codes::ExitCode;
///
/// assert_eq!(ExitCode::SUCCESS.as_i32(), 0);
/// assert_eq!(ExitCode::RECOVERY_FAILURE, ExitCode::from_i32(65));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(i32);

impl ExitCode {
    /// Success
    pub const SUCCESS: ExitCode = ExitCode(0);

    /// Internal error - general failure
    pub const INTERNAL: ExitCode = ExitCode(1);

    /// CLI arguments or configuration error
    pub const CLI_ARGS: ExitCode = ExitCode(2);

    /// Input document could not be read
    pub const DOCUMENT_ERROR: ExitCode = ExitCode(3);

    /// Model output was not recoverable into an estimation (sysexits `EX_DATAERR`)
    pub const RECOVERY_FAILURE: ExitCode = ExitCode(65);

    /// Model invocation failed (sysexits `EX_SOFTWARE`)
    pub const MODEL_FAILURE: ExitCode = ExitCode(70);

    /// Output artifact write failed (sysexits `EX_IOERR`)
    pub const REPORT_FAILURE: ExitCode = ExitCode(74);

    /// Get the numeric exit code value.
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        self.0
    }

    /// Create an ExitCode from a raw i32 value.
    ///
    /// Prefer using the named constants when possible.
    #[must_use]
    pub const fn from_i32(code: i32) -> Self {
        ExitCode(code)
    }
}

impl From<i32> for ExitCode {
    fn from(code: i32) -> Self {
        ExitCode(code)
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ConfigError, EstimatorError, ReportError};

    #[test]
    fn test_exit_code_values() {
        assert_eq!(ExitCode::SUCCESS.as_i32(), 0);
        assert_eq!(ExitCode::INTERNAL.as_i32(), 1);
        assert_eq!(ExitCode::CLI_ARGS.as_i32(), 2);
        assert_eq!(ExitCode::DOCUMENT_ERROR.as_i32(), 3);
        assert_eq!(ExitCode::RECOVERY_FAILURE.as_i32(), 65);
        assert_eq!(ExitCode::MODEL_FAILURE.as_i32(), 70);
        assert_eq!(ExitCode::REPORT_FAILURE.as_i32(), 74);
    }

    #[test]
    fn test_conversions() {
        let code: ExitCode = 74.into();
        assert_eq!(code, ExitCode::REPORT_FAILURE);
        let raw: i32 = ExitCode::DOCUMENT_ERROR.into();
        assert_eq!(raw, 3);
    }

    #[test]
    fn test_error_mapping() {
        let err = EstimatorError::Config(ConfigError::InvalidFile("bad toml".to_string()));
        assert_eq!(err.to_exit_code(), ExitCode::CLI_ARGS);

        let err = EstimatorError::Report(ReportError::ArtifactWriteFailed {
            artifact: "JSON report".to_string(),
            path: "out.json".to_string(),
            reason: "permission denied".to_string(),
        });
        assert_eq!(err.to_exit_code(), ExitCode::REPORT_FAILURE);
    }
}
