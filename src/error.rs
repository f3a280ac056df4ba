//! Application error type.
//!
//! Every failure in the pipeline is fatal for the run, so a single error type
//! carrying a process exit code and a human-readable message is enough.
//!
//! Exit codes:
//! - `2`: I/O or usage problems (missing log file, unwritable export)
//! - `3`: log content problems (malformed numbers, zero total delta)
//! - `4`: fitting/numeric problems (non-convergence, degenerate input)

/// Exit code for I/O and usage errors.
pub const EXIT_IO: u8 = 2;
/// Exit code for malformed or degenerate log content.
pub const EXIT_DATA: u8 = 3;
/// Exit code for curve-fitting failures.
pub const EXIT_FIT: u8 = 4;

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

    pub fn io(message: impl Into<String>) -> Self {
        Self::new(EXIT_IO, message)
    }

    pub fn data(message: impl Into<String>) -> Self {
        Self::new(EXIT_DATA, message)
    }

    pub fn fit(message: impl Into<String>) -> Self {
        Self::new(EXIT_FIT, message)
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
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
