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

    /// Missing/invalid configuration (API key, CLI input).
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(2, message)
    }

    /// Local store failure (file read/write/parse).
    pub fn store(message: impl Into<String>) -> Self {
        Self::new(2, message)
    }

    /// Upstream FRED failure: unreachable, non-success status, or malformed
    /// payload. Non-fatal inside the sync loop; fatal during backfill.
    pub fn fetch(message: impl Into<String>) -> Self {
        Self::new(4, message)
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
