/// Validation errors for inbound media
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("File too large: {size} bytes (max: {max} bytes)")]
    FileTooLarge { size: u64, max: u64 },
}

/// Size ceiling applied to inbound blobs before anything is downloaded.
///
/// The size reported by the transport is trusted as-is. A blob whose size is
/// unknown arrives here as `0` and passes.
#[derive(Debug, Clone, Copy)]
pub struct MediaValidator {
    max_file_size: u64,
}

impl MediaValidator {
    pub fn new(max_file_size: u64) -> Self {
        Self { max_file_size }
    }

    /// Validate file size; exactly at the ceiling is accepted.
    pub fn validate_file_size(&self, size: u64) -> Result<(), ValidationError> {
        if size > self.max_file_size {
            return Err(ValidationError::FileTooLarge {
                size,
                max: self.max_file_size,
            });
        }

        Ok(())
    }
}
