/// Default cap on inflated payload size (512 MiB)
pub const DEFAULT_MAX_INFLATED_BYTES: usize = 512 * 1024 * 1024;

/// Options for decoding XAD files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Upper bound on raw-DEFLATE output; `None` disables the check
    pub max_inflated_bytes: Option<usize>,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_inflated_bytes: Some(DEFAULT_MAX_INFLATED_BYTES),
        }
    }
}

impl DecodeOptions {
    /// Set the inflate cap
    pub fn with_max_inflated_bytes(mut self, limit: Option<usize>) -> Self {
        self.max_inflated_bytes = limit;
        self
    }
}
