//! Codec configuration.

use crate::types::MAX_ASDU_SIZE;

/// Stream codec configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecConfig {
    /// Largest ASDU accepted when encoding I-frames (at most 249)
    pub max_asdu_size: usize,
    /// Reject frames that fail [`Apci::validate_strict`](crate::types::Apci::validate_strict)
    pub strict: bool,
}

impl CodecConfig {
    /// Create a configuration with the protocol defaults.
    pub fn new() -> Self {
        Self {
            max_asdu_size: MAX_ASDU_SIZE,
            strict: false,
        }
    }

    /// Set the maximum ASDU size. Values above 249 are clamped.
    pub fn max_asdu_size(mut self, size: usize) -> Self {
        self.max_asdu_size = size.min(MAX_ASDU_SIZE);
        self
    }

    /// Enable or disable strict frame validation.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self::new()
    }
}
