//! Layer configuration
//!
//! Configuration is resolved once by the embedding environment, either built directly
//! or loaded from environment variables.

use std::env;

/// Annotation layer configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayerConfig {
    /// Whole layer is read-only: selections never swap in an editable shape
    pub read_only: bool,
    /// Headless mode: no interactive editing surface, selections behave as read-only
    pub headless: bool,
    /// Pointer positions come from a touch device and must be derived from client
    /// coordinates instead of element offsets
    pub touch_input: bool,
}

impl LayerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = env::var("ANNOTATION_READ_ONLY") {
            config.read_only = parse_flag(&val);
        }
        if let Ok(val) = env::var("ANNOTATION_HEADLESS") {
            config.headless = parse_flag(&val);
        }
        if let Ok(val) = env::var("ANNOTATION_TOUCH_INPUT") {
            config.touch_input = parse_flag(&val);
        }

        config
    }

    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    pub fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    pub fn touch_input(mut self, touch_input: bool) -> Self {
        self.touch_input = touch_input;
        self
    }
}

fn parse_flag(val: &str) -> bool {
    val.to_lowercase() == "true" || val == "1"
}
