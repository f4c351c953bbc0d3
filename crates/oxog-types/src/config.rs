use oxog_value::EncodeOptions;

/// Limits applied when rendering error payloads into unwrap messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderConfig {
    /// Nesting depth beyond which structural rendering gives up and falls back to
    /// plain string coercion.
    pub max_depth: usize,
    /// Maximum rendered length in characters; longer output is cut and ends in `...`.
    pub max_len: Option<usize>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_depth: EncodeOptions::DEFAULT_MAX_DEPTH,
            max_len: None,
        }
    }
}

impl RenderConfig {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = Some(max_len);
        self
    }
}
