//! Explicit model-rotation state, advanced by the caller on rate limits.

use offerbase_core::config::DEFAULT_ENRICH_MODELS;

/// Which model in a fixed list to use next.
///
/// Owned and threaded by the caller across calls; rotation survives from one
/// record to the next so a batch does not hammer a model that just
/// rate-limited.
#[derive(Debug, Clone)]
pub struct ModelRotation {
    models: Vec<String>,
    current: usize,
}

impl ModelRotation {
    /// Builds a rotation over `models`, falling back to the default list
    /// when the slice is empty.
    #[must_use]
    pub fn new(models: &[String]) -> Self {
        let models = if models.is_empty() {
            DEFAULT_ENRICH_MODELS
                .iter()
                .map(|s| (*s).to_string())
                .collect()
        } else {
            models.to_vec()
        };
        Self { models, current: 0 }
    }

    /// The model the next request should use.
    #[must_use]
    pub fn current(&self) -> &str {
        // The constructor guarantees a non-empty list.
        self.models
            .get(self.current)
            .map_or(DEFAULT_ENRICH_MODELS[0], String::as_str)
    }

    /// Advances to the next model, wrapping around, and returns it.
    pub fn advance(&mut self) -> &str {
        self.current = (self.current + 1) % self.models.len();
        self.current()
    }

    /// Number of models in the rotation; one full cycle of rate limits
    /// means every model was tried once.
    #[must_use]
    pub fn len(&self) -> usize {
        self.models.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

impl Default for ModelRotation {
    fn default() -> Self {
        Self::new(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rotation_uses_fixed_list() {
        let rotation = ModelRotation::default();
        assert_eq!(rotation.len(), DEFAULT_ENRICH_MODELS.len());
        assert_eq!(rotation.current(), DEFAULT_ENRICH_MODELS[0]);
    }

    #[test]
    fn advance_walks_the_list_and_wraps() {
        let models = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let mut rotation = ModelRotation::new(&models);

        assert_eq!(rotation.current(), "a");
        assert_eq!(rotation.advance(), "b");
        assert_eq!(rotation.advance(), "c");
        assert_eq!(rotation.advance(), "a");
    }

    #[test]
    fn empty_input_falls_back_to_defaults() {
        let rotation = ModelRotation::new(&[]);
        assert!(!rotation.is_empty());
        assert_eq!(rotation.len(), DEFAULT_ENRICH_MODELS.len());
    }

    #[test]
    fn rotation_state_is_independent_per_value() {
        let mut a = ModelRotation::default();
        let b = ModelRotation::default();
        a.advance();
        assert_ne!(a.current(), b.current());
    }
}
