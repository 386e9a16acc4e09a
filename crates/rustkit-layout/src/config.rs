//! Layout configuration.

/// Bounds and switches for one layout call.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    /// Cap on freezing passes when resolving flexible lengths.
    pub max_flex_iterations: usize,
    /// Cap on freezing passes when finding the size of an `fr`.
    pub max_track_iterations: usize,
    /// Cap on cursor steps for one auto-placed grid item.
    pub max_auto_placement_steps: usize,
    /// Tolerance for comparing pixel sizes.
    pub epsilon: f32,
    /// Keep enter/leave events in [`LayoutOutput::trace`](crate::LayoutOutput::trace).
    pub record_trace: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            max_flex_iterations: 64,
            max_track_iterations: 64,
            max_auto_placement_steps: 10_000,
            epsilon: 0.01,
            record_trace: false,
        }
    }
}

impl LayoutConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_flex_iterations(mut self, iterations: usize) -> Self {
        self.max_flex_iterations = iterations.max(1);
        self
    }

    pub fn with_max_track_iterations(mut self, iterations: usize) -> Self {
        self.max_track_iterations = iterations.max(1);
        self
    }

    pub fn with_max_auto_placement_steps(mut self, steps: usize) -> Self {
        self.max_auto_placement_steps = steps.max(1);
        self
    }

    pub fn with_epsilon(mut self, epsilon: f32) -> Self {
        if epsilon.is_finite() && epsilon >= 0.0 {
            self.epsilon = epsilon;
        }
        self
    }

    pub fn with_trace(mut self, record: bool) -> Self {
        self.record_trace = record;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_keeps_bounds_positive() {
        let config = LayoutConfig::new()
            .with_max_flex_iterations(0)
            .with_max_auto_placement_steps(0)
            .with_epsilon(f32::NAN)
            .with_trace(true);
        assert_eq!(config.max_flex_iterations, 1);
        assert_eq!(config.max_auto_placement_steps, 1);
        assert_eq!(config.epsilon, 0.01);
        assert!(config.record_trace);
    }
}
