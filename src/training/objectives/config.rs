//! Training configuration consulted at objective construction.

use bon::Builder;
use serde::{Deserialize, Serialize};

/// The part of the training setup objectives validate against.
///
/// Objectives read this once in their constructor and keep no reference to it.
///
/// # Example
///
/// ```
/// use boosters_objectives::training::ObjectiveConfig;
///
/// let config = ObjectiveConfig::builder().build();
/// assert_eq!(config.n_outputs, 1);
/// assert!(!config.differential_privacy);
///
/// let private = ObjectiveConfig::builder().differential_privacy(true).build();
/// assert!(private.differential_privacy);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Builder, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectiveConfig {
    /// Number of model outputs (score columns) per sample.
    #[builder(default = 1)]
    pub n_outputs: usize,

    /// Whether training runs under a differential-privacy budget.
    #[builder(default)]
    pub differential_privacy: bool,
}

impl Default for ObjectiveConfig {
    fn default() -> Self {
        Self {
            n_outputs: 1,
            differential_privacy: false,
        }
    }
}
