//! Run configuration
//!
//! [`SceneConfig`] gathers evaluation and hydration settings in one
//! serializable record so a host can load them from JSON.

use serde::{Deserialize, Serialize};

use crate::context::{EvalContext, LabelPolicy};
use crate::error::Result;
use crate::hydrate::HydrateOptions;

/// Evaluation settings, the serializable subset of [`EvalContext`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalSettings {
    /// Maximum closure call depth
    pub max_call_depth: usize,

    /// Trace every evaluated node
    pub trace: bool,

    /// Duplicate label handling
    pub label_policy: LabelPolicy,
}

impl Default for EvalSettings {
    fn default() -> Self {
        let ctx = EvalContext::default();
        Self {
            max_call_depth: ctx.max_call_depth,
            trace: ctx.trace,
            label_policy: ctx.label_policy,
        }
    }
}

/// Complete configuration for a source-to-world run.
///
/// # Example
///
/// ```
/// use physcene::config::SceneConfig;
/// use physcene::hydrate::EndpointPolicy;
///
/// let config = SceneConfig::from_json_str(
///     r#"{ "eval": { "max_call_depth": 64 }, "hydrate": { "endpoint_policy": "strict" } }"#,
/// )
/// .unwrap();
/// assert_eq!(config.eval.max_call_depth, 64);
/// assert_eq!(config.hydrate.endpoint_policy, EndpointPolicy::Strict);
/// assert_eq!(config.hydrate.restitution, 0.9);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Evaluator settings
    pub eval: EvalSettings,

    /// Hydrator settings
    pub hydrate: HydrateOptions,
}

impl SceneConfig {
    /// Parse a configuration from JSON; missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns `SceneError::Config` for malformed JSON or mistyped fields.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns `SceneError::Config` if serialization fails.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Build an evaluation context from these settings.
    pub fn context(&self) -> EvalContext {
        EvalContext::with_max_call_depth(self.eval.max_call_depth)
            .with_trace(self.eval.trace)
            .with_label_policy(self.eval.label_policy)
    }
}
