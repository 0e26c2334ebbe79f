//! Evaluation context configuration

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::value::EntityId;

/// How to treat two entities that carry the same explicit label in one scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelPolicy {
    /// Fail the run with `DuplicateLabel`
    #[default]
    Reject,

    /// Accept duplicates; the hydrator keeps the first body for a label
    Allow,
}

/// Configuration and state for evaluation.
///
/// This is passed through all evaluation calls and controls
/// behavior like recursion limits, interruption, and id minting.
#[derive(Debug, Clone)]
pub struct EvalContext {
    /// Maximum closure call depth (stack overflow protection)
    pub max_call_depth: usize,

    /// Interrupt flag - set to true to abort evaluation
    pub interrupt: Arc<AtomicBool>,

    /// Whether to trace evaluation (for debugging)
    pub trace: bool,

    /// Duplicate label handling
    pub label_policy: LabelPolicy,

    next_id: Arc<AtomicU64>,
}

impl Default for EvalContext {
    fn default() -> Self {
        Self {
            max_call_depth: 256,
            interrupt: Arc::new(AtomicBool::new(false)),
            trace: false,
            label_policy: LabelPolicy::default(),
            // 0 is reserved for the program root
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }
}

impl EvalContext {
    /// Create a new context with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context with a custom call depth limit.
    pub fn with_max_call_depth(max_depth: usize) -> Self {
        Self {
            max_call_depth: max_depth,
            ..Default::default()
        }
    }

    /// Set the duplicate label policy (builder pattern).
    pub fn with_label_policy(mut self, policy: LabelPolicy) -> Self {
        self.label_policy = policy;
        self
    }

    /// Enable per-node tracing (builder pattern).
    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    /// Same settings and interrupt flag, with a fresh id counter.
    ///
    /// Ids are unique per run, so long-lived owners call this before each
    /// evaluation.
    pub fn next_run(&self) -> Self {
        Self {
            next_id: Arc::new(AtomicU64::new(1)),
            ..self.clone()
        }
    }

    /// Mint a fresh entity identifier.
    pub fn mint_id(&self) -> EntityId {
        EntityId(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Check if evaluation has been interrupted.
    pub fn is_interrupted(&self) -> bool {
        self.interrupt.load(Ordering::Relaxed)
    }

    /// Request interruption of evaluation.
    pub fn interrupt(&self) {
        self.interrupt.store(true, Ordering::Relaxed);
    }

    /// Reset the interrupt flag.
    pub fn reset_interrupt(&self) {
        self.interrupt.store(false, Ordering::Relaxed);
    }
}
