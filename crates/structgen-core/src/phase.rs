//! Generation run state machine

use serde::{Deserialize, Serialize};

/// Phases of one generation run
///
/// State transitions:
/// ```text
/// Start → ValidateInput → EmitPrimary → EmitReferences → Link → Render → Done
///              │                                                  │
///              └──────────────→ Failed ←──────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationPhase {
    /// Generator is configured but has not run
    #[default]
    Start,
    /// Checking that every dataset is a non-empty sequence of records
    ValidateInput,
    /// Naming the primary dataset's records and identifier constants
    EmitPrimary,
    /// Naming every reference dataset's records and identifier constants
    EmitReferences,
    /// Emitting record items with relationship fields resolved against the complete
    /// naming table
    Link,
    /// Parsing and pretty-printing the assembled tokens
    Render,
    /// Output is ready
    Done,
    /// The run was aborted
    Failed,
}

impl GenerationPhase {
    /// Check if this phase can transition to the target phase
    pub fn can_transition_to(&self, target: GenerationPhase) -> bool {
        use GenerationPhase::*;
        matches!(
            (self, target),
            (Start, ValidateInput)
                | (ValidateInput, EmitPrimary)
                | (EmitPrimary, EmitReferences)
                | (EmitReferences, Link)
                | (Link, Render)
                | (Render, Done)
                | (ValidateInput, Failed)
                | (Render, Failed)
        )
    }

    /// Check if the run has finished, successfully or not
    pub fn is_terminal(&self) -> bool {
        matches!(self, GenerationPhase::Done | GenerationPhase::Failed)
    }

    /// Get a human-readable description of this phase
    pub fn description(&self) -> &'static str {
        match self {
            GenerationPhase::Start => "Generator has not run",
            GenerationPhase::ValidateInput => "Validating datasets",
            GenerationPhase::EmitPrimary => "Naming the primary dataset",
            GenerationPhase::EmitReferences => "Naming reference datasets",
            GenerationPhase::Link => "Resolving relationships",
            GenerationPhase::Render => "Rendering source",
            GenerationPhase::Done => "Generation complete",
            GenerationPhase::Failed => "Generation failed",
        }
    }
}

impl std::fmt::Display for GenerationPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerationPhase::Start => write!(f, "Start"),
            GenerationPhase::ValidateInput => write!(f, "ValidateInput"),
            GenerationPhase::EmitPrimary => write!(f, "EmitPrimary"),
            GenerationPhase::EmitReferences => write!(f, "EmitReferences"),
            GenerationPhase::Link => write!(f, "Link"),
            GenerationPhase::Render => write!(f, "Render"),
            GenerationPhase::Done => write!(f, "Done"),
            GenerationPhase::Failed => write!(f, "Failed"),
        }
    }
}
