use serde::{Deserialize, Serialize};

/// A to-do item. `created_at` is assigned once at creation, never
/// regenerated, and doubles as the task's identity in the store key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    pub created_at: String,
}

/// Derived candidate for quick task re-entry. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub text: String,
    pub completed: bool,
}
