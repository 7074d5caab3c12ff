use serde::{Deserialize, Serialize};

/// Configuration for the task_manager module (`modules.task_manager`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TaskManagerConfig {
    /// Deleting a project also deletes its tasks; deleting a user also deletes
    /// its projects.
    #[serde(default = "default_true")]
    pub cascade_deletes: bool,
    /// Delete a freshly inserted child when linking it to its parent fails.
    #[serde(default = "default_true")]
    pub compensate_orphans: bool,
}

impl Default for TaskManagerConfig {
    fn default() -> Self {
        Self {
            cascade_deletes: default_true(),
            compensate_orphans: default_true(),
        }
    }
}

fn default_true() -> bool {
    true
}
