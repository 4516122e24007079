//! Desk workspace record upserted by the installer.

use serde::{Deserialize, Serialize};

/// A UI workspace entry. The desk frontend renders these; this service only
/// maintains its own fixed record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceDef {
    pub name: String,
    pub label: String,
    pub module: String,
    pub icon: String,
    pub public: bool,
    pub hidden: bool,
    /// Roles allowed to see the workspace. Empty means visible to everyone.
    pub roles: Vec<String>,
}
