//! Custom field definitions installed from setup JSON files.

use serde::{Deserialize, Serialize};

/// One custom field, keyed by (table_name, field_name). Definition files under
/// the configured customfields directory each hold an array of these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomFieldDef {
    pub table_name: String,
    pub field_name: String,
    pub label: String,
    pub field_type: String,
    #[serde(default)]
    pub options: Option<String>,
    #[serde(default)]
    pub default_value: Option<String>,
    #[serde(default)]
    pub insert_after: Option<String>,
}
