use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CombineConfig {
    /// Rows shown in the combined-table preview.
    #[serde(default = "CombineConfig::default_preview_rows")]
    pub preview_rows: usize,
}

impl CombineConfig {
    fn default_preview_rows() -> usize {
        10
    }
}

impl Default for CombineConfig {
    fn default() -> Self {
        Self {
            preview_rows: Self::default_preview_rows(),
        }
    }
}
