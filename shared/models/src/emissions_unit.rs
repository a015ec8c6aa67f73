//! Emissions units and the processes that run on them.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::process::EmissionsProcess;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmissionsUnit {
    pub id: Uuid,
    pub identifier: String,
    pub description: Option<String>,
    pub status_code: Option<String>,
    pub status_year: Option<i16>,
    /// Status the unit had in the previous reporting year, None when the unit is new.
    pub previous_year_status_code: Option<String>,
    #[serde(default)]
    pub processes: Vec<EmissionsProcess>,
}

impl Default for EmissionsUnit {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4(),
            identifier: String::new(),
            description: None,
            status_code: Some(crate::status::STATUS_OPERATING.to_string()),
            status_year: None,
            previous_year_status_code: None,
            processes: Vec::new(),
        }
    }
}

impl EmissionsUnit {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            ..Self::default()
        }
    }

    pub fn status(&self) -> Option<&str> {
        self.status_code.as_deref()
    }
}
