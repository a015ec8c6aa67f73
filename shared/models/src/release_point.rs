//! Release points: stacks and fugitive areas emissions leave through.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Release point type code for fugitive areas.
pub const FUGITIVE_RELEASE_POINT_TYPE: &str = "1";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReleasePoint {
    pub id: Uuid,
    pub identifier: String,
    pub type_code: Option<String>,
    pub status_code: Option<String>,
    pub status_year: Option<i16>,
    pub previous_year_status_code: Option<String>,
    pub exit_gas_temperature: Option<i16>,
    pub stack_height: Option<Decimal>,
    pub stack_diameter: Option<Decimal>,
    pub stack_width: Option<Decimal>,
    pub stack_length: Option<Decimal>,
    pub fugitive_height: Option<i32>,
    pub fugitive_length: Option<i32>,
    pub fugitive_width: Option<i32>,
    pub fugitive_angle: Option<i32>,
}

impl Default for ReleasePoint {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4(),
            identifier: String::new(),
            type_code: None,
            status_code: Some(crate::status::STATUS_OPERATING.to_string()),
            status_year: None,
            previous_year_status_code: None,
            exit_gas_temperature: None,
            stack_height: None,
            stack_diameter: None,
            stack_width: None,
            stack_length: None,
            fugitive_height: None,
            fugitive_length: None,
            fugitive_width: None,
            fugitive_angle: None,
        }
    }
}

impl ReleasePoint {
    pub fn fugitive(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            type_code: Some(FUGITIVE_RELEASE_POINT_TYPE.to_string()),
            ..Self::default()
        }
    }

    pub fn is_fugitive(&self) -> bool {
        self.type_code.as_deref() == Some(FUGITIVE_RELEASE_POINT_TYPE)
    }

    pub fn status(&self) -> Option<&str> {
        self.status_code.as_deref()
    }
}
