//! Employee records
//!
//! The person entity mirrored from the registry, plus the color format
//! check shared by the snapshot codec and the cache's write path.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::defaults;
use crate::error::ValidationError;

/// Pattern every stored color must match
const COLOR_PATTERN: &str = r"^#[0-9A-Fa-f]{6}$";

fn color_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(COLOR_PATTERN).expect("Invalid color pattern"))
}

/// Check whether a color string is of the form `#RRGGBB`
pub fn is_valid_color(color: &str) -> bool {
    color_regex().is_match(color)
}

/// Validate a color, returning it unchanged on success
pub fn validate_color(color: &str) -> Result<&str, ValidationError> {
    if is_valid_color(color) {
        Ok(color)
    } else {
        Err(ValidationError::InvalidColor {
            color: color.to_string(),
        })
    }
}

/// A person record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Registry-assigned identity; `<= 0` means the record only exists locally
    pub id: i64,

    /// Display name, used as the cache key
    pub name: String,

    /// Hex color `#RRGGBB`
    pub color: String,

    /// Optional role
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl Employee {
    /// Create a record with a registry id
    pub fn new(id: i64, name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            color: color.into(),
            role: None,
        }
    }

    /// Set the role
    #[must_use]
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Whether the record carries a registry-assigned id
    pub fn is_synced(&self) -> bool {
        self.id > 0
    }

    /// Role, falling back to the default role
    pub fn role_or_default(&self) -> &str {
        self.role.as_deref().unwrap_or(defaults::DEFAULT_ROLE)
    }

    /// Check the invariants a stored record must satisfy
    pub fn validate(&self) -> Result<(), String> {
        if self.name.is_empty() {
            return Err("name is empty".to_string());
        }
        if !is_valid_color(&self.color) {
            return Err(format!("color '{}' is not #RRGGBB", self.color));
        }
        Ok(())
    }

    /// Fields sent to the registry for this record
    pub fn fields(&self) -> EmployeeFields {
        EmployeeFields {
            name: self.name.clone(),
            color: Some(self.color.clone()),
            role: self.role.clone(),
        }
    }
}

/// Request body for create and update calls
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmployeeFields {
    /// Employee name
    pub name: String,

    /// Hex color
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    /// Role
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}
