//! Break activities suggested when the timer enters a break.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakActivity {
    pub id: String,
    pub name: String,
    /// e.g. "Quick Exercise", "Mindfulness", "Fun Video".
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    /// Suggested length in minutes.
    #[serde(default)]
    pub duration_minutes: Option<u32>,
}

impl BreakActivity {
    /// Create a catalog entry with a fresh id.
    ///
    /// # Errors
    /// Returns an error when `name` is blank.
    pub fn new(
        name: &str,
        category: Option<String>,
        url: Option<String>,
    ) -> Result<Self, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::Empty("name".into()));
        }
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            category: category.filter(|c| !c.trim().is_empty()),
            url: url.filter(|u| !u.trim().is_empty()),
            duration_minutes: None,
        })
    }
}
