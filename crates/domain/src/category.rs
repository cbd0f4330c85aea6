//! Catalog category record.

use chrono::{DateTime, Utc};
use common::CategoryId;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// The fixed set of catalog categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CategoryName {
    Anime,
    Gaming,
    #[serde(rename = "Original Character")]
    OriginalCharacter,
    Diorama,
    Props,
    Mecha,
    Creature,
}

impl CategoryName {
    /// All category names, in seed order.
    pub const ALL: [CategoryName; 7] = [
        CategoryName::Anime,
        CategoryName::Gaming,
        CategoryName::OriginalCharacter,
        CategoryName::Diorama,
        CategoryName::Props,
        CategoryName::Mecha,
        CategoryName::Creature,
    ];

    /// Returns the display/database form.
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryName::Anime => "Anime",
            CategoryName::Gaming => "Gaming",
            CategoryName::OriginalCharacter => "Original Character",
            CategoryName::Diorama => "Diorama",
            CategoryName::Props => "Props",
            CategoryName::Mecha => "Mecha",
            CategoryName::Creature => "Creature",
        }
    }
}

impl std::fmt::Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for CategoryName {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CategoryName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| DomainError::UnknownCategoryName(s.to_string()))
    }
}

/// A catalog category row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: CategoryName,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Category {
    /// Creates a category row.
    pub fn new(id: CategoryId, name: CategoryName, description: Option<String>) -> Self {
        Self {
            id,
            name,
            description,
            created_at: Utc::now(),
        }
    }
}
