//! Place categories driving visit durations and crowd patterns.
//!
//! Parsing is lenient: plural and mixed-case spellings are accepted and
//! anything unrecognised becomes [`Category::Other`].
//!
//! # Examples
//! ```
//! use tabi_core::Category;
//!
//! assert_eq!("Temples".parse::<Category>(), Ok(Category::Temple));
//! assert_eq!(Category::Museum.to_string(), "museum");
//! ```

use std::convert::Infallible;

use serde::{Deserialize, Serialize};

/// Broad kind of a point of interest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    /// Buddhist temples.
    Temple,
    /// Shinto shrines.
    Shrine,
    /// Museums and galleries.
    Museum,
    /// Formal gardens.
    Garden,
    /// Urban parks.
    Park,
    /// Natural landscapes, hikes and viewpoints.
    Nature,
    /// Restaurants, markets and food streets.
    Food,
    /// Shopping districts and stores.
    Shopping,
    /// Entertainment and nightlife.
    Entertainment,
    /// Streetscapes and city districts.
    Urban,
    /// Towers, castles and other landmarks.
    Landmark,
    /// Anything else.
    #[default]
    Other,
}

impl Category {
    /// Return the category as a lowercase `&str`.
    ///
    /// # Examples
    /// ```
    /// use tabi_core::Category;
    ///
    /// assert_eq!(Category::Garden.as_str(), "garden");
    /// ```
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Temple => "temple",
            Self::Shrine => "shrine",
            Self::Museum => "museum",
            Self::Garden => "garden",
            Self::Park => "park",
            Self::Nature => "nature",
            Self::Food => "food",
            Self::Shopping => "shopping",
            Self::Entertainment => "entertainment",
            Self::Urban => "urban",
            Self::Landmark => "landmark",
            Self::Other => "other",
        }
    }

    /// Typical visit length in minutes when a place gives no explicit duration.
    #[must_use]
    pub const fn default_visit_minutes(&self) -> u32 {
        match self {
            Self::Garden | Self::Shopping => 90,
            Self::Museum | Self::Park | Self::Nature => 120,
            Self::Temple
            | Self::Shrine
            | Self::Food
            | Self::Entertainment
            | Self::Urban
            | Self::Landmark
            | Self::Other => 60,
        }
    }

    /// Whether crowds at this category thin out early in the morning.
    #[must_use]
    pub const fn is_quiet_at_dawn(&self) -> bool {
        matches!(self, Self::Temple | Self::Shrine)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let category = match s.trim().to_lowercase().as_str() {
            "temple" | "temples" => Self::Temple,
            "shrine" | "shrines" => Self::Shrine,
            "museum" | "museums" | "gallery" | "galleries" => Self::Museum,
            "garden" | "gardens" => Self::Garden,
            "park" | "parks" => Self::Park,
            "nature" | "hike" | "hiking" | "viewpoint" => Self::Nature,
            "food" | "restaurant" | "restaurants" | "market" | "markets" => Self::Food,
            "shopping" | "shop" | "shops" => Self::Shopping,
            "entertainment" | "nightlife" => Self::Entertainment,
            "urban" | "city" | "district" => Self::Urban,
            "landmark" | "landmarks" | "attraction" | "attractions" => Self::Landmark,
            _ => Self::Other,
        };
        Ok(category)
    }
}

impl From<String> for Category {
    fn from(value: String) -> Self {
        match value.parse() {
            Ok(category) => category,
            Err(never) => match never {},
        }
    }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        value.as_str().to_owned()
    }
}
