//! The date option catalog
//!
//! Loaded once at startup, either the built-in list or a JSON file, and never
//! mutated afterwards.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PassError, Result};

/// One date idea template with its allowed locations, food and activities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateOption {
    pub id: String,
    pub title: String,
    pub image: String,
    pub locations: Vec<String>,
    #[serde(default)]
    pub food_options: Vec<String>,
    #[serde(default)]
    pub activities: Vec<String>,
    #[serde(default)]
    pub has_own_food: bool,
    #[serde(default)]
    pub custom_input: bool,
}

impl DateOption {
    fn new(id: &str, title: &str, image: &str, locations: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            image: image.to_string(),
            locations: locations.iter().map(|l| l.to_string()).collect(),
            food_options: Vec::new(),
            activities: Vec::new(),
            has_own_food: false,
            custom_input: false,
        }
    }

    fn with_food(mut self, food: &[&str]) -> Self {
        self.food_options = food.iter().map(|f| f.to_string()).collect();
        self
    }

    fn with_activities(mut self, activities: &[&str]) -> Self {
        self.activities = activities.iter().map(|a| a.to_string()).collect();
        self
    }

    fn own_food(mut self) -> Self {
        self.has_own_food = true;
        self
    }

    fn custom(mut self) -> Self {
        self.custom_input = true;
        self
    }

    /// Fake flight code shown on the card, e.g. `VAL-PIC`.
    pub fn flight_code(&self) -> String {
        let prefix: String = self.id.chars().take(3).collect();
        format!("VAL-{}", prefix.to_uppercase())
    }

    pub fn default_location(&self) -> &str {
        self.locations.first().map(String::as_str).unwrap_or("")
    }
}

/// Ordered, immutable list of date options.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    options: Vec<DateOption>,
}

impl Catalog {
    /// The catalog shipped with the app.
    pub fn builtin() -> Self {
        let options = vec![
            DateOption::new(
                "picnic",
                "Picnic Date",
                "/assets/picnic_date.png",
                &["Quezon City Circle", "UP Town", "Valenzuela Park", "Philippine Arena"],
            )
            .own_food(),
            DateOption::new("mall", "Mall Date", "/assets/mall_date.png", &["MOA", "SM North"])
                .with_activities(&["Arcade", "Bowling"])
                .with_food(&["Food Court", "Restaurant", "Cafe"]),
            DateOption::new(
                "coffee",
                "Coffee Date Ride",
                "/assets/coffee_ride.png",
                &["Antipolo", "Angono", "Tanay", "Other Rizal Area"],
            )
            .with_food(&["Coffee & Pastries", "Brunch", "Light Snacks"]),
            DateOption::new(
                "staycation",
                "Staycation Day Tour",
                "/assets/staycation.png",
                &["TBD - Your Choice!"],
            )
            .with_food(&["We cook together", "Order delivery", "Meal prep"]),
            DateOption::new("manila", "Manila Date", "/assets/manila_date.png", &["Museum", "Intramuros"])
                .with_food(&["Binondo Food Trip", "Local Restaurant", "Street Food"]),
            DateOption::new(
                "foodtrip",
                "Samgyupsal / Unli Wings",
                "/assets/food_trip.png",
                &["Maginhawa", "Tomas Morato", "Kapitolyo"],
            )
            .with_food(&["Samgyupsal", "Unli Wings"]),
            DateOption::new("custom", "Your Suggestion", "/assets/custom_date.png", &["Custom Location"])
                .custom(),
        ];

        Self { options }
    }

    /// Builds a catalog from options, rejecting anything the selector can't work with.
    pub fn from_options(options: Vec<DateOption>) -> Result<Self> {
        if options.is_empty() {
            return Err(PassError::Catalog("catalog has no options".to_string()));
        }

        let mut seen = HashSet::new();
        let mut titles = HashSet::new();
        for option in &options {
            if option.id.trim().is_empty() {
                return Err(PassError::Catalog("option with empty id".to_string()));
            }
            if !seen.insert(option.id.as_str()) {
                return Err(PassError::Catalog(format!("duplicate option id '{}'", option.id)));
            }
            if option.title.trim().is_empty() {
                return Err(PassError::Catalog(format!("option '{}' has no title", option.id)));
            }
            // Tickets look options up by title.
            if !titles.insert(option.title.as_str()) {
                return Err(PassError::Catalog(format!("duplicate option title '{}'", option.title)));
            }
            if option.locations.is_empty() {
                return Err(PassError::Catalog(format!("option '{}' has no locations", option.id)));
            }
        }

        Ok(Self { options })
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let options: Vec<DateOption> = serde_json::from_str(json)?;
        Self::from_options(options)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn options(&self) -> &[DateOption] {
        &self.options
    }

    pub fn get(&self, id: &str) -> Option<&DateOption> {
        self.options.iter().find(|option| option.id == id)
    }

    pub fn find_by_title(&self, title: &str) -> Option<&DateOption> {
        self.options.iter().find(|option| option.title == title)
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }
}
