//! The accumulated date selection and the patches merged into it

use serde::{Deserialize, Serialize};

use crate::card::CardSelection;
use crate::image_ref::ImageRef;

/// The one order carried from the selection phase onward.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateSelection {
    pub category: String,
    pub location: String,
    pub food_option: Option<String>,
    pub activities: Vec<String>,
    pub bring_own_food: Option<bool>,
    pub comments: String,
    pub custom_image: Option<ImageRef>,
    pub passport_image: Option<ImageRef>,
    pub date: Option<String>,
    pub plan: Option<String>,
}

/// Partial update for a `DateSelection`.
///
/// `None` leaves the field alone. For fields that are optional in the
/// selection, `Some(None)` clears them. Category and location are always
/// present and non-empty, so a finalized selection never has one without the
/// other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionPatch {
    category: String,
    location: String,
    pub food_option: Option<Option<String>>,
    pub activities: Option<Vec<String>>,
    pub bring_own_food: Option<Option<bool>>,
    pub comments: Option<String>,
    pub custom_image: Option<Option<ImageRef>>,
    pub passport_image: Option<Option<ImageRef>>,
    pub date: Option<Option<String>>,
    pub plan: Option<Option<String>>,
}

impl SelectionPatch {
    /// A patch that only sets the destination. `None` when either half is blank.
    pub fn new(category: impl Into<String>, location: impl Into<String>) -> Option<Self> {
        let category = category.into();
        let location = location.into();
        if category.is_empty() || location.is_empty() {
            return None;
        }

        Some(Self {
            category,
            location,
            food_option: None,
            activities: None,
            bring_own_food: None,
            comments: None,
            custom_image: None,
            passport_image: None,
            date: None,
            plan: None,
        })
    }

    /// The patch a finalized card produces: its catalog title plus every card field.
    pub fn from_card(title: &str, card: CardSelection) -> Option<Self> {
        let patch = Self::new(title, card.location)?;
        Some(Self {
            food_option: Some(card.food_option),
            activities: Some(card.activities),
            bring_own_food: Some(card.bring_own_food),
            custom_image: Some(card.custom_image),
            date: Some(card.date),
            plan: Some(card.plan),
            ..patch
        })
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn location(&self) -> &str {
        &self.location
    }
}

/// What gets logged for a selection: images are described, never embedded.
#[derive(Debug, Serialize)]
pub struct SelectionLog<'a> {
    category: &'a str,
    location: &'a str,
    food_option: Option<&'a str>,
    activities: &'a [String],
    bring_own_food: Option<bool>,
    comments: &'a str,
    custom_image: Option<String>,
    passport_image: Option<String>,
    date: Option<&'a str>,
    plan: Option<&'a str>,
}

impl DateSelection {
    /// Shallow field overwrite: fields present in `patch` replace ours. The
    /// destination is always replaced.
    pub fn merge(&mut self, patch: SelectionPatch) {
        self.category = patch.category;
        self.location = patch.location;
        if let Some(food_option) = patch.food_option {
            self.food_option = food_option;
        }
        if let Some(activities) = patch.activities {
            self.activities = activities;
        }
        if let Some(bring_own_food) = patch.bring_own_food {
            self.bring_own_food = bring_own_food;
        }
        if let Some(comments) = patch.comments {
            self.comments = comments;
        }
        if let Some(custom_image) = patch.custom_image {
            self.custom_image = custom_image;
        }
        if let Some(passport_image) = patch.passport_image {
            self.passport_image = passport_image;
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(plan) = patch.plan {
            self.plan = plan;
        }
    }

    pub fn log_view(&self) -> SelectionLog<'_> {
        SelectionLog {
            category: &self.category,
            location: &self.location,
            food_option: self.food_option.as_deref(),
            activities: &self.activities,
            bring_own_food: self.bring_own_food,
            comments: &self.comments,
            custom_image: self.custom_image.as_ref().map(ImageRef::describe),
            passport_image: self.passport_image.as_ref().map(ImageRef::describe),
            date: self.date.as_deref(),
            plan: self.plan.as_deref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_ref::test_png;
    use proptest::prelude::*;

    #[test]
    fn test_empty_selection() {
        let selection = DateSelection::default();
        assert!(selection.category.is_empty());
        assert!(selection.activities.is_empty());
        assert!(selection.comments.is_empty());
    }

    #[test]
    fn test_destination_needs_both_halves() {
        assert!(SelectionPatch::new("Mall Date", "").is_none());
        assert!(SelectionPatch::new("", "MOA").is_none());

        let card = CardSelection::default();
        assert!(SelectionPatch::from_card("Mall Date", card).is_none());

        let patch = SelectionPatch::new("Mall Date", "MOA").unwrap();
        assert_eq!((patch.category(), patch.location()), ("Mall Date", "MOA"));
    }

    #[test]
    fn test_merge_keeps_absent_fields() {
        let mut selection = DateSelection {
            comments: "Bring snacks".into(),
            food_option: Some("Cafe".into()),
            ..Default::default()
        };

        selection.merge(SelectionPatch::new("Mall Date", "MOA").unwrap());

        assert_eq!(selection.category, "Mall Date");
        assert_eq!(selection.location, "MOA");
        assert_eq!(selection.comments, "Bring snacks");
        assert_eq!(selection.food_option.as_deref(), Some("Cafe"));
    }

    #[test]
    fn test_card_patch_clears_optional_fields() {
        let mut selection = DateSelection {
            food_option: Some("Cafe".into()),
            bring_own_food: Some(true),
            ..Default::default()
        };

        let card = CardSelection {
            location: "Museum".into(),
            ..Default::default()
        };
        selection.merge(SelectionPatch::from_card("Manila Date", card).unwrap());

        assert_eq!(selection.food_option, None);
        assert_eq!(selection.bring_own_food, None);
        assert_eq!(selection.location, "Museum");
    }

    #[test]
    fn test_card_patch_round_trip() {
        let card = CardSelection {
            location: "UP Town".into(),
            bring_own_food: Some(true),
            date: Some("2026-02-14".into()),
            ..Default::default()
        };
        let mut selection = DateSelection::default();
        selection.merge(SelectionPatch::from_card("Picnic Date", card.clone()).unwrap());

        assert_eq!(selection.category, "Picnic Date");
        assert_eq!(selection.location, card.location);
        assert_eq!(selection.bring_own_food, card.bring_own_food);
        assert_eq!(selection.date, card.date);
    }

    #[test]
    fn test_log_view_describes_images() {
        let photo = ImageRef::from_bytes(&test_png(1, 1)).unwrap();
        let selection = DateSelection {
            category: "Picnic Date".into(),
            location: "UP Town".into(),
            passport_image: Some(photo.clone()),
            custom_image: Some(photo),
            ..Default::default()
        };

        let json = serde_json::to_string(&selection.log_view()).unwrap();
        assert!(json.contains("\"passport_image\":\"image/png 1x1\""));
        assert!(json.contains("\"location\":\"UP Town\""));
        assert!(!json.contains("base64"));
    }

    fn text() -> impl Strategy<Value = String> {
        "[a-zA-Z ]{0,12}"
    }

    fn word() -> impl Strategy<Value = String> {
        "[a-zA-Z]{1,12}"
    }

    fn patch_strategy() -> impl Strategy<Value = SelectionPatch> {
        (
            word(),
            word(),
            proptest::option::of(proptest::option::of(text())),
            proptest::option::of(prop::collection::vec(text(), 0..3)),
            proptest::option::of(proptest::option::of(any::<bool>())),
            proptest::option::of(text()),
            proptest::option::of(proptest::option::of(text())),
        )
            .prop_map(|(category, location, food_option, activities, bring_own_food, comments, date)| {
                SelectionPatch {
                    food_option,
                    activities,
                    bring_own_food,
                    comments,
                    date,
                    ..SelectionPatch::new(category, location).unwrap()
                }
            })
    }

    proptest! {
        /// Applying P1 then P2 is a field-wise overwrite where P2 wins when present
        #[test]
        fn merge_is_fieldwise_overwrite(p1 in patch_strategy(), p2 in patch_strategy()) {
            let mut merged = DateSelection::default();
            merged.merge(p1.clone());
            let after_p1 = merged.clone();
            merged.merge(p2.clone());

            prop_assert_eq!(merged.category.as_str(), p2.category());
            prop_assert_eq!(merged.location.as_str(), p2.location());
            prop_assert_eq!(&merged.food_option, p2.food_option.as_ref().unwrap_or(&after_p1.food_option));
            prop_assert_eq!(&merged.activities, p2.activities.as_ref().unwrap_or(&after_p1.activities));
            prop_assert_eq!(&merged.bring_own_food, p2.bring_own_food.as_ref().unwrap_or(&after_p1.bring_own_food));
            prop_assert_eq!(&merged.comments, p2.comments.as_ref().unwrap_or(&after_p1.comments));
            prop_assert_eq!(&merged.date, p2.date.as_ref().unwrap_or(&after_p1.date));
        }

        /// Merging the same patch twice changes nothing the second time
        #[test]
        fn merge_is_idempotent(p in patch_strategy()) {
            let mut once = DateSelection::default();
            once.merge(p.clone());
            let mut twice = once.clone();
            twice.merge(p);
            prop_assert_eq!(once, twice);
        }

        /// A merged patch always leaves category and location set together
        #[test]
        fn merged_destination_is_never_half_set(p in patch_strategy()) {
            let mut selection = DateSelection::default();
            selection.merge(p);
            prop_assert!(!selection.category.is_empty());
            prop_assert!(!selection.location.is_empty());
        }
    }
}
