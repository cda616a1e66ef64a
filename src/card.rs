//! Option card: local form state for one catalog entry
//!
//! Every edit ends in exactly one `SelectionSink::notify` call carrying the
//! card's full current view. The sink never answers back.

use std::fs;

use serde::Serialize;

use crate::catalog::DateOption;
use crate::error::Result;
use crate::image_ref::ImageRef;

/// Receives a card's selection every time the card changes.
pub trait SelectionSink {
    fn notify(&mut self, id: &str, selection: CardSelection);
}

/// What one card currently reports upward.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CardSelection {
    pub location: String,
    pub food_option: Option<String>,
    pub activities: Vec<String>,
    pub bring_own_food: Option<bool>,
    pub custom_image: Option<ImageRef>,
    pub date: Option<String>,
    pub plan: Option<String>,
}

/// A single-field edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldEdit {
    Location(String),
    CustomLocation(String),
    Plan(String),
    Food(Option<String>),
    OwnFood(bool),
    Date(String),
}

/// Focusable rows of an expanded card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardField {
    Date,
    Location,
    CustomLocation,
    Plan,
    Image,
    OwnFood,
    Activity(usize),
    Food,
}

impl CardField {
    pub fn label(&self) -> &'static str {
        match self {
            CardField::Date => "PREFERRED DATE",
            CardField::Location => "DESTINATION SECTOR",
            CardField::CustomLocation => "WHERE (Your Suggestion)",
            CardField::Plan => "WHAT TO DO",
            CardField::Image => "IDEAL VIEW / ACTIVITY IMAGE",
            CardField::OwnFood => "CARRY-ON MEAL (Bring Own Food)",
            CardField::Activity(_) => "IN-FLIGHT ENTERTAINMENT",
            CardField::Food => "MEAL PREFERENCE",
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(
            self,
            CardField::Date | CardField::CustomLocation | CardField::Plan | CardField::Image
        )
    }
}

#[derive(Debug, Clone)]
pub struct OptionCard {
    option: DateOption,
    location: String,
    custom_location: String,
    plan: String,
    food_option: String,
    activities: Vec<String>,
    bring_own_food: bool,
    date: String,
    custom_image: Option<ImageRef>,
    focus: usize,
    /// Path typed into the upload row, not yet loaded.
    pub image_path: String,
}

impl OptionCard {
    pub fn new(option: DateOption) -> Self {
        let location = option.default_location().to_string();
        Self {
            option,
            location,
            custom_location: String::new(),
            plan: String::new(),
            food_option: String::new(),
            activities: Vec::new(),
            bring_own_food: false,
            date: String::new(),
            custom_image: None,
            focus: 0,
            image_path: String::new(),
        }
    }

    pub fn option(&self) -> &DateOption {
        &self.option
    }

    pub fn id(&self) -> &str {
        &self.option.id
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn custom_location(&self) -> &str {
        &self.custom_location
    }

    pub fn plan(&self) -> &str {
        &self.plan
    }

    pub fn food_option(&self) -> &str {
        &self.food_option
    }

    pub fn activities(&self) -> &[String] {
        &self.activities
    }

    pub fn bring_own_food(&self) -> bool {
        self.bring_own_food
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn custom_image(&self) -> Option<&ImageRef> {
        self.custom_image.as_ref()
    }

    /// Rows shown when the card is expanded, in display order.
    pub fn fields(&self) -> Vec<CardField> {
        let mut fields = vec![CardField::Date];
        if self.option.custom_input {
            fields.extend([CardField::CustomLocation, CardField::Plan, CardField::Image]);
        } else {
            fields.push(CardField::Location);
        }
        if self.option.has_own_food {
            fields.push(CardField::OwnFood);
        }
        fields.extend((0..self.option.activities.len()).map(CardField::Activity));
        if !self.option.food_options.is_empty() {
            fields.push(CardField::Food);
        }
        fields
    }

    pub fn focused_field(&self) -> CardField {
        let fields = self.fields();
        fields[self.focus.min(fields.len() - 1)]
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % self.fields().len();
    }

    pub fn focus_previous(&mut self) {
        let count = self.fields().len();
        self.focus = (self.focus + count - 1) % count;
    }

    /// The full merged view this card reports on a regular edit.
    pub fn current_selection(&self) -> CardSelection {
        CardSelection {
            location: if self.option.custom_input {
                self.custom_location.clone()
            } else {
                self.location.clone()
            },
            food_option: non_empty(&self.food_option),
            activities: self.activities.clone(),
            bring_own_food: self.option.has_own_food.then_some(self.bring_own_food),
            custom_image: if self.option.custom_input {
                self.custom_image.clone()
            } else {
                None
            },
            date: non_empty(&self.date),
            plan: non_empty(&self.plan),
        }
    }

    fn emit(&self, sink: &mut dyn SelectionSink) {
        sink.notify(&self.option.id, self.current_selection());
    }

    pub fn toggle_activity(&mut self, tag: &str, sink: &mut dyn SelectionSink) {
        if let Some(pos) = self.activities.iter().position(|a| a == tag) {
            self.activities.remove(pos);
        } else {
            self.activities.push(tag.to_string());
        }
        self.emit(sink);
    }

    pub fn set_field(&mut self, edit: FieldEdit, sink: &mut dyn SelectionSink) {
        match edit {
            FieldEdit::Location(location) => self.location = location,
            FieldEdit::CustomLocation(text) => {
                self.location = text.clone();
                self.custom_location = text;
            }
            FieldEdit::Plan(text) => self.plan = text,
            FieldEdit::Food(food) => self.food_option = food.unwrap_or_default(),
            FieldEdit::OwnFood(flag) => self.bring_own_food = flag,
            FieldEdit::Date(date) => self.date = date,
        }
        self.emit(sink);
    }

    /// Decodes and stores an uploaded image, then reports through the upload path.
    ///
    /// The upload path falls back to the option's first location when no
    /// custom location was typed, and always carries the new image. Nothing is
    /// emitted when decoding fails.
    pub fn upload_image(&mut self, bytes: &[u8], sink: &mut dyn SelectionSink) -> Result<()> {
        let image = ImageRef::from_bytes(bytes)?;
        self.custom_image = Some(image.clone());

        let location = if self.custom_location.is_empty() {
            self.option.default_location().to_string()
        } else {
            self.custom_location.clone()
        };

        let selection = CardSelection {
            location,
            custom_image: Some(image),
            ..self.current_selection()
        };
        sink.notify(&self.option.id, selection);
        Ok(())
    }

    /// Loads the file named in `image_path` through `upload_image`.
    pub fn upload_from_path(&mut self, sink: &mut dyn SelectionSink) -> Result<()> {
        let bytes = fs::read(self.image_path.trim())?;
        self.upload_image(&bytes, sink)?;
        self.image_path.clear();
        Ok(())
    }

    /// Steps the focused choice row (location or food) through its values.
    ///
    /// The empty entry stands for "nothing chosen" and sits before the first value.
    pub fn cycle_choice(&mut self, forward: bool, sink: &mut dyn SelectionSink) {
        match self.focused_field() {
            CardField::Location => {
                let next = cycle(&self.option.locations, &self.location, forward);
                self.set_field(FieldEdit::Location(next), sink);
            }
            CardField::Food => {
                let next = cycle(&self.option.food_options, &self.food_option, forward);
                self.set_field(FieldEdit::Food(non_empty(&next)), sink);
            }
            _ => {}
        }
    }

    /// Space on a checkbox-like row.
    pub fn activate(&mut self, sink: &mut dyn SelectionSink) {
        match self.focused_field() {
            CardField::OwnFood => {
                let flag = !self.bring_own_food;
                self.set_field(FieldEdit::OwnFood(flag), sink);
            }
            CardField::Activity(index) => {
                if let Some(tag) = self.option.activities.get(index).cloned() {
                    self.toggle_activity(&tag, sink);
                }
            }
            _ => {}
        }
    }

    pub fn type_char(&mut self, c: char, sink: &mut dyn SelectionSink) {
        self.edit_text(sink, |text| text.push(c));
    }

    pub fn backspace(&mut self, sink: &mut dyn SelectionSink) {
        self.edit_text(sink, |text| {
            text.pop();
        });
    }

    fn edit_text(&mut self, sink: &mut dyn SelectionSink, change: impl FnOnce(&mut String)) {
        match self.focused_field() {
            CardField::Date => {
                let mut text = self.date.clone();
                change(&mut text);
                self.set_field(FieldEdit::Date(text), sink);
            }
            CardField::CustomLocation => {
                let mut text = self.custom_location.clone();
                change(&mut text);
                self.set_field(FieldEdit::CustomLocation(text), sink);
            }
            CardField::Plan => {
                let mut text = self.plan.clone();
                change(&mut text);
                self.set_field(FieldEdit::Plan(text), sink);
            }
            // The path draft isn't part of the selection, so no emission.
            CardField::Image => change(&mut self.image_path),
            _ => {}
        }
    }
}

fn non_empty(text: &str) -> Option<String> {
    if text.is_empty() { None } else { Some(text.to_string()) }
}

fn cycle(values: &[String], current: &str, forward: bool) -> String {
    // Slot 0 is the empty choice, slots 1..=len are the values.
    let slots = values.len() + 1;
    let index = values
        .iter()
        .position(|v| v == current)
        .map(|i| i + 1)
        .unwrap_or(0);
    let next = if forward { (index + 1) % slots } else { (index + slots - 1) % slots };
    if next == 0 { String::new() } else { values[next - 1].clone() }
}

/// Sink that records every notification, for tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingSink {
    pub events: Vec<(String, CardSelection)>,
}

#[cfg(test)]
impl SelectionSink for RecordingSink {
    fn notify(&mut self, id: &str, selection: CardSelection) {
        self.events.push((id.to_string(), selection));
    }
}
