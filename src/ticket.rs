//! Boarding pass: a read-only projection of the final selection, and its export

use std::fs;
use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use serde::Serialize;
use tracing::{info, warn};

use crate::catalog::Catalog;
use crate::error::{PassError, Result};
use crate::intro;
use crate::selection::DateSelection;

pub const OWN_FOOD_MEAL: &str = "Carry-On (Own Food)";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TicketSummary {
    pub passenger: String,
    pub flight: String,
    pub date: String,
    pub category: String,
    pub location: String,
    pub entertainment: Option<String>,
    pub meals: Vec<String>,
    pub plan: Option<String>,
    pub special_requests: Option<String>,
    pub image: String,
}

impl TicketSummary {
    pub fn project(selection: &DateSelection, catalog: &Catalog, passenger: &str) -> Self {
        let option = catalog.find_by_title(&selection.category);

        let mut meals = Vec::new();
        if let Some(food) = &selection.food_option {
            meals.push(food.clone());
        }
        if selection.bring_own_food == Some(true) {
            meals.push(OWN_FOOD_MEAL.to_string());
        }

        let image = match (&selection.custom_image, option) {
            (Some(custom), _) => custom.data_uri.clone(),
            (None, Some(option)) => option.image.clone(),
            (None, None) => String::new(),
        };

        Self {
            passenger: passenger.to_string(),
            flight: option
                .map(|option| option.flight_code())
                .unwrap_or_else(|| intro::FLIGHT.to_string()),
            date: format_date(selection.date.as_deref()),
            category: selection.category.clone(),
            location: selection.location.to_uppercase(),
            entertainment: if selection.activities.is_empty() {
                None
            } else {
                Some(selection.activities.join(", "))
            },
            meals,
            plan: selection.plan.clone(),
            special_requests: if selection.comments.is_empty() {
                None
            } else {
                Some(selection.comments.clone())
            },
            image,
        }
    }

    /// Label/value rows in display order.
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        let mut rows = vec![
            ("PASSENGER", self.passenger.clone()),
            ("FLIGHT", self.flight.clone()),
            ("DATE", self.date.clone()),
            ("DESTINATION", self.location.clone()),
            ("ACTIVITY", self.category.clone()),
        ];
        if let Some(plan) = &self.plan {
            rows.push(("PLAN", plan.clone()));
        }
        if let Some(entertainment) = &self.entertainment {
            rows.push(("ENTERTAINMENT", entertainment.clone()));
        }
        for meal in &self.meals {
            rows.push(("MEAL", meal.clone()));
        }
        if let Some(requests) = &self.special_requests {
            rows.push(("SPECIAL REQUESTS", format!("\"{requests}\"")));
        }
        rows
    }

    /// The plain-text boarding pass.
    pub fn render_lines(&self) -> Vec<String> {
        let mut lines = vec![
            "LOVE AIRLINES - BOARDING PASS".to_string(),
            "=".repeat(30),
        ];
        for (label, value) in self.rows() {
            lines.push(format!("{label:<17}{value}"));
        }
        if !self.image.starts_with("data:") && !self.image.is_empty() {
            lines.push(format!("{:<17}{}", "SECTOR IMAGE", self.image));
        }
        lines.push("=".repeat(30));
        lines.push(barcode(&self.flight, 40));
        lines
    }
}

fn format_date(date: Option<&str>) -> String {
    match date {
        None => intro::FLIGHT_DATE.to_string(),
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(|d| d.format("%d %b %Y").to_string().to_uppercase())
            .unwrap_or_else(|_| raw.to_string()),
    }
}

/// Decorative barcode derived from the flight code.
fn barcode(seed: &str, width: usize) -> String {
    let bytes = seed.as_bytes();
    (0..width)
        .map(|i| {
            let b = bytes.get(i % bytes.len().max(1)).copied().unwrap_or(0) as usize;
            if (b + i) % 3 == 0 { '█' } else { '▌' }
        })
        .collect()
}

/// Turns a finished boarding pass into something the passenger keeps.
pub trait TicketExporter {
    /// Returns where the ticket ended up.
    fn export(&self, ticket: &TicketSummary, selection: &DateSelection) -> Result<PathBuf>;
}

/// Writes `boarding-pass-<timestamp>.txt` and a matching `.json` into a directory.
#[derive(Debug, Clone)]
pub struct FileExporter {
    dir: PathBuf,
}

#[derive(Serialize)]
struct ExportDocument<'a> {
    ticket: &'a TicketSummary,
    selection: &'a DateSelection,
}

impl FileExporter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Writes `<stem>.txt` and `<stem>.json`. Either both land or neither does.
    fn write_pair(&self, stem: &str, ticket: &TicketSummary, selection: &DateSelection) -> Result<PathBuf> {
        let text_path = self.dir.join(format!("{stem}.txt"));
        let json_path = self.dir.join(format!("{stem}.json"));

        let mut text = ticket.render_lines().join("\n");
        text.push('\n');
        let json = serde_json::to_string_pretty(&ExportDocument { ticket, selection })?;

        fs::write(&text_path, text).map_err(|err| PassError::Export {
            path: text_path.clone(),
            reason: err.to_string(),
        })?;

        if let Err(err) = fs::write(&json_path, json) {
            if let Err(cleanup) = fs::remove_file(&text_path) {
                warn!(path = %text_path.display(), error = %cleanup, "could not remove partial boarding pass");
            }
            return Err(PassError::Export {
                path: json_path,
                reason: err.to_string(),
            });
        }

        Ok(text_path)
    }
}

impl TicketExporter for FileExporter {
    fn export(&self, ticket: &TicketSummary, selection: &DateSelection) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir).map_err(|err| PassError::Export {
            path: self.dir.clone(),
            reason: err.to_string(),
        })?;

        let stem = format!("boarding-pass-{}", Local::now().format("%Y%m%d-%H%M%S"));
        let text_path = self.write_pair(&stem, ticket, selection)?;

        info!(path = %text_path.display(), "boarding pass exported");
        Ok(text_path)
    }
}
