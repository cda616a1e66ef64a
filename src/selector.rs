//! Selector screen: all option cards, which one is open, and what each reported

use std::collections::HashMap;

use thiserror::Error;
use tracing::{debug, info};

use crate::card::{CardSelection, OptionCard, SelectionSink};
use crate::catalog::Catalog;
use crate::selection::SelectionPatch;

/// Submission found no card with a destination.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Please confirm your destination sector! ✈️")]
pub struct NoDestination;

/// Last reported selection per card id.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SelectionLedger {
    entries: HashMap<String, CardSelection>,
}

impl SelectionLedger {
    pub fn get(&self, id: &str) -> Option<&CardSelection> {
        self.entries.get(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl SelectionSink for SelectionLedger {
    fn notify(&mut self, id: &str, selection: CardSelection) {
        debug!(card = id, location = %selection.location, "card selection changed");
        self.entries.insert(id.to_string(), selection);
    }
}

#[derive(Debug, Clone)]
pub struct SelectorScreen {
    cards: Vec<OptionCard>,
    expanded: Option<String>,
    ledger: SelectionLedger,
    /// Highlighted card while none is expanded.
    pub cursor: usize,
}

impl SelectorScreen {
    pub fn new(catalog: &Catalog) -> Self {
        Self {
            cards: catalog.options().iter().cloned().map(OptionCard::new).collect(),
            expanded: None,
            ledger: SelectionLedger::default(),
            cursor: 0,
        }
    }

    pub fn cards(&self) -> &[OptionCard] {
        &self.cards
    }

    pub fn expanded(&self) -> Option<&str> {
        self.expanded.as_deref()
    }

    pub fn ledger(&self) -> &SelectionLedger {
        &self.ledger
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.as_deref() == Some(id)
    }

    /// Opens `id`, or closes it when it is already open. Opening one card closes any other.
    pub fn toggle_expand(&mut self, id: &str) {
        if self.is_expanded(id) {
            self.expanded = None;
        } else {
            self.expanded = Some(id.to_string());
        }
    }

    pub fn record_card_selection(&mut self, id: &str, data: CardSelection) {
        self.ledger.notify(id, data);
    }

    /// The open card together with the sink it reports into.
    pub fn expanded_card_mut(&mut self) -> Option<(&mut OptionCard, &mut SelectionLedger)> {
        let id = self.expanded.as_deref()?;
        let card = self.cards.iter_mut().find(|card| card.id() == id)?;
        Some((card, &mut self.ledger))
    }

    pub fn next_card(&mut self) {
        self.cursor = (self.cursor + 1) % self.cards.len().max(1);
    }

    pub fn previous_card(&mut self) {
        let count = self.cards.len().max(1);
        self.cursor = (self.cursor + count - 1) % count;
    }

    pub fn toggle_cursor_card(&mut self) {
        if let Some(id) = self.cards.get(self.cursor).map(|card| card.id().to_string()) {
            self.toggle_expand(&id);
        }
    }

    /// Picks the first card, in catalog order, that reported a non-empty location.
    ///
    /// A user who filled in two cards only gets the earlier one.
    pub fn submit(&self) -> Result<SelectionPatch, NoDestination> {
        for card in &self.cards {
            let Some(data) = self.ledger.get(card.id()) else {
                continue;
            };
            if let Some(patch) = SelectionPatch::from_card(&card.option().title, data.clone()) {
                info!(card = card.id(), location = %data.location, "booking confirmed");
                return Ok(patch);
            }
        }

        info!(reported = self.ledger.len(), "booking rejected, no destination chosen");
        Err(NoDestination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::FieldEdit;
    use proptest::prelude::*;

    fn screen() -> SelectorScreen {
        SelectorScreen::new(&Catalog::builtin())
    }

    fn at(location: &str) -> CardSelection {
        CardSelection {
            location: location.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_toggle_expand() {
        let mut screen = screen();
        assert_eq!(screen.expanded(), None);

        screen.toggle_expand("mall");
        assert_eq!(screen.expanded(), Some("mall"));

        screen.toggle_expand("coffee");
        assert_eq!(screen.expanded(), Some("coffee"));

        screen.toggle_expand("coffee");
        assert_eq!(screen.expanded(), None);
    }

    #[test]
    fn test_submit_picks_single_reported_card() {
        let mut screen = screen();
        screen.record_card_selection("picnic", at("UP Town"));

        let patch = screen.submit().unwrap();
        assert_eq!(patch.category(), "Picnic Date");
        assert_eq!(patch.location(), "UP Town");
        assert_eq!(patch.activities, Some(vec![]));
    }

    #[test]
    fn test_submit_prefers_catalog_order_over_edit_order() {
        let mut screen = screen();
        screen.record_card_selection("manila", at("Intramuros"));
        screen.record_card_selection("mall", at("MOA"));

        let patch = screen.submit().unwrap();
        assert_eq!(patch.category(), "Mall Date");
        assert_eq!(patch.location(), "MOA");
    }

    #[test]
    fn test_submit_skips_empty_locations() {
        let mut screen = screen();
        screen.record_card_selection("picnic", at(""));
        screen.record_card_selection("custom", at("Baguio"));

        let patch = screen.submit().unwrap();
        assert_eq!(patch.category(), "Your Suggestion");
    }

    #[test]
    fn test_submit_rejects_without_destination() {
        let mut screen = screen();
        assert_eq!(screen.submit(), Err(NoDestination));

        screen.record_card_selection("custom", at(""));
        let err = screen.submit().unwrap_err();
        assert_eq!(err.to_string(), "Please confirm your destination sector! ✈️");
    }

    #[test]
    fn test_record_overwrites() {
        let mut screen = screen();
        screen.record_card_selection("coffee", at("Tanay"));
        screen.record_card_selection("coffee", at(""));
        assert_eq!(screen.ledger().get("coffee").unwrap().location, "");
        assert_eq!(screen.ledger().len(), 1);
    }

    #[test]
    fn test_expanded_card_edits_reach_ledger() {
        let mut screen = screen();
        assert!(screen.expanded_card_mut().is_none());

        screen.cursor = 2;
        screen.toggle_cursor_card();
        let (card, ledger) = screen.expanded_card_mut().unwrap();
        card.set_field(FieldEdit::Location("Angono".into()), ledger);

        assert_eq!(screen.ledger().get("coffee").unwrap().location, "Angono");
    }

    #[test]
    fn test_cursor_wraps() {
        let mut screen = screen();
        screen.previous_card();
        assert_eq!(screen.cursor, 6);
        screen.next_card();
        assert_eq!(screen.cursor, 0);
    }

    proptest! {
        /// At most one card is open, and it is the one most recently toggled open
        #[test]
        fn toggle_expand_keeps_at_most_one_open(toggles in prop::collection::vec(0usize..7, 0..40)) {
            let catalog = Catalog::builtin();
            let mut screen = SelectorScreen::new(&catalog);
            let mut expected: Option<String> = None;

            for index in toggles {
                let id = catalog.options()[index].id.clone();
                screen.toggle_expand(&id);
                expected = if expected.as_deref() == Some(id.as_str()) { None } else { Some(id) };
                prop_assert_eq!(screen.expanded(), expected.as_deref());
            }
        }

        /// With several destinations filled in, the earliest catalog entry wins
        #[test]
        fn submit_tie_break_is_catalog_order(filled in prop::collection::btree_set(0usize..7, 1..7)) {
            let catalog = Catalog::builtin();
            let mut screen = SelectorScreen::new(&catalog);
            for &index in filled.iter().rev() {
                screen.record_card_selection(&catalog.options()[index].id, at("Somewhere"));
            }

            let first = *filled.iter().next().unwrap();
            let patch = screen.submit().unwrap();
            prop_assert_eq!(patch.category(), catalog.options()[first].title.as_str());
        }
    }
}
