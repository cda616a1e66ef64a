//! Terminal app state: routes key presses to the active screen and screen
//! outputs into the phase controller

use std::path::{Path, PathBuf};
use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{error, warn};

use crate::card::CardField;
use crate::catalog::Catalog;
use crate::config::Settings;
use crate::controller::{Controller, Phase};
use crate::intro::IntroScreen;
use crate::passport::PassportScreen;
use crate::selector::SelectorScreen;
use crate::ticket::{FileExporter, TicketExporter, TicketSummary};

const MAX_NOTICES: usize = 5;

pub struct App {
    pub controller: Controller,
    pub catalog: Catalog,
    pub settings: Settings,
    pub intro: IntroScreen,
    pub passport: PassportScreen,
    pub selector: SelectorScreen,
    pub notices: Vec<String>,
    pub exported_to: Option<PathBuf>,
    pub should_quit: bool,
    exporter: Box<dyn TicketExporter>,
}

impl App {
    pub fn new(settings: Settings, catalog: Catalog) -> App {
        let exporter = Box::new(FileExporter::new(settings.export_dir.clone()));
        App::with_exporter(settings, catalog, exporter)
    }

    pub fn with_exporter(settings: Settings, catalog: Catalog, exporter: Box<dyn TicketExporter>) -> App {
        App {
            controller: Controller::new(),
            intro: IntroScreen::new(),
            passport: PassportScreen::new(settings.approval_delay),
            selector: SelectorScreen::new(&catalog),
            catalog,
            settings,
            notices: Vec::new(),
            exported_to: None,
            should_quit: false,
            exporter,
        }
    }

    pub fn phase(&self) -> Phase {
        self.controller.phase()
    }

    pub fn ticket(&self) -> TicketSummary {
        TicketSummary::project(self.controller.selection(), &self.catalog, &self.settings.passenger)
    }

    fn push_notice(&mut self, notice: impl Into<String>) {
        self.notices.insert(0, notice.into());
        self.notices.truncate(MAX_NOTICES);
    }

    /// Time-driven updates: the passport stamp.
    pub fn tick(&mut self, now: Instant) {
        if self.phase() != Phase::Passport {
            return;
        }
        if let Some(photo) = self.passport.poll_approval(now) {
            self.controller.advance_from_passport(photo);
            self.enter_phase();
        }
    }

    /// Screens owned by a phase start fresh whenever that phase is entered.
    fn enter_phase(&mut self) {
        self.notices.clear();
        if self.phase() == Phase::Selection {
            self.selector = SelectorScreen::new(&self.catalog);
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        match self.phase() {
            Phase::Intro => self.handle_intro_key(key.code),
            Phase::Passport => self.handle_passport_key(key.code),
            Phase::Selection => self.handle_selection_key(key.code),
            Phase::Comments => self.handle_comments_key(key.code),
            Phase::Ticket => self.handle_ticket_key(key.code),
            Phase::Sent => {
                if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char('q')) {
                    self.should_quit = true;
                }
            }
        }
    }

    fn handle_intro_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Enter => {
                if self.intro.press() {
                    self.controller.advance_from_intro();
                    self.enter_phase();
                }
            }
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            _ => {}
        }
    }

    fn handle_passport_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char(c) => self.passport.photo_path.push(c),
            KeyCode::Backspace => {
                self.passport.photo_path.pop();
            }
            KeyCode::Enter if !self.passport.photo_path.trim().is_empty() => {
                let path = self.passport.photo_path.trim().to_string();
                match self.passport.attach_photo_from_path(Path::new(&path)) {
                    Ok(true) => {
                        self.passport.photo_path.clear();
                        self.push_notice("Photo attached. Press Enter to approve your visa.");
                    }
                    Ok(false) => {
                        self.push_notice("Verification in progress. The photo can't be changed now.");
                    }
                    Err(err) => {
                        warn!(path = %path, error = %err, "passport photo rejected");
                        self.push_notice(format!("Could not use that photo: {err}"));
                    }
                }
            }
            KeyCode::Enter => {
                if self.passport.approve(Instant::now()) {
                    self.push_notice("APPROVING VISA...");
                } else if self.passport.photo().is_none() {
                    self.push_notice("Upload a passport photo to continue");
                }
            }
            _ => {}
        }
    }

    fn handle_selection_key(&mut self, code: KeyCode) {
        if self.selector.expanded().is_some() {
            self.handle_card_key(code);
            return;
        }

        match code {
            KeyCode::Down => self.selector.next_card(),
            KeyCode::Up => self.selector.previous_card(),
            KeyCode::Enter => self.selector.toggle_cursor_card(),
            KeyCode::Char('c') => self.confirm_booking(),
            KeyCode::Char('q') => self.should_quit = true,
            _ => {}
        }
    }

    fn handle_card_key(&mut self, code: KeyCode) {
        let Some((card, ledger)) = self.selector.expanded_card_mut() else {
            return;
        };

        match code {
            KeyCode::Esc => {
                let id = card.id().to_string();
                self.selector.toggle_expand(&id);
            }
            KeyCode::Tab | KeyCode::Down => card.focus_next(),
            KeyCode::BackTab | KeyCode::Up => card.focus_previous(),
            KeyCode::Left => card.cycle_choice(false, ledger),
            KeyCode::Right => card.cycle_choice(true, ledger),
            KeyCode::Char(' ') if !card.focused_field().is_text() => card.activate(ledger),
            KeyCode::Char(c) => card.type_char(c, ledger),
            KeyCode::Backspace => card.backspace(ledger),
            KeyCode::Enter if card.focused_field() == CardField::Image => {
                if let Err(err) = card.upload_from_path(ledger) {
                    warn!(card = card.id(), error = %err, "custom image rejected");
                    self.push_notice(format!("Could not use that image: {err}"));
                }
            }
            KeyCode::Enter => {
                let id = card.id().to_string();
                self.selector.toggle_expand(&id);
            }
            _ => {}
        }
    }

    fn confirm_booking(&mut self) {
        match self.selector.submit() {
            Ok(patch) => {
                self.controller.finalize_selection(patch);
                self.enter_phase();
            }
            Err(rejection) => self.push_notice(rejection.to_string()),
        }
    }

    fn handle_comments_key(&mut self, code: KeyCode) {
        let mut comments = self.controller.selection().comments.clone();
        match code {
            KeyCode::Char(c) => {
                comments.push(c);
                self.controller.set_comments(comments);
            }
            KeyCode::Backspace => {
                comments.pop();
                self.controller.set_comments(comments);
            }
            KeyCode::Enter => {
                self.controller.submit_comments();
                self.enter_phase();
            }
            KeyCode::Esc => {
                self.controller.return_to_selection();
                self.enter_phase();
            }
            _ => {}
        }
    }

    fn handle_ticket_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Enter => self.send_ticket(),
            KeyCode::Char('q') => self.should_quit = true,
            _ => {}
        }
    }

    /// Exports the boarding pass; only a successful export moves on to `Sent`.
    fn send_ticket(&mut self) {
        let ticket = self.ticket();
        match self.exporter.export(&ticket, self.controller.selection()) {
            Ok(path) => {
                self.exported_to = Some(path);
                self.controller.send();
                self.enter_phase();
            }
            Err(err) => {
                error!(error = %err, "boarding pass export failed");
                self.push_notice(format!("Could not print boarding pass: {err}. Press Enter to retry."));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{PassError, Result};
    use crate::image_ref::test_png;
    use crate::selection::DateSelection;
    use std::cell::Cell;
    use std::rc::Rc;
    use std::time::Duration;

    struct FlakyExporter {
        failures_left: Rc<Cell<u32>>,
    }

    impl TicketExporter for FlakyExporter {
        fn export(&self, _ticket: &TicketSummary, _selection: &DateSelection) -> Result<PathBuf> {
            if self.failures_left.get() > 0 {
                self.failures_left.set(self.failures_left.get() - 1);
                return Err(PassError::Export {
                    path: PathBuf::from("/printer"),
                    reason: "out of paper".into(),
                });
            }
            Ok(PathBuf::from("/printer/pass.txt"))
        }
    }

    fn settings() -> Settings {
        Settings {
            passenger: "Valentine".into(),
            catalog: None,
            export_dir: PathBuf::from("unused"),
            approval_delay: Duration::ZERO,
            log_file: None,
        }
    }

    fn app_with_failures(failures: u32) -> (App, Rc<Cell<u32>>) {
        let failures_left = Rc::new(Cell::new(failures));
        let exporter = Box::new(FlakyExporter { failures_left: failures_left.clone() });
        (App::with_exporter(settings(), Catalog::builtin(), exporter), failures_left)
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    /// Intro → passport with a real photo file → departures.
    fn board(app: &mut App, dir: &Path) {
        press(app, KeyCode::Enter);
        press(app, KeyCode::Enter);
        assert_eq!(app.phase(), Phase::Passport);

        let photo = dir.join("passport.png");
        std::fs::write(&photo, test_png(2, 2)).unwrap();
        type_text(app, &photo.display().to_string());
        press(app, KeyCode::Enter);
        assert!(app.passport.photo().is_some());

        press(app, KeyCode::Enter);
        assert!(app.passport.is_approving());
        app.tick(Instant::now());
        assert_eq!(app.phase(), Phase::Selection);
    }

    #[test]
    fn test_app_initialization() {
        let (app, _) = app_with_failures(0);
        assert_eq!(app.phase(), Phase::Intro);
        assert!(!app.should_quit);
        assert!(app.notices.is_empty());
        assert_eq!(app.selector.cards().len(), 7);
    }

    #[test]
    fn test_full_flow_through_keys() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, _) = app_with_failures(0);
        board(&mut app, dir.path());

        // Picnic card: open it, move to location, pick UP Town.
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.selector.expanded(), Some("picnic"));
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.selector.expanded(), None);

        press(&mut app, KeyCode::Char('c'));
        assert_eq!(app.phase(), Phase::Comments);
        let selection = app.controller.selection();
        assert_eq!(selection.category, "Picnic Date");
        assert_eq!(selection.location, "UP Town");
        assert_eq!(selection.bring_own_food, Some(false));
        assert!(selection.passport_image.is_some());

        type_text(&mut app, "Bring snackz");
        press(&mut app, KeyCode::Backspace);
        type_text(&mut app, "s");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.phase(), Phase::Ticket);
        assert_eq!(app.controller.selection().comments, "Bring snacks");

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.phase(), Phase::Sent);
        assert_eq!(app.exported_to, Some(PathBuf::from("/printer/pass.txt")));

        press(&mut app, KeyCode::Enter);
        assert!(app.should_quit);
    }

    #[test]
    fn test_confirm_without_destination_stays_put() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, _) = app_with_failures(0);
        board(&mut app, dir.path());

        press(&mut app, KeyCode::Char('c'));
        assert_eq!(app.phase(), Phase::Selection);
        assert_eq!(app.notices[0], "Please confirm your destination sector! ✈️");
    }

    #[test]
    fn test_approve_without_photo_is_gated() {
        let (mut app, _) = app_with_failures(0);
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Enter);

        press(&mut app, KeyCode::Enter);
        app.tick(Instant::now());
        assert_eq!(app.phase(), Phase::Passport);
        assert_eq!(app.notices[0], "Upload a passport photo to continue");
    }

    #[test]
    fn test_bad_photo_path_reports_notice() {
        let (mut app, _) = app_with_failures(0);
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Enter);

        type_text(&mut app, "/definitely/not/here.png");
        press(&mut app, KeyCode::Enter);
        assert!(app.passport.photo().is_none());
        assert!(app.notices[0].starts_with("Could not use that photo"));
    }

    #[test]
    fn test_photo_swap_refused_while_approving() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, _) = app_with_failures(0);
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Enter);

        let first = dir.path().join("a.png");
        std::fs::write(&first, test_png(2, 2)).unwrap();
        type_text(&mut app, &first.display().to_string());
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Enter);
        assert!(app.passport.is_approving());

        let second = dir.path().join("b.png");
        std::fs::write(&second, test_png(9, 9)).unwrap();
        type_text(&mut app, &second.display().to_string());
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.notices[0], "Verification in progress. The photo can't be changed now.");
        assert_eq!(app.passport.photo().unwrap().width, 2);
        assert_eq!(app.passport.photo_path, second.display().to_string());
    }

    #[test]
    fn test_going_back_remounts_selector_but_keeps_selection() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, _) = app_with_failures(0);
        board(&mut app, dir.path());

        app.selector.cursor = 1;
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('c'));
        assert_eq!(app.controller.selection().location, "SM North");

        type_text(&mut app, "Arcade");
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.phase(), Phase::Selection);
        assert_eq!(app.selector.ledger().len(), 0);
        assert_eq!(app.controller.selection().category, "Mall Date");
        assert_eq!(app.controller.selection().comments, "Arcade");
    }

    #[test]
    fn test_custom_card_typing_and_upload() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, _) = app_with_failures(0);
        board(&mut app, dir.path());

        app.selector.cursor = 6;
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "Baguio City");
        assert_eq!(app.selector.ledger().get("custom").unwrap().location, "Baguio City");

        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Tab);
        let view = dir.path().join("view.png");
        std::fs::write(&view, test_png(4, 3)).unwrap();
        type_text(&mut app, &view.display().to_string());
        press(&mut app, KeyCode::Enter);

        let reported = app.selector.ledger().get("custom").unwrap();
        assert_eq!(reported.custom_image.as_ref().unwrap().width, 4);
        assert_eq!(app.selector.expanded(), Some("custom"));

        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Char('c'));
        assert_eq!(app.controller.selection().category, "Your Suggestion");
        assert!(app.controller.selection().custom_image.is_some());
    }

    #[test]
    fn test_failed_export_stays_on_ticket_and_retries() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, failures_left) = app_with_failures(1);
        board(&mut app, dir.path());

        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Char('c'));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.phase(), Phase::Ticket);

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.phase(), Phase::Ticket);
        assert!(app.notices[0].contains("out of paper"));
        assert_eq!(failures_left.get(), 0);

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.phase(), Phase::Sent);
    }

    #[test]
    fn test_ctrl_c_quits_anywhere() {
        let (mut app, _) = app_with_failures(0);
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }
}
