//! Intro screen: a sealed invitation that opens into flight details

pub const FLIGHT: &str = "LA-143";
pub const FLIGHT_DATE: &str = "14 FEB 2026";
pub const ORIGIN: &str = "HEART";
pub const CLASS: &str = "FIRST";

#[derive(Debug, Clone, Default)]
pub struct IntroScreen {
    revealed: bool,
}

impl IntroScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub fn reveal(&mut self) {
        self.revealed = true;
    }

    /// Boarding is only offered once the details are showing.
    pub fn accept(&self) -> bool {
        self.revealed
    }

    /// Enter: first opens the invitation, then boards.
    pub fn press(&mut self) -> bool {
        if self.revealed {
            self.accept()
        } else {
            self.reveal();
            false
        }
    }
}
