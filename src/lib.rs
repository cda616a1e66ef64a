//! Love Airlines: a boarding pass invitation rendered in the terminal.
//!
//! The flow runs intro → passport → selection → comments → ticket → sent.
//! [`controller::Controller`] owns the phase and the accumulated
//! [`selection::DateSelection`]; every screen hands its output to one of the
//! controller's transitions.

pub mod app;
pub mod card;
pub mod catalog;
pub mod config;
pub mod controller;
pub mod error;
pub mod image_ref;
pub mod intro;
pub mod passport;
pub mod selection;
pub mod selector;
pub mod ticket;
pub mod ui;
