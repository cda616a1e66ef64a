//! Passport control: upload a photo, press approve, wait for the stamp
//!
//! There is no real verification. The approve action stays unavailable until
//! a photo is attached, then fires after a fixed delay.

use std::path::Path;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::error::Result;
use crate::image_ref::ImageRef;

pub const DEFAULT_APPROVAL_DELAY: Duration = Duration::from_millis(1500);

#[derive(Debug, Clone)]
pub struct PassportScreen {
    photo: Option<ImageRef>,
    approving_since: Option<Instant>,
    delay: Duration,
    /// Path typed by the user, loaded on Enter.
    pub photo_path: String,
}

impl PassportScreen {
    pub fn new(delay: Duration) -> Self {
        Self {
            photo: None,
            approving_since: None,
            delay,
            photo_path: String::new(),
        }
    }

    pub fn photo(&self) -> Option<&ImageRef> {
        self.photo.as_ref()
    }

    pub fn is_approving(&self) -> bool {
        self.approving_since.is_some()
    }

    pub fn can_approve(&self) -> bool {
        self.photo.is_some() && !self.is_approving()
    }

    /// Swapping the photo is allowed until approval starts. Returns false when
    /// the photo was refused.
    pub fn attach_photo(&mut self, photo: ImageRef) -> bool {
        if self.is_approving() {
            debug!(photo = %photo.describe(), "passport photo refused, approval in progress");
            return false;
        }
        info!(photo = %photo.describe(), "passport photo attached");
        self.photo = Some(photo);
        true
    }

    /// Like `attach_photo`, but the file isn't even read while approval is pending.
    pub fn attach_photo_from_path(&mut self, path: &Path) -> Result<bool> {
        if self.is_approving() {
            return Ok(false);
        }
        let photo = ImageRef::from_path(path)?;
        Ok(self.attach_photo(photo))
    }

    /// Starts the approval countdown. Returns false when approval isn't available.
    pub fn approve(&mut self, now: Instant) -> bool {
        if !self.can_approve() {
            return false;
        }
        self.approving_since = Some(now);
        true
    }

    /// Yields the approved photo once the delay has elapsed, exactly once.
    pub fn poll_approval(&mut self, now: Instant) -> Option<ImageRef> {
        let started = self.approving_since?;
        if now.duration_since(started) < self.delay {
            return None;
        }
        self.approving_since = None;
        self.photo.take()
    }
}
