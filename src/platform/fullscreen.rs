//! Fullscreen tracking
//!
//! The flag only flips when the host accepted the request.

/// Fullscreen request failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FullscreenError {
    #[error("fullscreen is not supported here")]
    Unsupported,
    #[error("fullscreen request rejected: {0}")]
    Rejected(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Fullscreen {
    active: bool,
}

impl Fullscreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Adopt the host's actual state, e.g. after the user pressed Esc
    pub fn sync(&mut self, active: bool) {
        if active != self.active {
            log::debug!("Fullscreen resynced to {active}");
            self.active = active;
        }
    }

    /// Ask `request` to enter (`true`) or leave (`false`) fullscreen.
    ///
    /// Failures are logged and leave the tracked state untouched.
    pub fn toggle<F>(&mut self, request: F) -> bool
    where
        F: FnOnce(bool) -> Result<(), FullscreenError>,
    {
        let enter = !self.active;
        match request(enter) {
            Ok(()) => {
                self.active = enter;
                log::info!("Fullscreen {}", if enter { "entered" } else { "left" });
            }
            Err(e) => log::warn!("Fullscreen toggle ignored: {e}"),
        }
        self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_round_trip() {
        let mut fs = Fullscreen::new();
        assert!(fs.toggle(|enter| {
            assert!(enter);
            Ok(())
        }));
        assert!(!fs.toggle(|enter| {
            assert!(!enter);
            Ok(())
        }));
    }

    #[test]
    fn test_sync_after_external_exit_allows_reentry() {
        let mut fs = Fullscreen::new();
        assert!(fs.toggle(|_| Ok(())));
        // Left fullscreen outside the toggle
        fs.sync(false);
        assert!(!fs.is_active());
        assert!(fs.toggle(|enter| {
            assert!(enter);
            Ok(())
        }));
    }

    #[test]
    fn test_sync_adopts_refused_request() {
        let mut fs = Fullscreen::new();
        // Request accepted synchronously, refused later by the host
        fs.toggle(|_| Ok(()));
        fs.sync(false);
        assert!(!fs.is_active());
        fs.sync(false);
        assert!(!fs.is_active());
        fs.sync(true);
        assert!(fs.is_active());
    }

    #[test]
    fn test_failure_leaves_flag() {
        let mut fs = Fullscreen::new();
        assert!(!fs.toggle(|_| Err(FullscreenError::Unsupported)));
        assert!(!fs.is_active());

        fs.toggle(|_| Ok(()));
        assert!(fs.toggle(|_| Err(FullscreenError::Rejected("denied".into()))));
        assert!(fs.is_active());
    }
}
