//! Run state of the main loop.
//!
//! The loop runs frames while the status is [`AppStatus::Running`]. A close
//! request flips it to [`AppStatus::Terminated`] once, and no frame starts
//! after that.

use tracing::info;
use winit::event::ElementState;
use winit::keyboard::{KeyCode, PhysicalKey};

/// Whether the main loop should keep producing frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppStatus {
    /// Frames are produced
    #[default]
    Running,
    /// Close was requested; the loop exits
    Terminated,
}

/// What asked the loop to stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// Window close button or system close.
    WindowClose,
    /// Escape key.
    EscapeKey,
}

impl ExitReason {
    /// Returns display name.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::WindowClose => "Window Closed",
            Self::EscapeKey => "Escape Pressed",
        }
    }

    /// Maps a key event to an exit request. Only a pressed Escape closes.
    #[must_use]
    pub fn from_key(key: PhysicalKey, state: ElementState) -> Option<Self> {
        match (key, state) {
            (PhysicalKey::Code(KeyCode::Escape), ElementState::Pressed) => Some(Self::EscapeKey),
            _ => None,
        }
    }
}

/// Tracks the run status and how many frames ran.
#[derive(Debug, Default)]
pub struct Lifecycle {
    status: AppStatus,
    exit_reason: Option<ExitReason>,
    frames: u64,
}

impl Lifecycle {
    /// Creates a running lifecycle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a frame if still running. Returns `false` once terminated.
    pub fn begin_frame(&mut self) -> bool {
        if self.is_running() {
            self.frames += 1;
            true
        } else {
            false
        }
    }

    /// Requests termination. Only the first request is recorded.
    pub fn request_exit(&mut self, reason: ExitReason) {
        if self.status == AppStatus::Terminated {
            return;
        }
        info!("Exit requested: {}", reason.display_name());
        self.status = AppStatus::Terminated;
        self.exit_reason = Some(reason);
    }

    /// Whether frames are still produced.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.status == AppStatus::Running
    }

    /// Why the loop stopped, if it did.
    #[must_use]
    pub fn exit_reason(&self) -> Option<ExitReason> {
        self.exit_reason
    }

    /// Number of frames started.
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_running() {
        let lifecycle = Lifecycle::new();
        assert_eq!(lifecycle.status, AppStatus::Running);
        assert!(lifecycle.exit_reason().is_none());
        assert_eq!(lifecycle.frames(), 0);
    }

    #[test]
    fn test_frames_run_until_close() {
        let mut lifecycle = Lifecycle::new();
        for _ in 0..3 {
            assert!(lifecycle.begin_frame());
        }

        lifecycle.request_exit(ExitReason::WindowClose);

        assert!(!lifecycle.begin_frame());
        assert!(!lifecycle.begin_frame());
        assert_eq!(lifecycle.frames(), 3);
        assert_eq!(lifecycle.status, AppStatus::Terminated);
    }

    #[test]
    fn test_first_exit_reason_wins() {
        let mut lifecycle = Lifecycle::new();
        lifecycle.request_exit(ExitReason::EscapeKey);
        lifecycle.request_exit(ExitReason::WindowClose);
        assert_eq!(lifecycle.exit_reason(), Some(ExitReason::EscapeKey));
    }

    #[test]
    fn test_escape_press_closes() {
        let escape = PhysicalKey::Code(KeyCode::Escape);
        assert_eq!(
            ExitReason::from_key(escape, ElementState::Pressed),
            Some(ExitReason::EscapeKey)
        );
        assert_eq!(ExitReason::from_key(escape, ElementState::Released), None);
        assert_eq!(
            ExitReason::from_key(PhysicalKey::Code(KeyCode::Space), ElementState::Pressed),
            None
        );
    }

    #[test]
    fn test_display_names() {
        assert_eq!(ExitReason::WindowClose.display_name(), "Window Closed");
        assert_eq!(ExitReason::EscapeKey.display_name(), "Escape Pressed");
    }
}
