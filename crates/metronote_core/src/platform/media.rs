//! Media-key command relay.
//!
//! # Responsibility
//! - Parse raw platform media commands (`play`, `pause`, `skipNext`,
//!   `skipPrevious`).
//! - Forward them to an optional playback controller.
//!
//! # Invariants
//! - `relay` never panics and never returns an error; every path reports a
//!   `RelayOutcome` and logs.
//! - `play` and `pause` both map to a play/pause toggle.

use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::sync::Arc;

/// Playback command understood by the relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaCommand {
    TogglePlayPause,
    SkipNext,
    SkipPrevious,
}

impl MediaCommand {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TogglePlayPause => "toggle_play_pause",
            Self::SkipNext => "skip_next",
            Self::SkipPrevious => "skip_previous",
        }
    }
}

/// Raw command string the relay does not recognize.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMediaCommand(pub String);

impl Display for UnknownMediaCommand {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown media command: `{}`", self.0)
    }
}

impl Error for UnknownMediaCommand {}

impl FromStr for MediaCommand {
    type Err = UnknownMediaCommand;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "play" | "pause" => Ok(Self::TogglePlayPause),
            "skipNext" => Ok(Self::SkipNext),
            "skipPrevious" => Ok(Self::SkipPrevious),
            other => Err(UnknownMediaCommand(other.to_string())),
        }
    }
}

/// Failure reported by a playback controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackError(pub String);

impl Display for PlaybackError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "playback controller failed: {}", self.0)
    }
}

impl Error for PlaybackError {}

/// External playback collaborator.
pub trait PlaybackController: Send + Sync {
    fn toggle_play_pause(&self) -> Result<(), PlaybackError>;
    fn play_next(&self) -> Result<(), PlaybackError>;
    fn play_previous(&self) -> Result<(), PlaybackError>;
}

/// Result of relaying one raw command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayOutcome {
    Dispatched(MediaCommand),
    Unknown(String),
    NoController(MediaCommand),
    ControllerFailed(MediaCommand, String),
}

impl RelayOutcome {
    /// Stable label for FFI/diagnostics.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Dispatched(_) => "dispatched",
            Self::Unknown(_) => "unknown",
            Self::NoController(_) => "no_controller",
            Self::ControllerFailed(..) => "controller_failed",
        }
    }
}

/// Relays platform media commands to an optional controller.
#[derive(Clone, Default)]
pub struct MediaCommandRelay {
    controller: Option<Arc<dyn PlaybackController>>,
}

impl MediaCommandRelay {
    pub fn new(controller: Option<Arc<dyn PlaybackController>>) -> Self {
        Self { controller }
    }

    pub fn set_controller(&mut self, controller: Option<Arc<dyn PlaybackController>>) {
        self.controller = controller;
    }

    pub fn has_controller(&self) -> bool {
        self.controller.is_some()
    }

    /// Parses and forwards one raw command.
    pub fn relay(&self, raw: &str) -> RelayOutcome {
        let command = match raw.parse::<MediaCommand>() {
            Ok(command) => command,
            Err(err) => {
                warn!("event=media_command module=platform status=skipped reason=unknown error={err}");
                return RelayOutcome::Unknown(err.0);
            }
        };

        let Some(controller) = self.controller.as_ref() else {
            info!(
                "event=media_command module=platform status=skipped reason=no_controller command={}",
                command.as_str()
            );
            return RelayOutcome::NoController(command);
        };

        let result = match command {
            MediaCommand::TogglePlayPause => controller.toggle_play_pause(),
            MediaCommand::SkipNext => controller.play_next(),
            MediaCommand::SkipPrevious => controller.play_previous(),
        };

        match result {
            Ok(()) => {
                info!(
                    "event=media_command module=platform status=ok command={}",
                    command.as_str()
                );
                RelayOutcome::Dispatched(command)
            }
            Err(err) => {
                error!(
                    "event=media_command module=platform status=error command={} error={err}",
                    command.as_str()
                );
                RelayOutcome::ControllerFailed(command, err.0)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{MediaCommand, MediaCommandRelay, PlaybackController, PlaybackError, RelayOutcome};
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct RecordingController {
        calls: Mutex<Vec<&'static str>>,
        fail: bool,
    }

    impl RecordingController {
        fn record(&self, name: &'static str) -> Result<(), PlaybackError> {
            self.calls.lock().expect("lock").push(name);
            if self.fail {
                Err(PlaybackError("player offline".to_string()))
            } else {
                Ok(())
            }
        }
    }

    impl PlaybackController for RecordingController {
        fn toggle_play_pause(&self) -> Result<(), PlaybackError> {
            self.record("toggle")
        }

        fn play_next(&self) -> Result<(), PlaybackError> {
            self.record("next")
        }

        fn play_previous(&self) -> Result<(), PlaybackError> {
            self.record("previous")
        }
    }

    #[test]
    fn play_and_pause_both_toggle() {
        assert_eq!("play".parse::<MediaCommand>(), Ok(MediaCommand::TogglePlayPause));
        assert_eq!("pause".parse::<MediaCommand>(), Ok(MediaCommand::TogglePlayPause));
        assert_eq!("skipNext".parse::<MediaCommand>(), Ok(MediaCommand::SkipNext));
        assert!("rewind".parse::<MediaCommand>().is_err());
    }

    #[test]
    fn relay_dispatches_to_controller_in_order() {
        let controller = Arc::new(RecordingController::default());
        let relay = MediaCommandRelay::new(Some(controller.clone()));

        assert_eq!(
            relay.relay("play"),
            RelayOutcome::Dispatched(MediaCommand::TogglePlayPause)
        );
        relay.relay("skipNext");
        relay.relay("skipPrevious");

        assert_eq!(
            *controller.calls.lock().expect("lock"),
            vec!["toggle", "next", "previous"]
        );
    }

    #[test]
    fn relay_without_controller_does_not_fail() {
        let relay = MediaCommandRelay::default();
        let outcome = relay.relay("pause");
        assert_eq!(
            outcome,
            RelayOutcome::NoController(MediaCommand::TogglePlayPause)
        );
        assert_eq!(outcome.label(), "no_controller");
    }

    #[test]
    fn relay_absorbs_controller_failures_and_unknown_commands() {
        let controller = Arc::new(RecordingController {
            fail: true,
            ..RecordingController::default()
        });
        let relay = MediaCommandRelay::new(Some(controller));

        assert!(matches!(
            relay.relay("skipNext"),
            RelayOutcome::ControllerFailed(MediaCommand::SkipNext, _)
        ));
        assert_eq!(
            relay.relay("eject"),
            RelayOutcome::Unknown("eject".to_string())
        );
    }
}
