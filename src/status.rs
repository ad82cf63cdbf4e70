use std::fmt;
use std::path::PathBuf;
use tracing::info;

/// Status line shown under the stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Running,
    /// No sensor was ready when the session opened
    NoSensor,
    /// The sensor went away while streaming
    SensorNotAvailable,
    SavedScreenshot(PathBuf),
    FailedScreenshot(PathBuf),
}

impl Status {
    /// Status for an availability change
    #[must_use]
    pub fn from_availability(available: bool) -> Self {
        if available {
            Self::Running
        } else {
            Self::SensorNotAvailable
        }
    }

    /// Status right after opening a session
    #[must_use]
    pub fn on_open(available: bool) -> Self {
        if available { Self::Running } else { Self::NoSensor }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Running => write!(f, "Running"),
            Self::NoSensor => write!(f, "No ready Kinect found!"),
            Self::SensorNotAvailable => write!(f, "Kinect not available!"),
            Self::SavedScreenshot(path) => write!(f, "Saved screenshot to {}", path.display()),
            Self::FailedScreenshot(path) => {
                write!(f, "Failed to write screenshot to {}", path.display())
            }
        }
    }
}

/// Holds the current status and reports changes
#[derive(Debug, Default)]
pub struct StatusBar {
    current: Option<Status>,
}

impl StatusBar {
    #[must_use]
    pub fn current(&self) -> Option<&Status> {
        self.current.as_ref()
    }

    /// Replace the status; returns `true` if the text changed
    pub fn set(&mut self, status: Status) -> bool {
        if self.current.as_ref() == Some(&status) {
            return false;
        }
        info!(status = %status, "status changed");
        self.current = Some(status);
        true
    }
}
