//! Outbound actuator command rate limiting and encoding.

use crate::pose::Pose;
use crate::transport::ActuatorLink;
use crate::utils::safe_cast::f64_to_i32_trunc;
use log::{debug, warn};
use std::fmt;
use std::time::Duration;

/// Position command understood by the actuator firmware
///
/// Encoded as ASCII `H<int>V<int>\n` with both angles truncated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActuatorCommand {
    pub horizontal: i32,
    pub vertical: i32,
}

impl ActuatorCommand {
    /// Build a command from a pose, truncating toward zero
    #[must_use]
    pub fn from_pose(pose: &Pose) -> Self {
        Self {
            horizontal: f64_to_i32_trunc(pose.horizontal),
            vertical: f64_to_i32_trunc(pose.vertical),
        }
    }

    /// Wire encoding
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        self.to_string().into_bytes()
    }
}

impl fmt::Display for ActuatorCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "H{}V{}", self.horizontal, self.vertical)
    }
}

/// Limits how often poses are sent to the actuator
pub struct CommandThrottle {
    send_interval: Duration,
    last_sent_at: Option<Duration>,
    sent: u64,
}

impl CommandThrottle {
    #[must_use]
    pub const fn new(send_interval: Duration) -> Self {
        Self {
            send_interval,
            last_sent_at: None,
            sent: 0,
        }
    }

    /// Command for `pose` if the link is up and the interval has passed
    ///
    /// The interval check is strict: a command exactly `send_interval` after
    /// the previous one is held back.
    pub fn maybe_send(&mut self, pose: &Pose, now: Duration, connected: bool) -> Option<ActuatorCommand> {
        if !connected {
            return None;
        }
        if let Some(last) = self.last_sent_at {
            if now.saturating_sub(last) <= self.send_interval {
                return None;
            }
        }
        self.last_sent_at = Some(now);
        self.sent += 1;
        Some(ActuatorCommand::from_pose(pose))
    }

    /// Throttle `pose` and write it to `link`
    ///
    /// Write failures are logged and the link drops itself to disconnected;
    /// the pose is superseded by the next tick.
    pub fn send_to(&mut self, link: &mut dyn ActuatorLink, pose: &Pose, now: Duration) -> Option<ActuatorCommand> {
        let command = self.maybe_send(pose, now, link.is_connected())?;
        match link.write(&command.to_bytes()) {
            Ok(()) => {
                debug!("Sent {}", command.to_string().trim_end());
                Some(command)
            }
            Err(e) => {
                warn!("Failed to send actuator command: {e}");
                None
            }
        }
    }

    /// Number of commands emitted so far
    #[must_use]
    pub const fn sent_count(&self) -> u64 {
        self.sent
    }

    #[must_use]
    pub const fn last_sent_at(&self) -> Option<Duration> {
        self.last_sent_at
    }
}
