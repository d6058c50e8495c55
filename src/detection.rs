//! Face detections as seen by the controller.
//!
//! The detector is an external collaborator. It delivers batches of bounding
//! boxes on its own schedule; the controller only ever looks at the first box
//! of the most recent batch, through a [`DetectionSlot`].

use crate::{Error, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Face bounding box in frame pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Centre point of the box
    #[must_use]
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Single-slot buffer holding the latest delivered detection
///
/// Each delivery replaces whatever was pending, including with "no face".
/// [`DetectionSlot::take`] drains it, so a detection lives for one tick.
#[derive(Debug, Default, Clone)]
pub struct DetectionSlot {
    pending: Option<BoundingBox>,
}

impl DetectionSlot {
    #[must_use]
    pub const fn new() -> Self {
        Self { pending: None }
    }

    /// Store the first box of `batch`, dropping anything older
    pub fn publish(&mut self, batch: &[BoundingBox]) {
        self.pending = batch.first().copied();
    }

    /// Drain the pending detection
    pub fn take(&mut self) -> Option<BoundingBox> {
        self.pending.take()
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

/// Something that produces detection batches over time
pub trait DetectionSource {
    /// Batch delivered since the last poll, if the detector fired
    fn poll(&mut self, now: Duration) -> Option<Vec<BoundingBox>>;

    /// True once no further batches will arrive
    fn is_exhausted(&self) -> bool {
        false
    }
}

/// One entry of a detection timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptedEvent {
    /// Delivery time in milliseconds since start
    pub at_ms: u64,
    /// Faces delivered at that time (may be empty)
    #[serde(default)]
    pub faces: Vec<BoundingBox>,
}

/// YAML detection timeline
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectionScript {
    pub events: Vec<ScriptedEvent>,
}

/// Replays a recorded detection timeline
///
/// All events due at a poll are collapsed to the most recent one, matching
/// what a single-slot consumer would see.
pub struct ScriptedDetections {
    events: Vec<ScriptedEvent>,
    cursor: usize,
}

impl ScriptedDetections {
    /// Build from events, sorting them by time
    #[must_use]
    pub fn new(mut events: Vec<ScriptedEvent>) -> Self {
        events.sort_by_key(|e| e.at_ms);
        Self { events, cursor: 0 }
    }

    /// Load a timeline from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let script = Self::parse(&content)?;
        info!("Loaded {} detection events from {}", script.events.len(), path.display());
        Ok(script)
    }

    /// Parse a timeline from YAML text
    pub fn parse(content: &str) -> Result<Self> {
        let script: DetectionScript = serde_yaml::from_str(content)
            .map_err(|e| Error::DetectionSource(format!("Failed to parse detection script: {e}")))?;
        Ok(Self::new(script.events))
    }

    /// Events not yet delivered
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.events.len() - self.cursor
    }
}

impl DetectionSource for ScriptedDetections {
    fn poll(&mut self, now: Duration) -> Option<Vec<BoundingBox>> {
        let now_ms = u64::try_from(now.as_millis()).unwrap_or(u64::MAX);
        let mut latest = None;
        while let Some(event) = self.events.get(self.cursor) {
            if event.at_ms > now_ms {
                break;
            }
            if latest.is_some() {
                debug!("Superseded detection batch at {} ms", event.at_ms);
            }
            latest = Some(event.faces.clone());
            self.cursor += 1;
        }
        latest
    }

    fn is_exhausted(&self) -> bool {
        self.cursor >= self.events.len()
    }
}
