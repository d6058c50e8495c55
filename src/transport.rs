//! Actuator link: the byte sink that carries position commands.
//!
//! The controller only ever asks a link whether it is connected and hands it
//! bytes. Opening, closing and reconnecting belong to the link itself.

use crate::{Error, Result};
use log::{info, warn};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Lifecycle notifications that gate `is_connected`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkEvent {
    /// Port opened and ready for writes
    Opened,
    /// Port closed on purpose
    Closed,
    /// Port failed
    Error(String),
}

/// Byte-oriented command sink
pub trait ActuatorLink {
    /// Whether writes are currently accepted
    fn is_connected(&self) -> bool;

    /// Write one encoded command
    fn write(&mut self, bytes: &[u8]) -> Result<()>;

    /// Apply a lifecycle event
    fn handle_event(&mut self, event: LinkEvent);

    /// Link-owned maintenance, called once per tick
    fn poll(&mut self, _now: Duration) {}

    /// Human readable name for logs
    fn name(&self) -> &str;
}

/// Where a [`DeviceLink`] finds its device
#[derive(Debug, Clone, PartialEq, Eq)]
enum PortSource {
    /// Always the same path
    Fixed(PathBuf),
    /// Rescan this directory on every open attempt
    Discover(PathBuf),
}

/// Link writing to a character device such as `/dev/ttyACM0`
///
/// A failed open or write drops the link to disconnected and schedules a
/// reopen `retry_interval` later. An explicit [`close`](Self::close) stops
/// reopening altogether.
///
/// The device is opened as a plain file and the line speed is left as the
/// kernel has it. CDC-ACM boards (`ttyACM*`, `cu.usbmodem*`) ignore the baud
/// rate; USB-UART adapters (`ttyUSB*`) must be configured beforehand, e.g.
/// `stty -F /dev/ttyUSB0 9600 raw`.
pub struct DeviceLink {
    source: PortSource,
    name: String,
    file: Option<File>,
    retry_interval: Duration,
    next_attempt: Option<Duration>,
    last_poll: Duration,
    closed: bool,
}

impl DeviceLink {
    /// Create a link to `path`; the device is opened on the first poll
    #[must_use]
    pub fn new<P: AsRef<Path>>(path: P, retry_interval: Duration) -> Self {
        let path = path.as_ref().to_path_buf();
        let name = path.display().to_string();
        Self::with_source(PortSource::Fixed(path), name, retry_interval)
    }

    /// Create a link that picks a port from `ports_dir` on every open attempt
    ///
    /// With no candidate present the link stays disconnected and looks again
    /// after `retry_interval`, so a board plugged in later is still found.
    #[must_use]
    pub fn discover<P: AsRef<Path>>(ports_dir: P, retry_interval: Duration) -> Self {
        let dir = ports_dir.as_ref().to_path_buf();
        let name = format!("auto:{}", dir.display());
        Self::with_source(PortSource::Discover(dir), name, retry_interval)
    }

    fn with_source(source: PortSource, name: String, retry_interval: Duration) -> Self {
        Self {
            source,
            name,
            file: None,
            retry_interval,
            next_attempt: None,
            last_poll: Duration::ZERO,
            closed: false,
        }
    }

    /// Close the device without scheduling a reopen
    pub fn close(&mut self) {
        self.handle_event(LinkEvent::Closed);
        self.next_attempt = None;
        self.closed = true;
    }

    /// Time of the next scheduled open attempt
    #[must_use]
    pub const fn next_attempt(&self) -> Option<Duration> {
        self.next_attempt
    }

    fn resolve_path(&self) -> Option<PathBuf> {
        match &self.source {
            PortSource::Fixed(path) => Some(path.clone()),
            PortSource::Discover(dir) => match discover_ports(dir) {
                Ok(ports) => select_port(&ports).map(PathBuf::from),
                Err(e) => {
                    warn!("Failed to list serial ports in {}: {e}", dir.display());
                    None
                }
            },
        }
    }

    fn open(&mut self, now: Duration) {
        let Some(path) = self.resolve_path() else {
            warn!("No serial ports found for {}, retrying in {:?}", self.name, self.retry_interval);
            self.next_attempt = Some(now + self.retry_interval);
            return;
        };

        self.name = path.display().to_string();
        info!("Opening port: {}", self.name);
        match OpenOptions::new().write(true).open(&path) {
            Ok(file) => {
                self.file = Some(file);
                self.next_attempt = None;
                self.handle_event(LinkEvent::Opened);
            }
            Err(e) => {
                self.handle_event(LinkEvent::Error(e.to_string()));
                self.next_attempt = Some(now + self.retry_interval);
            }
        }
    }
}

impl ActuatorLink for DeviceLink {
    fn is_connected(&self) -> bool {
        self.file.is_some()
    }

    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        let file = self
            .file
            .as_mut()
            .ok_or_else(|| Error::Transport(format!("{} is not open", self.name)))?;

        if let Err(e) = file.write_all(bytes).and_then(|()| file.flush()) {
            let message = e.to_string();
            self.handle_event(LinkEvent::Error(message.clone()));
            self.next_attempt = Some(self.last_poll + self.retry_interval);
            return Err(Error::Transport(message));
        }
        Ok(())
    }

    fn handle_event(&mut self, event: LinkEvent) {
        match event {
            LinkEvent::Opened => info!("Serial port opened: {}", self.name),
            LinkEvent::Closed => {
                self.file = None;
                info!("Serial port closed: {}", self.name);
            }
            LinkEvent::Error(message) => {
                self.file = None;
                warn!("Serial port error on {}: {message}", self.name);
            }
        }
    }

    fn poll(&mut self, now: Duration) {
        self.last_poll = now;
        if self.file.is_some() || self.closed {
            return;
        }
        match self.next_attempt {
            Some(at) if now < at => {}
            _ => self.open(now),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Dry-run link: always connected, logs each command and keeps only the last
#[derive(Debug, Default)]
pub struct LogLink {
    sent: u64,
    last: Option<String>,
}

impl LogLink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of commands accepted
    #[must_use]
    pub const fn sent(&self) -> u64 {
        self.sent
    }

    /// Most recent command, if any
    #[must_use]
    pub fn last(&self) -> Option<&str> {
        self.last.as_deref()
    }
}

impl ActuatorLink for LogLink {
    fn is_connected(&self) -> bool {
        true
    }

    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        let command = String::from_utf8_lossy(bytes);
        info!("Dry run: {}", command.trim_end());
        self.sent += 1;
        match &mut self.last {
            Some(last) => {
                last.clear();
                last.push_str(&command);
            }
            None => self.last = Some(command.into_owned()),
        }
        Ok(())
    }

    fn handle_event(&mut self, _event: LinkEvent) {}

    fn name(&self) -> &str {
        "dry-run"
    }
}

/// In-memory link recording every command written to it, for tests
#[derive(Debug, Default)]
pub struct MemoryLink {
    connected: bool,
    fail_writes: bool,
    written: Vec<String>,
}

impl MemoryLink {
    /// A link that starts connected
    #[must_use]
    pub fn connected() -> Self {
        Self {
            connected: true,
            ..Self::default()
        }
    }

    /// Make subsequent writes fail as if the port broke
    pub fn fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// Commands written so far, in order
    #[must_use]
    pub fn written(&self) -> &[String] {
        &self.written
    }
}

impl ActuatorLink for MemoryLink {
    fn is_connected(&self) -> bool {
        self.connected
    }

    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        if !self.connected {
            return Err(Error::Transport("memory link is not connected".to_string()));
        }
        if self.fail_writes {
            self.handle_event(LinkEvent::Error("simulated write failure".to_string()));
            return Err(Error::Transport("simulated write failure".to_string()));
        }
        self.written.push(String::from_utf8_lossy(bytes).into_owned());
        Ok(())
    }

    fn handle_event(&mut self, event: LinkEvent) {
        self.connected = matches!(event, LinkEvent::Opened);
    }

    fn name(&self) -> &str {
        "memory"
    }
}

/// Pick the port most likely to be the actuator board
///
/// Prefers names mentioning `arduino` or `usbmodem`, or `com` without
/// `bluetooth`; otherwise falls back to the first entry.
#[must_use]
pub fn select_port(ports: &[String]) -> Option<&String> {
    ports
        .iter()
        .find(|port| {
            let name = port.to_lowercase();
            name.contains("arduino")
                || name.contains("usbmodem")
                || (name.contains("com") && !name.contains("bluetooth"))
        })
        .or_else(|| ports.first())
}

/// List USB serial candidates in `dir` (normally `/dev`), sorted
pub fn discover_ports<P: AsRef<Path>>(dir: P) -> Result<Vec<String>> {
    const PREFIXES: [&str; 4] = ["ttyACM", "ttyUSB", "cu.", "tty.usb"];

    let mut ports = Vec::new();
    for entry in std::fs::read_dir(dir.as_ref())? {
        let entry = entry?;
        let file_name = entry.file_name();
        let name = file_name.to_string_lossy();
        if PREFIXES.iter().any(|prefix| name.starts_with(prefix)) {
            ports.push(entry.path().display().to_string());
        }
    }
    ports.sort();
    info!("Available serial ports: {ports:?}");
    Ok(ports)
}
