#![warn(missing_docs)]
//! Deterministic testing surfaces for navigation scenarios.

mod micro_navtest;
mod snapshot;
mod worlds;

use anyhow::Result;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use voxelnav_core::SimTick;

pub use micro_navtest::*;
pub use snapshot::*;
pub use worlds::*;

/// Primary event record captured by headless navigation tests.
#[derive(Debug, Serialize)]
pub struct EventRecord<'a> {
    /// Simulation tick when the event occurred.
    pub tick: SimTick,
    /// Human-readable kind label.
    pub kind: &'a str,
    /// Free-form payload for smoke tests.
    pub payload: &'a str,
}

/// A sink that writes newline-delimited JSON to disk.
pub struct JsonlSink {
    file: File,
}

impl JsonlSink {
    /// Create a new sink at `path`.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self { file })
    }

    /// Append an event to the log.
    pub fn write(&mut self, event: &EventRecord<'_>) -> Result<()> {
        let line = serde_json::to_string(event)?;
        self.file.write_all(line.as_bytes())?;
        self.file.write_all(b"\n")?;
        Ok(())
    }
}
