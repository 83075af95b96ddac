// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::{fs, path::Path, time::Duration};

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};

/// Rough duration classes commands fall into; the executor itself takes
/// an explicit timeout per call, these are just the configured defaults a
/// caller picks from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeoutClass {
    /// TEST UNIT READY, INQUIRY, MODE SENSE, ...
    Query,
    /// Block and sector reads.
    Read,
    /// Eject, close session, long vendor reads.
    Long,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Config {
    /// Which device to open and how to talk to it.
    pub device: DeviceConfig,
    /// Per-class command deadlines.
    pub timeouts: TimeoutConfig,
    /// Default allocation lengths for the query commands.
    pub allocation: AllocationConfig,
    /// Logging sink and verbosity.
    pub logger: LogConfig,
}

/// Device-level settings that never ride in a CDB.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct DeviceConfig {
    #[serde(rename = "Path")]
    /// Pass-through node (e.g. /dev/sg1); opened by the transport layer.
    pub path: String,

    #[serde(default = "default_sense_len", rename = "SenseLength")]
    /// Autosense bytes to request from the transport; >= 18 so fixed
    /// format fits whole.
    pub sense_length: u8,
}

fn default_sense_len() -> u8 {
    32
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct TimeoutConfig {
    #[serde(rename = "QuerySeconds", with = "serde_secs")]
    pub query: Duration,
    #[serde(rename = "ReadSeconds", with = "serde_secs")]
    pub read: Duration,
    #[serde(rename = "LongSeconds", with = "serde_secs")]
    pub long: Duration,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct AllocationConfig {
    #[serde(rename = "Inquiry")]
    pub inquiry: u8,
    #[serde(rename = "ModeSense")]
    pub mode_sense: u16,
    #[serde(rename = "Toc")]
    pub toc: u16,
    #[serde(rename = "Features")]
    pub features: u16,
}

/// Logging configuration, consumed by [`crate::cfg::logger::init_logger`].
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct LogConfig {
    /// An `EnvFilter` directive, e.g. `info` or `scsi_probe_rs=debug`.
    pub level: String,
    /// `stdout`, `stderr`, or `file`.
    pub output: String,
    pub is_show_line: bool,
    pub is_show_module_path: bool,
    pub is_show_target: bool,
    pub file: Option<LogFileConfig>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct LogFileConfig {
    pub path: String,
    pub rotation_frequency: Option<String>,
}

impl Config {
    /// Loads the configuration from YAML, validates it, and returns the
    /// ready-to-use value.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let s = fs::read_to_string(path)?;
        let cfg: Config = serde_yaml::from_str(&s).context("failed to parse config YAML")?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Validates invariants the rest of the crate relies on.
    pub fn validate(&self) -> Result<()> {
        ensure!(!self.device.path.is_empty(), "device Path must not be empty");
        ensure!(
            self.device.sense_length >= 18,
            "SenseLength must be >= 18 (fixed sense format)"
        );
        ensure!(
            self.timeouts.query >= Duration::from_secs(1)
                && self.timeouts.read >= Duration::from_secs(1)
                && self.timeouts.long >= Duration::from_secs(1),
            "all timeouts must be >= 1 second"
        );
        ensure!(
            self.allocation.toc >= 4 && self.allocation.features >= 8,
            "allocation lengths must cover the response headers"
        );
        Ok(())
    }

    /// Configured deadline for a command class.
    pub fn timeout(&self, class: TimeoutClass) -> Duration {
        match class {
            TimeoutClass::Query => self.timeouts.query,
            TimeoutClass::Read => self.timeouts.read,
            TimeoutClass::Long => self.timeouts.long,
        }
    }
}

/// Serde helpers for representing `Duration` as a number of seconds.
mod serde_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }
    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let secs = u64::deserialize(d)?;
        Ok(Duration::from_secs(secs))
    }
}
