// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Command executor: one CDB in, one [`CommandOutcome`] out.
//!
//! The executor performs no retries and owns no timeout of its own; the
//! caller supplies the deadline per call, so the same transport can serve
//! a 2-second TEST UNIT READY and a 10-minute vendor read back to back.
//! A timeout is surfaced as [`ExecuteError::Timeout`], which is a
//! different animal from a device CHECK CONDITION: the latter is a
//! *successful* execution whose outcome says `failed = true` and carries
//! sense bytes.

use std::time::Duration;

use anyhow::{Context, Result};
use bytes::Bytes;
use tracing::{debug, warn};

use crate::{
    client::transport::{Transport, TransportError},
    control_block::command::{Cdb, DataDirection, ScsiCommand},
    error::{DecodeError, ExecuteError},
    models::sense::SenseData,
};

/// Result of one executed command.
///
/// `failed = true` means the device reported an error and `sense` should
/// be interpreted; `data` may still be present when the device moved
/// bytes before failing.
#[derive(Debug, Clone, Default)]
pub struct CommandOutcome {
    pub data: Option<Bytes>,
    pub sense: Option<Bytes>,
    pub failed: bool,
    pub elapsed: Duration,
}

impl CommandOutcome {
    /// Decode the sense buffer, if any came back.
    ///
    /// Returns `None` when the device sent no sense at all; the decode
    /// itself may still fail on garbage, in which case the raw bytes in
    /// `self.sense` remain available for display.
    pub fn sense_data(&self) -> Option<Result<SenseData, DecodeError>> {
        self.sense.as_ref().map(|s| SenseData::parse(s))
    }
}

/// Execute a raw CDB against `transport`.
///
/// `expected_len` is the data-in byte count the caller anticipates; the
/// device may return less. Blocks the calling thread up to `timeout`.
pub fn execute(
    transport: &mut dyn Transport,
    cdb: &[u8],
    direction: DataDirection,
    expected_len: u32,
    timeout: Duration,
) -> Result<CommandOutcome, ExecuteError> {
    debug_assert!(matches!(cdb.len(), 6 | 10 | 12 | 16));

    let opcode = cdb[0];
    let reply = match transport.submit(cdb, direction, expected_len, timeout) {
        Ok(reply) => reply,
        Err(TransportError::Timeout) => {
            warn!(opcode, ?timeout, "command timed out");
            return Err(ExecuteError::Timeout { waited: timeout });
        },
        Err(TransportError::Failed(msg)) => return Err(ExecuteError::Transport(msg)),
    };

    debug!(
        opcode,
        failed = reply.failed,
        data_len = reply.data.as_ref().map(Bytes::len).unwrap_or(0),
        sense_len = reply.sense.as_ref().map(Bytes::len).unwrap_or(0),
        elapsed_us = reply.elapsed.as_micros() as u64,
        "command completed"
    );

    Ok(CommandOutcome {
        data: reply.data,
        sense: reply.sense,
        failed: reply.failed,
        elapsed: reply.elapsed,
    })
}

/// Execute a typed [`ScsiCommand`]: fills the CDB through the dispatch
/// union, derives the expected transfer from the command's own allocation
/// field where it has one.
///
/// `expected_len` overrides the derived value; block reads, whose byte
/// count depends on the device's block size, require it.
pub fn execute_command(
    transport: &mut dyn Transport,
    command: &ScsiCommand,
    expected_len: Option<u32>,
    timeout: Duration,
) -> Result<CommandOutcome> {
    let mut cdb = [0u8; 16];
    let len = command
        .fill(&mut cdb)
        .with_context(|| format!("{} parameters out of range", command.name()))?;

    let expected = match expected_len.or_else(|| command.allocation()) {
        Some(n) => n,
        None => anyhow::bail!(
            "{} needs an explicit expected transfer length",
            command.name()
        ),
    };

    execute(transport, &cdb[..len], command.direction(), expected, timeout)
        .with_context(|| format!("{} failed", command.name()))
}
