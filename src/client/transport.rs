// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! The pass-through transport contract.
//!
//! A [`Transport`] wraps one device handle (an SG_IO fd, a SPTI handle, a
//! USB mass-storage pipe, ...) and carries exactly one CDB at a time.
//! Requiring `&mut self` makes the one-in-flight-command-per-unit rule a
//! borrow-check fact rather than a convention; independent handles can be
//! driven from independent threads freely.
//!
//! The transport owns everything the core does not: submitting the CDB to
//! the OS, collecting data and sense buffers, and discarding a late reply
//! after the core has already given up on the command.

use std::time::Duration;

use bytes::Bytes;
use thiserror::Error;

use crate::control_block::command::DataDirection;

/// What came back from one pass-through round trip.
#[derive(Debug, Clone, Default)]
pub struct TransportReply {
    /// Data-in bytes, when the command had an IN phase and the device
    /// returned anything (possibly despite an error).
    pub data: Option<Bytes>,
    /// Autosense bytes; meaningful when `failed` is set, possibly shorter
    /// than the nominal sense length.
    pub sense: Option<Bytes>,
    /// Device completed the command with CHECK CONDITION (or worse).
    pub failed: bool,
    /// Wall-clock time the round trip took.
    pub elapsed: Duration,
}

/// Transport-level failure; device-reported errors are *not* errors at
/// this level, they travel inside [`TransportReply::failed`].
#[derive(Debug, Error)]
pub enum TransportError {
    /// Nothing came back within the deadline handed to [`Transport::submit`].
    #[error("no response within deadline")]
    Timeout,

    /// The command could not be submitted or the handle broke.
    #[error("{0}")]
    Failed(String),
}

/// One device handle capable of synchronous pass-through.
pub trait Transport {
    /// Submit `cdb`, block until completion or `timeout`, and return the
    /// reply. Implementations must report expiry as
    /// [`TransportError::Timeout`], never as a fake device error.
    fn submit(
        &mut self,
        cdb: &[u8],
        direction: DataDirection,
        expected_len: u32,
        timeout: Duration,
    ) -> Result<TransportReply, TransportError>;
}
