// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Scripted transport for unit tests. It records submitted CDBs and plays
//! back queued replies in order; an empty queue behaves like a dead
//! device (timeout).

use std::{collections::VecDeque, time::Duration};

use bytes::Bytes;

use crate::{
    client::transport::{Transport, TransportError, TransportReply},
    control_block::command::DataDirection,
};

/// One scripted round trip.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// GOOD status with data-in bytes.
    Data(Vec<u8>),
    /// GOOD status, no data phase.
    Good,
    /// CHECK CONDITION carrying these sense bytes (and no data).
    Check(Vec<u8>),
    /// CHECK CONDITION with both partial data and sense.
    CheckWithData(Vec<u8>, Vec<u8>),
    /// The device never answers.
    Timeout,
}

/// Records every submission and replays [`MockReply`]s front to back.
#[derive(Debug, Default)]
pub struct MockTransport {
    replies: VecDeque<MockReply>,
    /// Every CDB handed to [`Transport::submit`], in order.
    pub submitted: Vec<Vec<u8>>,
    /// Direction/expected-length pairs, parallel to `submitted`.
    pub transfers: Vec<(DataDirection, u32)>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_reply(&mut self, reply: MockReply) {
        self.replies.push_back(reply);
    }

    /// Last CDB submitted, if any.
    pub fn last_cdb(&self) -> Option<&[u8]> {
        self.submitted.last().map(Vec::as_slice)
    }
}

impl Transport for MockTransport {
    fn submit(
        &mut self,
        cdb: &[u8],
        direction: DataDirection,
        expected_len: u32,
        _timeout: Duration,
    ) -> Result<TransportReply, TransportError> {
        self.submitted.push(cdb.to_vec());
        self.transfers.push((direction, expected_len));

        let elapsed = Duration::from_micros(250);
        match self.replies.pop_front() {
            Some(MockReply::Data(data)) => Ok(TransportReply {
                data: Some(Bytes::from(data)),
                sense: None,
                failed: false,
                elapsed,
            }),
            Some(MockReply::Good) => Ok(TransportReply {
                data: None,
                sense: None,
                failed: false,
                elapsed,
            }),
            Some(MockReply::Check(sense)) => Ok(TransportReply {
                data: None,
                sense: Some(Bytes::from(sense)),
                failed: true,
                elapsed,
            }),
            Some(MockReply::CheckWithData(data, sense)) => Ok(TransportReply {
                data: Some(Bytes::from(data)),
                sense: Some(Bytes::from(sense)),
                failed: true,
                elapsed,
            }),
            Some(MockReply::Timeout) | None => Err(TransportError::Timeout),
        }
    }
}
