// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Typed errors shared by the CDB builders, the executor and the response
//! decoders.
//!
//! Encoding and decoding failures are always returned as values, never
//! panics, so a presentation layer can still show partial information
//! (e.g. dump the raw sense bytes when structured decode fails).

use std::time::Duration;

use thiserror::Error;

/// A build-time parameter cannot be represented in its CDB field.
///
/// Raised before any I/O occurs; always recoverable by supplying a
/// corrected value. Builders reject, they never silently truncate.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("{field}: value {value:#x} exceeds field maximum {max:#x}")]
pub struct ParameterOutOfRange {
    /// Standard name of the offending CDB field.
    pub field: &'static str,
    pub value: u64,
    pub max: u64,
}

impl ParameterOutOfRange {
    /// Check `value` against the inclusive `max` of `field`.
    #[inline]
    pub fn check(field: &'static str, value: u64, max: u64) -> Result<(), Self> {
        if value > max {
            return Err(Self { field, value, max });
        }
        Ok(())
    }
}

/// Executor-level failures. A device CHECK CONDITION is *not* an
/// `ExecuteError`: it comes back as a successful call whose outcome has
/// `failed = true` plus sense bytes.
#[derive(Debug, Error)]
pub enum ExecuteError {
    /// The transport did not answer within the caller-supplied timeout.
    /// Distinct from a device-reported error: there is no sense data.
    #[error("transport did not respond within {waited:?}")]
    Timeout { waited: Duration },

    /// The transport could not submit the command at all.
    #[error("transport failure: {0}")]
    Transport(String),
}

/// Decoder-level failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// Fewer bytes than the format's minimum header requires.
    #[error("{what}: need >= {needed} bytes, got {got}")]
    Truncated {
        what: &'static str,
        needed: usize,
        got: usize,
    },

    /// The first byte does not carry a sense response code (0x70..0x73).
    #[error("not sense data: response code {code:#04x}")]
    NotSense { code: u8 },

    /// The caller asked for a TOC/PMA/ATIP format the family does not know.
    /// Feature lists never raise this: unknown feature codes stay raw.
    #[error("unknown response format {format:#04x}")]
    UnknownFormat { format: u8 },
}

impl DecodeError {
    /// Fail unless `buf` holds at least `needed` bytes for `what`.
    #[inline]
    pub fn need(what: &'static str, buf: &[u8], needed: usize) -> Result<(), Self> {
        if buf.len() < needed {
            return Err(Self::Truncated {
                what,
                needed,
                got: buf.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_reports_field() {
        let err = ParameterOutOfRange::check("LOGICAL BLOCK ADDRESS", 0x20_0000, 0x1F_FFFF)
            .expect_err("must reject");
        assert_eq!(err.field, "LOGICAL BLOCK ADDRESS");
        assert!(err.to_string().contains("0x200000"));
    }

    #[test]
    fn need_passes_exact_length() {
        assert!(DecodeError::need("hdr", &[0u8; 4], 4).is_ok());
        let err = DecodeError::need("hdr", &[0u8; 3], 4).expect_err("short");
        assert_eq!(
            err,
            DecodeError::Truncated {
                what: "hdr",
                needed: 4,
                got: 3
            }
        );
    }
}
