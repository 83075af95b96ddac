// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! REPORT DENSITY SUPPORT response decoders.
//!
//! The header is 4 bytes: AVAILABLE LENGTH (big-endian u16, bytes after
//! itself) plus two reserved bytes. What follows depends on the MEDIUM
//! TYPE bit of the CDB that asked — density descriptors (52 bytes) or
//! medium-type descriptors (56 bytes). Like the TOC family, the response
//! does not tag itself; the caller keeps the bit it set and calls the
//! matching parser.

use crate::{control_block::inquiry::trim_ascii, error::DecodeError};

/// One 52-byte density descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DensityDescriptor {
    pub primary_code: u8,
    pub secondary_code: u8,
    /// Device can write this density.
    pub wrtok: bool,
    /// Density is a duplicate of another entry.
    pub dup: bool,
    /// Device default.
    pub deflt: bool,
    pub bits_per_mm: u32,
    pub media_width: u16,
    pub tracks: u16,
    /// Megabytes.
    pub capacity: u32,
    pub organization: String,
    pub name: String,
    pub description: String,
}

/// One 56-byte medium-type descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediumTypeDescriptor {
    pub medium_type: u8,
    pub density_codes: Vec<u8>,
    pub media_width: u16,
    pub medium_length: u16,
    pub organization: String,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DensitySupport {
    pub descriptors: Vec<DensityDescriptor>,
    pub truncated: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediumTypeSupport {
    pub descriptors: Vec<MediumTypeDescriptor>,
    pub truncated: bool,
}

fn reported_end(buf: &[u8]) -> (usize, bool) {
    let declared = u16::from_be_bytes([buf[0], buf[1]]) as usize;
    let end = (2 + declared).min(buf.len());
    (end, 2 + declared > buf.len())
}

/// Decode density descriptors (MEDIUM TYPE bit clear in the request).
pub fn parse_density_support(buf: &[u8]) -> Result<DensitySupport, DecodeError> {
    DecodeError::need("density support header", buf, 4)?;
    let (end, mut truncated) = reported_end(buf);

    let mut descriptors = Vec::new();
    let mut off = 4usize;
    while off + 52 <= end {
        let d = &buf[off..off + 52];
        // some drives report a per-descriptor length; step by it when sane
        let desc_len = u16::from_be_bytes([d[3], d[4]]) as usize;
        descriptors.push(DensityDescriptor {
            primary_code: d[0],
            secondary_code: d[1],
            wrtok: d[2] & 0x80 != 0,
            dup: d[2] & 0x40 != 0,
            deflt: d[2] & 0x20 != 0,
            bits_per_mm: u32::from_be_bytes([0, d[5], d[6], d[7]]),
            media_width: u16::from_be_bytes([d[8], d[9]]),
            tracks: u16::from_be_bytes([d[10], d[11]]),
            capacity: u32::from_be_bytes([d[12], d[13], d[14], d[15]]),
            organization: trim_ascii(&d[16..24]),
            name: trim_ascii(&d[24..32]),
            description: trim_ascii(&d[32..52]),
        });
        off += if desc_len >= 48 { desc_len + 4 } else { 52 };
    }
    if off < end {
        truncated = true;
    }

    Ok(DensitySupport {
        descriptors,
        truncated,
    })
}

/// Decode medium-type descriptors (MEDIUM TYPE bit set in the request).
pub fn parse_medium_type_support(buf: &[u8]) -> Result<MediumTypeSupport, DecodeError> {
    DecodeError::need("density support header", buf, 4)?;
    let (end, mut truncated) = reported_end(buf);

    let mut descriptors = Vec::new();
    let mut off = 4usize;
    while off + 56 <= end {
        let d = &buf[off..off + 56];
        let n = (d[4] as usize).min(9);
        descriptors.push(MediumTypeDescriptor {
            medium_type: d[0],
            density_codes: d[5..5 + n].to_vec(),
            media_width: u16::from_be_bytes([d[14], d[15]]),
            medium_length: u16::from_be_bytes([d[16], d[17]]),
            organization: trim_ascii(&d[20..28]),
            name: trim_ascii(&d[28..36]),
            description: trim_ascii(&d[36..56]),
        });
        off += 56;
    }
    if off < end {
        truncated = true;
    }

    Ok(MediumTypeSupport {
        descriptors,
        truncated,
    })
}
