// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! READ DISC STRUCTURE (0xAD) — 12-byte CDB filler.
//!
//! CDB layout (MMC):
//!   [0]     = 0xAD
//!   [1]     = MEDIA TYPE (low 4 bits: 0 = DVD/HD DVD, 1 = BD)
//!   [2..6]  = ADDRESS (big-endian u32; meaning depends on format)
//!   [6]     = LAYER NUMBER
//!   [7]     = FORMAT
//!   [8..10] = ALLOCATION LENGTH (big-endian u16)
//!   [10]    = AGID (bits 7..6)
//!   [11]    = CONTROL
//!
//! FORMAT values are structure-specific (0x00 physical format info, 0x01
//! copyright info, 0x04 manufacturing info, ...); the returned payload is
//! opaque at this layer.

use crate::error::ParameterOutOfRange;

pub const READ_DISC_STRUCTURE: u8 = 0xAD;

/// MEDIA TYPE field (byte 1, low 4 bits).
#[repr(u8)]
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum StructureMediaType {
    #[default]
    DvdHdDvd = 0x0,
    Bd = 0x1,
}

/// Fill a READ DISC STRUCTURE CDB into `cdb[0..12]`.
///
/// `agid` is the 2-bit authentication grant ID used by copyright formats;
/// pass 0 otherwise.
#[allow(clippy::too_many_arguments)]
pub fn fill_read_disc_structure(
    cdb: &mut [u8; 16],
    media: StructureMediaType,
    address: u32,
    layer: u8,
    format: u8,
    allocation_len: u16,
    agid: u8,
    control: u8,
) -> Result<usize, ParameterOutOfRange> {
    ParameterOutOfRange::check("AGID", agid as u64, 0x03)?;
    cdb.fill(0);
    cdb[0] = READ_DISC_STRUCTURE;
    cdb[1] = media as u8;
    cdb[2..6].copy_from_slice(&address.to_be_bytes());
    cdb[6] = layer;
    cdb[7] = format;
    cdb[8..10].copy_from_slice(&allocation_len.to_be_bytes());
    cdb[10] = agid << 6;
    cdb[11] = control;
    Ok(12)
}
