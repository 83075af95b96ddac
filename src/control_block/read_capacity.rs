// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! READ CAPACITY (10/16) — CDB fillers plus zero-copy response views.

use zerocopy::{
    FromBytes, Immutable, KnownLayout,
    byteorder::{BigEndian, U32, U64},
};

use crate::error::{DecodeError, ParameterOutOfRange};

pub const READ_CAPACITY_10: u8 = 0x25;
pub const SERVICE_ACTION_IN_16: u8 = 0x9E;
pub const SA_READ_CAPACITY_16: u8 = 0x10;

/// Fill a **READ CAPACITY(10)** CDB (opcode 0x25) into `cdb[0..10]`.
///
/// With `pmi = false` the device returns the maximum LBA and the logical
/// block length; `lba` is only meaningful when `pmi` is set. A max LBA of
/// `0xFFFF_FFFF` is the hint to issue READ CAPACITY(16) instead.
pub fn fill_read_capacity10(
    cdb: &mut [u8; 16],
    lba: u32,
    pmi: bool,
    control: u8,
) -> Result<usize, ParameterOutOfRange> {
    cdb.fill(0);
    cdb[0] = READ_CAPACITY_10;
    cdb[2..6].copy_from_slice(&lba.to_be_bytes()); // only used if PMI=1
    cdb[8] = pmi as u8;
    cdb[9] = control;
    Ok(10)
}

/// Fill a **READ CAPACITY(16)** CDB via SERVICE ACTION IN(16)
/// (opcode 0x9E, SA=0x10). Use `alloc_len = 32` for the full data.
pub fn fill_read_capacity16(
    cdb: &mut [u8; 16],
    lba: u64,
    pmi: bool,
    alloc_len: u32,
    control: u8,
) -> Result<usize, ParameterOutOfRange> {
    cdb.fill(0);
    cdb[0] = SERVICE_ACTION_IN_16;
    cdb[1] = SA_READ_CAPACITY_16;
    cdb[2..10].copy_from_slice(&lba.to_be_bytes()); // only used if PMI=1
    cdb[10..14].copy_from_slice(&alloc_len.to_be_bytes());
    cdb[14] = pmi as u8;
    cdb[15] = control;
    Ok(16)
}

/// Raw 8-byte parameter data returned by READ CAPACITY(10).
#[repr(C)]
#[derive(FromBytes, KnownLayout, Immutable, Debug)]
pub struct Capacity10 {
    /// Highest valid LBA on the device (bytes 0-3).
    pub max_lba: U32<BigEndian>,
    /// Size of each logical block in bytes (bytes 4-7).
    pub block_len: U32<BigEndian>,
}

/// Raw header (first 12 bytes) of READ CAPACITY(16) parameter data.
#[repr(C)]
#[derive(FromBytes, KnownLayout, Immutable, Debug)]
pub struct Capacity16 {
    /// 64-bit maximum LBA (bytes 0-7).
    pub max_lba: U64<BigEndian>,
    /// Size of each logical block in bytes (bytes 8-11).
    pub block_len: U32<BigEndian>,
}

impl Capacity10 {
    #[inline]
    pub fn total_bytes(&self) -> u64 {
        (self.max_lba.get() as u64 + 1) * self.block_len.get() as u64
    }

    /// If true, the device likely needs READ CAPACITY(16).
    #[inline]
    pub fn indicates_overflow(&self) -> bool {
        self.max_lba == u32::MAX
    }
}

impl Capacity16 {
    #[inline]
    pub fn total_bytes(&self) -> u128 {
        (self.max_lba.get() as u128 + 1) * self.block_len.get() as u128
    }
}

/// Parse READ CAPACITY(10) parameter data (needs >= 8 bytes).
#[inline]
pub fn parse_read_capacity10(buf: &[u8]) -> Result<&Capacity10, DecodeError> {
    let (raw, _rest) = Capacity10::ref_from_prefix(buf).map_err(|_| DecodeError::Truncated {
        what: "READ CAPACITY(10) data",
        needed: 8,
        got: buf.len(),
    })?;
    Ok(raw)
}

/// Parse READ CAPACITY(16) parameter data head (needs >= 12 bytes).
#[inline]
pub fn parse_read_capacity16(buf: &[u8]) -> Result<&Capacity16, DecodeError> {
    let (raw, _rest) = Capacity16::ref_from_prefix(buf).map_err(|_| DecodeError::Truncated {
        what: "READ CAPACITY(16) data",
        needed: 12,
        got: buf.len(),
    })?;
    Ok(raw)
}
