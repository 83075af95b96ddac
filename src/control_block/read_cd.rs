// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! READ CD (0xBE) and READ CD MSF (0xB9) — 12-byte CDB fillers.
//!
//! READ CD layout (MMC):
//!   [0]     = 0xBE
//!   [1]     = EXPECTED SECTOR TYPE (bits 4..2) | DAP (bit 1)
//!   [2..6]  = STARTING LBA (big-endian u32)
//!   [6..9]  = TRANSFER LENGTH (big-endian u24, in sectors)
//!   [9]     = SYNC[7] | HEADER CODES[6:5] | USER DATA[4] | EDC/ECC[3] |
//!             C2 ERROR FIELD[2:1]
//!   [10]    = SUB-CHANNEL SELECTION (bits 2..0)
//!   [11]    = CONTROL
//!
//! READ CD MSF replaces the LBA/length pair with two independent MSF
//! addresses (start inclusive, end exclusive):
//!   [3..6]  = STARTING MSF (M, S, F)
//!   [6..9]  = ENDING MSF (M, S, F)
//!
//! Start and end are separate parameters on purpose; collapsing them into
//! one address can only ever ask for an empty transfer.

use bitflags::bitflags;

use crate::{control_block::codec::Msf, error::ParameterOutOfRange};

pub const READ_CD: u8 = 0xBE;
pub const READ_CD_MSF: u8 = 0xB9;

/// EXPECTED SECTOR TYPE (CDB byte 1, bits 4..2).
#[repr(u8)]
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum ExpectedSectorType {
    #[default]
    Any = 0b000,
    CdDa = 0b001,
    Mode1 = 0b010,
    Mode2Formless = 0b011,
    Mode2Form1 = 0b100,
    Mode2Form2 = 0b101,
}

/// C2 ERROR FIELD selection (byte 9, bits 2..1).
#[repr(u8)]
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum C2ErrorField {
    #[default]
    None = 0b00,
    C2Pointers = 0b01,
    C2AndBlockError = 0b10,
}

/// HEADER CODES selection (byte 9, bits 6..5).
#[repr(u8)]
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum HeaderCodes {
    #[default]
    None = 0b00,
    HeaderOnly = 0b01,
    SubHeaderOnly = 0b10,
    AllHeaders = 0b11,
}

bitflags! {
    /// Single-bit main-channel selections of READ CD byte 9.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
    pub struct MainChannel: u8 {
        const SYNC     = 1 << 7;
        const USER_DATA = 1 << 4;
        const EDC_ECC  = 1 << 3;
    }
}

/// SUB-CHANNEL SELECTION (byte 10, bits 2..0).
#[repr(u8)]
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum SubChannel {
    #[default]
    None = 0b000,
    RawPw = 0b001,
    Q = 0b010,
    CorrectedPw = 0b100,
}

#[inline]
fn byte9(main: MainChannel, headers: HeaderCodes, c2: C2ErrorField) -> u8 {
    main.bits() | ((headers as u8) << 5) | ((c2 as u8) << 1)
}

/// Fill a **READ CD** CDB into `cdb[0..12]`.
///
/// `sectors` is a 24-bit count; larger values are rejected.
#[allow(clippy::too_many_arguments)]
pub fn fill_read_cd(
    cdb: &mut [u8; 16],
    lba: u32,
    sectors: u32,
    sector_type: ExpectedSectorType,
    dap: bool,
    main: MainChannel,
    headers: HeaderCodes,
    c2: C2ErrorField,
    subchannel: SubChannel,
    control: u8,
) -> Result<usize, ParameterOutOfRange> {
    ParameterOutOfRange::check("TRANSFER LENGTH", sectors as u64, 0xFF_FFFF)?;
    cdb.fill(0);
    cdb[0] = READ_CD;
    cdb[1] = ((sector_type as u8) << 2) | ((dap as u8) << 1);
    cdb[2..6].copy_from_slice(&lba.to_be_bytes());
    cdb[6] = (sectors >> 16) as u8;
    cdb[7] = (sectors >> 8) as u8;
    cdb[8] = sectors as u8;
    cdb[9] = byte9(main, headers, c2);
    cdb[10] = subchannel as u8;
    cdb[11] = control;
    Ok(12)
}

/// Convenience: full 2352-byte raw sectors (sync + headers + data + EDC),
/// no sub-channel.
#[inline]
pub fn fill_read_cd_raw(
    cdb: &mut [u8; 16],
    lba: u32,
    sectors: u32,
) -> Result<usize, ParameterOutOfRange> {
    fill_read_cd(
        cdb,
        lba,
        sectors,
        ExpectedSectorType::Any,
        false,
        MainChannel::SYNC | MainChannel::USER_DATA | MainChannel::EDC_ECC,
        HeaderCodes::AllHeaders,
        C2ErrorField::None,
        SubChannel::None,
        0x00,
    )
}

fn check_msf(field: &'static str, msf: Msf) -> Result<(), ParameterOutOfRange> {
    if msf.second >= 60 {
        return Err(ParameterOutOfRange {
            field,
            value: msf.second as u64,
            max: 59,
        });
    }
    if msf.frame >= 75 {
        return Err(ParameterOutOfRange {
            field,
            value: msf.frame as u64,
            max: 74,
        });
    }
    Ok(())
}

/// Fill a **READ CD MSF** CDB into `cdb[0..12]`.
///
/// `start` is inclusive, `end` exclusive; both are validated for
/// second < 60 and frame < 75.
#[allow(clippy::too_many_arguments)]
pub fn fill_read_cd_msf(
    cdb: &mut [u8; 16],
    start: Msf,
    end: Msf,
    sector_type: ExpectedSectorType,
    dap: bool,
    main: MainChannel,
    headers: HeaderCodes,
    c2: C2ErrorField,
    subchannel: SubChannel,
    control: u8,
) -> Result<usize, ParameterOutOfRange> {
    check_msf("STARTING MSF", start)?;
    check_msf("ENDING MSF", end)?;
    cdb.fill(0);
    cdb[0] = READ_CD_MSF;
    cdb[1] = ((sector_type as u8) << 2) | ((dap as u8) << 1);
    cdb[3] = start.minute;
    cdb[4] = start.second;
    cdb[5] = start.frame;
    cdb[6] = end.minute;
    cdb[7] = end.second;
    cdb[8] = end.frame;
    cdb[9] = byte9(main, headers, c2);
    cdb[10] = subchannel as u8;
    cdb[11] = control;
    Ok(12)
}
