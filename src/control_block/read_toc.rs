// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! READ TOC/PMA/ATIP (0x43) — 10-byte CDB filler.
//!
//! CDB layout (MMC):
//!   [0]    = 0x43
//!   [1]    = MSF (bit 1; LBA addressing when clear)
//!   [2]    = FORMAT (low 4 bits, 0..=5)
//!   [6]    = TRACK/SESSION NUMBER (meaning depends on format)
//!   [7..9] = ALLOCATION LENGTH (big-endian u16)
//!   [9]    = CONTROL
//!
//! The response layout is selected by the FORMAT field of the *request*;
//! nothing inside the returned buffer repeats it. Callers must keep the
//! format they asked for and hand it back to
//! [`crate::models::toc::parse_toc_pma_atip`].

use crate::error::ParameterOutOfRange;

pub const READ_TOC_PMA_ATIP: u8 = 0x43;

/// FORMAT field values (CDB byte 2).
#[repr(u8)]
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum TocFormat {
    /// Formatted TOC: one descriptor per track plus lead-out.
    #[default]
    Toc = 0x00,
    /// Session info: first/last session plus first track of last session.
    Session = 0x01,
    /// Raw Q sub-channel data from the lead-in.
    FullToc = 0x02,
    /// Program Memory Area (recordable media).
    Pma = 0x03,
    /// Absolute Time In Pregroove (CD-R/RW only).
    Atip = 0x04,
    /// CD-TEXT packs stored in the lead-in.
    CdText = 0x05,
}

impl TryFrom<u8> for TocFormat {
    type Error = crate::error::DecodeError;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        Ok(match v {
            0x00 => Self::Toc,
            0x01 => Self::Session,
            0x02 => Self::FullToc,
            0x03 => Self::Pma,
            0x04 => Self::Atip,
            0x05 => Self::CdText,
            other => return Err(crate::error::DecodeError::UnknownFormat { format: other }),
        })
    }
}

/// Fill a READ TOC/PMA/ATIP CDB into `cdb[0..10]`.
///
/// `track_session`: starting track for [`TocFormat::Toc`], session number
/// for [`TocFormat::FullToc`]; ignored by the other formats (pass 0).
pub fn fill_read_toc(
    cdb: &mut [u8; 16],
    msf: bool,
    format: TocFormat,
    track_session: u8,
    allocation_len: u16,
    control: u8,
) -> Result<usize, ParameterOutOfRange> {
    cdb.fill(0);
    cdb[0] = READ_TOC_PMA_ATIP;
    cdb[1] = (msf as u8) << 1;
    cdb[2] = format as u8;
    cdb[6] = track_session;
    cdb[7..9].copy_from_slice(&allocation_len.to_be_bytes());
    cdb[9] = control;
    Ok(10)
}

/// Convenience: formatted TOC in LBA addressing from track 0.
#[inline]
pub fn fill_read_toc_simple(
    cdb: &mut [u8; 16],
    allocation_len: u16,
) -> Result<usize, ParameterOutOfRange> {
    fill_read_toc(cdb, false, TocFormat::Toc, 0, allocation_len, 0x00)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toc_cdb_layout() {
        let mut cdb = [0u8; 16];
        let n = fill_read_toc(&mut cdb, true, TocFormat::Atip, 0, 804, 0).expect("builds");
        assert_eq!(n, 10);
        assert_eq!(cdb[0], 0x43);
        assert_eq!(cdb[1], 0x02); // MSF
        assert_eq!(cdb[2], 0x04); // ATIP
        assert_eq!(&cdb[7..9], &804u16.to_be_bytes());
    }

    #[test]
    fn format_round_trip() {
        for f in [
            TocFormat::Toc,
            TocFormat::Session,
            TocFormat::FullToc,
            TocFormat::Pma,
            TocFormat::Atip,
            TocFormat::CdText,
        ] {
            assert_eq!(TocFormat::try_from(f as u8).expect("known"), f);
        }
        assert!(TocFormat::try_from(0x06).is_err());
    }
}
