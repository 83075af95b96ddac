// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! READ TOC/PMA/ATIP response decoders.
//!
//! Nothing inside these buffers says which format they are: the layout is
//! selected by the FORMAT field of the CDB that requested them. The
//! decoding entry point therefore *requires* the format as an argument
//! and never attempts detection; a caller that loses track of what it
//! asked for cannot reliably re-decode stored bytes, and that property is
//! inherent to the command, not something to paper over here.
//!
//! All six formats share a 4-byte header whose first two bytes are a
//! big-endian DATA LENGTH counting the bytes that follow it.

use crate::{
    control_block::{
        codec::{Msf, from_bcd},
        read_toc::TocFormat,
    },
    error::DecodeError,
};

/// Union over the six response layouts, tagged by the requested format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TocPmaAtipResponse {
    Toc(TocResponse),
    Session(SessionInfo),
    FullToc(FullTocResponse),
    Pma(PmaResponse),
    Atip(AtipResponse),
    CdText(CdTextResponse),
}

/// Formatted TOC (format 0000b).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocResponse {
    pub first_track: u8,
    pub last_track: u8,
    pub tracks: Vec<TocTrackDescriptor>,
    pub truncated: bool,
}

/// One 8-byte track descriptor. `start` is an LBA or a packed MSF
/// depending on the MSF bit of the request; another thing the caller has
/// to remember.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TocTrackDescriptor {
    pub adr: u8,
    pub control: u8,
    /// 1..99, or 0xAA for the lead-out.
    pub track: u8,
    pub start: u32,
}

impl TocTrackDescriptor {
    /// Control bit 2 set means data, clear means audio.
    #[inline]
    pub fn is_data(&self) -> bool {
        self.control & 0x04 != 0
    }
}

/// Session info (format 0001b).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionInfo {
    pub first_session: u8,
    pub last_session: u8,
    pub adr: u8,
    pub control: u8,
    pub first_track_last_session: u8,
    pub start: u32,
}

/// Raw lead-in TOC (format 0010b).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FullTocResponse {
    pub first_session: u8,
    pub last_session: u8,
    pub descriptors: Vec<FullTocDescriptor>,
    pub truncated: bool,
}

/// One 11-byte Q sub-channel descriptor from the lead-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FullTocDescriptor {
    pub session: u8,
    pub adr: u8,
    pub control: u8,
    pub tno: u8,
    /// Track number, or an A0h/A1h/A2h/B0h.. information point.
    pub point: u8,
    /// Running time in the lead-in.
    pub atime: Msf,
    pub zero: u8,
    /// Position the point refers to.
    pub ptime: Msf,
}

/// Program Memory Area (format 0011b); same descriptor body as the full
/// TOC without the session byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PmaResponse {
    pub descriptors: Vec<FullTocDescriptor>,
    pub truncated: bool,
}

/// ATIP (format 0100b) — one fixed record describing the blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtipResponse {
    pub indicative_target_writing_power: u8,
    pub ddcd: bool,
    pub reference_speed: u8,
    /// Unrestricted use disc.
    pub uru: bool,
    /// Set for CD-RW, clear for CD-R.
    pub is_cdrw: bool,
    pub disc_subtype: u8,
    pub a1_valid: bool,
    pub a2_valid: bool,
    pub a3_valid: bool,
    /// Start of lead-in (BCD on the wire).
    pub leadin_start: Msf,
    /// Last possible start of lead-out (BCD on the wire).
    pub leadout_start: Msf,
    pub a1: Option<[u8; 3]>,
    pub a2: Option<[u8; 3]>,
    pub a3: Option<[u8; 3]>,
}

/// CD-TEXT from the lead-in (format 0101b).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CdTextResponse {
    pub packs: Vec<CdTextPack>,
    pub truncated: bool,
}

/// One 18-byte CD-TEXT pack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CdTextPack {
    /// 0x80 title, 0x81 performer, ... 0x8F size info.
    pub pack_type: u8,
    pub track: u8,
    pub sequence: u8,
    /// Double-byte character set flag.
    pub dbcc: bool,
    pub block: u8,
    pub char_position: u8,
    pub text: [u8; 12],
    pub crc: u16,
}

/// Decode a READ TOC/PMA/ATIP response using the format the caller
/// originally requested.
pub fn parse_toc_pma_atip(
    buf: &[u8],
    format: TocFormat,
) -> Result<TocPmaAtipResponse, DecodeError> {
    DecodeError::need("TOC/PMA/ATIP header", buf, 4)?;
    let data_length = u16::from_be_bytes([buf[0], buf[1]]) as usize;
    // DATA LENGTH counts bytes after its own 2-byte field.
    let end = (2 + data_length).min(buf.len());

    Ok(match format {
        TocFormat::Toc => TocPmaAtipResponse::Toc(parse_toc(buf, end)),
        TocFormat::Session => TocPmaAtipResponse::Session(parse_session(buf)?),
        TocFormat::FullToc => {
            TocPmaAtipResponse::FullToc(parse_full_toc(buf, end))
        },
        TocFormat::Pma => TocPmaAtipResponse::Pma(parse_pma(buf, end)),
        TocFormat::Atip => TocPmaAtipResponse::Atip(parse_atip(buf, end)?),
        TocFormat::CdText => TocPmaAtipResponse::CdText(parse_cd_text(buf, end)),
    })
}

fn parse_toc(buf: &[u8], end: usize) -> TocResponse {
    let mut tracks = Vec::new();
    let mut off = 4;
    while off + 8 <= end {
        tracks.push(TocTrackDescriptor {
            adr: buf[off + 1] >> 4,
            control: buf[off + 1] & 0x0F,
            track: buf[off + 2],
            start: u32::from_be_bytes([
                buf[off + 4],
                buf[off + 5],
                buf[off + 6],
                buf[off + 7],
            ]),
        });
        off += 8;
    }
    TocResponse {
        first_track: buf[2],
        last_track: buf[3],
        tracks,
        truncated: off < end || 2 + u16::from_be_bytes([buf[0], buf[1]]) as usize > buf.len(),
    }
}

fn parse_session(buf: &[u8]) -> Result<SessionInfo, DecodeError> {
    // one mandatory descriptor, fixed 12-byte response
    DecodeError::need("session info", buf, 12)?;
    Ok(SessionInfo {
        first_session: buf[2],
        last_session: buf[3],
        adr: buf[5] >> 4,
        control: buf[5] & 0x0F,
        first_track_last_session: buf[6],
        start: u32::from_be_bytes([buf[8], buf[9], buf[10], buf[11]]),
    })
}

fn full_toc_descriptor(d: &[u8]) -> FullTocDescriptor {
    FullTocDescriptor {
        session: d[0],
        adr: d[1] >> 4,
        control: d[1] & 0x0F,
        tno: d[2],
        point: d[3],
        atime: Msf::new(d[4], d[5], d[6]),
        zero: d[7],
        ptime: Msf::new(d[8], d[9], d[10]),
    }
}

fn parse_full_toc(buf: &[u8], end: usize) -> FullTocResponse {
    let mut descriptors = Vec::new();
    let mut off = 4;
    while off + 11 <= end {
        descriptors.push(full_toc_descriptor(&buf[off..off + 11]));
        off += 11;
    }
    FullTocResponse {
        first_session: buf[2],
        last_session: buf[3],
        descriptors,
        truncated: off < end || 2 + u16::from_be_bytes([buf[0], buf[1]]) as usize > buf.len(),
    }
}

fn parse_pma(buf: &[u8], end: usize) -> PmaResponse {
    let mut descriptors = Vec::new();
    let mut off = 4;
    while off + 11 <= end {
        descriptors.push(full_toc_descriptor(&buf[off..off + 11]));
        off += 11;
    }
    PmaResponse {
        descriptors,
        truncated: off < end || 2 + u16::from_be_bytes([buf[0], buf[1]]) as usize > buf.len(),
    }
}

fn parse_atip(buf: &[u8], end: usize) -> Result<AtipResponse, DecodeError> {
    // indicator bytes through the lead-out time
    DecodeError::need("ATIP data", buf, 15)?;

    let opt_triple = |valid: bool, off: usize| {
        (valid && end >= off + 3).then(|| [buf[off], buf[off + 1], buf[off + 2]])
    };

    let a1_valid = buf[6] & 0x04 != 0;
    let a2_valid = buf[6] & 0x02 != 0;
    let a3_valid = buf[6] & 0x01 != 0;

    Ok(AtipResponse {
        indicative_target_writing_power: (buf[4] >> 4) & 0x07,
        ddcd: buf[4] & 0x08 != 0,
        reference_speed: buf[4] & 0x07,
        uru: buf[5] & 0x40 != 0,
        is_cdrw: buf[6] & 0x40 != 0,
        disc_subtype: (buf[6] >> 3) & 0x07,
        a1_valid,
        a2_valid,
        a3_valid,
        leadin_start: Msf::new(from_bcd(buf[8]), from_bcd(buf[9]), from_bcd(buf[10])),
        leadout_start: Msf::new(from_bcd(buf[12]), from_bcd(buf[13]), from_bcd(buf[14])),
        a1: opt_triple(a1_valid, 16),
        a2: opt_triple(a2_valid, 20),
        a3: opt_triple(a3_valid, 24),
    })
}

fn parse_cd_text(buf: &[u8], end: usize) -> CdTextResponse {
    let mut packs = Vec::new();
    let mut off = 4;
    while off + 18 <= end {
        let d = &buf[off..off + 18];
        let mut text = [0u8; 12];
        text.copy_from_slice(&d[4..16]);
        packs.push(CdTextPack {
            pack_type: d[0],
            track: d[1] & 0x7F,
            sequence: d[2],
            dbcc: d[3] & 0x80 != 0,
            block: (d[3] >> 4) & 0x07,
            char_position: d[3] & 0x0F,
            text,
            crc: u16::from_be_bytes([d[16], d[17]]),
        });
        off += 18;
    }
    CdTextResponse {
        packs,
        truncated: off < end || 2 + u16::from_be_bytes([buf[0], buf[1]]) as usize > buf.len(),
    }
}
