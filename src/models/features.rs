// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! GET CONFIGURATION response decoder (MMC feature lists).
//!
//! Wire layout:
//!
//! ```text
//! header   [0..4] DATA LENGTH (big-endian u32, bytes following itself)
//!          [4..6] reserved
//!          [6..8] CURRENT PROFILE (big-endian u16)
//! repeated [0..2] FEATURE CODE (big-endian u16)
//!          [2]    VERSION (bits 5..2) | PERSISTENT (bit 1) | CURRENT (bit 0)
//!          [3]    ADDITIONAL LENGTH
//!          [4..]  ADDITIONAL LENGTH bytes of feature-specific payload
//! ```
//!
//! Forward compatibility is a hard requirement here, not an edge case:
//! an unrecognized feature code decodes into [`FeatureDetail::Unknown`]
//! with its payload preserved verbatim, never into an error. Payloads
//! shorter than a feature's nominal shape read missing trailing bytes as
//! zero, since drives legitimately ship older (shorter) revisions of a
//! feature.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::error::DecodeError;

/// Whole response: header plus descriptors in returned order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureList {
    /// DATA LENGTH as declared by the drive.
    pub data_length: u32,
    /// Profile the medium currently mounted resolves to (0 when none).
    pub current_profile: u16,
    pub descriptors: Vec<FeatureDescriptor>,
    /// Set when the declared length ran past the actual buffer.
    pub truncated: bool,
}

/// One feature descriptor. `data` keeps the raw payload even for decoded
/// features, so callers can always hex-dump exactly what the drive sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureDescriptor {
    pub code: u16,
    pub version: u8,
    pub persistent: bool,
    pub current: bool,
    pub data: Vec<u8>,
    pub detail: FeatureDetail,
}

impl FeatureDescriptor {
    /// Standard name of this feature, or `None` for codes outside the
    /// published tables.
    pub fn name(&self) -> Option<&'static str> {
        feature_name(self.code)
    }
}

/// A profile advertised by the Profile List feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfileDescriptor {
    pub profile: u16,
    pub current: bool,
}

/// Typed payloads for the known feature codes (MMC 0x0000-0x0142).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeatureDetail {
    /// 0x0000
    ProfileList(Vec<ProfileDescriptor>),
    /// 0x0001
    Core {
        physical_interface: u32,
        inq2: bool,
        dbe: bool,
    },
    /// 0x0002
    Morphing { oc_event: bool, async_notify: bool },
    /// 0x0003
    RemovableMedium {
        loading_mechanism: u8,
        load: bool,
        eject: bool,
        prevent_jumper: bool,
        lock: bool,
    },
    /// 0x0004
    WriteProtect {
        dwp: bool,
        wdcb: bool,
        spwp: bool,
        sswpp: bool,
    },
    /// 0x0010
    RandomReadable {
        block_size: u32,
        blocking: u16,
        page_present: bool,
    },
    /// 0x001D
    MultiRead,
    /// 0x001E
    CdRead {
        dap: bool,
        c2_flags: bool,
        cd_text: bool,
    },
    /// 0x001F
    DvdRead { multi110: bool, dual_r: bool },
    /// 0x0020
    RandomWritable {
        last_lba: u32,
        block_size: u32,
        blocking: u16,
        page_present: bool,
    },
    /// 0x0021
    IncrementalStreamingWritable {
        data_block_types: u16,
        buf: bool,
        link_sizes: Vec<u8>,
    },
    /// 0x0022
    SectorErasable,
    /// 0x0023
    Formattable {
        renosa: bool,
        expand: bool,
        qcert: bool,
        cert: bool,
    },
    /// 0x0024
    HardwareDefectManagement { ssa: bool },
    /// 0x0025
    WriteOnce {
        block_size: u32,
        blocking: u16,
        page_present: bool,
    },
    /// 0x0026
    RestrictedOverwrite,
    /// 0x0027
    CdrwCavWrite,
    /// 0x0028
    Mrw {
        dvd_plus_write: bool,
        dvd_plus_read: bool,
        cd_write: bool,
    },
    /// 0x0029
    EnhancedDefectReporting {
        drt_dm: bool,
        dbi_cache_zones: u8,
        entries: u16,
    },
    /// 0x002A
    DvdPlusRw {
        write: bool,
        close_only: bool,
        quick_start: bool,
    },
    /// 0x002B
    DvdPlusR { write: bool },
    /// 0x002C
    RigidRestrictedOverwrite {
        dsdg: bool,
        dsdr: bool,
        intermediate: bool,
        blank: bool,
    },
    /// 0x002D
    CdTrackAtOnce {
        buf: bool,
        rw_raw: bool,
        rw_pack: bool,
        test_write: bool,
        cd_rw: bool,
        rw_subcode: bool,
        data_types: u16,
    },
    /// 0x002E
    CdMastering {
        buf: bool,
        sao: bool,
        raw_ms: bool,
        raw: bool,
        test_write: bool,
        cd_rw: bool,
        rw_subcode: bool,
        max_cue_sheet_len: u32,
    },
    /// 0x002F
    DvdRWrite {
        buf: bool,
        rdl: bool,
        test_write: bool,
        dvd_rw: bool,
    },
    /// 0x0030
    DdCdRead,
    /// 0x0031
    DdCdRWrite { test_write: bool },
    /// 0x0032
    DdCdRwWrite { intermediate: bool, blank: bool },
    /// 0x0033
    LayerJumpRecording { link_sizes: Vec<u8> },
    /// 0x0035
    StopLongOperation,
    /// 0x0037
    CdrwMediaWriteSupport { subtypes: u8 },
    /// 0x0038
    BdRPseudoOverwrite,
    /// 0x003A
    DvdPlusRwDualLayer {
        write: bool,
        close_only: bool,
        quick_start: bool,
    },
    /// 0x003B
    DvdPlusRDualLayer { write: bool },
    /// 0x0040
    BdRead,
    /// 0x0041
    BdWrite { svnr: bool },
    /// 0x0042
    Tsr,
    /// 0x0050
    HdDvdRead { hd_dvd_r: bool, hd_dvd_ram: bool },
    /// 0x0051
    HdDvdWrite { hd_dvd_r: bool, hd_dvd_ram: bool },
    /// 0x0080
    HybridDisc { ri: bool },
    /// 0x0100
    PowerManagement,
    /// 0x0101
    Smart { page_present: bool },
    /// 0x0102
    EmbeddedChanger {
        scc: bool,
        sdp: bool,
        highest_slot: u8,
    },
    /// 0x0103
    CdAudioExternalPlay {
        scan: bool,
        scm: bool,
        sv: bool,
        volume_levels: u16,
    },
    /// 0x0104
    MicrocodeUpgrade { m5: bool },
    /// 0x0105
    Timeout { group3: bool, unit_length: u16 },
    /// 0x0106
    DvdCss { version: u8 },
    /// 0x0107
    RealTimeStreaming {
        rbcb: bool,
        scs: bool,
        mp2a: bool,
        wspd: bool,
        sw: bool,
    },
    /// 0x0108 — ASCII, space padded.
    DriveSerialNumber(String),
    /// 0x0109 — opaque per the media serial number report.
    MediaSerialNumber(Vec<u8>),
    /// 0x010A
    DiscControlBlocks(Vec<u32>),
    /// 0x010B
    DvdCprm { version: u8 },
    /// 0x010C
    FirmwareInformation { date: String },
    /// 0x010D
    Aacs {
        bng: bool,
        block_count: u8,
        agids: u8,
        version: u8,
    },
    /// 0x0110
    Vcps,
    /// 0x0113
    SecurDisc,
    /// 0x0142
    Ossc { profiles: Vec<u16> },
    /// Any code outside the tables; payload preserved, never an error.
    Unknown,
}

/// Parse a GET CONFIGURATION response.
///
/// Descriptors are consumed until the declared DATA LENGTH or the real
/// buffer runs out, whichever comes first; a descriptor whose payload
/// would overrun ends the list with `truncated = true`.
pub fn parse_feature_list(buf: &[u8]) -> Result<FeatureList, DecodeError> {
    DecodeError::need("feature list header", buf, 8)?;

    let data_length = u32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]]);
    let current_profile = u16::from_be_bytes([buf[6], buf[7]]);

    // DATA LENGTH counts bytes after its own field.
    let declared_end = 4usize.saturating_add(data_length as usize);
    let end = declared_end.min(buf.len());
    let mut truncated = declared_end > buf.len();

    let mut descriptors = Vec::new();
    let mut off = 8usize;
    while off + 4 <= end {
        let code = u16::from_be_bytes([buf[off], buf[off + 1]]);
        let flags = buf[off + 2];
        let add_len = buf[off + 3] as usize;
        let payload_end = off + 4 + add_len;
        if payload_end > end {
            truncated = true;
            break;
        }
        let data = buf[off + 4..payload_end].to_vec();
        let detail = decode_feature(code, &data);
        descriptors.push(FeatureDescriptor {
            code,
            version: (flags >> 2) & 0x0F,
            persistent: flags & 0x02 != 0,
            current: flags & 0x01 != 0,
            data,
            detail,
        });
        off = payload_end;
    }
    if off < end {
        // trailing bytes too short for a descriptor header
        truncated = true;
    }

    Ok(FeatureList {
        data_length,
        current_profile,
        descriptors,
        truncated,
    })
}

// Tolerant accessors: a drive reporting an older feature revision sends a
// shorter payload, and the absent trailing fields read as zero.
#[inline]
fn at(d: &[u8], i: usize) -> u8 {
    d.get(i).copied().unwrap_or(0)
}

#[inline]
fn be16_at(d: &[u8], i: usize) -> u16 {
    u16::from_be_bytes([at(d, i), at(d, i + 1)])
}

#[inline]
fn be32_at(d: &[u8], i: usize) -> u32 {
    u32::from_be_bytes([at(d, i), at(d, i + 1), at(d, i + 2), at(d, i + 3)])
}

#[inline]
fn bit(d: &[u8], i: usize, b: u8) -> bool {
    at(d, i) & (1 << b) != 0
}

/// Feature-code dispatch: one arm per known code.
fn decode_feature(code: u16, d: &[u8]) -> FeatureDetail {
    use FeatureDetail::*;
    match code {
        0x0000 => {
            let mut profiles = Vec::with_capacity(d.len() / 4);
            for chunk in d.chunks_exact(4) {
                profiles.push(ProfileDescriptor {
                    profile: u16::from_be_bytes([chunk[0], chunk[1]]),
                    current: chunk[2] & 0x01 != 0,
                });
            }
            ProfileList(profiles)
        },
        0x0001 => Core {
            physical_interface: be32_at(d, 0),
            inq2: bit(d, 4, 1),
            dbe: bit(d, 4, 0),
        },
        0x0002 => Morphing {
            oc_event: bit(d, 0, 1),
            async_notify: bit(d, 0, 0),
        },
        0x0003 => RemovableMedium {
            loading_mechanism: at(d, 0) >> 5,
            load: bit(d, 0, 4),
            eject: bit(d, 0, 3),
            prevent_jumper: bit(d, 0, 2),
            lock: bit(d, 0, 0),
        },
        0x0004 => WriteProtect {
            dwp: bit(d, 0, 3),
            wdcb: bit(d, 0, 2),
            spwp: bit(d, 0, 1),
            sswpp: bit(d, 0, 0),
        },
        0x0010 => RandomReadable {
            block_size: be32_at(d, 0),
            blocking: be16_at(d, 4),
            page_present: bit(d, 6, 0),
        },
        0x001D => MultiRead,
        0x001E => CdRead {
            dap: bit(d, 0, 7),
            c2_flags: bit(d, 0, 1),
            cd_text: bit(d, 0, 0),
        },
        0x001F => DvdRead {
            multi110: bit(d, 0, 0),
            dual_r: bit(d, 2, 0),
        },
        0x0020 => RandomWritable {
            last_lba: be32_at(d, 0),
            block_size: be32_at(d, 4),
            blocking: be16_at(d, 8),
            page_present: bit(d, 10, 0),
        },
        0x0021 => {
            let n = at(d, 3) as usize;
            IncrementalStreamingWritable {
                data_block_types: be16_at(d, 0),
                buf: bit(d, 2, 0),
                link_sizes: (0..n).map(|i| at(d, 4 + i)).collect(),
            }
        },
        0x0022 => SectorErasable,
        0x0023 => Formattable {
            renosa: bit(d, 0, 3),
            expand: bit(d, 0, 2),
            qcert: bit(d, 0, 1),
            cert: bit(d, 0, 0),
        },
        0x0024 => HardwareDefectManagement { ssa: bit(d, 0, 7) },
        0x0025 => WriteOnce {
            block_size: be32_at(d, 0),
            blocking: be16_at(d, 4),
            page_present: bit(d, 6, 0),
        },
        0x0026 => RestrictedOverwrite,
        0x0027 => CdrwCavWrite,
        0x0028 => Mrw {
            dvd_plus_write: bit(d, 0, 2),
            dvd_plus_read: bit(d, 0, 1),
            cd_write: bit(d, 0, 0),
        },
        0x0029 => EnhancedDefectReporting {
            drt_dm: bit(d, 0, 0),
            dbi_cache_zones: at(d, 1),
            entries: be16_at(d, 2),
        },
        0x002A => DvdPlusRw {
            write: bit(d, 0, 0),
            close_only: bit(d, 1, 0),
            quick_start: bit(d, 1, 1),
        },
        0x002B => DvdPlusR { write: bit(d, 0, 0) },
        0x002C => RigidRestrictedOverwrite {
            dsdg: bit(d, 0, 3),
            dsdr: bit(d, 0, 2),
            intermediate: bit(d, 0, 1),
            blank: bit(d, 0, 0),
        },
        0x002D => CdTrackAtOnce {
            buf: bit(d, 0, 6),
            rw_raw: bit(d, 0, 4),
            rw_pack: bit(d, 0, 3),
            test_write: bit(d, 0, 2),
            cd_rw: bit(d, 0, 1),
            rw_subcode: bit(d, 0, 0),
            data_types: be16_at(d, 2),
        },
        0x002E => CdMastering {
            buf: bit(d, 0, 6),
            sao: bit(d, 0, 5),
            raw_ms: bit(d, 0, 4),
            raw: bit(d, 0, 3),
            test_write: bit(d, 0, 2),
            cd_rw: bit(d, 0, 1),
            rw_subcode: bit(d, 0, 0),
            max_cue_sheet_len: be32_at(d, 0) & 0x00FF_FFFF,
        },
        0x002F => DvdRWrite {
            buf: bit(d, 0, 6),
            rdl: bit(d, 0, 3),
            test_write: bit(d, 0, 2),
            dvd_rw: bit(d, 0, 1),
        },
        0x0030 => DdCdRead,
        0x0031 => DdCdRWrite {
            test_write: bit(d, 0, 2),
        },
        0x0032 => DdCdRwWrite {
            intermediate: bit(d, 0, 1),
            blank: bit(d, 0, 0),
        },
        0x0033 => {
            let n = at(d, 3) as usize;
            LayerJumpRecording {
                link_sizes: (0..n).map(|i| at(d, 4 + i)).collect(),
            }
        },
        0x0035 => StopLongOperation,
        0x0037 => CdrwMediaWriteSupport { subtypes: at(d, 1) },
        0x0038 => BdRPseudoOverwrite,
        0x003A => DvdPlusRwDualLayer {
            write: bit(d, 0, 0),
            close_only: bit(d, 1, 0),
            quick_start: bit(d, 1, 1),
        },
        0x003B => DvdPlusRDualLayer { write: bit(d, 0, 0) },
        0x0040 => BdRead,
        0x0041 => BdWrite { svnr: bit(d, 0, 0) },
        0x0042 => Tsr,
        0x0050 => HdDvdRead {
            hd_dvd_r: bit(d, 0, 0),
            hd_dvd_ram: bit(d, 2, 0),
        },
        0x0051 => HdDvdWrite {
            hd_dvd_r: bit(d, 0, 0),
            hd_dvd_ram: bit(d, 2, 0),
        },
        0x0080 => HybridDisc { ri: bit(d, 0, 0) },
        0x0100 => PowerManagement,
        0x0101 => Smart {
            page_present: bit(d, 0, 0),
        },
        0x0102 => EmbeddedChanger {
            scc: bit(d, 0, 4),
            sdp: bit(d, 0, 2),
            highest_slot: at(d, 2) & 0x1F,
        },
        0x0103 => CdAudioExternalPlay {
            scan: bit(d, 0, 2),
            scm: bit(d, 0, 1),
            sv: bit(d, 0, 0),
            volume_levels: be16_at(d, 2),
        },
        0x0104 => MicrocodeUpgrade { m5: bit(d, 0, 0) },
        0x0105 => Timeout {
            group3: bit(d, 0, 0),
            unit_length: be16_at(d, 2),
        },
        0x0106 => DvdCss { version: at(d, 3) },
        0x0107 => RealTimeStreaming {
            rbcb: bit(d, 0, 4),
            scs: bit(d, 0, 3),
            mp2a: bit(d, 0, 2),
            wspd: bit(d, 0, 1),
            sw: bit(d, 0, 0),
        },
        0x0108 => DriveSerialNumber(
            crate::control_block::inquiry::trim_ascii(d),
        ),
        0x0109 => MediaSerialNumber(d.to_vec()),
        0x010A => DiscControlBlocks(
            d.chunks_exact(4)
                .map(|c| u32::from_be_bytes([c[0], c[1], c[2], c[3]]))
                .collect(),
        ),
        0x010B => DvdCprm { version: at(d, 3) },
        0x010C => FirmwareInformation {
            // century/year/month/day/hour/minute/second as ASCII digits
            date: crate::control_block::inquiry::trim_ascii(d),
        },
        0x010D => Aacs {
            bng: bit(d, 0, 0),
            block_count: at(d, 1),
            agids: at(d, 2) & 0x0F,
            version: at(d, 3),
        },
        0x0110 => Vcps,
        0x0113 => SecurDisc,
        0x0142 => Ossc {
            profiles: d
                .chunks_exact(2)
                .skip(1) // first word is the profile count
                .map(|c| u16::from_be_bytes([c[0], c[1]]))
                .collect(),
        },
        _ => Unknown,
    }
}

/// Published feature names, for rendering.
pub fn feature_name(code: u16) -> Option<&'static str> {
    static NAMES: Lazy<HashMap<u16, &'static str>> = Lazy::new(|| {
        HashMap::from([
            (0x0000, "Profile List"),
            (0x0001, "Core"),
            (0x0002, "Morphing"),
            (0x0003, "Removable Medium"),
            (0x0004, "Write Protect"),
            (0x0010, "Random Readable"),
            (0x001D, "Multi-Read"),
            (0x001E, "CD Read"),
            (0x001F, "DVD Read"),
            (0x0020, "Random Writable"),
            (0x0021, "Incremental Streaming Writable"),
            (0x0022, "Sector Erasable"),
            (0x0023, "Formattable"),
            (0x0024, "Hardware Defect Management"),
            (0x0025, "Write Once"),
            (0x0026, "Restricted Overwrite"),
            (0x0027, "CD-RW CAV Write"),
            (0x0028, "MRW"),
            (0x0029, "Enhanced Defect Reporting"),
            (0x002A, "DVD+RW"),
            (0x002B, "DVD+R"),
            (0x002C, "Rigid Restricted Overwrite"),
            (0x002D, "CD Track at Once"),
            (0x002E, "CD Mastering"),
            (0x002F, "DVD-R/-RW Write"),
            (0x0030, "DDCD Read"),
            (0x0031, "DDCD-R Write"),
            (0x0032, "DDCD-RW Write"),
            (0x0033, "Layer Jump Recording"),
            (0x0035, "Stop Long Operation"),
            (0x0037, "CD-RW Media Write Support"),
            (0x0038, "BD-R Pseudo-Overwrite"),
            (0x003A, "DVD+RW Dual Layer"),
            (0x003B, "DVD+R Dual Layer"),
            (0x0040, "BD Read"),
            (0x0041, "BD Write"),
            (0x0042, "TSR"),
            (0x0050, "HD DVD Read"),
            (0x0051, "HD DVD Write"),
            (0x0080, "Hybrid Disc"),
            (0x0100, "Power Management"),
            (0x0101, "S.M.A.R.T."),
            (0x0102, "Embedded Changer"),
            (0x0103, "CD Audio External Play"),
            (0x0104, "Microcode Upgrade"),
            (0x0105, "Time-out"),
            (0x0106, "DVD CSS"),
            (0x0107, "Real Time Streaming"),
            (0x0108, "Drive Serial Number"),
            (0x0109, "Media Serial Number"),
            (0x010A, "Disc Control Blocks"),
            (0x010B, "DVD CPRM"),
            (0x010C, "Firmware Information"),
            (0x010D, "AACS"),
            (0x0110, "VCPS"),
            (0x0113, "SecurDisc"),
            (0x0142, "OSSC"),
        ])
    });
    NAMES.get(&code).copied()
}
