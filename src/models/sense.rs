// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Sense-data decoder (SPC fixed and descriptor formats).
//!
//! The response code in byte 0 (low 7 bits) selects the family:
//!
//! * `0x70`/`0x71` — fixed format, one flat 18-byte layout
//! * `0x72`/`0x73` — descriptor format, a header followed by
//!   {type, length, payload} sub-records
//!
//! Real hardware frequently returns fewer bytes than the nominal
//! minimum, so both paths decode whatever is present and raise the
//! `truncated` flag instead of failing, as long as the format header
//! itself (response code + sense key) could be read.

use core::fmt;

use crate::error::DecodeError;

/// Nominal fixed-format length; shorter buffers decode partially.
pub const FIXED_NOMINAL_LEN: usize = 18;

/// Smallest buffer either format can be identified from: response code,
/// plus the byte holding the sense key (byte 2 fixed, byte 1 descriptor).
const MIN_HEADER_LEN: usize = 3;

/// SKSV-gated pointer into the failed CDB or parameter list
/// (ILLEGAL REQUEST responses).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPointer {
    /// Points into the CDB when set, into the parameter data otherwise.
    pub command_data: bool,
    /// Bit within the byte, when the BPV bit declared it valid.
    pub bit_pointer: Option<u8>,
    /// Byte offset of the offending field.
    pub field_pointer: u16,
}

impl FieldPointer {
    /// Decode the 3-byte sense-key-specific area; `None` when SKSV is
    /// clear.
    fn from_sks(sks: &[u8; 3]) -> Option<Self> {
        if sks[0] & 0x80 == 0 {
            return None;
        }
        let bpv = sks[0] & 0x08 != 0;
        Some(Self {
            command_data: sks[0] & 0x40 != 0,
            bit_pointer: bpv.then_some(sks[0] & 0x07),
            field_pointer: u16::from_be_bytes([sks[1], sks[2]]),
        })
    }
}

/// One typed sub-record of a descriptor-format sense buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SenseDescriptor {
    /// Type 0x00 — information field.
    Information { valid: bool, information: u64 },
    /// Type 0x01 — command-specific information.
    CommandSpecific(u64),
    /// Type 0x02 — sense-key-specific; carries a field pointer for
    /// ILLEGAL REQUEST, progress/retry data for other keys.
    SenseKeySpecific {
        field_pointer: Option<FieldPointer>,
        raw: [u8; 3],
    },
    /// Type 0x03 — field replaceable unit code.
    FieldReplaceableUnit(u8),
    /// Type 0x04 — stream commands (filemark/EOM/ILI bits).
    Stream {
        filemark: bool,
        eom: bool,
        ili: bool,
    },
    /// Type 0x05 — block commands (ILI bit).
    Block { ili: bool },
    /// Type 0x0A — another progress indication.
    Progress {
        sense_key: u8,
        asc: u8,
        ascq: u8,
        progress: u16,
    },
    /// Type 0x80..0xFF are vendor specific, everything else here is
    /// simply a type this decoder does not know; payload kept verbatim.
    Unknown { descriptor_type: u8, data: Vec<u8> },
}

/// Per-format payload of a decoded sense buffer. Exactly one family
/// applies to any one buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SenseBody {
    /// Fixed format (0x70/0x71).
    Fixed {
        valid: bool,
        filemark: bool,
        eom: bool,
        ili: bool,
        information: u32,
        cmd_specific: u32,
        fru: u8,
        field_pointer: Option<FieldPointer>,
    },
    /// Descriptor format (0x72/0x73): sub-records in returned order.
    Descriptor(Vec<SenseDescriptor>),
}

/// Structured sense data, either format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SenseData {
    /// Low 7 bits of byte 0 (0x70..=0x73).
    pub response_code: u8,
    /// 0x71/0x73 report an error from an earlier, already-acknowledged
    /// command.
    pub deferred: bool,
    pub sense_key: u8,
    pub asc: u8,
    pub ascq: u8,
    /// Set when the buffer ended before the format's nominal size.
    pub truncated: bool,
    pub body: SenseBody,
}

impl SenseData {
    /// Parse either sense format, dispatching on the response code.
    pub fn parse(buf: &[u8]) -> Result<Self, DecodeError> {
        DecodeError::need("sense header", buf, MIN_HEADER_LEN)?;
        let code = buf[0] & 0x7F;
        match code {
            0x70 | 0x71 => Ok(Self::parse_fixed(buf, code)),
            0x72 | 0x73 => Ok(Self::parse_descriptor(buf, code)),
            other => Err(DecodeError::NotSense { code: other }),
        }
    }

    /// Fixed format (SPC § 4.4.3). `buf.len() >= 3` guaranteed by caller.
    fn parse_fixed(buf: &[u8], code: u8) -> Self {
        let at = |i: usize| buf.get(i).copied().unwrap_or(0);
        let be32 = |i: usize| {
            u32::from_be_bytes([at(i), at(i + 1), at(i + 2), at(i + 3)])
        };

        let field_pointer = if buf.len() >= 18 && (buf[2] & 0x0F) == 0x05 {
            // sense-key-specific bytes only carry a field pointer for
            // ILLEGAL REQUEST
            FieldPointer::from_sks(&[buf[15], buf[16], buf[17]])
        } else {
            None
        };

        SenseData {
            response_code: code,
            deferred: code == 0x71,
            sense_key: buf[2] & 0x0F,
            asc: at(12),
            ascq: at(13),
            truncated: buf.len() < FIXED_NOMINAL_LEN,
            body: SenseBody::Fixed {
                valid: buf[0] & 0x80 != 0,
                filemark: buf[2] & 0x80 != 0,
                eom: buf[2] & 0x40 != 0,
                ili: buf[2] & 0x20 != 0,
                information: be32(3),
                cmd_specific: be32(8),
                fru: at(14),
                field_pointer,
            },
        }
    }

    /// Descriptor format (SPC § 4.4.2): 8-byte header, then sub-records
    /// until the declared additional length (or the real buffer, if
    /// shorter) runs out.
    fn parse_descriptor(buf: &[u8], code: u8) -> Self {
        let at = |i: usize| buf.get(i).copied().unwrap_or(0);

        let mut descriptors = Vec::new();
        let mut truncated = buf.len() < 8;

        if buf.len() >= 8 {
            let declared_end = 8usize + at(7) as usize;
            let end = declared_end.min(buf.len());
            if declared_end > buf.len() {
                truncated = true;
            }

            let mut off = 8;
            while off + 2 <= end {
                let dtype = buf[off];
                let dlen = buf[off + 1] as usize;
                let payload_end = off + 2 + dlen;
                if payload_end > end {
                    truncated = true;
                    break;
                }
                descriptors.push(decode_descriptor(dtype, &buf[off + 2..payload_end]));
                off = payload_end;
            }
        }

        SenseData {
            response_code: code,
            deferred: code == 0x73,
            sense_key: buf[1] & 0x0F,
            asc: at(2),
            ascq: at(3),
            truncated,
            body: SenseBody::Descriptor(descriptors),
        }
    }
}

fn decode_descriptor(dtype: u8, payload: &[u8]) -> SenseDescriptor {
    let keep_raw = || SenseDescriptor::Unknown {
        descriptor_type: dtype,
        data: payload.to_vec(),
    };

    match dtype {
        // INFORMATION: reserved(1) + 8-byte field at offset 2 of the
        // descriptor, i.e. payload[2..10]
        0x00 if payload.len() >= 10 => SenseDescriptor::Information {
            valid: payload[0] & 0x80 != 0,
            information: u64::from_be_bytes(
                payload[2..10].try_into().unwrap_or([0; 8]),
            ),
        },
        0x01 if payload.len() >= 10 => SenseDescriptor::CommandSpecific(
            u64::from_be_bytes(payload[2..10].try_into().unwrap_or([0; 8])),
        ),
        0x02 if payload.len() >= 6 => {
            let sks = [payload[2], payload[3], payload[4]];
            SenseDescriptor::SenseKeySpecific {
                field_pointer: FieldPointer::from_sks(&sks),
                raw: sks,
            }
        },
        0x03 if payload.len() >= 2 => SenseDescriptor::FieldReplaceableUnit(payload[1]),
        0x04 if payload.len() >= 2 => SenseDescriptor::Stream {
            filemark: payload[1] & 0x80 != 0,
            eom: payload[1] & 0x40 != 0,
            ili: payload[1] & 0x20 != 0,
        },
        0x05 if payload.len() >= 2 => SenseDescriptor::Block {
            ili: payload[1] & 0x20 != 0,
        },
        0x0A if payload.len() >= 6 => SenseDescriptor::Progress {
            sense_key: payload[1] & 0x0F,
            asc: payload[2],
            ascq: payload[3],
            progress: u16::from_be_bytes([payload[4], payload[5]]),
        },
        _ => keep_raw(),
    }
}

/// Sense key name (SPC table 48).
pub fn sense_key_to_str(key: u8) -> &'static str {
    match key {
        0x0 => "NO SENSE",
        0x1 => "RECOVERED ERROR",
        0x2 => "NOT READY",
        0x3 => "MEDIUM ERROR",
        0x4 => "HARDWARE ERROR",
        0x5 => "ILLEGAL REQUEST",
        0x6 => "UNIT ATTENTION",
        0x7 => "DATA PROTECT",
        0x8 => "BLANK CHECK",
        0x9 => "VENDOR SPECIFIC",
        0xA => "COPY ABORTED",
        0xB => "ABORTED COMMAND",
        0xD => "VOLUME OVERFLOW",
        0xE => "MISCOMPARE",
        0xF => "COMPLETED",
        _ => "RESERVED",
    }
}

/// Return the SPC description for a given ASC/ASCQ pair.
///
/// If the pair is not present in the table, returns `"UNSPECIFIED /
/// vendor specific"`.
#[inline]
pub fn asc_ascq_to_str(asc: u8, ascq: u8) -> &'static str {
    hot_table(asc, ascq).unwrap_or("UNSPECIFIED / vendor specific")
}

fn hot_table(asc: u8, ascq: u8) -> Option<&'static str> {
    Some(match (asc, ascq) {
        (0x00, 0x00) => "No additional sense information",
        (0x00, 0x11) => "Audio play operation in progress",
        (0x02, 0x04) => "Not ready - LUN not ready, format in progress",
        (0x03, 0x11) => "Medium error - unrecovered read error",
        (0x04, 0x00) => "Logical unit not ready, cause not reportable",
        (0x04, 0x01) => "Logical unit is in process of becoming ready",
        (0x05, 0x20) => "Illegal request - invalid command information field",
        (0x0C, 0x00) => "Write error",
        (0x11, 0x00) => "Unrecovered read error",
        (0x11, 0x05) => "L-EC uncorrectable error",
        (0x11, 0x06) => "CIRC unrecovered error",
        (0x15, 0x00) => "Random positioning error",
        (0x20, 0x00) => "Invalid command operation code",
        (0x21, 0x00) => "Logical block address out of range",
        (0x24, 0x00) => "Illegal request - invalid field in CDB",
        (0x25, 0x00) => "Illegal request - logical unit not supported",
        (0x26, 0x00) => "Invalid field in parameter list",
        (0x28, 0x00) => "Not ready to ready change, medium may have changed",
        (0x29, 0x00) => "Power on, reset, or bus device reset occurred",
        (0x2A, 0x01) => "Mode parameters changed",
        (0x30, 0x00) => "Incompatible medium installed",
        (0x30, 0x01) => "Cannot read medium - unknown format",
        (0x30, 0x02) => "Cannot read medium - incompatible format",
        (0x3A, 0x00) => "Medium not present",
        (0x3A, 0x01) => "Medium not present - tray closed",
        (0x3A, 0x02) => "Medium not present - tray open",
        (0x40, 0x00) => "Data integrity error",
        (0x44, 0x00) => "Internal target failure",
        (0x57, 0x00) => "Unable to recover table-of-contents",
        (0x63, 0x00) => "End of user area encountered on this track",
        (0x64, 0x00) => "Illegal mode for this track",
        (0x6F, 0x00) => "Copy protection key exchange failure - authentication failure",
        _ => return None,
    })
}

impl fmt::Display for SenseData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{} ASC/ASCQ {:02X}h/{:02X}h ({})",
            sense_key_to_str(self.sense_key),
            if self.deferred { " [deferred]" } else { "" },
            self.asc,
            self.ascq,
            asc_ascq_to_str(self.asc, self.ascq),
        )?;
        if self.truncated {
            write!(f, " [truncated sense]")?;
        }
        Ok(())
    }
}
