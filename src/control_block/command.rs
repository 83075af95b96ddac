// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Closed tagged union over every supported command.
//!
//! Each variant holds the typed parameters of one command and knows how
//! to fill its CDB, which direction its data phase runs, and (when the
//! command itself states it) how many bytes to expect back. This replaces
//! dispatching on raw numeric command codes: an unknown command cannot be
//! represented at all.

use enum_dispatch::enum_dispatch;

use crate::{
    control_block::{
        codec::Msf,
        get_configuration::{FeatureRequest, fill_get_configuration},
        inquiry::{fill_inquiry_standard, fill_inquiry_vpd},
        mode_sense::{PageControl, fill_mode_sense6, fill_mode_sense10},
        read::{fill_read6, fill_read10, fill_read12, fill_read16},
        read_capacity::{fill_read_capacity10, fill_read_capacity16},
        read_cd::{
            C2ErrorField, ExpectedSectorType, HeaderCodes, MainChannel, SubChannel,
            fill_read_cd, fill_read_cd_msf,
        },
        read_disc_information::{DiscInfoType, fill_read_disc_information},
        read_disc_structure::{StructureMediaType, fill_read_disc_structure},
        read_toc::{TocFormat, fill_read_toc},
        request_sense::fill_request_sense,
        ssc::{fill_read_block_limits, fill_report_density_support},
        test_unit_ready::fill_test_unit_ready,
        unit::{fill_prevent_allow, fill_start_stop_unit},
        vendor::{
            pioneer::{PioneerSubCode, fill_pioneer_read_cd_da, fill_pioneer_read_cd_da_msf},
            plasmon::fill_plasmon_read_long,
            plextor::{PlextorSubChannel, fill_plextor_read_cd_da},
            syquest::{fill_syquest_read_long6, fill_syquest_read_long10},
        },
    },
    error::ParameterOutOfRange,
};

/// Direction of the data phase, as seen from the initiator.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum DataDirection {
    #[default]
    None,
    In,
    Out,
}

/// One command's worth of behaviour: CDB assembly plus transfer shape.
#[enum_dispatch]
pub trait Cdb {
    /// Fill `cdb` from the typed parameters; returns the CDB length used.
    fn fill(&self, cdb: &mut [u8; 16]) -> Result<usize, ParameterOutOfRange>;

    /// Direction of the data phase.
    fn direction(&self) -> DataDirection;

    /// Bytes the command itself promises back (allocation length or fixed
    /// parameter data). `None` when the transfer size depends on device
    /// state the command does not carry (block reads).
    fn allocation(&self) -> Option<u32>;

    /// Standard command name, for logs.
    fn name(&self) -> &'static str;
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TestUnitReady {
    pub control: u8,
}

impl Cdb for TestUnitReady {
    fn fill(&self, cdb: &mut [u8; 16]) -> Result<usize, ParameterOutOfRange> {
        fill_test_unit_ready(cdb, self.control)
    }

    fn direction(&self) -> DataDirection {
        DataDirection::None
    }

    fn allocation(&self) -> Option<u32> {
        Some(0)
    }

    fn name(&self) -> &'static str {
        "TEST UNIT READY"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestSense {
    pub desc: bool,
    pub allocation_len: u8,
}

impl Cdb for RequestSense {
    fn fill(&self, cdb: &mut [u8; 16]) -> Result<usize, ParameterOutOfRange> {
        fill_request_sense(cdb, self.desc, self.allocation_len, 0x00)
    }

    fn direction(&self) -> DataDirection {
        DataDirection::In
    }

    fn allocation(&self) -> Option<u32> {
        Some(self.allocation_len as u32)
    }

    fn name(&self) -> &'static str {
        "REQUEST SENSE"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Inquiry {
    /// `Some(page)` issues a VPD inquiry for that page.
    pub vpd_page: Option<u8>,
    pub allocation_len: u8,
}

impl Cdb for Inquiry {
    fn fill(&self, cdb: &mut [u8; 16]) -> Result<usize, ParameterOutOfRange> {
        match self.vpd_page {
            Some(page) => fill_inquiry_vpd(cdb, page, self.allocation_len, 0x00),
            None => fill_inquiry_standard(cdb, self.allocation_len, 0x00),
        }
    }

    fn direction(&self) -> DataDirection {
        DataDirection::In
    }

    fn allocation(&self) -> Option<u32> {
        Some(self.allocation_len as u32)
    }

    fn name(&self) -> &'static str {
        "INQUIRY"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeSense6 {
    pub dbd: bool,
    pub pc: PageControl,
    pub page_code: u8,
    pub subpage_code: u8,
    pub allocation_len: u8,
}

impl Cdb for ModeSense6 {
    fn fill(&self, cdb: &mut [u8; 16]) -> Result<usize, ParameterOutOfRange> {
        fill_mode_sense6(
            cdb,
            self.dbd,
            self.pc,
            self.page_code,
            self.subpage_code,
            self.allocation_len,
            0x00,
        )
    }

    fn direction(&self) -> DataDirection {
        DataDirection::In
    }

    fn allocation(&self) -> Option<u32> {
        Some(self.allocation_len as u32)
    }

    fn name(&self) -> &'static str {
        "MODE SENSE(6)"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeSense10 {
    pub dbd: bool,
    pub llbaa: bool,
    pub pc: PageControl,
    pub page_code: u8,
    pub subpage_code: u8,
    pub allocation_len: u16,
}

impl Cdb for ModeSense10 {
    fn fill(&self, cdb: &mut [u8; 16]) -> Result<usize, ParameterOutOfRange> {
        fill_mode_sense10(
            cdb,
            self.dbd,
            self.llbaa,
            self.pc,
            self.page_code,
            self.subpage_code,
            self.allocation_len,
            0x00,
        )
    }

    fn direction(&self) -> DataDirection {
        DataDirection::In
    }

    fn allocation(&self) -> Option<u32> {
        Some(self.allocation_len as u32)
    }

    fn name(&self) -> &'static str {
        "MODE SENSE(10)"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Read6 {
    pub lba: u32,
    /// 0 means 256 blocks.
    pub blocks: u8,
}

impl Cdb for Read6 {
    fn fill(&self, cdb: &mut [u8; 16]) -> Result<usize, ParameterOutOfRange> {
        fill_read6(cdb, self.lba, self.blocks, 0x00)
    }

    fn direction(&self) -> DataDirection {
        DataDirection::In
    }

    fn allocation(&self) -> Option<u32> {
        None
    }

    fn name(&self) -> &'static str {
        "READ(6)"
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Read10 {
    pub lba: u32,
    pub blocks: u16,
    pub rd_protect: u8,
    pub dpo: bool,
    pub fua: bool,
    pub fua_nv: bool,
    pub group: u8,
}

impl Cdb for Read10 {
    fn fill(&self, cdb: &mut [u8; 16]) -> Result<usize, ParameterOutOfRange> {
        fill_read10(
            cdb,
            self.lba,
            self.blocks,
            self.rd_protect,
            self.dpo,
            self.fua,
            self.fua_nv,
            self.group,
            0x00,
        )
    }

    fn direction(&self) -> DataDirection {
        DataDirection::In
    }

    fn allocation(&self) -> Option<u32> {
        None
    }

    fn name(&self) -> &'static str {
        "READ(10)"
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Read12 {
    pub lba: u32,
    pub blocks: u32,
    pub rd_protect: u8,
    pub dpo: bool,
    pub fua: bool,
    pub fua_nv: bool,
    pub group: u8,
}

impl Cdb for Read12 {
    fn fill(&self, cdb: &mut [u8; 16]) -> Result<usize, ParameterOutOfRange> {
        fill_read12(
            cdb,
            self.lba,
            self.blocks,
            self.rd_protect,
            self.dpo,
            self.fua,
            self.fua_nv,
            self.group,
            0x00,
        )
    }

    fn direction(&self) -> DataDirection {
        DataDirection::In
    }

    fn allocation(&self) -> Option<u32> {
        None
    }

    fn name(&self) -> &'static str {
        "READ(12)"
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Read16 {
    pub lba: u64,
    pub blocks: u32,
    pub rd_protect: u8,
    pub dpo: bool,
    pub fua: bool,
    pub fua_nv: bool,
    pub group: u8,
}

impl Cdb for Read16 {
    fn fill(&self, cdb: &mut [u8; 16]) -> Result<usize, ParameterOutOfRange> {
        fill_read16(
            cdb,
            self.lba,
            self.blocks,
            self.rd_protect,
            self.dpo,
            self.fua,
            self.fua_nv,
            self.group,
            0x00,
        )
    }

    fn direction(&self) -> DataDirection {
        DataDirection::In
    }

    fn allocation(&self) -> Option<u32> {
        None
    }

    fn name(&self) -> &'static str {
        "READ(16)"
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReadCapacity10 {
    pub lba: u32,
    pub pmi: bool,
}

impl Cdb for ReadCapacity10 {
    fn fill(&self, cdb: &mut [u8; 16]) -> Result<usize, ParameterOutOfRange> {
        fill_read_capacity10(cdb, self.lba, self.pmi, 0x00)
    }

    fn direction(&self) -> DataDirection {
        DataDirection::In
    }

    fn allocation(&self) -> Option<u32> {
        Some(8)
    }

    fn name(&self) -> &'static str {
        "READ CAPACITY(10)"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadCapacity16 {
    pub lba: u64,
    pub pmi: bool,
    pub allocation_len: u32,
}

impl Cdb for ReadCapacity16 {
    fn fill(&self, cdb: &mut [u8; 16]) -> Result<usize, ParameterOutOfRange> {
        fill_read_capacity16(cdb, self.lba, self.pmi, self.allocation_len, 0x00)
    }

    fn direction(&self) -> DataDirection {
        DataDirection::In
    }

    fn allocation(&self) -> Option<u32> {
        Some(self.allocation_len)
    }

    fn name(&self) -> &'static str {
        "READ CAPACITY(16)"
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReadCd {
    pub lba: u32,
    pub sectors: u32,
    pub sector_type: ExpectedSectorType,
    pub dap: bool,
    pub main: MainChannel,
    pub headers: HeaderCodes,
    pub c2: C2ErrorField,
    pub subchannel: SubChannel,
}

impl Cdb for ReadCd {
    fn fill(&self, cdb: &mut [u8; 16]) -> Result<usize, ParameterOutOfRange> {
        fill_read_cd(
            cdb,
            self.lba,
            self.sectors,
            self.sector_type,
            self.dap,
            self.main,
            self.headers,
            self.c2,
            self.subchannel,
            0x00,
        )
    }

    fn direction(&self) -> DataDirection {
        DataDirection::In
    }

    fn allocation(&self) -> Option<u32> {
        None
    }

    fn name(&self) -> &'static str {
        "READ CD"
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReadCdMsf {
    pub start: Msf,
    pub end: Msf,
    pub sector_type: ExpectedSectorType,
    pub dap: bool,
    pub main: MainChannel,
    pub headers: HeaderCodes,
    pub c2: C2ErrorField,
    pub subchannel: SubChannel,
}

impl Cdb for ReadCdMsf {
    fn fill(&self, cdb: &mut [u8; 16]) -> Result<usize, ParameterOutOfRange> {
        fill_read_cd_msf(
            cdb,
            self.start,
            self.end,
            self.sector_type,
            self.dap,
            self.main,
            self.headers,
            self.c2,
            self.subchannel,
            0x00,
        )
    }

    fn direction(&self) -> DataDirection {
        DataDirection::In
    }

    fn allocation(&self) -> Option<u32> {
        None
    }

    fn name(&self) -> &'static str {
        "READ CD MSF"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadTocPmaAtip {
    pub msf: bool,
    pub format: TocFormat,
    pub track_session: u8,
    pub allocation_len: u16,
}

impl Cdb for ReadTocPmaAtip {
    fn fill(&self, cdb: &mut [u8; 16]) -> Result<usize, ParameterOutOfRange> {
        fill_read_toc(
            cdb,
            self.msf,
            self.format,
            self.track_session,
            self.allocation_len,
            0x00,
        )
    }

    fn direction(&self) -> DataDirection {
        DataDirection::In
    }

    fn allocation(&self) -> Option<u32> {
        Some(self.allocation_len as u32)
    }

    fn name(&self) -> &'static str {
        "READ TOC/PMA/ATIP"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetConfiguration {
    pub rt: FeatureRequest,
    pub starting_feature: u16,
    pub allocation_len: u16,
}

impl Cdb for GetConfiguration {
    fn fill(&self, cdb: &mut [u8; 16]) -> Result<usize, ParameterOutOfRange> {
        fill_get_configuration(
            cdb,
            self.rt,
            self.starting_feature,
            self.allocation_len,
            0x00,
        )
    }

    fn direction(&self) -> DataDirection {
        DataDirection::In
    }

    fn allocation(&self) -> Option<u32> {
        Some(self.allocation_len as u32)
    }

    fn name(&self) -> &'static str {
        "GET CONFIGURATION"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadDiscInformation {
    pub data_type: DiscInfoType,
    pub allocation_len: u16,
}

impl Cdb for ReadDiscInformation {
    fn fill(&self, cdb: &mut [u8; 16]) -> Result<usize, ParameterOutOfRange> {
        fill_read_disc_information(cdb, self.data_type, self.allocation_len, 0x00)
    }

    fn direction(&self) -> DataDirection {
        DataDirection::In
    }

    fn allocation(&self) -> Option<u32> {
        Some(self.allocation_len as u32)
    }

    fn name(&self) -> &'static str {
        "READ DISC INFORMATION"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadDiscStructure {
    pub media: StructureMediaType,
    pub address: u32,
    pub layer: u8,
    pub format: u8,
    pub allocation_len: u16,
    pub agid: u8,
}

impl Cdb for ReadDiscStructure {
    fn fill(&self, cdb: &mut [u8; 16]) -> Result<usize, ParameterOutOfRange> {
        fill_read_disc_structure(
            cdb,
            self.media,
            self.address,
            self.layer,
            self.format,
            self.allocation_len,
            self.agid,
            0x00,
        )
    }

    fn direction(&self) -> DataDirection {
        DataDirection::In
    }

    fn allocation(&self) -> Option<u32> {
        Some(self.allocation_len as u32)
    }

    fn name(&self) -> &'static str {
        "READ DISC STRUCTURE"
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReadBlockLimits;

impl Cdb for ReadBlockLimits {
    fn fill(&self, cdb: &mut [u8; 16]) -> Result<usize, ParameterOutOfRange> {
        fill_read_block_limits(cdb, 0x00)
    }

    fn direction(&self) -> DataDirection {
        DataDirection::In
    }

    fn allocation(&self) -> Option<u32> {
        Some(6)
    }

    fn name(&self) -> &'static str {
        "READ BLOCK LIMITS"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportDensitySupport {
    pub media: bool,
    pub medium_type: bool,
    pub allocation_len: u16,
}

impl Cdb for ReportDensitySupport {
    fn fill(&self, cdb: &mut [u8; 16]) -> Result<usize, ParameterOutOfRange> {
        fill_report_density_support(
            cdb,
            self.media,
            self.medium_type,
            self.allocation_len,
            0x00,
        )
    }

    fn direction(&self) -> DataDirection {
        DataDirection::In
    }

    fn allocation(&self) -> Option<u32> {
        Some(self.allocation_len as u32)
    }

    fn name(&self) -> &'static str {
        "REPORT DENSITY SUPPORT"
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StartStopUnit {
    pub immed: bool,
    pub power_condition: u8,
    pub loej: bool,
    pub start: bool,
}

impl Cdb for StartStopUnit {
    fn fill(&self, cdb: &mut [u8; 16]) -> Result<usize, ParameterOutOfRange> {
        fill_start_stop_unit(
            cdb,
            self.immed,
            self.power_condition,
            self.loej,
            self.start,
            0x00,
        )
    }

    fn direction(&self) -> DataDirection {
        DataDirection::None
    }

    fn allocation(&self) -> Option<u32> {
        Some(0)
    }

    fn name(&self) -> &'static str {
        "START STOP UNIT"
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PreventAllow {
    pub prevent: u8,
}

impl Cdb for PreventAllow {
    fn fill(&self, cdb: &mut [u8; 16]) -> Result<usize, ParameterOutOfRange> {
        fill_prevent_allow(cdb, self.prevent, 0x00)
    }

    fn direction(&self) -> DataDirection {
        DataDirection::None
    }

    fn allocation(&self) -> Option<u32> {
        Some(0)
    }

    fn name(&self) -> &'static str {
        "PREVENT ALLOW MEDIUM REMOVAL"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlextorReadCdDa {
    pub lba: u32,
    pub sectors: u32,
    pub subchannel: PlextorSubChannel,
}

impl Cdb for PlextorReadCdDa {
    fn fill(&self, cdb: &mut [u8; 16]) -> Result<usize, ParameterOutOfRange> {
        fill_plextor_read_cd_da(cdb, self.lba, self.sectors, self.subchannel, 0x00)
    }

    fn direction(&self) -> DataDirection {
        DataDirection::In
    }

    fn allocation(&self) -> Option<u32> {
        None
    }

    fn name(&self) -> &'static str {
        "PLEXTOR READ CD-DA"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PioneerReadCdDa {
    pub lba: u32,
    pub sectors: u32,
    pub subcode: PioneerSubCode,
}

impl Cdb for PioneerReadCdDa {
    fn fill(&self, cdb: &mut [u8; 16]) -> Result<usize, ParameterOutOfRange> {
        fill_pioneer_read_cd_da(cdb, self.lba, self.sectors, self.subcode, 0x00)
    }

    fn direction(&self) -> DataDirection {
        DataDirection::In
    }

    fn allocation(&self) -> Option<u32> {
        None
    }

    fn name(&self) -> &'static str {
        "PIONEER READ CD-DA"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PioneerReadCdDaMsf {
    pub start: Msf,
    pub end: Msf,
    pub subcode: PioneerSubCode,
}

impl Cdb for PioneerReadCdDaMsf {
    fn fill(&self, cdb: &mut [u8; 16]) -> Result<usize, ParameterOutOfRange> {
        fill_pioneer_read_cd_da_msf(cdb, self.start, self.end, self.subcode, 0x00)
    }

    fn direction(&self) -> DataDirection {
        DataDirection::In
    }

    fn allocation(&self) -> Option<u32> {
        None
    }

    fn name(&self) -> &'static str {
        "PIONEER READ CD-DA MSF"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlasmonReadLong {
    pub lba: u32,
    pub sectors: u8,
}

impl Cdb for PlasmonReadLong {
    fn fill(&self, cdb: &mut [u8; 16]) -> Result<usize, ParameterOutOfRange> {
        fill_plasmon_read_long(cdb, self.lba, self.sectors, 0x00)
    }

    fn direction(&self) -> DataDirection {
        DataDirection::In
    }

    fn allocation(&self) -> Option<u32> {
        None
    }

    fn name(&self) -> &'static str {
        "PLASMON READ LONG"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyquestReadLong6 {
    pub lba: u32,
    pub sectors: u8,
}

impl Cdb for SyquestReadLong6 {
    fn fill(&self, cdb: &mut [u8; 16]) -> Result<usize, ParameterOutOfRange> {
        fill_syquest_read_long6(cdb, self.lba, self.sectors, 0x00)
    }

    fn direction(&self) -> DataDirection {
        DataDirection::In
    }

    fn allocation(&self) -> Option<u32> {
        None
    }

    fn name(&self) -> &'static str {
        "SYQUEST READ LONG(6)"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyquestReadLong10 {
    pub lba: u32,
    pub byte_len: u16,
    pub correct: bool,
}

impl Cdb for SyquestReadLong10 {
    fn fill(&self, cdb: &mut [u8; 16]) -> Result<usize, ParameterOutOfRange> {
        fill_syquest_read_long10(cdb, self.lba, self.byte_len, self.correct, 0x00)
    }

    fn direction(&self) -> DataDirection {
        DataDirection::In
    }

    fn allocation(&self) -> Option<u32> {
        Some(self.byte_len as u32)
    }

    fn name(&self) -> &'static str {
        "SYQUEST READ LONG(10)"
    }
}

/// Every command this crate can issue.
#[enum_dispatch(Cdb)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScsiCommand {
    TestUnitReady,
    RequestSense,
    Inquiry,
    ModeSense6,
    ModeSense10,
    Read6,
    Read10,
    Read12,
    Read16,
    ReadCapacity10,
    ReadCapacity16,
    ReadCd,
    ReadCdMsf,
    ReadTocPmaAtip,
    GetConfiguration,
    ReadDiscInformation,
    ReadDiscStructure,
    ReadBlockLimits,
    ReportDensitySupport,
    StartStopUnit,
    PreventAllow,
    PlextorReadCdDa,
    PioneerReadCdDa,
    PioneerReadCdDaMsf,
    PlasmonReadLong,
    SyquestReadLong6,
    SyquestReadLong10,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatch_builds_through_the_union() {
        let cmd = ScsiCommand::from(Read10 {
            lba: 12345,
            blocks: 4,
            ..Default::default()
        });
        let mut cdb = [0u8; 16];
        let n = cmd.fill(&mut cdb).expect("in range");
        assert_eq!(n, 10);
        assert_eq!(cdb[0], 0x28);
        assert_eq!(cmd.direction(), DataDirection::In);
        assert_eq!(cmd.allocation(), None);
        assert_eq!(cmd.name(), "READ(10)");
    }

    #[test]
    fn allocation_follows_cdb_field() {
        let cmd = ScsiCommand::from(GetConfiguration {
            rt: FeatureRequest::All,
            starting_feature: 0,
            allocation_len: 512,
        });
        assert_eq!(cmd.allocation(), Some(512));
    }
}
