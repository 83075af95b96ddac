use anyhow::Result;
use scsi_probe_rs::{
    control_block::{
        codec::{Msf, read_be, unpack_bits},
        read::{
            READ_6_MAX_LBA, fill_read6, fill_read10, fill_read12, fill_read16,
        },
        read_cd::{
            C2ErrorField, ExpectedSectorType, HeaderCodes, MainChannel, SubChannel,
            fill_read_cd, fill_read_cd_msf,
        },
        read_toc::{TocFormat, fill_read_toc},
    },
    error::ParameterOutOfRange,
};

/// Every field written by a builder must read back bit-exactly through
/// the codec; silent truncation anywhere would corrupt addresses on the
/// medium.
#[test]
fn read6_round_trip() -> Result<()> {
    for lba in [0u32, 1, 0x1234, 0x0F_4321, READ_6_MAX_LBA] {
        let mut cdb = [0u8; 16];
        fill_read6(&mut cdb, lba, 16, 0)?;
        let decoded =
            ((read_be(&cdb, 1, 1)? as u32 & 0x1F) << 16) | read_be(&cdb, 2, 2)? as u32;
        assert_eq!(decoded, lba, "READ(6) LBA {lba:#x}");
        assert_eq!(cdb[4], 16);
    }
    Ok(())
}

#[test]
fn read6_rejects_one_past_max() {
    let mut cdb = [0u8; 16];
    let err = fill_read6(&mut cdb, 0x20_0000, 1, 0).expect_err("22-bit LBA");
    assert_eq!(
        err,
        ParameterOutOfRange {
            field: "LOGICAL BLOCK ADDRESS",
            value: 0x20_0000,
            max: 0x1F_FFFF,
        }
    );
}

#[test]
fn read10_golden_bytes() -> Result<()> {
    let mut cdb = [0u8; 16];
    let n = fill_read10(&mut cdb, 12345, 4, 0, false, false, false, 0, 0)?;
    let expected = hex::decode("28000000303900000400")?;
    assert_eq!(&cdb[..n], &expected[..]);
    Ok(())
}

#[test]
fn read10_round_trip_with_flags() -> Result<()> {
    let mut cdb = [0u8; 16];
    fill_read10(&mut cdb, 0xDEAD_BEEF, 0xFFFF, 0b011, true, true, true, 0x1F, 0)?;
    assert_eq!(read_be(&cdb, 2, 4)?, 0xDEAD_BEEF);
    assert_eq!(read_be(&cdb, 7, 2)?, 0xFFFF);
    assert_eq!(unpack_bits(cdb[1], 5, 3), 0b011); // RDPROTECT
    assert_eq!(unpack_bits(cdb[1], 4, 1), 1); // DPO
    assert_eq!(unpack_bits(cdb[1], 3, 1), 1); // FUA
    assert_eq!(unpack_bits(cdb[1], 1, 1), 1); // FUA_NV
    assert_eq!(cdb[6], 0x1F);
    Ok(())
}

#[test]
fn read12_and_read16_round_trip() -> Result<()> {
    let mut cdb = [0u8; 16];
    fill_read12(&mut cdb, 0x0102_0304, 0x0A0B_0C0D, 0, false, false, false, 0, 0)?;
    assert_eq!(read_be(&cdb, 2, 4)?, 0x0102_0304);
    assert_eq!(read_be(&cdb, 6, 4)?, 0x0A0B_0C0D);

    fill_read16(
        &mut cdb,
        0x0102_0304_0506_0708,
        0x1122_3344,
        0,
        false,
        false,
        false,
        0,
        0,
    )?;
    assert_eq!(read_be(&cdb, 2, 8)?, 0x0102_0304_0506_0708);
    assert_eq!(read_be(&cdb, 10, 4)?, 0x1122_3344);
    Ok(())
}

#[test]
fn read_cd_selection_byte() -> Result<()> {
    let mut cdb = [0u8; 16];
    fill_read_cd(
        &mut cdb,
        1000,
        1,
        ExpectedSectorType::Mode1,
        true,
        MainChannel::USER_DATA,
        HeaderCodes::None,
        C2ErrorField::C2Pointers,
        SubChannel::Q,
        0,
    )?;
    assert_eq!(cdb[0], 0xBE);
    assert_eq!(unpack_bits(cdb[1], 2, 3), 0b010); // Mode1
    assert_eq!(unpack_bits(cdb[1], 1, 1), 1); // DAP
    assert_eq!(unpack_bits(cdb[9], 4, 1), 1); // user data
    assert_eq!(unpack_bits(cdb[9], 1, 2), 0b01); // C2 pointers
    assert_eq!(cdb[10], 0b010); // Q sub-channel
    Ok(())
}

/// Start and end travel in separate CDB fields; a builder that collapsed
/// them would always ask for an empty transfer.
#[test]
fn read_cd_msf_bounds_are_independent() -> Result<()> {
    let start = Msf::new(0, 2, 0);
    let end = Msf::new(62, 15, 30);
    let mut cdb = [0u8; 16];
    fill_read_cd_msf(
        &mut cdb,
        start,
        end,
        ExpectedSectorType::CdDa,
        false,
        MainChannel::USER_DATA,
        HeaderCodes::None,
        C2ErrorField::None,
        SubChannel::None,
        0,
    )?;
    assert_eq!((cdb[3], cdb[4], cdb[5]), (0, 2, 0));
    assert_eq!((cdb[6], cdb[7], cdb[8]), (62, 15, 30));
    assert_ne!(&cdb[3..6], &cdb[6..9]);
    Ok(())
}

#[test]
fn read_toc_keeps_format_code() -> Result<()> {
    for format in [
        TocFormat::Toc,
        TocFormat::Session,
        TocFormat::FullToc,
        TocFormat::Pma,
        TocFormat::Atip,
        TocFormat::CdText,
    ] {
        let mut cdb = [0u8; 16];
        fill_read_toc(&mut cdb, false, format, 0, 1024, 0)?;
        assert_eq!(cdb[2] & 0x0F, format as u8);
    }
    Ok(())
}
