use std::time::Duration;

use anyhow::Result;
use hex_literal::hex;
use scsi_probe_rs::{
    client::{
        executor::{execute, execute_command},
        mock::{MockReply, MockTransport},
    },
    control_block::command::{
        DataDirection, GetConfiguration, PlextorReadCdDa, Read10, ScsiCommand,
        TestUnitReady,
    },
    control_block::get_configuration::FeatureRequest,
    control_block::vendor::plextor::PlextorSubChannel,
    error::ExecuteError,
    models::sense::SenseData,
};

const TIMEOUT: Duration = Duration::from_secs(5);

#[test]
fn good_command_returns_data() -> Result<()> {
    let mut t = MockTransport::new();
    t.push_reply(MockReply::Data(vec![0u8; 2048]));

    let cmd = ScsiCommand::from(Read10 {
        lba: 16,
        blocks: 1,
        ..Default::default()
    });
    let outcome = execute_command(&mut t, &cmd, Some(2048), TIMEOUT)?;

    assert!(!outcome.failed);
    assert_eq!(outcome.data.as_ref().map(|d| d.len()), Some(2048));
    assert!(outcome.sense.is_none());
    assert_eq!(t.last_cdb().map(|c| c[0]), Some(0x28));
    assert_eq!(t.transfers[0], (DataDirection::In, 2048));
    Ok(())
}

#[test]
fn check_condition_carries_decodable_sense() -> Result<()> {
    let mut t = MockTransport::new();
    t.push_reply(MockReply::Check(
        hex!("70 00 02 00000000 0a 00000000 3a 02 00 000000").to_vec(),
    ));

    let cmd = ScsiCommand::from(TestUnitReady::default());
    let outcome = execute_command(&mut t, &cmd, None, TIMEOUT)?;

    assert!(outcome.failed);
    let sense: SenseData = outcome
        .sense_data()
        .expect("sense present")
        .expect("sense decodes");
    assert_eq!(sense.sense_key, 0x02);
    assert_eq!((sense.asc, sense.ascq), (0x3A, 0x02));
    Ok(())
}

/// A dead transport is not a device error: no sense, a distinct typed
/// timeout instead.
#[test]
fn timeout_is_not_a_device_error() {
    let mut t = MockTransport::new();
    t.push_reply(MockReply::Timeout);

    let err = execute(&mut t, &[0u8; 6], DataDirection::None, 0, TIMEOUT)
        .expect_err("scripted timeout");
    match err {
        ExecuteError::Timeout { waited } => assert_eq!(waited, TIMEOUT),
        other => panic!("expected timeout, got {other:?}"),
    }
}

#[test]
fn allocation_length_drives_expected_transfer() -> Result<()> {
    let mut t = MockTransport::new();
    t.push_reply(MockReply::Data(hex!("00000004 0000 0008").to_vec()));

    let cmd = ScsiCommand::from(GetConfiguration {
        rt: FeatureRequest::All,
        starting_feature: 0,
        allocation_len: 512,
    });
    execute_command(&mut t, &cmd, None, TIMEOUT)?;
    assert_eq!(t.transfers[0], (DataDirection::In, 512));
    Ok(())
}

#[test]
fn block_read_without_expected_length_is_refused() {
    let mut t = MockTransport::new();
    let cmd = ScsiCommand::from(Read10 {
        lba: 0,
        blocks: 1,
        ..Default::default()
    });
    // no I/O may happen before the error
    assert!(execute_command(&mut t, &cmd, None, TIMEOUT).is_err());
    assert!(t.submitted.is_empty());
}

#[test]
fn out_of_range_parameters_fail_before_submission() {
    let mut t = MockTransport::new();
    let cmd = ScsiCommand::from(Read10 {
        lba: 0,
        blocks: 1,
        rd_protect: 9,
        ..Default::default()
    });
    assert!(execute_command(&mut t, &cmd, Some(2048), TIMEOUT).is_err());
    assert!(t.submitted.is_empty());
}

#[test]
fn vendor_command_through_the_union() -> Result<()> {
    let mut t = MockTransport::new();
    t.push_reply(MockReply::Data(vec![0u8; 2352]));

    let cmd = ScsiCommand::from(PlextorReadCdDa {
        lba: 150,
        sectors: 1,
        subchannel: PlextorSubChannel::None,
    });
    execute_command(&mut t, &cmd, Some(2352), TIMEOUT)?;

    let cdb = t.last_cdb().expect("submitted");
    assert_eq!(cdb.len(), 12);
    assert_eq!(cdb[0], 0xD8);
    Ok(())
}

/// Device returned partial data and then failed; both buffers surface.
#[test]
fn partial_data_with_sense_preserved() -> Result<()> {
    let mut t = MockTransport::new();
    t.push_reply(MockReply::CheckWithData(
        vec![0xAB; 512],
        hex!("70 00 03 00000000 0a 00000000 11 00 00 000000").to_vec(),
    ));

    let cmd = ScsiCommand::from(Read10 {
        lba: 100,
        blocks: 2,
        ..Default::default()
    });
    let outcome = execute_command(&mut t, &cmd, Some(4096), TIMEOUT)?;
    assert!(outcome.failed);
    assert_eq!(outcome.data.as_ref().map(|d| d.len()), Some(512));
    let sense = outcome.sense_data().expect("present").expect("decodes");
    assert_eq!(sense.sense_key, 0x03);
    Ok(())
}
