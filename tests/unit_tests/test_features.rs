use hex_literal::hex;
use scsi_probe_rs::{
    error::DecodeError,
    models::features::{FeatureDetail, parse_feature_list},
};

/// Header plus Profile List, Core and a CD Read feature, the opening of
/// a real DVD-writer response.
fn drive_response() -> Vec<u8> {
    let mut buf = hex!(
        "00000000 0000 0010"                 // length patched below; profile DVD-ROM
        "0000 03 0c"                         // Profile List, 3 profiles
        "0010 0100 0008 0100 0009 0000"     // DVD-ROM (current), CD-ROM (current), CD-R
        "0001 0b 08"                         // Core, v2
        "00000002 0200 0000"                 // SCSI interface, INQ2
        "001e 09 04"                         // CD Read, v2
        "83 000000"
    )
    .to_vec();
    let len = (buf.len() - 4) as u32;
    buf[0..4].copy_from_slice(&len.to_be_bytes());
    buf
}

#[test]
fn full_response_decodes() {
    let list = parse_feature_list(&drive_response()).expect("decodes");
    assert_eq!(list.current_profile, 0x0010);
    assert_eq!(list.descriptors.len(), 3);
    assert!(!list.truncated);

    match &list.descriptors[0].detail {
        FeatureDetail::ProfileList(profiles) => {
            assert_eq!(profiles.len(), 3);
            assert!(profiles[0].current && profiles[1].current);
            assert!(!profiles[2].current);
        },
        other => panic!("expected profile list, got {other:?}"),
    }
    match &list.descriptors[1].detail {
        FeatureDetail::Core {
            physical_interface,
            inq2,
            ..
        } => {
            assert_eq!(*physical_interface, 2);
            assert!(inq2);
        },
        other => panic!("expected core, got {other:?}"),
    }
    assert_eq!(list.descriptors[2].name(), Some("CD Read"));
}

/// Forward compatibility: a code outside the published tables decodes
/// into a raw-preserving descriptor, never an error.
#[test]
fn fabricated_feature_code_tolerated() {
    let mut buf = hex!("00000000 0000 0008").to_vec();
    buf.extend_from_slice(&hex!("beef 05 06 010203040506"));
    let len = (buf.len() - 4) as u32;
    buf[0..4].copy_from_slice(&len.to_be_bytes());

    let list = parse_feature_list(&buf).expect("unknown code is not an error");
    assert_eq!(list.descriptors.len(), 1);
    let d = &list.descriptors[0];
    assert_eq!(d.code, 0xBEEF);
    assert_eq!(d.detail, FeatureDetail::Unknown);
    assert_eq!(d.data, hex!("010203040506"));
    assert_eq!(d.name(), None);
    assert_eq!(d.version, 1);
    assert!(d.current);
}

#[test]
fn truncation_monotonicity() {
    let buf = drive_response();
    for len in 0..buf.len() {
        match parse_feature_list(&buf[..len]) {
            Ok(list) => {
                assert!(len >= 8);
                if len < buf.len() {
                    assert!(list.truncated, "prefix {len} not flagged");
                }
            },
            Err(DecodeError::Truncated { .. }) => assert!(len < 8),
            Err(other) => panic!("prefix {len}: unexpected {other:?}"),
        }
    }
}

/// Spec scenario: a header whose declared length is exhausted exactly by
/// the header itself yields an empty descriptor list.
#[test]
fn header_only_response() {
    let buf = hex!("00000004 0000 0008");
    let list = parse_feature_list(&buf).expect("decodes");
    assert_eq!(list.data_length, 4);
    assert_eq!(list.current_profile, 0x0008);
    assert!(list.descriptors.is_empty());
    assert!(!list.truncated);
}
