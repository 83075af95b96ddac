use hex_literal::hex;
use scsi_probe_rs::{
    error::DecodeError,
    models::sense::{SenseBody, SenseData, SenseDescriptor, asc_ascq_to_str},
};

/// Medium-not-present fixed sense, as a tray-open MMC drive returns it.
const FIXED_NOT_READY: [u8; 18] = hex!("70 00 02 00000000 0a 00000000 3a 02 00 000000");

/// Descriptor-format equivalent with an information sub-record.
const DESC_MEDIUM_ERROR: [u8; 20] = hex!(
    "72 03 11 05 00 00 00 0c"  // header: MEDIUM ERROR, L-EC uncorrectable
    "00 0a 80 00 00000000 00031b94" // information descriptor, LBA 0x31b94
);

#[test]
fn response_code_selects_the_family() {
    let fixed = SenseData::parse(&FIXED_NOT_READY).expect("fixed");
    assert_eq!(fixed.response_code, 0x70);
    assert_eq!(fixed.sense_key, 0x02);
    assert_eq!((fixed.asc, fixed.ascq), (0x3A, 0x02));
    assert!(matches!(fixed.body, SenseBody::Fixed { .. }));
    assert!(!fixed.truncated);

    let desc = SenseData::parse(&DESC_MEDIUM_ERROR).expect("descriptor");
    assert_eq!(desc.response_code, 0x72);
    assert_eq!(desc.sense_key, 0x03);
    assert_eq!((desc.asc, desc.ascq), (0x11, 0x05));
    match &desc.body {
        SenseBody::Descriptor(list) => {
            assert_eq!(
                list[0],
                SenseDescriptor::Information {
                    valid: true,
                    information: 0x31b94,
                }
            );
        },
        SenseBody::Fixed { .. } => panic!("0x72 decoded as fixed"),
    }
}

/// Decoding any prefix of a valid buffer must never read out of bounds or
/// crash: either a truncated-header error or a partial record with the
/// flag set.
#[test]
fn truncation_monotonicity() {
    for buf in [&FIXED_NOT_READY[..], &DESC_MEDIUM_ERROR[..]] {
        for len in 0..buf.len() {
            match SenseData::parse(&buf[..len]) {
                Ok(sense) => assert!(
                    sense.truncated || len >= 18,
                    "prefix {len} decoded without truncation flag"
                ),
                Err(DecodeError::Truncated { .. }) => assert!(len < 3),
                Err(other) => panic!("prefix {len}: unexpected {other:?}"),
            }
        }
    }
}

#[test]
fn short_sense_keeps_key_and_flags_truncation() {
    let sense = SenseData::parse(&FIXED_NOT_READY[..8]).expect("partial");
    assert!(sense.truncated);
    assert_eq!(sense.sense_key, 0x02);
    // ASC byte was cut off; it must read as zero, not garbage
    assert_eq!(sense.asc, 0x00);
}

#[test]
fn deferred_codes_flagged() {
    let mut buf = FIXED_NOT_READY;
    buf[0] = 0x71;
    assert!(SenseData::parse(&buf).expect("fixed deferred").deferred);
}

#[test]
fn non_sense_codes_rejected() {
    assert_eq!(
        SenseData::parse(&[0x00, 0x00, 0x00]),
        Err(DecodeError::NotSense { code: 0x00 })
    );
    assert_eq!(
        SenseData::parse(&[0x7F, 0x00, 0x00]),
        Err(DecodeError::NotSense { code: 0x7F })
    );
}

#[test]
fn asc_ascq_table_covers_common_conditions() {
    assert_eq!(asc_ascq_to_str(0x3A, 0x02), "Medium not present - tray open");
    assert_eq!(asc_ascq_to_str(0xEE, 0xEE), "UNSPECIFIED / vendor specific");
}
