use hex_literal::hex;
use scsi_probe_rs::{
    control_block::inquiry::PeripheralClass,
    error::DecodeError,
    models::{
        block_limits::parse_block_limits,
        density::parse_density_support,
        disc_information::{DiscStatus, parse_disc_information},
        mode::{BlockDescriptor, parse_mode_header6, parse_mode_header10},
    },
};

/// MODE SENSE(10) answer of an MMC drive: 8-byte header, one short-form
/// descriptor, then the pages (left raw here).
const MODE10_MMC: [u8; 24] = hex!(
    "0016 00 00 00 00 0008"
    "00051448 00 000800"      // 333896 blocks of 2048
    "2a 06 3f 37 f1 77 29 23" // capabilities page head
);

#[test]
fn device_class_picks_descriptor_layout() {
    // The same bytes are a block count for a disk and a density code
    // area for a tape; only the INQUIRY class disambiguates.
    let body = hex!("0b 00 00 08 42 000000 00 000000");

    let disk = parse_mode_header6(&body, PeripheralClass::DirectAccess).expect("decodes");
    assert_eq!(
        disk.descriptors,
        vec![BlockDescriptor::ShortLba {
            blocks: 0x4200_0000,
            block_len: 0
        }]
    );

    let tape =
        parse_mode_header6(&body, PeripheralClass::SequentialAccess).expect("decodes");
    assert_eq!(
        tape.descriptors,
        vec![BlockDescriptor::General {
            density: 0x42,
            blocks: 0,
            block_len: 0
        }]
    );
}

#[test]
fn mode10_header_and_pages_offset() {
    let h = parse_mode_header10(&MODE10_MMC, PeripheralClass::MultiMedia).expect("decodes");
    assert_eq!(h.mode_data_length, 0x16);
    assert!(!h.long_lba);
    assert!(!h.write_protected);
    assert_eq!(
        h.descriptors,
        vec![BlockDescriptor::ShortLba {
            blocks: 0x051448,
            block_len: 2048
        }]
    );
    assert_eq!(h.pages_offset, 16);
    assert_eq!(MODE10_MMC[h.pages_offset], 0x2a); // capabilities page
}

#[test]
fn mode_headers_reject_short_buffers() {
    assert!(matches!(
        parse_mode_header6(&[0u8; 3], PeripheralClass::DirectAccess),
        Err(DecodeError::Truncated { .. })
    ));
    assert!(matches!(
        parse_mode_header10(&MODE10_MMC[..7], PeripheralClass::MultiMedia),
        Err(DecodeError::Truncated { .. })
    ));
}

#[test]
fn disc_information_for_an_open_cdr() {
    let mut b = vec![0u8; 34];
    b[1] = 32;
    b[2] = 0b0001_0101; // erasable, last session incomplete, disc incomplete
    b[3] = 1;
    b[4] = 2; // two sessions
    b[5] = 5;
    b[6] = 9;
    b[7] = 0x20;
    let di = parse_disc_information(&b).expect("decodes");
    assert_eq!(di.disc_status, DiscStatus::Incomplete);
    assert!(di.erasable);
    assert_eq!(di.sessions, 2);
    assert_eq!(di.first_track_last_session, 5);
    assert_eq!(di.last_track_last_session, 9);
}

#[test]
fn block_limits_fixed_block_device() {
    let bl = parse_block_limits(&hex!("00 000200 0200")).expect("decodes");
    assert!(bl.is_fixed());
    assert_eq!(bl.max_block_len, 512);
}

#[test]
fn density_support_truncation_monotonicity() {
    let mut buf = vec![0u8; 4 + 52];
    buf[1] = 54;
    buf[4] = 0x42;
    for len in 0..buf.len() {
        match parse_density_support(&buf[..len]) {
            Ok(ds) => {
                assert!(len >= 4);
                if len < buf.len() {
                    assert!(ds.truncated || ds.descriptors.is_empty());
                }
            },
            Err(DecodeError::Truncated { .. }) => assert!(len < 4),
            Err(other) => panic!("prefix {len}: unexpected {other:?}"),
        }
    }
}
