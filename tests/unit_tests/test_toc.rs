use hex_literal::hex;
use scsi_probe_rs::{
    control_block::{codec::Msf, read_toc::TocFormat},
    error::DecodeError,
    models::toc::{TocPmaAtipResponse, parse_toc_pma_atip},
};

/// Two-track mixed-mode TOC (data + audio + lead-out), LBA addressing.
fn toc_fixture() -> Vec<u8> {
    hex!(
        "001a 0102"
        "00 14 01 00 00000000"  // track 1, data
        "00 10 02 00 00004b00"  // track 2, audio at 19200
        "00 14 aa 00 00051447"  // lead-out
    )
    .to_vec()
}

/// Raw lead-in TOC with the three mandatory A0/A1/A2 points.
fn full_toc_fixture() -> Vec<u8> {
    hex!(
        "0023 0101"
        "01 14 00 a0 00 00 00 00 01 00 00" // first track 1
        "01 14 00 a1 00 00 00 00 01 00 00" // last track 1
        "01 14 00 a2 00 00 00 00 4f 3b 4a" // lead-out at 79:59:74
    )
    .to_vec()
}

#[test]
fn toc_decodes_tracks_in_order() {
    let resp = parse_toc_pma_atip(&toc_fixture(), TocFormat::Toc).expect("decodes");
    let TocPmaAtipResponse::Toc(toc) = resp else {
        panic!("wrong variant for format 0");
    };
    assert_eq!(toc.first_track, 1);
    assert_eq!(toc.last_track, 2);
    assert_eq!(toc.tracks.len(), 3);
    assert!(toc.tracks[0].is_data());
    assert!(!toc.tracks[1].is_data());
    assert_eq!(toc.tracks[1].start, 19200);
    assert_eq!(toc.tracks[2].track, 0xAA);
}

#[test]
fn full_toc_lead_out_point() {
    let resp =
        parse_toc_pma_atip(&full_toc_fixture(), TocFormat::FullToc).expect("decodes");
    let TocPmaAtipResponse::FullToc(full) = resp else {
        panic!("wrong variant for format 2");
    };
    assert_eq!(full.descriptors.len(), 3);
    let a2 = &full.descriptors[2];
    assert_eq!(a2.point, 0xA2);
    assert_eq!(a2.ptime, Msf::new(0x4f, 0x3b, 0x4a));
}

/// The decoder must take the caller's word for the format: the same
/// bytes produce different, equally valid variants.
#[test]
fn format_argument_controls_the_variant() {
    let bytes = toc_fixture();
    assert!(matches!(
        parse_toc_pma_atip(&bytes, TocFormat::Toc),
        Ok(TocPmaAtipResponse::Toc(_))
    ));
    assert!(matches!(
        parse_toc_pma_atip(&bytes, TocFormat::Session),
        Ok(TocPmaAtipResponse::Session(_))
    ));
    assert!(matches!(
        parse_toc_pma_atip(&bytes, TocFormat::Pma),
        Ok(TocPmaAtipResponse::Pma(_))
    ));
}

#[test]
fn truncation_monotonicity() {
    for fixture in [toc_fixture(), full_toc_fixture()] {
        for len in 0..fixture.len() {
            match parse_toc_pma_atip(&fixture[..len], TocFormat::Toc) {
                Ok(TocPmaAtipResponse::Toc(toc)) => {
                    assert!(len >= 4);
                    if len < fixture.len() {
                        assert!(toc.truncated, "prefix {len} not flagged");
                    }
                },
                Ok(other) => panic!("prefix {len}: wrong variant {other:?}"),
                Err(DecodeError::Truncated { .. }) => assert!(len < 4),
                Err(other) => panic!("prefix {len}: unexpected {other:?}"),
            }
        }
    }
}

#[test]
fn atip_for_a_cdr_blank() {
    let buf = hex!(
        "001a 0000"
        "24 40 84 00"  // ITWP 2, speed 4x class, URU, CD-R, A1 valid
        "97 22 0d 00"  // lead-in start 97:22:13 (BCD)
        "79 59 74 00"  // lead-out limit 79:59:74 (BCD)
        "02 4c 60 00"  // A1
    );
    let resp = parse_toc_pma_atip(&buf, TocFormat::Atip).expect("decodes");
    let TocPmaAtipResponse::Atip(atip) = resp else {
        panic!("wrong variant for format 4");
    };
    assert!(!atip.is_cdrw);
    assert!(atip.uru);
    assert_eq!(atip.reference_speed, 4);
    assert_eq!(atip.leadin_start, Msf::new(97, 22, 13));
    assert_eq!(atip.leadout_start, Msf::new(79, 59, 74));
    assert_eq!(atip.a1, Some([0x02, 0x4c, 0x60]));
    assert_eq!(atip.a3, None);
}
