// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Text renderers for decoded structures.
//!
//! One pure `render_*` function per type; no I/O, no state. The
//! presentation layer decides where the text goes.

use std::fmt::Write;

use crate::{
    models::{
        block_limits::BlockLimits,
        density::DensitySupport,
        disc_information::DiscInformation,
        features::{FeatureList, feature_name},
        mode::{BlockDescriptor, ModeHeader},
        sense::SenseData,
        toc::TocPmaAtipResponse,
    },
};

/// Writes cannot fail into a String; keep call sites tidy.
macro_rules! w {
    ($out:expr, $($arg:tt)*) => {
        let _ = writeln!($out, $($arg)*);
    };
}

pub fn render_sense(sense: &SenseData) -> String {
    // Display carries key/ASC/ASCQ; add the sub-records for descriptor
    // format.
    let mut out = format!("{sense}\n");
    if let crate::models::sense::SenseBody::Descriptor(list) = &sense.body {
        for d in list {
            w!(out, "  {d:?}");
        }
    }
    out
}

pub fn render_feature_list(list: &FeatureList) -> String {
    let mut out = String::new();
    w!(
        out,
        "current profile {:#06x}, {} feature(s){}",
        list.current_profile,
        list.descriptors.len(),
        if list.truncated { " [truncated]" } else { "" }
    );
    for d in &list.descriptors {
        w!(
            out,
            "  {:#06x} {:<32} v{} {}{}",
            d.code,
            feature_name(d.code).unwrap_or("(unknown)"),
            d.version,
            if d.current { "current " } else { "" },
            if d.persistent { "persistent" } else { "" },
        );
    }
    out
}

pub fn render_toc(resp: &TocPmaAtipResponse) -> String {
    let mut out = String::new();
    match resp {
        TocPmaAtipResponse::Toc(toc) => {
            w!(out, "tracks {}..{}", toc.first_track, toc.last_track);
            for t in &toc.tracks {
                w!(
                    out,
                    "  track {:3} {} start {}",
                    t.track,
                    if t.is_data() { "data " } else { "audio" },
                    t.start,
                );
            }
        },
        TocPmaAtipResponse::Session(s) => {
            w!(
                out,
                "sessions {}..{}, last session starts at track {} ({})",
                s.first_session,
                s.last_session,
                s.first_track_last_session,
                s.start,
            );
        },
        TocPmaAtipResponse::FullToc(full) => {
            w!(out, "sessions {}..{}", full.first_session, full.last_session);
            for d in &full.descriptors {
                w!(
                    out,
                    "  session {} point {:#04x} at {} -> {}",
                    d.session,
                    d.point,
                    d.atime,
                    d.ptime,
                );
            }
        },
        TocPmaAtipResponse::Pma(pma) => {
            for d in &pma.descriptors {
                w!(out, "  point {:#04x} -> {}", d.point, d.ptime);
            }
        },
        TocPmaAtipResponse::Atip(atip) => {
            w!(
                out,
                "{} blank, lead-in {}, lead-out limit {}",
                if atip.is_cdrw { "CD-RW" } else { "CD-R" },
                atip.leadin_start,
                atip.leadout_start,
            );
        },
        TocPmaAtipResponse::CdText(text) => {
            for p in &text.packs {
                w!(
                    out,
                    "  pack {:#04x} track {:2}: {}",
                    p.pack_type,
                    p.track,
                    String::from_utf8_lossy(&p.text).trim_end_matches('\0'),
                );
            }
        },
    }
    out
}

pub fn render_disc_information(di: &DiscInformation) -> String {
    let mut out = String::new();
    w!(
        out,
        "{:?} disc, {} session(s), tracks {}..{}{}",
        di.disc_status,
        di.sessions,
        di.first_track_last_session,
        di.last_track_last_session,
        if di.erasable { ", erasable" } else { "" },
    );
    w!(
        out,
        "lead-in {} lead-out {}",
        di.last_session_leadin_start,
        di.last_leadout_start
    );
    out
}

pub fn render_mode_header(h: &ModeHeader) -> String {
    let mut out = String::new();
    w!(
        out,
        "medium type {:#04x}{}, pages at +{}",
        h.medium_type,
        if h.write_protected {
            ", write protected"
        } else {
            ""
        },
        h.pages_offset,
    );
    for d in &h.descriptors {
        match d {
            BlockDescriptor::General {
                density,
                blocks,
                block_len,
            } => {
                w!(
                    out,
                    "  density {density:#04x}: {blocks} block(s) of {block_len}"
                );
            },
            BlockDescriptor::ShortLba { blocks, block_len } => {
                w!(out, "  {blocks} block(s) of {block_len}");
            },
            BlockDescriptor::LongLba { blocks, block_len } => {
                w!(out, "  {blocks} block(s) of {block_len}");
            },
        }
    }
    out
}

pub fn render_block_limits(bl: &BlockLimits) -> String {
    if bl.is_fixed() {
        format!("fixed block size {}\n", bl.max_block_len)
    } else {
        format!(
            "block sizes {}..{} (granularity 2^{})\n",
            bl.min_block_len, bl.max_block_len, bl.granularity
        )
    }
}

pub fn render_density_support(ds: &DensitySupport) -> String {
    let mut out = String::new();
    for d in &ds.descriptors {
        w!(
            out,
            "{:#04x}/{:#04x} {:<8} {:<8} {} MB{}",
            d.primary_code,
            d.secondary_code,
            d.name,
            d.organization,
            d.capacity,
            if d.deflt { " (default)" } else { "" },
        );
    }
    out
}
