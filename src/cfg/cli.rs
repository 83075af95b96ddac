// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Resolve a config path: `SCSI_PROBE_CONFIG` wins, then `rel` relative
/// to the working directory; the result must exist.
pub fn resolve_config_path(rel: &str) -> Result<PathBuf> {
    let chosen = std::env::var_os("SCSI_PROBE_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(rel));

    let abs = if chosen.is_absolute() {
        chosen
    } else {
        std::env::current_dir()
            .context("cannot get current working dir")?
            .join(&chosen)
    };

    let canon = abs
        .canonicalize()
        .with_context(|| format!("failed to canonicalize path {abs:?}"))?;

    Ok(canon)
}

/// As [`resolve_config_path`], but falls back to `default` when `rel`
/// does not exist.
pub fn resolve_config_path_or(rel: &str, default: &str) -> Result<PathBuf> {
    if Path::new(rel).exists() || std::env::var_os("SCSI_PROBE_CONFIG").is_some() {
        resolve_config_path(rel)
    } else {
        resolve_config_path(default)
    }
}
