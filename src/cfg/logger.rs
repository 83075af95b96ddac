// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::{path::Path, sync::Arc};

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::json;
use tracing::{Event, Subscriber};
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{
    EnvFilter,
    fmt::{
        self, FmtContext, FormatEvent, FormatFields,
        format::{FmtSpan, JsonFields, Writer},
    },
    layer::SubscriberExt,
};

use crate::cfg::config::LogConfig;

// Custom layer emitting one JSON object per event
struct JsonFormatter {
    config: Arc<LogConfig>,
}

#[derive(Serialize)]
struct LogEntry {
    timestamp: String,
    level: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    target: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    module_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    line: Option<u32>,
    fields: serde_json::Map<String, serde_json::Value>,
}

impl LogEntry {
    fn new(
        config: &LogConfig,
        event: &Event,
        fields: serde_json::Map<String, serde_json::Value>,
    ) -> Self {
        Self {
            timestamp: chrono::Utc::now().to_rfc3339(),
            level: event.metadata().level().to_string(),
            target: config
                .is_show_target
                .then(|| event.metadata().target().to_string()),
            module_path: config
                .is_show_module_path
                .then(|| event.metadata().module_path().unwrap_or("").to_string()),
            line: if config.is_show_line {
                event.metadata().line()
            } else {
                None
            },
            fields,
        }
    }
}

impl<S, N> FormatEvent<S, N> for JsonFormatter
where
    S: Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let mut visitor = JsonVisitor::default();
        event.record(&mut visitor);

        let log_entry = LogEntry::new(&self.config, event, visitor.fields);
        writeln!(
            writer,
            "{}",
            serde_json::to_string(&log_entry).map_err(|_| std::fmt::Error)?
        )
    }
}

#[derive(Default)]
struct JsonVisitor {
    fields: serde_json::Map<String, serde_json::Value>,
}

impl tracing::field::Visit for JsonVisitor {
    fn record_debug(
        &mut self,
        field: &tracing::field::Field,
        value: &dyn std::fmt::Debug,
    ) {
        self.fields
            .insert(field.name().to_string(), json!(format!("{:?}", value)));
    }
}

/// Install the global subscriber described by `config`. The returned
/// guard must stay alive for the non-blocking writer to flush.
pub fn init_logger(config: &LogConfig) -> Result<WorkerGuard> {
    let (file_writer, guard) = match config.output.as_str() {
        "stdout" => tracing_appender::non_blocking(std::io::stdout()),
        "stderr" => tracing_appender::non_blocking(std::io::stderr()),
        "file" => {
            let cfg = config
                .file
                .as_ref()
                .context("logger.output=file requires a file section")?;

            let path = Path::new(&cfg.path);
            let directory = path.parent().unwrap_or_else(|| Path::new(""));
            let file_name = path
                .file_name()
                .unwrap_or_else(|| std::ffi::OsStr::new("scsi-probe.log"));

            let rotation = match cfg.rotation_frequency.as_deref() {
                Some("minutely") => Rotation::MINUTELY,
                Some("hourly") => Rotation::HOURLY,
                Some("daily") => Rotation::DAILY,
                _ => Rotation::NEVER,
            };
            tracing_appender::non_blocking(RollingFileAppender::new(
                rotation, directory, file_name,
            ))
        },
        other => anyhow::bail!("invalid log output {other:?}"),
    };

    let subscriber_layer = fmt::layer()
        .with_writer(move || file_writer.clone())
        .with_ansi(true)
        .with_span_events(FmtSpan::NEW | FmtSpan::CLOSE)
        .json()
        .event_format(JsonFormatter {
            config: Arc::new(config.clone()),
        })
        .fmt_fields(JsonFields::default());

    let env_filter =
        EnvFilter::try_new(&config.level).context("failed to parse log level from config")?;

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(subscriber_layer);

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set global default subscriber")?;

    Ok(guard)
}
