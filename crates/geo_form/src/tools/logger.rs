/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/

use anyhow::Result;
use serde::Deserialize;
use strum_macros::Display;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_subscriber::{layer::SubscriberExt, EnvFilter, Registry};

#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Deserialize, Clone, Copy, Display, PartialEq, Eq)]
pub enum LogLevel {
    #[strum(serialize = "trace")]
    TRACE,
    #[strum(serialize = "debug")]
    DEBUG,
    #[strum(serialize = "info")]
    INFO,
    #[strum(serialize = "warn")]
    WARN,
    #[strum(serialize = "error")]
    ERROR,
    #[strum(serialize = "off")]
    OFF,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggerConfig {
    pub level: LogLevel,
    pub log_to_file: bool,
}

/// Installs the global subscriber. `RUST_LOG` takes precedence over the
/// configured level. Keep the returned guard alive for the lifetime of the
/// process, dropping it flushes and stops the background writer.
pub fn setup_tracing(logger_cfg: LoggerConfig) -> Result<WorkerGuard> {
    let (non_blocking, guard) = if logger_cfg.log_to_file {
        tracing_appender::non_blocking(tracing_appender::rolling::hourly(
            "logs",
            "geo-form.log",
        ))
    } else {
        tracing_appender::non_blocking(std::io::stdout())
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logger_cfg.level.to_string()));

    let subscriber = Registry::default()
        .with(env_filter)
        .with(JsonStorageLayer)
        .with(BunyanFormattingLayer::new(
            "geo-form".to_string(),
            non_blocking,
        ));

    tracing_log::LogTracer::init()?;
    tracing::subscriber::set_global_default(subscriber)?;

    Ok(guard)
}
