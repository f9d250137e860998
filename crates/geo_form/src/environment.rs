/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/

use crate::{common::types::FormState, tools::logger::LoggerConfig};
use anyhow::{Context, Result};
use reqwest::{Client, Url};
use serde::Deserialize;
use std::{sync::Arc, time::Duration};
use tokio::sync::RwLock;

#[derive(Debug, Deserialize, Clone)]
pub struct GeoServiceConfig {
    pub process_url: String,
    pub request_timeout_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub http_server_port: u16,
    pub geo_service_cfg: GeoServiceConfig,
    pub logger_cfg: LoggerConfig,
}

#[derive(Clone)]
pub struct AppState {
    pub form: Arc<RwLock<FormState>>,
    pub geo_client: Client,
    pub geo_process_url: Url,
    pub http_server_port: u16,
}

impl AppState {
    pub fn new(app_config: AppConfig) -> Result<AppState> {
        let geo_process_url = Url::parse(app_config.geo_service_cfg.process_url.as_str())
            .with_context(|| {
                format!(
                    "Failed to parse process_url ({})",
                    app_config.geo_service_cfg.process_url
                )
            })?;

        let geo_client = Client::builder()
            .timeout(Duration::from_secs(
                app_config.geo_service_cfg.request_timeout_seconds,
            ))
            .build()
            .context("Failed to build geo service client")?;

        Ok(AppState {
            form: Arc::new(RwLock::new(FormState::default())),
            geo_client,
            geo_process_url,
            http_server_port: app_config.http_server_port,
        })
    }
}
