/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum_macros::{Display, EnumString};

pub const MIN_LATITUDE: f64 = -90.0;
pub const MAX_LATITUDE: f64 = 90.0;
pub const MIN_LONGITUDE: f64 = -180.0;
pub const MAX_LONGITUDE: f64 = 180.0;

/// A validated coordinate pair. Only built through [`crate::common::utils::parse_point`].
#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub lat: f64,
    pub lng: f64,
}

/// Body POSTed to the geo service.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct GeoRequest {
    pub points: Vec<Point>,
}

/// Raw text inputs, as typed into the form or sent to `/api/points`.
#[derive(Deserialize, Serialize, Clone, Debug, Default)]
pub struct PointForm {
    #[serde(default)]
    pub lat: String,
    #[serde(default)]
    pub lng: String,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
pub struct FormState {
    pub lat_input: String,
    pub lng_input: String,
    pub points: Vec<Point>,
    pub loading: bool,
    pub error: Option<String>,
    pub response: Option<Value>,
    pub last_sent_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, EnumString, Display, Serialize, Deserialize, Eq, Hash, PartialEq)]
pub enum SubmissionOutcome {
    Success,
    Failure,
    Rejected,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SubmitAccepted {
    pub points: usize,
}
