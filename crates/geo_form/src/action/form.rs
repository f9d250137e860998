/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/

//! State transitions of the coordinate form. Nothing here performs I/O; the
//! outbound call lives in [`crate::action::service`].

use crate::{
    common::{types::*, utils::parse_point},
    tools::{callapi::CallApiError, error::FormError},
};
use chrono::Utc;
use serde_json::Value;

impl FormState {
    /// Validates the raw inputs and appends the point. On failure the list is
    /// untouched and the typed inputs are kept so the user can correct them.
    pub fn add_point(&mut self, lat: &str, lng: &str) -> Result<Point, FormError> {
        self.lat_input = lat.to_string();
        self.lng_input = lng.to_string();

        match parse_point(lat, lng) {
            Ok(point) => {
                self.points.push(point);
                self.lat_input.clear();
                self.lng_input.clear();
                self.error = None;
                Ok(point)
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    pub fn remove_point(&mut self, index: usize) -> Result<Point, FormError> {
        if index >= self.points.len() {
            return Err(self.fail(FormError::PointNotFound(index)));
        }
        Ok(self.points.remove(index))
    }

    /// Guards a submission and, when allowed, moves the form into the loading
    /// state. The returned request is a snapshot of the list at this moment.
    pub fn begin_submission(&mut self) -> Result<GeoRequest, FormError> {
        if self.points.is_empty() {
            return Err(self.fail(FormError::EmptySubmission));
        }
        if self.loading {
            return Err(self.fail(FormError::SubmissionInFlight));
        }

        self.loading = true;
        self.error = None;
        self.response = None;
        self.last_sent_at = Some(Utc::now());

        Ok(GeoRequest {
            points: self.points.clone(),
        })
    }

    pub fn complete_submission(&mut self, result: Result<Value, CallApiError>) {
        self.loading = false;
        match result {
            Ok(response) => self.response = Some(response),
            Err(err) => self.error = Some(err.to_string()),
        }
    }

    fn fail(&mut self, err: FormError) -> FormError {
        self.error = Some(err.to_string());
        err
    }
}
