/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use strum_macros::IntoStaticStr;
use thiserror::Error;

/// Errors a user can cause through the form. The display text is what the
/// error banner shows.
#[derive(Debug, Clone, PartialEq, Eq, Error, IntoStaticStr)]
pub enum FormError {
    #[error("Please enter valid numbers for latitude and longitude")]
    InvalidNumber,
    #[error("Latitude must be between -90 and 90")]
    LatitudeOutOfRange,
    #[error("Longitude must be between -180 and 180")]
    LongitudeOutOfRange,
    #[error("Please add at least one coordinate point")]
    EmptySubmission,
    #[error("A request to the geo service is already in progress")]
    SubmissionInFlight,
    #[error("No coordinate point at position {0}")]
    PointNotFound(usize),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    InvalidRequest(String),
    #[error("{0}")]
    InternalError(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error_message: String,
    error_code: String,
}

impl AppError {
    fn code(&self) -> &'static str {
        match self {
            AppError::InvalidRequest(_) => "INVALID_REQUEST",
            AppError::InternalError(_) => "INTERNAL_ERROR",
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error_message: self.to_string(),
            error_code: self.code().to_string(),
        })
    }
}

impl From<FormError> for AppError {
    fn from(err: FormError) -> Self {
        AppError::InvalidRequest(err.to_string())
    }
}
