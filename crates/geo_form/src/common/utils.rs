/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/

use crate::{common::types::*, tools::error::FormError};

fn parse_coordinate(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|value| !value.is_nan())
}

/// Parses and range-checks the two raw inputs. Numeric checks come before
/// range checks, and latitude is checked before longitude.
pub fn parse_point(lat: &str, lng: &str) -> Result<Point, FormError> {
    let (lat, lng) = match (parse_coordinate(lat), parse_coordinate(lng)) {
        (Some(lat), Some(lng)) => (lat, lng),
        _ => return Err(FormError::InvalidNumber),
    };

    if !(MIN_LATITUDE..=MAX_LATITUDE).contains(&lat) {
        return Err(FormError::LatitudeOutOfRange);
    }

    if !(MIN_LONGITUDE..=MAX_LONGITUDE).contains(&lng) {
        return Err(FormError::LongitudeOutOfRange);
    }

    Ok(Point { lat, lng })
}
