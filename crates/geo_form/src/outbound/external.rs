/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/
use crate::{
    common::types::GeoRequest,
    tools::callapi::{call_api, CallApiError},
};
use reqwest::{Client, Method, Url};
use serde_json::Value;

/// POSTs the point list to the geo service. Any JSON body is accepted.
pub async fn process_points(
    client: &Client,
    process_url: &Url,
    request_body: GeoRequest,
) -> Result<Value, CallApiError> {
    call_api::<Value, GeoRequest>(
        client,
        Method::POST,
        process_url,
        vec![("content-type", "application/json")],
        Some(request_body),
    )
    .await
}
