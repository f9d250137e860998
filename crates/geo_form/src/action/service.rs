/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/

use crate::{
    common::types::*,
    environment::AppState,
    outbound::external::process_points,
    tools::{
        error::FormError,
        prometheus::{FORM_VALIDATION_FAILURES, GEO_SUBMISSIONS, POINTS_ADDED},
    },
};
use tokio::task::JoinHandle;
use tracing::*;
use uuid::Uuid;

fn record_rejection(err: &FormError) {
    let reason: &'static str = err.into();
    FORM_VALIDATION_FAILURES.with_label_values(&[reason]).inc();
    warn!(tag = "[FORM REJECTED]", reason = reason, "{}", err);
}

pub async fn add_point(app_state: &AppState, input: &PointForm) -> Result<Point, FormError> {
    let result = app_state
        .form
        .write()
        .await
        .add_point(&input.lat, &input.lng);

    match &result {
        Ok(point) => {
            POINTS_ADDED.inc();
            debug!("Point added : lat = {}, lng = {}", point.lat, point.lng);
        }
        Err(err) => record_rejection(err),
    }

    result
}

pub async fn remove_point(app_state: &AppState, index: usize) -> Result<Point, FormError> {
    let result = app_state.form.write().await.remove_point(index);

    match &result {
        Ok(point) => debug!("Point removed at {} : lat = {}, lng = {}", index, point.lat, point.lng),
        Err(err) => record_rejection(err),
    }

    result
}

/// Starts a submission of the current list and returns without waiting for the
/// geo service. Yields the number of points sent and the handle of the task
/// that writes the outcome back into the form state.
pub async fn submit_points(app_state: &AppState) -> Result<(usize, JoinHandle<()>), FormError> {
    let request = match app_state.form.write().await.begin_submission() {
        Ok(request) => request,
        Err(err) => {
            GEO_SUBMISSIONS
                .with_label_values(&[SubmissionOutcome::Rejected.to_string().as_str()])
                .inc();
            record_rejection(&err);
            return Err(err);
        }
    };

    let submission_id = Uuid::new_v4();
    let points = request.points.len();
    info!(
        tag = "[GEO SUBMISSION]",
        submission_id = %submission_id,
        points = points,
        "Submitting points to {}",
        app_state.geo_process_url
    );

    let (form, client, process_url) = (
        app_state.form.clone(),
        app_state.geo_client.clone(),
        app_state.geo_process_url.clone(),
    );

    let handle = tokio::spawn(async move {
        let result = process_points(&client, &process_url, request).await;

        let outcome = match &result {
            Ok(_) => SubmissionOutcome::Success,
            Err(err) => {
                error!(tag = "[GEO SUBMISSION]", submission_id = %submission_id, "Submission failed : {}", err);
                SubmissionOutcome::Failure
            }
        };
        GEO_SUBMISSIONS
            .with_label_values(&[outcome.to_string().as_str()])
            .inc();
        info!(tag = "[GEO SUBMISSION]", submission_id = %submission_id, outcome = %outcome, "Submission completed");

        form.write().await.complete_submission(result);
    });

    Ok((points, handle))
}
