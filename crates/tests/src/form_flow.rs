/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/

use actix_web::{http::StatusCode, test, web, App};
use geo_form::{
    action::service::submit_points,
    common::types::{FormState, Point, PointForm},
    environment::{AppConfig, AppState, GeoServiceConfig},
    server::configure,
    tools::{
        error::FormError,
        logger::{LogLevel, LoggerConfig},
    },
};
use serde_json::{json, Value};
use std::{
    net::SocketAddr,
    sync::{Arc, Mutex},
    time::Duration,
};
use warp::Filter;

type Received = Arc<Mutex<Vec<Value>>>;

/// Stub geo service on an ephemeral port. Records every JSON body it
/// receives and answers with `reply` and `status`.
fn start_geo_stub(status: u16, reply: Value, delay: Duration) -> (SocketAddr, Received) {
    let received: Received = Arc::new(Mutex::new(Vec::new()));
    let recorder = received.clone();

    let route = warp::post()
        .and(warp::path!("geo" / "process"))
        .and(warp::header::exact("content-type", "application/json"))
        .and(warp::body::json())
        .then(move |body: Value| {
            let recorder = recorder.clone();
            let reply = reply.clone();
            async move {
                recorder.lock().expect("recorder lock").push(body);
                tokio::time::sleep(delay).await;
                warp::reply::with_status(
                    warp::reply::json(&reply),
                    warp::http::StatusCode::from_u16(status).expect("valid status"),
                )
            }
        });

    let (addr, server) = warp::serve(route).bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(server);

    (addr, received)
}

/// Stub geo service that answers 200 with an HTML body instead of JSON.
fn start_html_geo_stub() -> SocketAddr {
    let route = warp::post()
        .and(warp::path!("geo" / "process"))
        .map(|| warp::reply::html("<html><body>not json</body></html>"));

    let (addr, server) = warp::serve(route).bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(server);

    addr
}

fn app_state(process_url: String) -> AppState {
    app_state_with_timeout(process_url, 5)
}

fn app_state_with_timeout(process_url: String, request_timeout_seconds: u64) -> AppState {
    AppState::new(AppConfig {
        http_server_port: 0,
        geo_service_cfg: GeoServiceConfig {
            process_url,
            request_timeout_seconds,
        },
        logger_cfg: LoggerConfig {
            level: LogLevel::INFO,
            log_to_file: false,
        },
    })
    .expect("valid app config")
}

fn stub_url(addr: SocketAddr) -> String {
    format!("http://{addr}/geo/process")
}

async fn wait_until_settled(state: &AppState) -> FormState {
    for _ in 0..250 {
        let form = state.form.read().await.clone();
        if !form.loading {
            return form;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("submission did not complete in time");
}

fn point_form(lat: &str, lng: &str) -> PointForm {
    PointForm {
        lat: lat.to_string(),
        lng: lng.to_string(),
    }
}

#[actix_web::test]
async fn add_remove_and_submit_through_the_form() -> anyhow::Result<()> {
    let (addr, received) = start_geo_stub(200, json!({"status": "ok"}), Duration::ZERO);
    let state = app_state(stub_url(addr));
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state.clone()))
            .configure(configure),
    )
    .await;

    for (lat, lng) in [("40.0", "-3.5"), ("51.5", "-0.1")] {
        let req = test::TestRequest::post()
            .uri("/points")
            .set_form(point_form(lat, lng))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    }

    let req = test::TestRequest::post()
        .uri("/points/0/remove")
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::SEE_OTHER);

    assert_eq!(
        state.form.read().await.points,
        vec![Point { lat: 51.5, lng: -0.1 }]
    );

    let req = test::TestRequest::post().uri("/submit").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::SEE_OTHER);

    let form = wait_until_settled(&state).await;

    assert_eq!(
        received.lock().expect("recorder lock").clone(),
        vec![json!({"points": [{"lat": 51.5, "lng": -0.1}]})]
    );
    assert_eq!(form.response, Some(json!({"status": "ok"})));
    assert_eq!(form.error, None);

    let req = test::TestRequest::get().uri("/").to_request();
    let body = test::call_and_read_body(&app, req).await;
    let html = String::from_utf8(body.to_vec())?;

    assert!(html.contains("Response:"));
    assert!(html.contains("&quot;status&quot;: &quot;ok&quot;"));
    assert!(!html.contains("class=\"error\""));

    Ok(())
}

#[actix_web::test]
async fn out_of_range_latitude_is_rejected() -> anyhow::Result<()> {
    let state = app_state("http://127.0.0.1:9/geo/process".to_string());
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state.clone()))
            .configure(configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/points")
        .set_json(point_form("95", "0"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error_message"], "Latitude must be between -90 and 90");
    assert_eq!(body["error_code"], "INVALID_REQUEST");

    let req = test::TestRequest::get().uri("/api/state").to_request();
    let form: FormState = test::call_and_read_body_json(&app, req).await;

    assert!(form.points.is_empty());
    assert_eq!(form.lat_input, "95");
    assert_eq!(
        form.error.as_deref(),
        Some("Latitude must be between -90 and 90")
    );

    Ok(())
}

#[actix_web::test]
async fn api_add_and_remove_points() -> anyhow::Result<()> {
    let state = app_state("http://127.0.0.1:9/geo/process".to_string());
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state.clone()))
            .configure(configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/points")
        .set_json(point_form("12.5", "77.25"))
        .to_request();
    let point: Point = test::call_and_read_body_json(&app, req).await;
    assert_eq!(point, Point { lat: 12.5, lng: 77.25 });

    let req = test::TestRequest::delete().uri("/api/points/4").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::delete().uri("/api/points/0").to_request();
    let removed: Point = test::call_and_read_body_json(&app, req).await;
    assert_eq!(removed, point);
    assert!(state.form.read().await.points.is_empty());

    Ok(())
}

#[actix_web::test]
async fn empty_submission_never_reaches_the_geo_service() -> anyhow::Result<()> {
    let (addr, received) = start_geo_stub(200, json!({}), Duration::ZERO);
    let state = app_state(stub_url(addr));
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state.clone()))
            .configure(configure),
    )
    .await;

    let req = test::TestRequest::post().uri("/api/submit").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    tokio::time::sleep(Duration::from_millis(50)).await;

    let form = state.form.read().await.clone();
    assert!(received.lock().expect("recorder lock").is_empty());
    assert!(!form.loading);
    assert_eq!(
        form.error.as_deref(),
        Some("Please add at least one coordinate point")
    );

    Ok(())
}

#[actix_web::test]
async fn non_success_status_is_reported_as_error() -> anyhow::Result<()> {
    let (addr, received) = start_geo_stub(500, json!({"error": "boom"}), Duration::ZERO);
    let state = app_state(stub_url(addr));
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state.clone()))
            .configure(configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/points")
        .set_json(point_form("1", "2"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::post().uri("/api/submit").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::ACCEPTED);

    let accepted: Value = test::read_body_json(resp).await;
    assert_eq!(accepted, json!({"points": 1}));

    let form = wait_until_settled(&state).await;

    assert_eq!(received.lock().expect("recorder lock").len(), 1);
    assert_eq!(form.response, None);
    assert!(form
        .error
        .as_deref()
        .is_some_and(|error| error.contains("500")));

    Ok(())
}

#[actix_web::test]
async fn unreachable_geo_service_is_reported_as_error() -> anyhow::Result<()> {
    let port = std::net::TcpListener::bind("127.0.0.1:0")?.local_addr()?.port();
    let state = app_state(format!("http://127.0.0.1:{port}/geo/process"));
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state.clone()))
            .configure(configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/points")
        .set_form(point_form("1", "2"))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::post().uri("/submit").to_request();
    test::call_service(&app, req).await;

    let form = wait_until_settled(&state).await;

    assert_eq!(form.response, None);
    assert!(form
        .error
        .as_deref()
        .is_some_and(|error| error.starts_with("Failed to reach the geo service")));

    Ok(())
}

#[actix_web::test]
async fn non_json_reply_is_reported_as_error() -> anyhow::Result<()> {
    let addr = start_html_geo_stub();
    let state = app_state(stub_url(addr));
    state.form.write().await.add_point("48.85", "2.35")?;

    let (_, in_flight) = submit_points(&state).await?;
    in_flight.await?;

    let form = state.form.read().await.clone();
    assert!(!form.loading);
    assert_eq!(form.response, None);
    assert!(form
        .error
        .as_deref()
        .is_some_and(|error| error.starts_with("Failed to parse response as JSON")));

    Ok(())
}

#[actix_web::test]
async fn slow_geo_service_times_out() -> anyhow::Result<()> {
    let (addr, received) =
        start_geo_stub(200, json!({"status": "late"}), Duration::from_secs(3));
    let state = app_state_with_timeout(stub_url(addr), 1);
    state.form.write().await.add_point("35.68", "139.69")?;

    let (_, in_flight) = submit_points(&state).await?;
    in_flight.await?;

    let form = state.form.read().await.clone();
    assert!(!form.loading);
    assert_eq!(form.response, None);
    assert!(form
        .error
        .as_deref()
        .is_some_and(|error| error.starts_with("Failed to reach the geo service")));
    assert_eq!(received.lock().expect("recorder lock").len(), 1);

    Ok(())
}

#[actix_web::test]
async fn unparsable_index_gets_json_error() -> anyhow::Result<()> {
    let state = app_state("http://127.0.0.1:9/geo/process".to_string());
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state.clone()))
            .configure(configure),
    )
    .await;

    let req = test::TestRequest::delete().uri("/api/points/-1").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error_code"], "INVALID_REQUEST");
    assert!(body["error_message"]
        .as_str()
        .is_some_and(|message| message.starts_with("Invalid path parameter")));

    Ok(())
}

#[tokio::test]
async fn overlapping_submission_is_refused_while_in_flight() -> anyhow::Result<()> {
    let (addr, received) =
        start_geo_stub(200, json!({"status": "ok"}), Duration::from_millis(200));
    let state = app_state(stub_url(addr));
    state.form.write().await.add_point("10", "20")?;

    let (points, in_flight) = submit_points(&state).await?;
    assert_eq!(points, 1);
    assert!(state.form.read().await.loading);

    assert_eq!(
        submit_points(&state).await.err(),
        Some(FormError::SubmissionInFlight)
    );

    in_flight.await?;

    let form = state.form.read().await.clone();
    assert!(!form.loading);
    assert_eq!(form.response, Some(json!({"status": "ok"})));
    assert_eq!(received.lock().expect("recorder lock").len(), 1);

    Ok(())
}

#[actix_web::test]
async fn health_check() {
    let state = app_state("http://127.0.0.1:9/geo/process".to_string());
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(configure),
    )
    .await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let body = test::call_and_read_body(&app, req).await;

    assert_eq!(body.as_ref(), b"Geo Form Is Up!");
}
