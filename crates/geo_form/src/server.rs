/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/

use crate::{
    action::service::{add_point, remove_point, submit_points},
    common::types::*,
    environment::{AppConfig, AppState},
    tools::{error::AppError, logger::setup_tracing, prometheus::prometheus_metrics},
    view::page::render_form_page,
};
use actix_web::{
    http::header::{self, ContentType},
    web, App, HttpResponse, HttpServer,
};
use anyhow::Result;
use std::{env::var, net::Ipv4Addr};
use tracing::*;

fn redirect_to_form() -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, "/"))
        .finish()
}

async fn form_page(app_state: web::Data<AppState>) -> HttpResponse {
    let form = app_state.form.read().await;
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(render_form_page(&form))
}

// The HTML handlers always redirect back to the page; rejections are already
// stored in the form state and show up in the error banner.

async fn form_add_point(
    app_state: web::Data<AppState>,
    input: web::Form<PointForm>,
) -> HttpResponse {
    let _ = add_point(&app_state, &input).await;
    redirect_to_form()
}

async fn form_remove_point(
    app_state: web::Data<AppState>,
    index: web::Path<usize>,
) -> HttpResponse {
    let _ = remove_point(&app_state, index.into_inner()).await;
    redirect_to_form()
}

async fn form_submit(app_state: web::Data<AppState>) -> HttpResponse {
    let _ = submit_points(&app_state).await;
    redirect_to_form()
}

async fn api_state(app_state: web::Data<AppState>) -> web::Json<FormState> {
    web::Json(app_state.form.read().await.clone())
}

async fn api_add_point(
    app_state: web::Data<AppState>,
    input: web::Json<PointForm>,
) -> Result<web::Json<Point>, AppError> {
    Ok(web::Json(add_point(&app_state, &input).await?))
}

async fn api_remove_point(
    app_state: web::Data<AppState>,
    index: web::Path<usize>,
) -> Result<web::Json<Point>, AppError> {
    Ok(web::Json(remove_point(&app_state, index.into_inner()).await?))
}

async fn api_submit(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let (points, _) = submit_points(&app_state).await?;
    Ok(HttpResponse::Accepted().json(SubmitAccepted { points }))
}

/// Path segments that do not parse are reported with the API's JSON error body.
fn api_path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, _req| {
        AppError::InvalidRequest(format!("Invalid path parameter : {err}")).into()
    })
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(form_page))
        .route("/points", web::post().to(form_add_point))
        .route("/points/{index}/remove", web::post().to(form_remove_point))
        .route("/submit", web::post().to(form_submit))
        .service(
            web::scope("/api")
                .app_data(api_path_config())
                .route("/state", web::get().to(api_state))
                .route("/points", web::post().to(api_add_point))
                .route("/points/{index}", web::delete().to(api_remove_point))
                .route("/submit", web::post().to(api_submit)),
        )
        .route(
            "/health",
            web::get().to(|| Box::pin(async { HttpResponse::Ok().body("Geo Form Is Up!") })),
        );
}

pub async fn run_server() -> Result<()> {
    let dhall_config_path =
        var("DHALL_CONFIG").unwrap_or_else(|_| "./dhall-configs/dev/geo_form.dhall".to_string());
    let app_config = serde_dhall::from_file(dhall_config_path).parse::<AppConfig>()?;

    let _guard = setup_tracing(app_config.logger_cfg.clone())?;

    std::panic::set_hook(Box::new(|panic_info| {
        error!("Panic Occured : {:?}", panic_info);
    }));

    let app_state = AppState::new(app_config)?;
    let http_server_port = app_state.http_server_port;

    info!(
        "Starting geo form on port {} (geo service : {})",
        http_server_port, app_state.geo_process_url
    );

    let app_data = web::Data::new(app_state);
    let prometheus = prometheus_metrics();

    HttpServer::new(move || {
        App::new()
            .wrap(prometheus.clone())
            .app_data(app_data.clone())
            .configure(configure)
    })
    .bind((Ipv4Addr::UNSPECIFIED, http_server_port))?
    .shutdown_timeout(60)
    .run()
    .await?;

    Ok(())
}
