//! HTTP handler functions for the feedback map API.

use actix_web::{HttpResponse, web};
use feedback_map_analytics::aggregate_by_county;
use feedback_map_feedback_models::NewFeedback;
use feedback_map_feedback_models::departments::{
    DEPARTMENTS, department_stats as catalog_department_stats, search_departments as search_catalog,
};
use feedback_map_geography::resolver::CountyResolver;
use feedback_map_render::state::LoadState;
use feedback_map_render::view::ZoomTransform;
use feedback_map_render::{RenderOptions, render_load_state, render_map};
use feedback_map_server_models::{
    ApiCountyList, ApiHealth, ApiResolvedCounty, MapQueryParams, ResolveParams, SearchParams,
};
use feedback_map_source::SourceError;

use crate::AppState;

const SVG_CONTENT_TYPE: &str = "image/svg+xml";

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/feedback`
///
/// Every stored record, newest first.
pub async fn list_feedback(state: web::Data<AppState>) -> HttpResponse {
    match state.repository.list().await {
        Ok(records) => HttpResponse::Ok().json(records),
        Err(e) => internal_error("Failed to list feedback", &e),
    }
}

/// `POST /api/feedback`
///
/// Stores a submission and refreshes the map data in the background so the
/// new record is counted. The current map stays up until the refresh lands.
pub async fn create_feedback(
    state: web::Data<AppState>,
    body: web::Json<NewFeedback>,
) -> HttpResponse {
    match state.repository.create(body.into_inner()).await {
        Ok(record) => {
            log::info!(
                "Stored feedback {} ({})",
                record.reference_number,
                record.county().unwrap_or("no county")
            );
            let state = state.clone();
            actix_web::rt::spawn(async move {
                let outcome = state.loader.refresh().await;
                log::debug!("Map refresh after submission finished: {outcome:?}");
            });
            HttpResponse::Created().json(record)
        }
        Err(SourceError::Validation(e)) => HttpResponse::BadRequest().json(serde_json::json!({
            "error": e.to_string(),
            "field": e.field,
        })),
        Err(e) => internal_error("Failed to store feedback", &e),
    }
}

/// `GET /api/stats`
pub async fn stats(state: web::Data<AppState>) -> HttpResponse {
    match state.repository.stats().await {
        Ok(stats) => HttpResponse::Ok().json(stats),
        Err(e) => internal_error("Failed to compute stats", &e),
    }
}

/// `GET /api/counties`
///
/// Per-county counts, issues, and fill colors over the current records.
pub async fn counties(state: web::Data<AppState>) -> HttpResponse {
    match state.repository.list().await {
        Ok(records) => {
            let aggregation = aggregate_by_county(&records);
            HttpResponse::Ok().json(ApiCountyList::from(&aggregation))
        }
        Err(e) => internal_error("Failed to aggregate counties", &e),
    }
}

/// `GET /api/resolve?lat=&lng=`
///
/// Nearest county to a point. Zero or non-finite coordinates resolve to
/// nothing.
pub async fn resolve(params: web::Query<ResolveParams>) -> HttpResponse {
    let entry = CountyResolver::default().nearest(params.lat, params.lng);
    HttpResponse::Ok().json(ApiResolvedCounty::from(entry))
}

/// `GET /api/departments`
pub async fn departments() -> HttpResponse {
    HttpResponse::Ok().json(DEPARTMENTS)
}

/// `GET /api/departments/search?q=`
pub async fn search_departments(params: web::Query<SearchParams>) -> HttpResponse {
    HttpResponse::Ok().json(search_catalog(&params.q))
}

/// `GET /api/departments/stats`
pub async fn department_stats() -> HttpResponse {
    HttpResponse::Ok().json(catalog_department_stats())
}

/// `GET /api/map.svg`
///
/// The choropleth map in its current load state. While loading, a
/// placeholder is returned; after a failed load, an error placeholder
/// with status 503.
pub async fn map_svg(
    state: web::Data<AppState>,
    params: web::Query<MapQueryParams>,
) -> HttpResponse {
    let params = params.into_inner();
    let defaults = RenderOptions::default();
    let width = params.width.unwrap_or(defaults.width);
    let height = params.height.unwrap_or(defaults.height);

    let load_state = state.loader.state().await;
    let data = match render_load_state(&load_state, width, height) {
        Ok(Some(placeholder)) => {
            let mut response = if matches!(load_state, LoadState::Error(_)) {
                HttpResponse::ServiceUnavailable()
            } else {
                HttpResponse::Ok()
            };
            return response.content_type(SVG_CONTENT_TYPE).body(placeholder);
        }
        Ok(None) => match load_state.data() {
            Some(data) => data.clone(),
            None => return HttpResponse::ServiceUnavailable().finish(),
        },
        Err(e) => return bad_request(&e),
    };

    let transform = ZoomTransform::new(
        params.zoom.unwrap_or(1.0),
        params.x.unwrap_or(0.0),
        params.y.unwrap_or(0.0),
    )
    .constrain(width, height);

    let options = RenderOptions {
        width,
        height,
        selected: params.selected,
        hovered: params.hovered,
        transform,
        ..defaults
    };

    match render_map(&data.boundaries, &data.aggregation, &options) {
        Ok(rendered) => HttpResponse::Ok()
            .content_type(SVG_CONTENT_TYPE)
            .body(rendered.svg),
        Err(e) => bad_request(&e),
    }
}

/// `POST /api/map/reload`
///
/// Retries a failed load, or refreshes a loaded one.
pub async fn reload_map(state: web::Data<AppState>) -> HttpResponse {
    let outcome = match state.loader.retry().await {
        Ok(outcome) => outcome,
        Err(_) => state.loader.load().await,
    };
    log::debug!("Map reload finished: {outcome:?}");

    match state.loader.state().await {
        LoadState::Ready(data) => HttpResponse::Ok().json(serde_json::json!({
            "status": "ready",
            "records": data.records.len(),
            "counties": data.boundaries.counties.len(),
        })),
        LoadState::Error(message) => HttpResponse::ServiceUnavailable().json(serde_json::json!({
            "status": "error",
            "error": message,
        })),
        LoadState::Loading => HttpResponse::Accepted().json(serde_json::json!({
            "status": "loading",
        })),
    }
}

fn internal_error(context: &str, e: &SourceError) -> HttpResponse {
    log::error!("{context}: {e}");
    HttpResponse::InternalServerError().json(serde_json::json!({
        "error": e.to_string(),
    }))
}

fn bad_request(e: &impl std::fmt::Display) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({
        "error": e.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{App, test, web};
    use feedback_map_feedback_models::FeedbackRecord;
    use feedback_map_source::FeedbackRepository;
    use feedback_map_source::boundaries::CatalogBoundaries;
    use feedback_map_source::config::MockDelays;
    use feedback_map_source::loader::MapDataLoader;
    use feedback_map_source::mock::MockFeedbackRepository;

    use crate::{AppState, configure};

    fn state() -> web::Data<AppState> {
        let repository: Arc<dyn FeedbackRepository> =
            Arc::new(MockFeedbackRepository::seeded(MockDelays::NONE));
        web::Data::new(AppState {
            loader: MapDataLoader::new(repository.clone(), Arc::new(CatalogBoundaries)),
            repository,
        })
    }

    #[actix_web::test]
    async fn health_reports_version() {
        let app =
            test::init_service(App::new().app_data(state()).configure(configure)).await;
        let req = test::TestRequest::get().uri("/api/health").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["healthy"], true);
    }

    #[actix_web::test]
    async fn created_feedback_is_listed_first_with_a_county() {
        let app =
            test::init_service(App::new().app_data(state()).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/api/feedback")
            .set_json(serde_json::json!({
                "phoneNumber": "+254700000000",
                "type": "complaint",
                "description": "Broken streetlight",
                "location": { "latitude": -1.29, "longitude": 36.82 }
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let req = test::TestRequest::get().uri("/api/feedback").to_request();
        let records: Vec<FeedbackRecord> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(records[0].description, "Broken streetlight");
        assert_eq!(records[0].county(), Some("Nairobi"));
    }

    #[actix_web::test]
    async fn submission_refreshes_map_without_leaving_ready() {
        let state = state();
        state.loader.load().await;
        let before = state.loader.state().await.data().unwrap().records.len();
        let app =
            test::init_service(App::new().app_data(state.clone()).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/api/feedback")
            .set_json(serde_json::json!({
                "phoneNumber": "+254700000000",
                "type": "complaint",
                "description": "Water point broken",
                "location": { "latitude": -1.29, "longitude": 36.82 }
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        assert!(state.loader.state().await.data().is_some());

        let mut refreshed = before;
        for _ in 0..50 {
            actix_web::rt::time::sleep(std::time::Duration::from_millis(10)).await;
            let load_state = state.loader.state().await;
            assert!(!load_state.is_loading());
            refreshed = load_state.data().unwrap().records.len();
            if refreshed > before {
                break;
            }
        }
        assert_eq!(refreshed, before + 1);
    }

    #[actix_web::test]
    async fn invalid_feedback_is_rejected() {
        let app =
            test::init_service(App::new().app_data(state()).configure(configure)).await;
        let req = test::TestRequest::post()
            .uri("/api/feedback")
            .set_json(serde_json::json!({ "phoneNumber": "", "description": "x" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn counties_are_ranked() {
        let app =
            test::init_service(App::new().app_data(state()).configure(configure)).await;
        let req = test::TestRequest::get().uri("/api/counties").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["counties"][0]["name"], "Nairobi");
        assert_eq!(body["counties"][0]["count"], 2);
        assert_eq!(body["maxCount"], 2);
        assert_eq!(body["unresolved"], 1);
    }

    #[actix_web::test]
    async fn resolve_finds_nearest_county() {
        let app =
            test::init_service(App::new().app_data(state()).configure(configure)).await;

        let req = test::TestRequest::get()
            .uri("/api/resolve?lat=-4.05&lng=39.66")
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["county"], "Mombasa");

        let req = test::TestRequest::get()
            .uri("/api/resolve?lat=0&lng=36.8")
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert!(body["county"].is_null());
    }

    #[actix_web::test]
    async fn department_search_matches_names() {
        let app =
            test::init_service(App::new().app_data(state()).configure(configure)).await;
        let req = test::TestRequest::get()
            .uri("/api/departments/search?q=health")
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert!(!body.as_array().unwrap().is_empty());
    }

    #[actix_web::test]
    async fn map_shows_loading_then_renders() {
        let state = state();
        let app =
            test::init_service(App::new().app_data(state.clone()).configure(configure)).await;

        let req = test::TestRequest::get().uri("/api/map.svg").to_request();
        let body = test::call_and_read_body(&app, req).await;
        let svg = String::from_utf8(body.to_vec()).unwrap();
        assert!(svg.contains("Loading map data..."));

        state.loader.load().await;

        let req = test::TestRequest::get()
            .uri("/api/map.svg?selected=Nairobi&zoom=2")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = test::read_body(resp).await;
        let svg = String::from_utf8(body.to_vec()).unwrap();
        assert!(svg.contains(r#"data-county="Nairobi""#));
        assert!(svg.contains("scale(2)"));
    }

    #[actix_web::test]
    async fn map_rejects_bad_dimensions() {
        let state = state();
        state.loader.load().await;
        let app = test::init_service(App::new().app_data(state).configure(configure)).await;
        let req = test::TestRequest::get()
            .uri("/api/map.svg?width=0")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
