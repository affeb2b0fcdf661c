use crate::core::location::Coordinates;
use crate::core::paginate::ResultPage;
use crate::core::DiscoveryEngine;
use crate::models::{
    DiscoveryResponse, ErrorResponse, HealthResponse, MatchRequest, ReverseLocationQuery,
    ReverseLocationResponse, SearchRequest,
};
use crate::services::{state_abbreviation, CatalogStore, ReverseGeocodeClient};
use actix_web::{web, HttpResponse, Responder};
use std::collections::HashSet;
use std::sync::Arc;
use validator::Validate;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogStore>,
    pub geocode: Arc<ReverseGeocodeClient>,
    pub engine: DiscoveryEngine,
    pub batch_size: usize,
    pub known_cities: Arc<HashSet<String>>,
}

/// Configure all discovery-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/discovery/search", web::post().to(search))
        .route("/discovery/ai-match", web::post().to(ai_match))
        .route("/locations/reverse", web::get().to(reverse_locate));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let status = if state.catalog.is_empty() { "degraded" } else { "healthy" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Predicate search endpoint
///
/// POST /api/v1/discovery/search
///
/// Request body:
/// ```json
/// {
///   "query": "paciente",
///   "city": "Recife, PE",
///   "availability": "this_week",
///   "certifications": ["first_aid"],
///   "sort": "rating",
///   "visibleCount": 12
/// }
/// ```
async fn search(state: web::Data<AppState>, req: web::Json<SearchRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for search request: {:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let criteria = req.criteria();
    let requester = req.requester();

    let results = state.engine.search(
        &state.catalog.caregivers(),
        &criteria,
        requester.as_ref(),
        req.sort,
        chrono::Utc::now(),
    );

    tracing::debug!(
        "Search returned {} of {} caregivers",
        results.len(),
        state.catalog.len()
    );

    HttpResponse::Ok().json(page_response(results, state.batch_size, req.visible_count))
}

/// Preference match endpoint
///
/// POST /api/v1/discovery/ai-match
///
/// Request body:
/// ```json
/// {
///   "specializations": ["alzheimer"],
///   "minExperience": "0-2",
///   "keywords": ["paciente"],
///   "city": "Recife, PE"
/// }
/// ```
async fn ai_match(state: web::Data<AppState>, req: web::Json<MatchRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let results = state.engine.preference_match(
        &state.catalog.caregivers(),
        &req.profile(),
        &req.city_filter(),
        chrono::Utc::now(),
    );

    HttpResponse::Ok().json(page_response(results, state.batch_size, req.visible_count))
}

/// Reverse location lookup endpoint
///
/// GET /api/v1/locations/reverse?lat=-8.0476&lon=-34.8770
///
/// Failures are reported as notices with a null city, never as HTTP errors:
/// the client always keeps manual city selection as a fallback.
async fn reverse_locate(
    state: web::Data<AppState>,
    query: web::Query<ReverseLocationQuery>,
) -> impl Responder {
    let coords = Coordinates {
        latitude: query.lat,
        longitude: query.lon,
    };

    let place = match state.geocode.lookup(coords).await {
        Ok(place) => place,
        Err(e) => {
            tracing::warn!("Reverse geocode failed for {:?}: {}", coords, e);
            return HttpResponse::Ok().json(ReverseLocationResponse {
                city: None,
                known_city: false,
                notice: "We couldn't determine your location; you can still pick a city manually"
                    .to_string(),
            });
        }
    };

    let Some(abbrev) = state_abbreviation(&place.state_name) else {
        tracing::warn!("Unmapped state name: {}", place.state_name);
        return HttpResponse::Ok().json(ReverseLocationResponse {
            city: None,
            known_city: false,
            notice: "We couldn't determine your location; you can still pick a city manually"
                .to_string(),
        });
    };

    let city = format!("{}, {}", place.city, abbrev);
    let known = state.known_cities.contains(&city);
    let notice = if known {
        format!("Showing caregivers near {}", city)
    } else {
        format!(
            "No caregivers are registered in {} yet; showing all cities",
            city
        )
    };

    HttpResponse::Ok().json(ReverseLocationResponse {
        city: Some(city),
        known_city: known,
        notice,
    })
}

/// Window the ranked list behind a batch cursor. A client that has already
/// revealed deeper keeps its position, clamped to the list length.
fn page_response(
    results: Vec<crate::models::RankedResult>,
    batch_size: usize,
    requested_visible: Option<usize>,
) -> DiscoveryResponse {
    let mut page = ResultPage::new(results, batch_size);
    if let Some(requested) = requested_visible {
        while page.visible_count() < requested && page.has_more() {
            page.reveal_more();
        }
    }

    DiscoveryResponse {
        visible_count: page.visible_count(),
        total_results: page.total(),
        has_more: page.has_more(),
        results: page.visible().to_vec(),
    }
}
