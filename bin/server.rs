// Emendas Dashboard - Web Server
// JSON API consumed by the browser dashboard. All endpoints are pure
// reads over the dataset loaded once at startup.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use emendas_dashboard::{
    aggregate, extract_earmark_facets, filter_activity, filter_earmarks, Activity,
    AutocompleteIndex, Dataset, Deputy, DeputyFilter, Earmark, EarmarkFacets, EarmarkFilter,
    Facets, FormattedTotals, Totals, MIN_QUERY_DETAIL,
};

/// Default dataset file, relative to the working directory.
const DEFAULT_DATASET: &str = "base_mestre_deputados_completa.json";

/// Grid cap of the original dashboard: at most 100 cards per response
/// unless the client asks otherwise.
const GRID_LIMIT: usize = 100;

/// Shared application state
#[derive(Clone)]
struct AppState {
    dataset: Arc<Dataset>,
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            error: None,
        }
    }
}

impl ApiResponse<()> {
    fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: (),
            error: Some(message.into()),
        }
    }
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

#[derive(Serialize)]
struct FacetsResponse<'a> {
    facets: &'a Facets,
    updated_at: Option<&'a str>,
    total_deputies: usize,
}

/// GET /api/facets - Dataset-wide filter vocabularies
async fn get_facets(State(state): State<AppState>) -> impl IntoResponse {
    let dataset = &state.dataset;
    Json(ApiResponse::ok(FacetsResponse {
        facets: &dataset.facets,
        updated_at: dataset.updated_at.as_deref(),
        total_deputies: dataset.deputies.len(),
    }))
    .into_response()
}

#[derive(Deserialize)]
struct DeputiesQuery {
    term: Option<String>,
    party: Option<String>,
    uf: Option<String>,
    year: Option<i32>,
    funcao: Option<String>,
    beneficiario: Option<String>,
    limit: Option<usize>,
}

#[derive(Serialize)]
struct DeputiesResponse {
    total: usize,
    deputies: Vec<Deputy>,
}

/// GET /api/deputies - Filtered deputy cards
async fn get_deputies(
    State(state): State<AppState>,
    Query(query): Query<DeputiesQuery>,
) -> impl IntoResponse {
    let filter = DeputyFilter {
        term: query.term.unwrap_or_default(),
        party: query.party,
        uf: query.uf,
        year: query.year,
        function: query.funcao,
        beneficiary: query.beneficiario,
    };

    let matched = state.dataset.filter(&filter);
    let total = matched.len();
    let limit = query.limit.unwrap_or(GRID_LIMIT);
    let deputies: Vec<Deputy> = matched.into_iter().take(limit).cloned().collect();

    Json(ApiResponse::ok(DeputiesResponse { total, deputies })).into_response()
}

#[derive(Deserialize)]
struct EarmarksQuery {
    term: Option<String>,
    year: Option<i32>,
    funcao: Option<String>,
    beneficiario: Option<String>,
}

#[derive(Serialize)]
struct EarmarkTableResponse {
    deputy: String,
    rows: Vec<Earmark>,
    totals: Totals,
    formatted_totals: FormattedTotals,
    facets: EarmarkFacets,
}

/// GET /api/deputies/:name/earmarks - Detail table: sorted rows + totals
async fn get_deputy_earmarks(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(query): Query<EarmarksQuery>,
) -> impl IntoResponse {
    let Some(deputy) = find_deputy(&state, &name) else {
        return deputy_not_found(&name);
    };

    let filter = EarmarkFilter {
        term: query.term.unwrap_or_default(),
        year: query.year,
        function: query.funcao,
        beneficiary: query.beneficiario.unwrap_or_default(),
    };

    let filtered = filter_earmarks(&deputy.earmarks, &filter);
    let result = aggregate(&filtered);

    let response = EarmarkTableResponse {
        deputy: deputy.status.nome_eleitoral.clone(),
        formatted_totals: result.totals.formatted(),
        totals: result.totals,
        rows: result.rows,
        facets: extract_earmark_facets(&deputy.earmarks),
    };

    Json(ApiResponse::ok(response)).into_response()
}

#[derive(Deserialize)]
struct ActivityQuery {
    term: Option<String>,
}

/// GET /api/deputies/:name/activity - Filtered fronts and committees
async fn get_deputy_activity(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(query): Query<ActivityQuery>,
) -> impl IntoResponse {
    let Some(deputy) = find_deputy(&state, &name) else {
        return deputy_not_found(&name);
    };

    let term = query.term.unwrap_or_default();
    let activity: Activity = filter_activity(&deputy.fronts, &deputy.committees, &term);

    Json(ApiResponse::ok(activity)).into_response()
}

#[derive(Deserialize)]
struct SuggestQuery {
    q: Option<String>,
}

/// GET /api/autocomplete - Dataset-wide beneficiary suggestions
async fn dataset_autocomplete(
    State(state): State<AppState>,
    Query(query): Query<SuggestQuery>,
) -> impl IntoResponse {
    let term = query.q.unwrap_or_default();
    let suggestions: Vec<String> = state
        .dataset
        .suggest(&term)
        .into_iter()
        .map(str::to_string)
        .collect();

    Json(ApiResponse::ok(suggestions)).into_response()
}

/// GET /api/deputies/:name/autocomplete - Detail-scope suggestions
async fn deputy_autocomplete(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(query): Query<SuggestQuery>,
) -> impl IntoResponse {
    let Some(deputy) = find_deputy(&state, &name) else {
        return deputy_not_found(&name);
    };

    let facets = extract_earmark_facets(&deputy.earmarks);
    let index = AutocompleteIndex::new(facets.beneficiary_labels, MIN_QUERY_DETAIL);

    let term = query.q.unwrap_or_default();
    let suggestions: Vec<String> = index.query(&term).into_iter().map(str::to_string).collect();

    Json(ApiResponse::ok(suggestions)).into_response()
}

// ============================================================================
// Helpers
// ============================================================================

fn find_deputy<'a>(state: &'a AppState, raw_name: &str) -> Option<&'a Deputy> {
    // Deputy names travel URL-encoded in the path segment
    let decoded = urlencoding::decode(raw_name)
        .map(|name| name.into_owned())
        .unwrap_or_else(|_| raw_name.to_string());
    state.dataset.find_deputy(&decoded)
}

fn deputy_not_found(name: &str) -> axum::response::Response {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::err(format!("deputy not found: {}", name))),
    )
        .into_response()
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() {
    println!("🌐 Emendas Dashboard - Web Server");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_DATASET.to_string());

    let dataset = match Dataset::load(&path) {
        Ok(dataset) => dataset,
        Err(e) => {
            eprintln!("❌ Failed to load dataset from {:?}: {:#}", path, e);
            eprintln!("   Pass the dataset path as the first argument.");
            std::process::exit(1);
        }
    };

    println!("✓ Dataset loaded: {} deputados", dataset.deputies.len());
    if let Some(updated) = &dataset.updated_at {
        println!("✓ Atualizado em: {}", updated);
    }

    let state = AppState {
        dataset: Arc::new(dataset),
    };

    // Build API routes
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/facets", get(get_facets))
        .route("/deputies", get(get_deputies))
        .route("/deputies/:name/earmarks", get(get_deputy_earmarks))
        .route("/deputies/:name/activity", get(get_deputy_activity))
        .route("/deputies/:name/autocomplete", get(deputy_autocomplete))
        .route("/autocomplete", get(dataset_autocomplete))
        .with_state(state);

    // The static dashboard page is hosted by the presentation layer;
    // this process only serves data, so CORS stays permissive.
    let app = Router::new()
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive());

    let addr = "0.0.0.0:3000";
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    println!("\n🚀 Server running on http://localhost:3000");
    println!("   API: http://localhost:3000/api/deputies");
    println!("\n   Press Ctrl+C to stop\n");

    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}
