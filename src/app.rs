//! Application routes and request handlers.

use crate::app_state::SharedAppState;
use crate::batch;
use crate::error::SummaristError;
use crate::metrics;
use crate::models;
use crate::search;
use crate::validated_query::ValidatedQuery;

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use std::time::Instant;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// Build the application router.
pub fn router(state: SharedAppState) -> Router {
    fn v1(state: SharedAppState) -> Router {
        Router::new()
            .route("/fires/summary", get(fires_summary))
            .route("/fires/files", get(fires_files))
            .route("/violations/search", get(violations_search))
            .route("/population/:country/:year", get(population))
            .route(
                "/population/cumulative/country/:country",
                get(population_cumulative_country),
            )
            .route(
                "/population/cumulative/year/:year",
                get(population_cumulative_year),
            )
            .with_state(state)
            .layer(
                ServiceBuilder::new().layer(
                    TraceLayer::new_for_http()
                        .on_request(metrics::request_counter)
                        .on_response(metrics::record_response_metrics),
                ),
            )
    }

    Router::new()
        .route("/.well-known/summarist-schema", get(schema))
        .route("/metrics", get(metrics::metrics_handler))
        .nest("/v1", v1(state))
}

async fn schema() -> &'static str {
    "Hello, world!"
}

/// Reduce every partition in the requested date range.
async fn fires_summary(
    State(state): State<SharedAppState>,
    ValidatedQuery(query): ValidatedQuery<models::DateRangeQuery>,
) -> Result<Json<models::BatchSummaryResponse>, SummaristError> {
    let summaries = batch::run(
        &state.args.data_dir,
        &query.start_date,
        &query.end_date,
        state.policy,
        &state.resource_manager,
    )
    .await?;
    let response = match summaries {
        Some(summaries) => models::BatchSummaryResponse {
            message: models::BATCH_PROCESSED_MESSAGE.to_string(),
            summaries: Some(summaries),
        },
        None => models::BatchSummaryResponse {
            message: models::BATCH_EMPTY_MESSAGE.to_string(),
            summaries: None,
        },
    };
    Ok(Json(response))
}

/// Count the files and rows recorded for a single date.
async fn fires_files(
    State(state): State<SharedAppState>,
    ValidatedQuery(query): ValidatedQuery<models::DateQuery>,
) -> Result<Json<models::FilesResponse>, SummaristError> {
    let counts = batch::inspect(&state.args.data_dir, &query.date, &state.resource_manager).await?;
    let response = match counts {
        Some((file_count, row_count)) => models::FilesResponse {
            message: models::FILES_PROCESSED_MESSAGE.to_string(),
            file_count: Some(file_count),
            row_count: Some(row_count),
        },
        None => models::FilesResponse {
            message: models::FILES_EMPTY_MESSAGE.to_string(),
            file_count: None,
            row_count: None,
        },
    };
    Ok(Json(response))
}

/// Search the violations export for a plate.
async fn violations_search(
    State(state): State<SharedAppState>,
    ValidatedQuery(query): ValidatedQuery<models::PlateQuery>,
) -> Result<Json<Vec<models::MatchRecord>>, SummaristError> {
    let matches = search::run(
        &state.args.violations_file,
        &query.plate_number,
        state.args.search_chunk_size,
        &state.fees,
        &state.resource_manager,
    )
    .await?;
    Ok(Json(matches))
}

async fn population(
    State(state): State<SharedAppState>,
    Path((country, year)): Path<(String, String)>,
) -> Result<Json<models::PopulationResponse<models::PopulationResult>>, SummaristError> {
    let timer = Instant::now();
    let (lookup_country, lookup_year) = (country.clone(), year.clone());
    let population =
        tokio_rayon::spawn(move || state.census.population(&lookup_country, &lookup_year)).await?;
    Ok(Json(models::PopulationResponse::new(
        models::PopulationResult {
            country,
            year,
            population,
        },
        timer.elapsed().as_secs_f64(),
    )))
}

async fn population_cumulative_country(
    State(state): State<SharedAppState>,
    Path(country): Path<String>,
) -> Result<Json<models::PopulationResponse<u64>>, SummaristError> {
    let timer = Instant::now();
    let result = tokio_rayon::spawn(move || state.census.cumulative_country(&country)).await?;
    Ok(Json(models::PopulationResponse::new(
        result,
        timer.elapsed().as_secs_f64(),
    )))
}

async fn population_cumulative_year(
    State(state): State<SharedAppState>,
    Path(year): Path<String>,
) -> Result<Json<models::PopulationResponse<u64>>, SummaristError> {
    let timer = Instant::now();
    let result = tokio_rayon::spawn(move || state.census.cumulative_year(&year)).await?;
    Ok(Json(models::PopulationResponse::new(
        result,
        timer.elapsed().as_secs_f64(),
    )))
}
