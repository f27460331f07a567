use crate::error::ApiFailure;
use crate::extract::CurrentUser;
use crate::{blocking, AppState};
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use records_api::models::auth::MessageResponse;
use records_api::models::record::{
    NewRecord, Record, RecordQuery, RecordStats, RecordStatus, RecordUpdate, RecordsPage,
};
use serde::Deserialize;

/// Query string of `GET /records`. Paging numbers are accepted signed, anything
/// below one reads as one.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    page: Option<i64>,
    limit: Option<i64>,
    #[serde(default)]
    search: String,
    status: Option<RecordStatus>,
}

impl From<ListParams> for RecordQuery {
    fn from(params: ListParams) -> Self {
        let defaults = RecordQuery::default();
        let at_least_one =
            |value: i64| u32::try_from(value.max(1)).unwrap_or(u32::MAX);
        RecordQuery {
            page: params.page.map_or(defaults.page, at_least_one),
            limit: params.limit.map_or(defaults.limit, at_least_one),
            search: params.search,
            status: params.status,
        }
    }
}

pub async fn list(
    State(state): State<AppState>,
    current: CurrentUser,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<RecordsPage>, ApiFailure> {
    let Query(params) = params?;
    let query = RecordQuery::from(params);
    let page = blocking(move || state.records.list(&current.user.id, &query)).await?;
    Ok(Json(page))
}

pub async fn stats(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<RecordStats>, ApiFailure> {
    let stats = blocking(move || state.records.stats(&current.user.id)).await?;
    Ok(Json(stats))
}

pub async fn get(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Record>, ApiFailure> {
    let record = blocking(move || state.records.get(&current.user.id, &id)).await?;
    Ok(Json(record))
}

pub async fn create(
    State(state): State<AppState>,
    current: CurrentUser,
    payload: Result<Json<NewRecord>, JsonRejection>,
) -> Result<(StatusCode, Json<Record>), ApiFailure> {
    let Json(new_record) = payload?;
    let record = blocking(move || state.records.create(&current.user.id, &new_record)).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn update(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<String>,
    payload: Result<Json<RecordUpdate>, JsonRejection>,
) -> Result<Json<Record>, ApiFailure> {
    let Json(update) = payload?;
    let record =
        blocking(move || state.records.update(&current.user.id, &id, &update)).await?;
    Ok(Json(record))
}

pub async fn delete(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiFailure> {
    blocking(move || state.records.delete(&current.user.id, &id)).await?;
    Ok(Json(MessageResponse::new("Record deleted successfully")))
}
