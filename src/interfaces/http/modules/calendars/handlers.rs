//! Calendar HTTP handlers
//!
//! Thin adapters over `CalendarService`; all error translation happens
//! in `ApiError`.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use crate::application::CalendarService;
use crate::interfaces::http::common::{
    ApiError, ApiResponse, PaginatedResponse, ValidatedJson,
};

use super::dto::*;

/// Application state for calendar handlers.
#[derive(Clone)]
pub struct CalendarAppState {
    pub calendar_service: Arc<CalendarService>,
}

#[utoipa::path(
    post,
    path = "/api/v1/calendars",
    tag = "Calendars",
    request_body = CreateCalendarRequest,
    responses(
        (status = 201, description = "Calendar created", body = ApiResponse<CalendarDto>),
        (status = 400, description = "Invalid request"),
        (status = 409, description = "Duplicate calendar name for user")
    )
)]
pub async fn create_calendar(
    State(state): State<CalendarAppState>,
    ValidatedJson(request): ValidatedJson<CreateCalendarRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CalendarDto>>), ApiError> {
    let calendar = state
        .calendar_service
        .create(&request.name, &request.user_id, &request.timezone)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(CalendarDto::from(calendar))),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/calendars/{id}",
    tag = "Calendars",
    params(
        ("id" = Uuid, Path, description = "Calendar ID"),
        GetCalendarParams
    ),
    responses(
        (status = 200, description = "Calendar details", body = ApiResponse<CalendarDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_calendar(
    State(state): State<CalendarAppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<GetCalendarParams>,
) -> Result<Json<ApiResponse<CalendarDto>>, ApiError> {
    let calendar = match params.user_id {
        Some(user_id) => state.calendar_service.get_by_id_and_user(id, &user_id).await?,
        None => state.calendar_service.get_by_id(id).await?,
    };
    Ok(Json(ApiResponse::success(CalendarDto::from(calendar))))
}

#[utoipa::path(
    get,
    path = "/api/v1/calendars",
    tag = "Calendars",
    params(ListCalendarsParams),
    responses(
        (status = 200, description = "Calendar list", body = PaginatedResponse<CalendarDto>)
    )
)]
pub async fn list_calendars(
    State(state): State<CalendarAppState>,
    Query(params): Query<ListCalendarsParams>,
) -> Result<Json<PaginatedResponse<CalendarDto>>, ApiError> {
    let page = state
        .calendar_service
        .list_by_user_paged(&params.user_id, params.page, params.limit)
        .await?;
    Ok(Json(PaginatedResponse::from_result(page)))
}

#[utoipa::path(
    put,
    path = "/api/v1/calendars/{id}",
    tag = "Calendars",
    params(("id" = Uuid, Path, description = "Calendar ID")),
    request_body = UpdateCalendarRequest,
    responses(
        (status = 200, description = "Calendar updated", body = ApiResponse<CalendarDto>),
        (status = 404, description = "Not found"),
        (status = 409, description = "Duplicate calendar name for user")
    )
)]
pub async fn update_calendar(
    State(state): State<CalendarAppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateCalendarRequest>,
) -> Result<Json<ApiResponse<CalendarDto>>, ApiError> {
    let calendar = state
        .calendar_service
        .update(id, &request.name, &request.timezone)
        .await?;
    Ok(Json(ApiResponse::success(CalendarDto::from(calendar))))
}

#[utoipa::path(
    delete,
    path = "/api/v1/calendars/{id}",
    tag = "Calendars",
    params(("id" = Uuid, Path, description = "Calendar ID")),
    responses(
        (status = 204, description = "Calendar deleted"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_calendar(
    State(state): State<CalendarAppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.calendar_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/v1/calendars/user/{user_id}/count",
    tag = "Calendars",
    params(("user_id" = String, Path, description = "Owner user ID")),
    responses(
        (status = 200, description = "Number of calendars owned by the user", body = ApiResponse<CalendarCountDto>)
    )
)]
pub async fn count_calendars(
    State(state): State<CalendarAppState>,
    Path(user_id): Path<String>,
) -> Result<Json<ApiResponse<CalendarCountDto>>, ApiError> {
    let count = state.calendar_service.count_by_user(&user_id).await?;
    Ok(Json(ApiResponse::success(CalendarCountDto { user_id, count })))
}
