//! Time slot HTTP handlers
//!
//! Slots are nested under their calendar; the standalone `/slots/busy`
//! route searches across calendar owners.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use crate::application::TimeSlotService;
use crate::domain::{DomainError, SlotStatus, TimeSlot};
use crate::interfaces::http::common::{ApiError, ApiResponse, PaginatedResponse};

use super::dto::*;

/// Application state for time slot handlers.
#[derive(Clone)]
pub struct TimeSlotAppState {
    pub time_slot_service: Arc<TimeSlotService>,
}

// A slot addressed through the wrong calendar does not exist
async fn owned_slot(
    state: &TimeSlotAppState,
    calendar_id: Uuid,
    slot_id: Uuid,
) -> Result<TimeSlot, ApiError> {
    let slot = state.time_slot_service.get_by_id(slot_id).await?;
    if slot.calendar_id != calendar_id {
        return Err(DomainError::not_found("TimeSlot", slot_id).into());
    }
    Ok(slot)
}

#[utoipa::path(
    post,
    path = "/api/v1/calendars/{calendar_id}/slots",
    tag = "Time Slots",
    params(("calendar_id" = Uuid, Path, description = "Calendar ID")),
    request_body = CreateTimeSlotRequest,
    responses(
        (status = 201, description = "Time slot created", body = ApiResponse<TimeSlotDto>),
        (status = 400, description = "Invalid interval"),
        (status = 404, description = "Calendar not found"),
        (status = 409, description = "Overlaps an existing slot")
    )
)]
pub async fn create_slot(
    State(state): State<TimeSlotAppState>,
    Path(calendar_id): Path<Uuid>,
    Json(request): Json<CreateTimeSlotRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TimeSlotDto>>), ApiError> {
    let status = request
        .status
        .as_deref()
        .map(|s| {
            parse_status(s).ok_or_else(|| {
                DomainError::InvalidArgument(format!("Unknown slot status '{}'", s))
            })
        })
        .transpose()?;

    let slot = state
        .time_slot_service
        .create(calendar_id, request.start_time, request.end_time, status)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(TimeSlotDto::from(slot))),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/calendars/{calendar_id}/slots/{slot_id}",
    tag = "Time Slots",
    params(
        ("calendar_id" = Uuid, Path, description = "Calendar ID"),
        ("slot_id" = Uuid, Path, description = "Time slot ID")
    ),
    responses(
        (status = 200, description = "Time slot details", body = ApiResponse<TimeSlotDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_slot(
    State(state): State<TimeSlotAppState>,
    Path((calendar_id, slot_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ApiResponse<TimeSlotDto>>, ApiError> {
    let slot = owned_slot(&state, calendar_id, slot_id).await?;
    Ok(Json(ApiResponse::success(TimeSlotDto::from(slot))))
}

#[utoipa::path(
    get,
    path = "/api/v1/calendars/{calendar_id}/slots",
    tag = "Time Slots",
    params(
        ("calendar_id" = Uuid, Path, description = "Calendar ID"),
        ListSlotsParams
    ),
    responses(
        (status = 200, description = "Slots of this calendar only", body = PaginatedResponse<TimeSlotDto>),
        (status = 404, description = "Calendar not found")
    )
)]
pub async fn list_slots(
    State(state): State<TimeSlotAppState>,
    Path(calendar_id): Path<Uuid>,
    Query(params): Query<ListSlotsParams>,
) -> Result<Json<PaginatedResponse<TimeSlotDto>>, ApiError> {
    let page = match (params.start_date, params.end_date) {
        (Some(start), Some(end)) => {
            state
                .time_slot_service
                .list_by_calendar_in_range(
                    calendar_id,
                    day_start(start),
                    day_end(end),
                    params.page,
                    params.limit,
                )
                .await?
        }
        (None, None) => {
            state
                .time_slot_service
                .list_by_calendar(calendar_id, params.page, params.limit)
                .await?
        }
        _ => {
            return Err(DomainError::InvalidArgument(
                "start_date and end_date must be provided together".into(),
            )
            .into());
        }
    };
    Ok(Json(PaginatedResponse::from_result(page)))
}

#[utoipa::path(
    get,
    path = "/api/v1/calendars/{calendar_id}/slots/available",
    tag = "Time Slots",
    params(
        ("calendar_id" = Uuid, Path, description = "Calendar ID"),
        DateRangeParams
    ),
    responses(
        (status = 200, description = "AVAILABLE slots fully inside the range", body = ApiResponse<Vec<TimeSlotDto>>)
    )
)]
pub async fn get_available_slots(
    State(state): State<TimeSlotAppState>,
    Path(calendar_id): Path<Uuid>,
    Query(params): Query<DateRangeParams>,
) -> Result<Json<ApiResponse<Vec<TimeSlotDto>>>, ApiError> {
    let slots = state
        .time_slot_service
        .get_available_slots(
            calendar_id,
            day_start(params.start_date),
            day_end(params.end_date),
        )
        .await?;
    let dtos: Vec<TimeSlotDto> = slots.into_iter().map(TimeSlotDto::from).collect();
    Ok(Json(ApiResponse::success(dtos)))
}

#[utoipa::path(
    get,
    path = "/api/v1/calendars/{calendar_id}/slots/stats/daily",
    tag = "Time Slots",
    params(
        ("calendar_id" = Uuid, Path, description = "Calendar ID"),
        DateRangeParams
    ),
    responses(
        (status = 200, description = "Slot counts grouped by start date", body = ApiResponse<Vec<DailySlotCountDto>>)
    )
)]
pub async fn get_daily_slot_stats(
    State(state): State<TimeSlotAppState>,
    Path(calendar_id): Path<Uuid>,
    Query(params): Query<DateRangeParams>,
) -> Result<Json<ApiResponse<Vec<DailySlotCountDto>>>, ApiError> {
    let counts = state
        .time_slot_service
        .count_by_day(
            calendar_id,
            day_start(params.start_date),
            day_end(params.end_date),
        )
        .await?;
    let dtos: Vec<DailySlotCountDto> = counts.into_iter().map(DailySlotCountDto::from).collect();
    Ok(Json(ApiResponse::success(dtos)))
}

#[utoipa::path(
    put,
    path = "/api/v1/calendars/{calendar_id}/slots/{slot_id}",
    tag = "Time Slots",
    params(
        ("calendar_id" = Uuid, Path, description = "Calendar ID"),
        ("slot_id" = Uuid, Path, description = "Time slot ID")
    ),
    request_body = UpdateTimeSlotRequest,
    responses(
        (status = 200, description = "Time slot updated", body = ApiResponse<TimeSlotDto>),
        (status = 400, description = "Invalid interval or status"),
        (status = 404, description = "Not found"),
        (status = 409, description = "Overlaps an existing slot")
    )
)]
pub async fn update_slot(
    State(state): State<TimeSlotAppState>,
    Path((calendar_id, slot_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<UpdateTimeSlotRequest>,
) -> Result<Json<ApiResponse<TimeSlotDto>>, ApiError> {
    owned_slot(&state, calendar_id, slot_id).await?;
    let status = parse_status(&request.status).ok_or_else(|| {
        DomainError::InvalidArgument(format!("Unknown slot status '{}'", request.status))
    })?;
    let slot = state
        .time_slot_service
        .update(slot_id, request.start_time, request.end_time, status)
        .await?;
    Ok(Json(ApiResponse::success(TimeSlotDto::from(slot))))
}

#[utoipa::path(
    patch,
    path = "/api/v1/calendars/{calendar_id}/slots/{slot_id}/status",
    tag = "Time Slots",
    params(
        ("calendar_id" = Uuid, Path, description = "Calendar ID"),
        ("slot_id" = Uuid, Path, description = "Time slot ID"),
        SlotStatusParams
    ),
    responses(
        (status = 200, description = "Status changed", body = ApiResponse<TimeSlotDto>),
        (status = 400, description = "Unknown status"),
        (status = 404, description = "Not found")
    )
)]
pub async fn change_slot_status(
    State(state): State<TimeSlotAppState>,
    Path((calendar_id, slot_id)): Path<(Uuid, Uuid)>,
    Query(params): Query<SlotStatusParams>,
) -> Result<Json<ApiResponse<TimeSlotDto>>, ApiError> {
    owned_slot(&state, calendar_id, slot_id).await?;
    let status = parse_status(&params.status).ok_or_else(|| {
        DomainError::InvalidArgument(format!("Unknown slot status '{}'", params.status))
    })?;
    match status {
        SlotStatus::Busy => state.time_slot_service.mark_busy(slot_id).await?,
        SlotStatus::Available => state.time_slot_service.mark_available(slot_id).await?,
    }
    let slot = state.time_slot_service.get_by_id(slot_id).await?;
    Ok(Json(ApiResponse::success(TimeSlotDto::from(slot))))
}

#[utoipa::path(
    delete,
    path = "/api/v1/calendars/{calendar_id}/slots/{slot_id}",
    tag = "Time Slots",
    params(
        ("calendar_id" = Uuid, Path, description = "Calendar ID"),
        ("slot_id" = Uuid, Path, description = "Time slot ID")
    ),
    responses(
        (status = 204, description = "Time slot deleted"),
        (status = 404, description = "Not found"),
        (status = 409, description = "Slot has a scheduled meeting")
    )
)]
pub async fn delete_slot(
    State(state): State<TimeSlotAppState>,
    Path((calendar_id, slot_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    owned_slot(&state, calendar_id, slot_id).await?;
    state.time_slot_service.delete(slot_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/v1/slots/busy",
    tag = "Time Slots",
    params(BusySlotsParams),
    responses(
        (status = 200, description = "BUSY slots of the given calendar owners", body = ApiResponse<Vec<TimeSlotDto>>),
        (status = 400, description = "Empty user list")
    )
)]
pub async fn get_busy_slots(
    State(state): State<TimeSlotAppState>,
    Query(params): Query<BusySlotsParams>,
) -> Result<Json<ApiResponse<Vec<TimeSlotDto>>>, ApiError> {
    let user_ids: Vec<String> = params
        .user_ids
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    if user_ids.is_empty() {
        return Err(DomainError::InvalidArgument("user_ids must not be empty".into()).into());
    }

    let slots = state
        .time_slot_service
        .get_busy_slots_by_users(
            &user_ids,
            day_start(params.start_date),
            day_end(params.end_date),
        )
        .await?;
    let dtos: Vec<TimeSlotDto> = slots.into_iter().map(TimeSlotDto::from).collect();
    Ok(Json(ApiResponse::success(dtos)))
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, Utc};

    use crate::application::CalendarService;
    use crate::infrastructure::cache::ServiceCache;
    use crate::infrastructure::storage::InMemoryRepositories;

    fn t(hours: i64) -> DateTime<Utc> {
        Utc::now() + Duration::hours(24 + hours)
    }

    async fn state_with_slot() -> (TimeSlotAppState, Uuid, Uuid) {
        let repos = Arc::new(InMemoryRepositories::new());
        let cache = Arc::new(ServiceCache::new());
        let calendars = Arc::new(CalendarService::new(repos.clone(), cache.clone()));
        let slots = Arc::new(TimeSlotService::new(repos, calendars.clone(), cache));

        let cal = calendars.create("Work", "u1", "UTC").await.unwrap();
        let slot = slots.create(cal.id, t(0), t(1), None).await.unwrap();
        let state = TimeSlotAppState {
            time_slot_service: slots,
        };
        (state, cal.id, slot.id)
    }

    #[tokio::test]
    async fn mutating_routes_reject_foreign_calendar() {
        let (state, _cal_id, slot_id) = state_with_slot().await;
        let foreign = Uuid::new_v4();

        let req = UpdateTimeSlotRequest {
            start_time: t(2),
            end_time: t(3),
            status: "AVAILABLE".to_string(),
        };
        let err = update_slot(State(state.clone()), Path((foreign, slot_id)), Json(req))
            .await
            .unwrap_err();
        assert!(matches!(err.0, DomainError::NotFound { .. }));

        let err = change_slot_status(
            State(state.clone()),
            Path((foreign, slot_id)),
            Query(SlotStatusParams {
                status: "BUSY".to_string(),
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err.0, DomainError::NotFound { .. }));

        let err = delete_slot(State(state.clone()), Path((foreign, slot_id)))
            .await
            .unwrap_err();
        assert!(matches!(err.0, DomainError::NotFound { .. }));

        // Untouched through all three rejections
        let slot = state.time_slot_service.get_by_id(slot_id).await.unwrap();
        assert_eq!(slot.status, SlotStatus::Available);
    }

    #[tokio::test]
    async fn mutating_routes_accept_owning_calendar() {
        let (state, cal_id, slot_id) = state_with_slot().await;

        change_slot_status(
            State(state.clone()),
            Path((cal_id, slot_id)),
            Query(SlotStatusParams {
                status: "BUSY".to_string(),
            }),
        )
        .await
        .unwrap();

        let slot = state.time_slot_service.get_by_id(slot_id).await.unwrap();
        assert_eq!(slot.status, SlotStatus::Busy);
    }
}
