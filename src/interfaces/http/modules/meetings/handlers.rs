//! Meeting HTTP handlers

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use crate::application::MeetingService;
use crate::domain::{DomainError, Meeting};
use crate::interfaces::http::common::{
    ApiError, ApiResponse, PaginatedResponse, PaginationQuery, ValidatedJson,
};
use crate::interfaces::http::modules::time_slots::{day_end, day_start};

use super::dto::*;

/// Application state for meeting handlers.
#[derive(Clone)]
pub struct MeetingAppState {
    pub meeting_service: Arc<MeetingService>,
}

#[utoipa::path(
    post,
    path = "/api/v1/meetings",
    tag = "Meetings",
    request_body = ScheduleMeetingRequest,
    responses(
        (status = 201, description = "Meeting scheduled", body = ApiResponse<MeetingDto>),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Time slot not found"),
        (status = 409, description = "Slot is not available")
    )
)]
pub async fn schedule_meeting(
    State(state): State<MeetingAppState>,
    ValidatedJson(request): ValidatedJson<ScheduleMeetingRequest>,
) -> Result<(StatusCode, Json<ApiResponse<MeetingDto>>), ApiError> {
    let meeting = state
        .meeting_service
        .schedule(
            &request.title,
            request.description,
            request.participants,
            request.time_slot_id,
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(MeetingDto::from(meeting))),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/meetings/{id}",
    tag = "Meetings",
    params(("id" = Uuid, Path, description = "Meeting ID")),
    responses(
        (status = 200, description = "Meeting details", body = ApiResponse<MeetingDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_meeting(
    State(state): State<MeetingAppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<MeetingDto>>, ApiError> {
    let meeting = state.meeting_service.get_by_id(id).await?;
    Ok(Json(ApiResponse::success(MeetingDto::from(meeting))))
}

#[utoipa::path(
    get,
    path = "/api/v1/meetings",
    tag = "Meetings",
    params(SearchMeetingsParams),
    responses(
        (status = 200, description = "Meetings matching the filter", body = ApiResponse<Vec<MeetingDto>>),
        (status = 400, description = "No usable filter")
    )
)]
pub async fn search_meetings(
    State(state): State<MeetingAppState>,
    Query(params): Query<SearchMeetingsParams>,
) -> Result<Json<ApiResponse<Vec<MeetingDto>>>, ApiError> {
    let range = match (params.start_date, params.end_date) {
        (Some(start), Some(end)) => Some((day_start(start), day_end(end))),
        (None, None) => None,
        _ => {
            return Err(DomainError::InvalidArgument(
                "start_date and end_date must be provided together".into(),
            )
            .into());
        }
    };

    let meetings: Vec<Meeting> = match (params.participant_id, range, params.title) {
        (Some(participant), Some((start, end)), _) => {
            state
                .meeting_service
                .find_by_participant_in_range(&participant, start, end)
                .await?
        }
        (None, Some((start, end)), _) => state.meeting_service.find_in_range(start, end).await?,
        (Some(participant), None, _) => {
            // Unpaged variant of the participant listing
            state
                .meeting_service
                .list_by_participant(&participant, 1, i64::MAX as u64)
                .await?
                .items
        }
        (None, None, Some(title)) => state.meeting_service.find_by_title(&title).await?,
        (None, None, None) => {
            return Err(DomainError::InvalidArgument(
                "Provide participant_id, a date range, or a title filter".into(),
            )
            .into());
        }
    };

    let dtos: Vec<MeetingDto> = meetings.into_iter().map(MeetingDto::from).collect();
    Ok(Json(ApiResponse::success(dtos)))
}

#[utoipa::path(
    get,
    path = "/api/v1/meetings/participant/{participant_id}",
    tag = "Meetings",
    params(
        ("participant_id" = String, Path, description = "Participant ID"),
        PaginationQuery
    ),
    responses(
        (status = 200, description = "Meetings of this participant", body = PaginatedResponse<MeetingDto>)
    )
)]
pub async fn list_meetings_by_participant(
    State(state): State<MeetingAppState>,
    Path(participant_id): Path<String>,
    Query(paging): Query<PaginationQuery>,
) -> Result<Json<PaginatedResponse<MeetingDto>>, ApiError> {
    let page = state
        .meeting_service
        .list_by_participant(&participant_id, paging.page, paging.limit)
        .await?;
    Ok(Json(PaginatedResponse::from_result(page)))
}

#[utoipa::path(
    get,
    path = "/api/v1/meetings/participant/{participant_id}/count",
    tag = "Meetings",
    params(("participant_id" = String, Path, description = "Participant ID")),
    responses(
        (status = 200, description = "Number of meetings for the participant", body = ApiResponse<MeetingCountDto>)
    )
)]
pub async fn count_meetings_by_participant(
    State(state): State<MeetingAppState>,
    Path(participant_id): Path<String>,
) -> Result<Json<ApiResponse<MeetingCountDto>>, ApiError> {
    let count = state
        .meeting_service
        .count_by_participant(&participant_id)
        .await?;
    Ok(Json(ApiResponse::success(MeetingCountDto {
        participant_id,
        count,
    })))
}

#[utoipa::path(
    get,
    path = "/api/v1/meetings/calendar-user/{user_id}",
    tag = "Meetings",
    params(
        ("user_id" = String, Path, description = "Calendar owner user ID"),
        PaginationQuery
    ),
    responses(
        (status = 200, description = "Meetings booked on the user's calendars", body = PaginatedResponse<MeetingDto>)
    )
)]
pub async fn list_meetings_by_calendar_owner(
    State(state): State<MeetingAppState>,
    Path(user_id): Path<String>,
    Query(paging): Query<PaginationQuery>,
) -> Result<Json<PaginatedResponse<MeetingDto>>, ApiError> {
    let page = state
        .meeting_service
        .list_by_calendar_owner(&user_id, paging.page, paging.limit)
        .await?;
    Ok(Json(PaginatedResponse::from_result(page)))
}

#[utoipa::path(
    put,
    path = "/api/v1/meetings/{id}",
    tag = "Meetings",
    params(("id" = Uuid, Path, description = "Meeting ID")),
    request_body = UpdateMeetingRequest,
    responses(
        (status = 200, description = "Meeting updated", body = ApiResponse<MeetingDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_meeting(
    State(state): State<MeetingAppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateMeetingRequest>,
) -> Result<Json<ApiResponse<MeetingDto>>, ApiError> {
    let meeting = state
        .meeting_service
        .update(id, &request.title, request.description, request.participants)
        .await?;
    Ok(Json(ApiResponse::success(MeetingDto::from(meeting))))
}

#[utoipa::path(
    delete,
    path = "/api/v1/meetings/{id}",
    tag = "Meetings",
    params(("id" = Uuid, Path, description = "Meeting ID")),
    responses(
        (status = 204, description = "Meeting cancelled, slot released"),
        (status = 404, description = "Not found")
    )
)]
pub async fn cancel_meeting(
    State(state): State<MeetingAppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.meeting_service.cancel(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/v1/meetings/{id}/participants",
    tag = "Meetings",
    params(("id" = Uuid, Path, description = "Meeting ID")),
    request_body = AddParticipantRequest,
    responses(
        (status = 200, description = "Participant added", body = ApiResponse<MeetingDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn add_participant(
    State(state): State<MeetingAppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<AddParticipantRequest>,
) -> Result<Json<ApiResponse<MeetingDto>>, ApiError> {
    let meeting = state
        .meeting_service
        .add_participant(id, &request.participant_id)
        .await?;
    Ok(Json(ApiResponse::success(MeetingDto::from(meeting))))
}

#[utoipa::path(
    delete,
    path = "/api/v1/meetings/{id}/participants/{participant_id}",
    tag = "Meetings",
    params(
        ("id" = Uuid, Path, description = "Meeting ID"),
        ("participant_id" = String, Path, description = "Participant ID")
    ),
    responses(
        (status = 200, description = "Participant removed", body = ApiResponse<MeetingDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn remove_participant(
    State(state): State<MeetingAppState>,
    Path((id, participant_id)): Path<(Uuid, String)>,
) -> Result<Json<ApiResponse<MeetingDto>>, ApiError> {
    let meeting = state
        .meeting_service
        .remove_participant(id, &participant_id)
        .await?;
    Ok(Json(ApiResponse::success(MeetingDto::from(meeting))))
}
