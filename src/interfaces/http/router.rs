//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::FromRef,
    routing::{delete, get, post},
    Router,
};
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::application::{CalendarService, MeetingService, TimeSlotService};
use crate::interfaces::http::common::{ApiResponse, PaginatedResponse, PaginationQuery};
use crate::interfaces::http::modules::{calendars, health, meetings, time_slots};

/// Unified state for all routes. Axum extracts the specific handler
/// state via `FromRef`.
#[derive(Clone)]
pub struct AppState {
    pub calendar_service: Arc<CalendarService>,
    pub time_slot_service: Arc<TimeSlotService>,
    pub meeting_service: Arc<MeetingService>,
    pub db: DatabaseConnection,
    pub started_at: Arc<Instant>,
}

// -- FromRef implementations so each handler keeps its own State<T> extractor --

impl FromRef<AppState> for calendars::CalendarAppState {
    fn from_ref(s: &AppState) -> Self {
        calendars::CalendarAppState {
            calendar_service: Arc::clone(&s.calendar_service),
        }
    }
}

impl FromRef<AppState> for time_slots::TimeSlotAppState {
    fn from_ref(s: &AppState) -> Self {
        time_slots::TimeSlotAppState {
            time_slot_service: Arc::clone(&s.time_slot_service),
        }
    }
}

impl FromRef<AppState> for meetings::MeetingAppState {
    fn from_ref(s: &AppState) -> Self {
        meetings::MeetingAppState {
            meeting_service: Arc::clone(&s.meeting_service),
        }
    }
}

impl FromRef<AppState> for health::HealthState {
    fn from_ref(s: &AppState) -> Self {
        health::HealthState {
            db: s.db.clone(),
            started_at: Arc::clone(&s.started_at),
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        // Calendars
        calendars::create_calendar,
        calendars::get_calendar,
        calendars::list_calendars,
        calendars::update_calendar,
        calendars::delete_calendar,
        calendars::count_calendars,
        // Time Slots
        time_slots::create_slot,
        time_slots::get_slot,
        time_slots::list_slots,
        time_slots::get_available_slots,
        time_slots::get_daily_slot_stats,
        time_slots::update_slot,
        time_slots::change_slot_status,
        time_slots::delete_slot,
        time_slots::get_busy_slots,
        // Meetings
        meetings::schedule_meeting,
        meetings::get_meeting,
        meetings::search_meetings,
        meetings::list_meetings_by_participant,
        meetings::count_meetings_by_participant,
        meetings::list_meetings_by_calendar_owner,
        meetings::update_meeting,
        meetings::cancel_meeting,
        meetings::add_participant,
        meetings::remove_participant,
    ),
    components(
        schemas(
            // Common
            ApiResponse<String>,
            PaginatedResponse<calendars::CalendarDto>,
            PaginatedResponse<time_slots::TimeSlotDto>,
            PaginatedResponse<meetings::MeetingDto>,
            PaginationQuery,
            // Calendars
            calendars::CalendarDto,
            calendars::CreateCalendarRequest,
            calendars::UpdateCalendarRequest,
            calendars::CalendarCountDto,
            // Time Slots
            time_slots::TimeSlotDto,
            time_slots::CreateTimeSlotRequest,
            time_slots::UpdateTimeSlotRequest,
            time_slots::DailySlotCountDto,
            // Meetings
            meetings::MeetingDto,
            meetings::ScheduleMeetingRequest,
            meetings::UpdateMeetingRequest,
            meetings::AddParticipantRequest,
            meetings::MeetingCountDto,
        )
    ),
    tags(
        (name = "Health", description = "Server health check endpoints"),
        (name = "Calendars", description = "Calendar CRUD operations"),
        (name = "Time Slots", description = "Time slot management and availability queries"),
        (name = "Meetings", description = "Meeting scheduling bound to time slots"),
    ),
    info(
        title = "Calendar Service API",
        version = "1.0.0",
        description = "REST API for calendars, time slots and meeting scheduling",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Calendar routes
    let calendar_routes = Router::new()
        .route(
            "/",
            get(calendars::list_calendars).post(calendars::create_calendar),
        )
        .route("/user/{user_id}/count", get(calendars::count_calendars))
        .route(
            "/{calendar_id}",
            get(calendars::get_calendar)
                .put(calendars::update_calendar)
                .delete(calendars::delete_calendar),
        )
        // --- Time slots nested under their calendar ---
        .route(
            "/{calendar_id}/slots",
            get(time_slots::list_slots).post(time_slots::create_slot),
        )
        .route(
            "/{calendar_id}/slots/available",
            get(time_slots::get_available_slots),
        )
        .route(
            "/{calendar_id}/slots/stats/daily",
            get(time_slots::get_daily_slot_stats),
        )
        .route(
            "/{calendar_id}/slots/{slot_id}",
            get(time_slots::get_slot)
                .put(time_slots::update_slot)
                .delete(time_slots::delete_slot),
        )
        .route(
            "/{calendar_id}/slots/{slot_id}/status",
            axum::routing::patch(time_slots::change_slot_status),
        );

    // Cross-calendar slot routes
    let slot_routes = Router::new().route("/busy", get(time_slots::get_busy_slots));

    // Meeting routes
    let meeting_routes = Router::new()
        .route(
            "/",
            get(meetings::search_meetings).post(meetings::schedule_meeting),
        )
        .route(
            "/participant/{participant_id}",
            get(meetings::list_meetings_by_participant),
        )
        .route(
            "/participant/{participant_id}/count",
            get(meetings::count_meetings_by_participant),
        )
        .route(
            "/calendar-user/{user_id}",
            get(meetings::list_meetings_by_calendar_owner),
        )
        .route(
            "/{id}",
            get(meetings::get_meeting)
                .put(meetings::update_meeting)
                .delete(meetings::cancel_meeting),
        )
        .route("/{id}/participants", post(meetings::add_participant))
        .route(
            "/{id}/participants/{participant_id}",
            delete(meetings::remove_participant),
        );

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    // Build router
    Router::new()
        // Swagger UI
        .merge(swagger_routes)
        // Health
        .route("/health", get(health::health_check))
        // Calendars + nested slots
        .nest("/api/v1/calendars", calendar_routes)
        // Cross-calendar slot queries
        .nest("/api/v1/slots", slot_routes)
        // Meetings
        .nest("/api/v1/meetings", meeting_routes)
        .with_state(state)
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
