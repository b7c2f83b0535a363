use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use cursor_core::{
    CursorStateDto, DisplayBounds, EventListDto, MoveRequest, PingDto, ScreenDto, StatusDto,
};

use super::error::ApiError;
use super::AppState;
use crate::infrastructure::display::DisplayBoundsSource;

/// Maximum number of journal entries returned by `GET /api/events`.
pub const EVENTS_PAGE: usize = 200;

pub(super) async fn cursor_show(
    State(state): State<AppState>,
) -> Result<Json<CursorStateDto>, ApiError> {
    let overlay = state.dispatcher.show().await?;
    Ok(Json(CursorStateDto::from(&overlay)))
}

pub(super) async fn cursor_hide(
    State(state): State<AppState>,
) -> Result<Json<CursorStateDto>, ApiError> {
    let overlay = state.dispatcher.hide().await?;
    Ok(Json(CursorStateDto::from(&overlay)))
}

pub(super) async fn cursor_move(
    State(state): State<AppState>,
    body: Result<Json<MoveRequest>, JsonRejection>,
) -> Result<Json<CursorStateDto>, ApiError> {
    let Json(req) = body.map_err(|rejection| ApiError::InvalidBody(rejection.body_text()))?;
    let overlay = state.dispatcher.move_to(req.x, req.y).await?;
    Ok(Json(CursorStateDto::from(&overlay)))
}

pub(super) async fn cursor_state(State(state): State<AppState>) -> Json<CursorStateDto> {
    let overlay = state.dispatcher.state().await;
    Json(CursorStateDto::from(&overlay))
}

pub(super) async fn ping() -> Json<PingDto> {
    Json(PingDto::ok())
}

pub(super) async fn status(State(state): State<AppState>) -> Json<StatusDto> {
    let overlay = state.dispatcher.state().await;
    Json(StatusDto {
        session: state.dispatcher.session(),
        screen: ScreenDto::from(state.bounds.current_bounds()),
        cursor: CursorStateDto::from(&overlay),
    })
}

/// Replaces the display bounds, e.g. after a rotation.  A visible overlay
/// that would end up off screen is hidden; later `move` commands are
/// validated against the new extent.
pub(super) async fn update_screen(
    State(state): State<AppState>,
    body: Result<Json<ScreenDto>, JsonRejection>,
) -> Result<Json<ScreenDto>, ApiError> {
    let Json(screen) = body.map_err(|rejection| ApiError::InvalidBody(rejection.body_text()))?;
    state
        .dispatcher
        .update_bounds(DisplayBounds::from(screen))
        .await?;
    Ok(Json(ScreenDto::from(state.bounds.current_bounds())))
}

pub(super) async fn events(State(state): State<AppState>) -> Json<EventListDto> {
    Json(state.journal.recent(EVENTS_PAGE))
}

pub(super) async fn events_clear(State(state): State<AppState>) -> StatusCode {
    state.journal.clear();
    StatusCode::NO_CONTENT
}
