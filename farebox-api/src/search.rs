use axum::{extract::State, routing::post, Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use farebox_core::{
    ClosestSearchRequest, DistanceCursor, ForwardCursor, SearchTicketsRequest, Ticket,
};

use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/tickets/search", post(search_tickets))
        .route("/v1/routes/closest", post(search_closest_routes))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchTicketsDto {
    pub from: String,
    pub to: String,
    #[serde(rename = "type")]
    pub transport_type: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub last_departure_time: Option<DateTime<Utc>>,
    pub last_id: Option<i32>,
    pub page_size: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchTicketsResponse {
    pub tickets: Vec<Ticket>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_id: Option<i32>,
}

async fn search_tickets(
    State(state): State<AppState>,
    Json(dto): Json<SearchTicketsDto>,
) -> Result<Json<SearchTicketsResponse>, AppError> {
    // A cursor time without an id resumes from id 0, matching the original
    // wire contract where the two fields travel separately.
    let cursor = dto.last_departure_time.map(|departure_time| ForwardCursor {
        departure_time,
        id: dto.last_id.unwrap_or(0),
    });

    let page = state
        .service
        .search_tickets(SearchTicketsRequest {
            from: dto.from,
            to: dto.to,
            transport_type: dto.transport_type,
            start_time: dto.start_time,
            end_time: dto.end_time,
            cursor,
            page_size: dto.page_size,
        })
        .await?;

    let next = page.next_cursor;
    Ok(Json(SearchTicketsResponse {
        tickets: page.items,
        next_cursor: next.map(|c| c.departure_time),
        next_id: next.map(|c| c.id),
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClosestRoutesDto {
    pub from: String,
    pub to: String,
    pub desired_departure_time: DateTime<Utc>,
    pub last_departure_time: Option<DateTime<Utc>>,
    pub last_id: Option<i32>,
    pub page_size: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClosestRoutesResponse {
    pub tickets: Vec<Ticket>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor_departure_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor_id: Option<i32>,
}

async fn search_closest_routes(
    State(state): State<AppState>,
    Json(dto): Json<ClosestRoutesDto>,
) -> Result<Json<ClosestRoutesResponse>, AppError> {
    let cursor = dto.last_departure_time.map(|departure_time| DistanceCursor {
        anchor: dto.desired_departure_time,
        departure_time,
        id: dto.last_id.unwrap_or(0),
    });

    let page = state
        .service
        .search_closest_routes(ClosestSearchRequest {
            from: dto.from,
            to: dto.to,
            desired_departure_time: dto.desired_departure_time,
            cursor,
            page_size: dto.page_size,
        })
        .await?;

    let next = page.next_cursor;
    Ok(Json(ClosestRoutesResponse {
        tickets: page.items,
        next_cursor_departure_time: next.map(|c| c.departure_time),
        next_cursor_id: next.map(|c| c.id),
    }))
}
