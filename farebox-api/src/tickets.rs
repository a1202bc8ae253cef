use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

use farebox_core::{CreateTicketRequest, Ticket};

use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/tickets", post(create_ticket))
        .route("/v1/tickets/{id}", get(get_ticket_details))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTicketDto {
    pub from: String,
    pub to: String,
    #[serde(rename = "type")]
    pub transport_type: String,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    pub price: Decimal,
    pub available_tickets: i32,
}

async fn create_ticket(
    State(state): State<AppState>,
    Json(dto): Json<CreateTicketDto>,
) -> Result<Json<Ticket>, AppError> {
    let ticket = state
        .service
        .create_ticket(CreateTicketRequest {
            from: dto.from,
            to: dto.to,
            transport_type: dto.transport_type,
            departure_time: dto.departure_time,
            arrival_time: dto.arrival_time,
            price: dto.price,
            available_tickets: dto.available_tickets,
        })
        .await?;

    Ok(Json(ticket))
}

async fn get_ticket_details(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Ticket>, AppError> {
    let ticket = state.service.get_ticket_details(id).await?;
    Ok(Json(ticket))
}
