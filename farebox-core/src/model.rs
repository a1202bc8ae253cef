use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An ordered (origin, destination) city pair with a stable identifier.
/// No two routes share the same ordered pair; routes are never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub id: i32,
    pub origin_city: String,
    pub destination_city: String,
}

/// A persisted ticket on a route. Timestamps are normalized to UTC at the
/// serde boundary; offset-bearing RFC 3339 input is accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: i32,
    pub transport_type_code: i32,
    pub route_id: i32,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    pub price: Decimal,
    pub available_tickets: i32,
}

/// Ticket fields prior to persistence; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewTicket {
    pub transport_type_code: i32,
    pub route_id: i32,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    pub price: Decimal,
    pub available_tickets: i32,
}
