use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::BoxError;
use crate::model::{NewTicket, Ticket};

/// Storage contract for route rows.
///
/// `create_route` must tolerate concurrent creation of the same ordered
/// pair: the unique constraint on (origin, destination) plus the caller's
/// re-query converge on a single surviving row.
#[async_trait]
pub trait RouteStore: Send + Sync {
    async fn find_id_by_cities(
        &self,
        origin: &str,
        destination: &str,
    ) -> Result<Option<i32>, BoxError>;

    async fn create_route(&self, origin: &str, destination: &str) -> Result<(), BoxError>;
}

/// Storage contract for ticket rows and the two paginated scans.
#[async_trait]
pub trait TicketStore: Send + Sync {
    /// Persists the ticket and returns the full record with its assigned id.
    async fn save(&self, ticket: NewTicket) -> Result<Ticket, BoxError>;

    async fn find_by_id_with_details(&self, id: i32) -> Result<Option<Ticket>, BoxError>;

    /// Chronological scan filtered by transport type. Ordered by
    /// `(departure_time, id)` ascending; `cursor` resumes strictly after that
    /// pair; `start_time`/`end_time` bound `departure_time` inclusively when
    /// present.
    async fn find_tickets(
        &self,
        transport_type_code: i32,
        route_id: i32,
        start_time: Option<DateTime<Utc>>,
        end_time: Option<DateTime<Utc>>,
        cursor: Option<(DateTime<Utc>, i32)>,
        page_size: i64,
    ) -> Result<Vec<Ticket>, BoxError>;

    /// Chronological scan across all transport types; otherwise identical to
    /// [`find_tickets`](TicketStore::find_tickets).
    async fn find_tickets_without_transport_type(
        &self,
        route_id: i32,
        start_time: Option<DateTime<Utc>>,
        end_time: Option<DateTime<Utc>>,
        cursor: Option<(DateTime<Utc>, i32)>,
        page_size: i64,
    ) -> Result<Vec<Ticket>, BoxError>;

    /// Distance scan for the city pair: ordered by
    /// `(|departure_time - anchor|, id)` ascending. `cursor` identifies the
    /// last ticket of the previous page and the scan resumes strictly after
    /// its `(distance, id)` pair, with distance measured from the same
    /// `anchor`. An unknown city pair yields an empty result, not an error.
    async fn find_closest_tickets(
        &self,
        origin: &str,
        destination: &str,
        anchor: DateTime<Utc>,
        cursor: Option<(DateTime<Utc>, i32)>,
        page_size: i64,
    ) -> Result<Vec<Ticket>, BoxError>;
}
