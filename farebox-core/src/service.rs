use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::debug;

use crate::cursor::{DistanceCursor, ForwardCursor, Page, PageLimits};
use crate::error::{Error, Result};
use crate::model::{NewTicket, Ticket};
use crate::store::{RouteStore, TicketStore};
use crate::transport::{map_transport_type, OnUnknown};

/// Request to register a new ticket, creating its route on first use.
#[derive(Debug, Clone)]
pub struct CreateTicketRequest {
    pub from: String,
    pub to: String,
    pub transport_type: String,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    pub price: Decimal,
    pub available_tickets: i32,
}

/// Chronological search over one route.
#[derive(Debug, Clone)]
pub struct SearchTicketsRequest {
    pub from: String,
    pub to: String,
    pub transport_type: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub cursor: Option<ForwardCursor>,
    pub page_size: u32,
}

/// Distance search around a desired departure instant.
#[derive(Debug, Clone)]
pub struct ClosestSearchRequest {
    pub from: String,
    pub to: String,
    pub desired_departure_time: DateTime<Utc>,
    pub cursor: Option<DistanceCursor>,
    pub page_size: u32,
}

/// Ticket operations over the two store contracts.
///
/// Stateless and reentrant: every call is a self-contained unit of work over
/// externally owned storage. The only internal retry anywhere is the single
/// re-query after route creation.
pub struct TicketService {
    routes: Arc<dyn RouteStore>,
    tickets: Arc<dyn TicketStore>,
    limits: PageLimits,
}

impl TicketService {
    pub fn new(
        routes: Arc<dyn RouteStore>,
        tickets: Arc<dyn TicketStore>,
        limits: PageLimits,
    ) -> Self {
        Self {
            routes,
            tickets,
            limits,
        }
    }

    /// Registers a ticket, creating the route if the city pair is new.
    pub async fn create_ticket(&self, request: CreateTicketRequest) -> Result<Ticket> {
        if request.departure_time >= request.arrival_time {
            return Err(Error::Validation(
                "departure time must precede arrival time".into(),
            ));
        }
        if request.available_tickets < 0 {
            return Err(Error::Validation(
                "available tickets must be non-negative".into(),
            ));
        }

        let route_id = self
            .resolve_or_create_route(&request.from, &request.to)
            .await?;
        let transport_type_code =
            map_transport_type(&request.transport_type, OnUnknown::DefaultToZero)?;

        let ticket = self
            .tickets
            .save(NewTicket {
                transport_type_code,
                route_id,
                departure_time: request.departure_time,
                arrival_time: request.arrival_time,
                price: request.price,
                available_tickets: request.available_tickets,
            })
            .await?;
        debug!(ticket_id = ticket.id, route_id, "registered ticket");
        Ok(ticket)
    }

    pub async fn get_ticket_details(&self, id: i32) -> Result<Ticket> {
        self.tickets
            .find_by_id_with_details(id)
            .await?
            .ok_or(Error::TicketNotFound(id))
    }

    /// Chronological search: ascending `(departure_time, id)` within the
    /// optional departure window, resumed strictly after the cursor.
    pub async fn search_tickets(&self, request: SearchTicketsRequest) -> Result<Page<ForwardCursor>> {
        let limit = self.limits.check(request.page_size)?;
        let route_id = self.resolve_route(&request.from, &request.to).await?;
        let cursor = request.cursor.map(|c| (c.departure_time, c.id));

        // Two distinct query shapes, not one nullable filter.
        let items = match &request.transport_type {
            Some(token) => {
                let code = map_transport_type(token, OnUnknown::Reject)?;
                self.tickets
                    .find_tickets(
                        code,
                        route_id,
                        request.start_time,
                        request.end_time,
                        cursor,
                        limit,
                    )
                    .await?
            }
            None => {
                self.tickets
                    .find_tickets_without_transport_type(
                        route_id,
                        request.start_time,
                        request.end_time,
                        cursor,
                        limit,
                    )
                    .await?
            }
        };
        Ok(Page::from_items(items, ForwardCursor::of))
    }

    /// Distance search: ascending `(|departure_time - anchor|, id)`. The
    /// anchor is the first request's desired time; a supplied cursor carries
    /// it forward so later pages keep walking outward from the same instant.
    pub async fn search_closest_routes(
        &self,
        request: ClosestSearchRequest,
    ) -> Result<Page<DistanceCursor>> {
        let limit = self.limits.check(request.page_size)?;
        let anchor = request
            .cursor
            .map(|c| c.anchor)
            .unwrap_or(request.desired_departure_time);
        let cursor = request.cursor.map(|c| (c.departure_time, c.id));

        let items = self
            .tickets
            .find_closest_tickets(&request.from, &request.to, anchor, cursor, limit)
            .await?;
        Ok(Page::from_items(items, |last| DistanceCursor::of(anchor, last)))
    }

    /// Read-only resolution: a missing route is the caller's error.
    async fn resolve_route(&self, origin: &str, destination: &str) -> Result<i32> {
        self.routes
            .find_id_by_cities(origin, destination)
            .await?
            .ok_or(Error::RouteNotFound)
    }

    /// Get-or-create resolution. A resolver losing the creation race falls
    /// through to the re-query; a re-query miss after creation means the
    /// store broke its uniqueness contract and is fatal.
    async fn resolve_or_create_route(&self, origin: &str, destination: &str) -> Result<i32> {
        if let Some(id) = self.routes.find_id_by_cities(origin, destination).await? {
            return Ok(id);
        }
        self.routes.create_route(origin, destination).await?;
        self.routes
            .find_id_by_cities(origin, destination)
            .await?
            .ok_or(Error::RouteCreationFailed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BoxError;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use std::sync::Mutex;

    #[derive(Default)]
    struct StubRoutes {
        rows: Mutex<Vec<(String, String, i32)>>,
        // Simulates a store that violates the creation contract.
        create_is_noop: bool,
    }

    #[async_trait]
    impl RouteStore for StubRoutes {
        async fn find_id_by_cities(
            &self,
            origin: &str,
            destination: &str,
        ) -> std::result::Result<Option<i32>, BoxError> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .find(|(o, d, _)| o == origin && d == destination)
                .map(|(_, _, id)| *id))
        }

        async fn create_route(
            &self,
            origin: &str,
            destination: &str,
        ) -> std::result::Result<(), BoxError> {
            if !self.create_is_noop {
                let mut rows = self.rows.lock().unwrap();
                let id = rows.len() as i32 + 1;
                rows.push((origin.to_string(), destination.to_string(), id));
            }
            Ok(())
        }
    }

    #[derive(Default)]
    struct StubTickets {
        saved: Mutex<Vec<Ticket>>,
    }

    #[async_trait]
    impl TicketStore for StubTickets {
        async fn save(&self, ticket: NewTicket) -> std::result::Result<Ticket, BoxError> {
            let mut saved = self.saved.lock().unwrap();
            let ticket = Ticket {
                id: saved.len() as i32 + 1,
                transport_type_code: ticket.transport_type_code,
                route_id: ticket.route_id,
                departure_time: ticket.departure_time,
                arrival_time: ticket.arrival_time,
                price: ticket.price,
                available_tickets: ticket.available_tickets,
            };
            saved.push(ticket.clone());
            Ok(ticket)
        }

        async fn find_by_id_with_details(
            &self,
            id: i32,
        ) -> std::result::Result<Option<Ticket>, BoxError> {
            Ok(self.saved.lock().unwrap().iter().find(|t| t.id == id).cloned())
        }

        async fn find_tickets(
            &self,
            _transport_type_code: i32,
            _route_id: i32,
            _start_time: Option<DateTime<Utc>>,
            _end_time: Option<DateTime<Utc>>,
            _cursor: Option<(DateTime<Utc>, i32)>,
            _page_size: i64,
        ) -> std::result::Result<Vec<Ticket>, BoxError> {
            Ok(Vec::new())
        }

        async fn find_tickets_without_transport_type(
            &self,
            _route_id: i32,
            _start_time: Option<DateTime<Utc>>,
            _end_time: Option<DateTime<Utc>>,
            _cursor: Option<(DateTime<Utc>, i32)>,
            _page_size: i64,
        ) -> std::result::Result<Vec<Ticket>, BoxError> {
            Ok(Vec::new())
        }

        async fn find_closest_tickets(
            &self,
            _origin: &str,
            _destination: &str,
            _anchor: DateTime<Utc>,
            _cursor: Option<(DateTime<Utc>, i32)>,
            _page_size: i64,
        ) -> std::result::Result<Vec<Ticket>, BoxError> {
            Ok(Vec::new())
        }
    }

    fn service(routes: StubRoutes, tickets: StubTickets) -> TicketService {
        TicketService::new(Arc::new(routes), Arc::new(tickets), PageLimits::default())
    }

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, hour, 0, 0).unwrap()
    }

    fn create_request() -> CreateTicketRequest {
        CreateTicketRequest {
            from: "Moscow".to_string(),
            to: "Kazan".to_string(),
            transport_type: "train".to_string(),
            departure_time: at(10),
            arrival_time: at(15),
            price: Decimal::new(1500, 0),
            available_tickets: 40,
        }
    }

    #[tokio::test]
    async fn test_create_rejects_inverted_times() {
        let svc = service(StubRoutes::default(), StubTickets::default());
        let err = svc
            .create_ticket(CreateTicketRequest {
                departure_time: at(15),
                arrival_time: at(10),
                ..create_request()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn test_create_rejects_negative_availability() {
        let svc = service(StubRoutes::default(), StubTickets::default());
        let err = svc
            .create_ticket(CreateTicketRequest {
                available_tickets: -1,
                ..create_request()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn test_create_accepts_unknown_transport_as_code_zero() {
        let svc = service(StubRoutes::default(), StubTickets::default());
        let ticket = svc
            .create_ticket(CreateTicketRequest {
                transport_type: "ferry".to_string(),
                ..create_request()
            })
            .await
            .unwrap();
        assert_eq!(ticket.transport_type_code, 0);
    }

    #[tokio::test]
    async fn test_create_reuses_existing_route() {
        let routes = StubRoutes::default();
        routes.rows.lock().unwrap().push((
            "Moscow".to_string(),
            "Kazan".to_string(),
            42,
        ));
        let svc = service(routes, StubTickets::default());
        let ticket = svc.create_ticket(create_request()).await.unwrap();
        assert_eq!(ticket.route_id, 42);
    }

    #[tokio::test]
    async fn test_create_fails_when_route_creation_does_not_stick() {
        let routes = StubRoutes {
            create_is_noop: true,
            ..StubRoutes::default()
        };
        let svc = service(routes, StubTickets::default());
        let err = svc.create_ticket(create_request()).await.unwrap_err();
        assert!(matches!(err, Error::RouteCreationFailed));
    }

    #[tokio::test]
    async fn test_search_rejects_unknown_transport() {
        let routes = StubRoutes::default();
        routes
            .rows
            .lock()
            .unwrap()
            .push(("Moscow".to_string(), "Kazan".to_string(), 1));
        let svc = service(routes, StubTickets::default());
        let err = svc
            .search_tickets(SearchTicketsRequest {
                from: "Moscow".to_string(),
                to: "Kazan".to_string(),
                transport_type: Some("ferry".to_string()),
                start_time: None,
                end_time: None,
                cursor: None,
                page_size: 10,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidTransportType(_)));
    }

    #[tokio::test]
    async fn test_search_fails_for_missing_route() {
        let svc = service(StubRoutes::default(), StubTickets::default());
        let err = svc
            .search_tickets(SearchTicketsRequest {
                from: "Atlantis".to_string(),
                to: "Nowhere".to_string(),
                transport_type: None,
                start_time: None,
                end_time: None,
                cursor: None,
                page_size: 10,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::RouteNotFound));
    }

    #[tokio::test]
    async fn test_search_rejects_oversized_page() {
        let svc = service(StubRoutes::default(), StubTickets::default());
        let err = svc
            .search_tickets(SearchTicketsRequest {
                from: "Moscow".to_string(),
                to: "Kazan".to_string(),
                transport_type: None,
                start_time: None,
                end_time: None,
                cursor: None,
                page_size: 101,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidPageSize { got: 101, max: 100 }));
    }

    #[tokio::test]
    async fn test_get_details_missing_ticket() {
        let svc = service(StubRoutes::default(), StubTickets::default());
        let err = svc.get_ticket_details(99).await.unwrap_err();
        assert!(matches!(err, Error::TicketNotFound(99)));
    }
}
