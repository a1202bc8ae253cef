//! In-memory store implementations with the same filter and ordering
//! semantics as the Postgres repos. Used by the service-level and API tests
//! and usable as a throwaway backend for local development.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use farebox_core::error::BoxError;
use farebox_core::model::{NewTicket, Route, Ticket};
use farebox_core::store::{RouteStore, TicketStore};

#[derive(Default)]
pub struct MemoryRouteStore {
    routes: Mutex<Vec<Route>>,
}

impl MemoryRouteStore {
    fn find(&self, origin: &str, destination: &str) -> Option<i32> {
        self.routes
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.origin_city == origin && r.destination_city == destination)
            .map(|r| r.id)
    }
}

#[async_trait]
impl RouteStore for MemoryRouteStore {
    async fn find_id_by_cities(
        &self,
        origin: &str,
        destination: &str,
    ) -> Result<Option<i32>, BoxError> {
        Ok(self.find(origin, destination))
    }

    async fn create_route(&self, origin: &str, destination: &str) -> Result<(), BoxError> {
        let mut routes = self.routes.lock().unwrap();
        // Same outcome as ON CONFLICT DO NOTHING on the unique pair.
        if routes
            .iter()
            .any(|r| r.origin_city == origin && r.destination_city == destination)
        {
            return Ok(());
        }
        let id = routes.len() as i32 + 1;
        routes.push(Route {
            id,
            origin_city: origin.to_string(),
            destination_city: destination.to_string(),
        });
        Ok(())
    }
}

pub struct MemoryTicketStore {
    routes: Arc<MemoryRouteStore>,
    tickets: Mutex<Vec<Ticket>>,
}

impl MemoryTicketStore {
    pub fn new(routes: Arc<MemoryRouteStore>) -> Self {
        Self {
            routes,
            tickets: Mutex::new(Vec::new()),
        }
    }

    fn chronological(
        &self,
        transport_type_code: Option<i32>,
        route_id: i32,
        start_time: Option<DateTime<Utc>>,
        end_time: Option<DateTime<Utc>>,
        cursor: Option<(DateTime<Utc>, i32)>,
        page_size: i64,
    ) -> Vec<Ticket> {
        let mut rows: Vec<Ticket> = self
            .tickets
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.route_id == route_id)
            .filter(|t| transport_type_code.is_none_or(|code| t.transport_type_code == code))
            .filter(|t| start_time.is_none_or(|start| t.departure_time >= start))
            .filter(|t| end_time.is_none_or(|end| t.departure_time <= end))
            .filter(|t| cursor.is_none_or(|(time, id)| (t.departure_time, t.id) > (time, id)))
            .cloned()
            .collect();
        rows.sort_by_key(|t| (t.departure_time, t.id));
        rows.truncate(page_size as usize);
        rows
    }
}

#[async_trait]
impl TicketStore for MemoryTicketStore {
    async fn save(&self, ticket: NewTicket) -> Result<Ticket, BoxError> {
        let mut tickets = self.tickets.lock().unwrap();
        let ticket = Ticket {
            id: tickets.len() as i32 + 1,
            transport_type_code: ticket.transport_type_code,
            route_id: ticket.route_id,
            departure_time: ticket.departure_time,
            arrival_time: ticket.arrival_time,
            price: ticket.price,
            available_tickets: ticket.available_tickets,
        };
        tickets.push(ticket.clone());
        Ok(ticket)
    }

    async fn find_by_id_with_details(&self, id: i32) -> Result<Option<Ticket>, BoxError> {
        Ok(self
            .tickets
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.id == id)
            .cloned())
    }

    async fn find_tickets(
        &self,
        transport_type_code: i32,
        route_id: i32,
        start_time: Option<DateTime<Utc>>,
        end_time: Option<DateTime<Utc>>,
        cursor: Option<(DateTime<Utc>, i32)>,
        page_size: i64,
    ) -> Result<Vec<Ticket>, BoxError> {
        Ok(self.chronological(
            Some(transport_type_code),
            route_id,
            start_time,
            end_time,
            cursor,
            page_size,
        ))
    }

    async fn find_tickets_without_transport_type(
        &self,
        route_id: i32,
        start_time: Option<DateTime<Utc>>,
        end_time: Option<DateTime<Utc>>,
        cursor: Option<(DateTime<Utc>, i32)>,
        page_size: i64,
    ) -> Result<Vec<Ticket>, BoxError> {
        Ok(self.chronological(None, route_id, start_time, end_time, cursor, page_size))
    }

    async fn find_closest_tickets(
        &self,
        origin: &str,
        destination: &str,
        anchor: DateTime<Utc>,
        cursor: Option<(DateTime<Utc>, i32)>,
        page_size: i64,
    ) -> Result<Vec<Ticket>, BoxError> {
        let Some(route_id) = self.routes.find(origin, destination) else {
            return Ok(Vec::new());
        };
        let resume = cursor.map(|(time, id)| ((time - anchor).abs(), id));
        let mut rows: Vec<Ticket> = self
            .tickets
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.route_id == route_id)
            .filter(|t| {
                resume.is_none_or(|(distance, id)| {
                    ((t.departure_time - anchor).abs(), t.id) > (distance, id)
                })
            })
            .cloned()
            .collect();
        rows.sort_by_key(|t| ((t.departure_time - anchor).abs(), t.id));
        rows.truncate(page_size as usize);
        Ok(rows)
    }
}
