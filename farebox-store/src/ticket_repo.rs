use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};

use farebox_core::error::BoxError;
use farebox_core::model::{NewTicket, Ticket};
use farebox_core::store::TicketStore;

#[derive(FromRow)]
struct TicketRow {
    id: i32,
    transport_type_code: i32,
    route_id: i32,
    departure_time: DateTime<Utc>,
    arrival_time: DateTime<Utc>,
    price: Decimal,
    available_tickets: i32,
}

impl From<TicketRow> for Ticket {
    fn from(row: TicketRow) -> Self {
        Ticket {
            id: row.id,
            transport_type_code: row.transport_type_code,
            route_id: row.route_id,
            departure_time: row.departure_time,
            arrival_time: row.arrival_time,
            price: row.price,
            available_tickets: row.available_tickets,
        }
    }
}

pub struct PostgresTicketStore {
    pub pool: PgPool,
}

#[async_trait]
impl TicketStore for PostgresTicketStore {
    async fn save(&self, ticket: NewTicket) -> Result<Ticket, BoxError> {
        let row = sqlx::query_as::<_, TicketRow>(
            r#"
            INSERT INTO tickets
                (transport_type_code, route_id, departure_time, arrival_time, price, available_tickets)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, transport_type_code, route_id, departure_time, arrival_time, price, available_tickets
            "#,
        )
        .bind(ticket.transport_type_code)
        .bind(ticket.route_id)
        .bind(ticket.departure_time)
        .bind(ticket.arrival_time)
        .bind(ticket.price)
        .bind(ticket.available_tickets)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn find_by_id_with_details(&self, id: i32) -> Result<Option<Ticket>, BoxError> {
        let row = sqlx::query_as::<_, TicketRow>(
            r#"
            SELECT id, transport_type_code, route_id, departure_time, arrival_time, price, available_tickets
            FROM tickets
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Ticket::from))
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
        let (cursor_time, cursor_id) = split_cursor(cursor);
        let rows = sqlx::query_as::<_, TicketRow>(
            r#"
            SELECT id, transport_type_code, route_id, departure_time, arrival_time, price, available_tickets
            FROM tickets
            WHERE transport_type_code = $1
              AND route_id = $2
              AND ($3::timestamptz IS NULL OR departure_time >= $3)
              AND ($4::timestamptz IS NULL OR departure_time <= $4)
              AND ($5::timestamptz IS NULL OR (departure_time, id) > ($5, $6::int))
            ORDER BY departure_time, id
            LIMIT $7
            "#,
        )
        .bind(transport_type_code)
        .bind(route_id)
        .bind(start_time)
        .bind(end_time)
        .bind(cursor_time)
        .bind(cursor_id)
        .bind(page_size)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Ticket::from).collect())
    }

    async fn find_tickets_without_transport_type(
        &self,
        route_id: i32,
        start_time: Option<DateTime<Utc>>,
        end_time: Option<DateTime<Utc>>,
        cursor: Option<(DateTime<Utc>, i32)>,
        page_size: i64,
    ) -> Result<Vec<Ticket>, BoxError> {
        let (cursor_time, cursor_id) = split_cursor(cursor);
        let rows = sqlx::query_as::<_, TicketRow>(
            r#"
            SELECT id, transport_type_code, route_id, departure_time, arrival_time, price, available_tickets
            FROM tickets
            WHERE route_id = $1
              AND ($2::timestamptz IS NULL OR departure_time >= $2)
              AND ($3::timestamptz IS NULL OR departure_time <= $3)
              AND ($4::timestamptz IS NULL OR (departure_time, id) > ($4, $5::int))
            ORDER BY departure_time, id
            LIMIT $6
            "#,
        )
        .bind(route_id)
        .bind(start_time)
        .bind(end_time)
        .bind(cursor_time)
        .bind(cursor_id)
        .bind(page_size)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Ticket::from).collect())
    }

    async fn find_closest_tickets(
        &self,
        origin: &str,
        destination: &str,
        anchor: DateTime<Utc>,
        cursor: Option<(DateTime<Utc>, i32)>,
        page_size: i64,
    ) -> Result<Vec<Ticket>, BoxError> {
        let (cursor_time, cursor_id) = split_cursor(cursor);
        // Ordered by absolute distance from the anchor, then id; the resume
        // predicate replays the cursor ticket's (distance, id) pair.
        let rows = sqlx::query_as::<_, TicketRow>(
            r#"
            SELECT t.id, t.transport_type_code, t.route_id,
                   t.departure_time, t.arrival_time, t.price, t.available_tickets
            FROM tickets t
            JOIN routes r ON r.id = t.route_id
            WHERE r.origin_city = $1
              AND r.destination_city = $2
              AND ($4::timestamptz IS NULL OR
                   (ABS(EXTRACT(EPOCH FROM (t.departure_time - $3::timestamptz))), t.id) >
                   (ABS(EXTRACT(EPOCH FROM ($4::timestamptz - $3::timestamptz))), $5::int))
            ORDER BY ABS(EXTRACT(EPOCH FROM (t.departure_time - $3::timestamptz))), t.id
            LIMIT $6
            "#,
        )
        .bind(origin)
        .bind(destination)
        .bind(anchor)
        .bind(cursor_time)
        .bind(cursor_id)
        .bind(page_size)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Ticket::from).collect())
    }
}

fn split_cursor(cursor: Option<(DateTime<Utc>, i32)>) -> (Option<DateTime<Utc>>, Option<i32>) {
    match cursor {
        Some((time, id)) => (Some(time), Some(id)),
        None => (None, None),
    }
}
