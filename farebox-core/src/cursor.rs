use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::model::Ticket;

/// Resume point for the chronological ordering: the scan continues strictly
/// after `(departure_time, id)`, compared lexicographically ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForwardCursor {
    pub departure_time: DateTime<Utc>,
    pub id: i32,
}

impl ForwardCursor {
    pub fn of(ticket: &Ticket) -> Self {
        Self {
            departure_time: ticket.departure_time,
            id: ticket.id,
        }
    }
}

/// Resume point for the distance ordering. `anchor` is the desired departure
/// instant of the first request and stays fixed across pages, so every page
/// continues the walk outward from the same target rather than re-centering
/// on the caller's position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistanceCursor {
    pub anchor: DateTime<Utc>,
    pub departure_time: DateTime<Utc>,
    pub id: i32,
}

impl DistanceCursor {
    pub fn of(anchor: DateTime<Utc>, ticket: &Ticket) -> Self {
        Self {
            anchor,
            departure_time: ticket.departure_time,
            id: ticket.id,
        }
    }
}

/// One page of results plus the cursor for the page after it.
#[derive(Debug, Clone, Serialize)]
pub struct Page<C> {
    pub items: Vec<Ticket>,
    pub next_cursor: Option<C>,
}

impl<C> Page<C> {
    /// Builds a page from an already ordered, already bounded result set.
    /// `next_cursor` is present iff `items` is non-empty and is derived from
    /// the last item alone.
    pub fn from_items(items: Vec<Ticket>, to_cursor: impl FnOnce(&Ticket) -> C) -> Self {
        let next_cursor = items.last().map(to_cursor);
        Self { items, next_cursor }
    }
}

/// Ceiling on requested page sizes. Out-of-range requests are rejected
/// rather than silently capped.
#[derive(Debug, Clone, Copy)]
pub struct PageLimits {
    pub max_page_size: u32,
}

impl PageLimits {
    pub const DEFAULT_MAX_PAGE_SIZE: u32 = 100;

    pub fn new(max_page_size: u32) -> Self {
        Self { max_page_size }
    }

    /// Validates a requested page size, returning it as a store-ready limit.
    pub fn check(&self, page_size: u32) -> Result<i64, Error> {
        if page_size == 0 || page_size > self.max_page_size {
            return Err(Error::InvalidPageSize {
                got: page_size,
                max: self.max_page_size,
            });
        }
        Ok(i64::from(page_size))
    }
}

impl Default for PageLimits {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_PAGE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal::Decimal;

    fn ticket(id: i32, hour: u32) -> Ticket {
        Ticket {
            id,
            transport_type_code: 1,
            route_id: 1,
            departure_time: Utc.with_ymd_and_hms(2025, 6, 1, hour, 0, 0).unwrap(),
            arrival_time: Utc.with_ymd_and_hms(2025, 6, 1, hour + 2, 0, 0).unwrap(),
            price: Decimal::new(500, 0),
            available_tickets: 10,
        }
    }

    #[test]
    fn test_empty_page_has_no_cursor() {
        let page = Page::from_items(Vec::new(), ForwardCursor::of);
        assert!(page.items.is_empty());
        assert!(page.next_cursor.is_none());
    }

    #[test]
    fn test_cursor_derived_from_last_item() {
        let page = Page::from_items(vec![ticket(1, 8), ticket(2, 9)], ForwardCursor::of);
        let cursor = page.next_cursor.unwrap();
        assert_eq!(cursor.id, 2);
        assert_eq!(cursor.departure_time, page.items[1].departure_time);
    }

    #[test]
    fn test_page_limits_accept_boundaries() {
        let limits = PageLimits::new(100);
        assert_eq!(limits.check(1).unwrap(), 1);
        assert_eq!(limits.check(100).unwrap(), 100);
    }

    #[test]
    fn test_page_limits_reject_out_of_range() {
        let limits = PageLimits::new(100);
        assert!(matches!(
            limits.check(0),
            Err(Error::InvalidPageSize { got: 0, max: 100 })
        ));
        assert!(matches!(
            limits.check(101),
            Err(Error::InvalidPageSize { got: 101, max: 100 })
        ));
    }
}
