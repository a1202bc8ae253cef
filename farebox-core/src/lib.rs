pub mod cursor;
pub mod error;
pub mod model;
pub mod service;
pub mod store;
pub mod transport;

pub use cursor::{DistanceCursor, ForwardCursor, Page, PageLimits};
pub use error::{BoxError, Error};
pub use model::{NewTicket, Route, Ticket};
pub use service::{
    ClosestSearchRequest, CreateTicketRequest, SearchTicketsRequest, TicketService,
};
pub use store::{RouteStore, TicketStore};
