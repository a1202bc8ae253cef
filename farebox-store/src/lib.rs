pub mod app_config;
pub mod database;
pub mod memory;
pub mod route_repo;
pub mod ticket_repo;

pub use database::DbClient;
pub use memory::{MemoryRouteStore, MemoryTicketStore};
pub use route_repo::PostgresRouteStore;
pub use ticket_repo::PostgresTicketStore;
