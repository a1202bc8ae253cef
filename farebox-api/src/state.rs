use std::sync::Arc;

use farebox_core::TicketService;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<TicketService>,
}
