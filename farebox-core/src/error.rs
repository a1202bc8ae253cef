/// Error type returned by the store contracts.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("route not found")]
    RouteNotFound,

    #[error("ticket {0} not found")]
    TicketNotFound(i32),

    #[error("invalid transport type: {0}")]
    InvalidTransportType(String),

    #[error("page size must be between 1 and {max}, got {got}")]
    InvalidPageSize { got: u32, max: u32 },

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("route creation failed")]
    RouteCreationFailed,

    #[error("storage error: {0}")]
    Store(#[source] BoxError),
}

impl From<BoxError> for Error {
    fn from(err: BoxError) -> Self {
        Error::Store(err)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
