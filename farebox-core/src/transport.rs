use crate::error::Error;

/// Recognized transport types and their stable wire codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportType {
    Bus,
    Avia,
    Train,
}

impl TransportType {
    pub fn code(self) -> i32 {
        match self {
            TransportType::Bus => 1,
            TransportType::Avia => 2,
            TransportType::Train => 3,
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "bus" => Some(TransportType::Bus),
            "avia" => Some(TransportType::Avia),
            "train" => Some(TransportType::Train),
            _ => None,
        }
    }
}

/// What to do with a token outside the recognized set.
///
/// Registration accepts unknown tokens as code 0 while search rejects them;
/// the asymmetry is intentional and each call site states its policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnUnknown {
    Reject,
    DefaultToZero,
}

pub fn map_transport_type(token: &str, on_unknown: OnUnknown) -> Result<i32, Error> {
    match TransportType::from_token(token) {
        Some(transport_type) => Ok(transport_type.code()),
        None => match on_unknown {
            OnUnknown::Reject => Err(Error::InvalidTransportType(token.to_string())),
            OnUnknown::DefaultToZero => Ok(0),
        },
    }
}
