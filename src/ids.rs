use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Strongly typed dispatch identifier backed by ULID.
///
/// Every [`Dispatcher`](crate::dispatcher::Dispatcher) gets one; it is attached
/// to the dispatcher's log events and handed to the handler.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub struct DispatchId(pub ulid::Ulid);

impl DispatchId {
    #[must_use]
    pub fn new() -> Self {
        Self(ulid::Ulid::new())
    }

    /// Attempt to parse from a header or environment value; if invalid, generate a new one.
    #[must_use]
    pub fn from_header_or_new(value: Option<&str>) -> Self {
        value
            .and_then(|s| s.parse::<DispatchId>().ok())
            .unwrap_or_default()
    }
}

impl Default for DispatchId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for DispatchId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DispatchId {
    type Err = ulid::DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = ulid::Ulid::from_string(s)?;
        Ok(DispatchId(id))
    }
}
