use serde::{Deserialize, Serialize};
use std::fmt;

/// Exchange-assigned order identifier.
///
/// Assigned sequentially from 1 by a single exchange instance and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OrderId(pub u64);

impl OrderId {
    pub const FIRST: OrderId = OrderId(1);

    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl From<u64> for OrderId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
