use std::fmt;

/// A named channel on the bus.
///
/// Topics are created implicitly by the first subscriber and dropped when the
/// last one leaves. The constructors cover the platform's topic families; the
/// inner form is `<family>:<key>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Topic(String);

impl Topic {
    /// Live price stream of one instrument
    pub fn price(symbol: &str) -> Self {
        Topic(format!("price:{symbol}"))
    }

    /// Order lifecycle events of one user
    pub fn orders(user_id: &str) -> Self {
        Topic(format!("orders:{user_id}"))
    }

    /// Valuation snapshots of all users
    pub fn portfolios() -> Self {
        Topic("portfolios".to_string())
    }

    /// Membership and chat events of one room
    pub fn room(room_id: &str) -> Self {
        Topic(format!("room:{room_id}"))
    }

    /// Escape hatch for callers with their own naming scheme
    pub fn named(name: impl Into<String>) -> Self {
        Topic(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
