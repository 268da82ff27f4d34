//! Identifier types for stops, routes and trips.
//!
//! Feed identifiers are opaque strings (e.g. `"8495-d8b98d40"`). Wrapping
//! them keeps a stop id from being passed where a trip id is expected.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a raw identifier.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }
    };
}

string_id!(
    /// A bus stop identifier.
    StopId
);

string_id!(
    /// A route identifier (shared by both directions of a line).
    RouteId
);

string_id!(
    /// A trip identifier: one scheduled run of a vehicle along a route.
    TripId
);

/// Direction of travel along a route (GTFS `direction_id`, usually 0 or 1).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct DirectionId(pub u8);

impl fmt::Display for DirectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A route travelled in one direction.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RouteKey {
    pub route: RouteId,
    pub direction: DirectionId,
}

impl RouteKey {
    /// Create a key from a route and direction.
    pub fn new(route: impl Into<RouteId>, direction: u8) -> Self {
        Self {
            route: route.into(),
            direction: DirectionId(direction),
        }
    }
}

impl From<String> for RouteId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Debug for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RouteKey({}_{})", self.route, self.direction)
    }
}

impl fmt::Display for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.route, self.direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn display_and_debug() {
        let stop = StopId::new("1023-ca6f2b92");
        assert_eq!(stop.to_string(), "1023-ca6f2b92");
        assert_eq!(format!("{stop:?}"), "StopId(1023-ca6f2b92)");

        let key = RouteKey::new("OUT-202", 1);
        assert_eq!(key.to_string(), "OUT-202_1");
        assert_eq!(format!("{key:?}"), "RouteKey(OUT-202_1)");
    }

    #[test]
    fn route_keys_order_by_route_then_direction() {
        let mut map = BTreeMap::new();
        map.insert(RouteKey::new("B", 0), 1);
        map.insert(RouteKey::new("A", 1), 2);
        map.insert(RouteKey::new("A", 0), 3);

        let order: Vec<_> = map.keys().map(|k| k.to_string()).collect();
        assert_eq!(order, vec!["A_0", "A_1", "B_0"]);
    }

    #[test]
    fn ids_serialize_transparently() {
        let json = serde_json::to_string(&TripId::new("T1")).unwrap();
        assert_eq!(json, "\"T1\"");

        let key: RouteKey = serde_json::from_str(r#"{"route":"101","direction":1}"#).unwrap();
        assert_eq!(key, RouteKey::new("101", 1));
    }
}
