//! Typed entity IDs.
//!
//! Each entity gets its own i64 newtype so a `UserId` can never be handed to
//! a query expecting an `OrderId`. The wrappers are serde-transparent and,
//! with the `postgres` feature, bind and decode as plain `BIGINT`.

/// Declare an i64-backed entity ID.
///
/// The generated type is `Copy`, ordered, hashable, serde-transparent, and
/// parses from its decimal string form. With the `postgres` feature it also
/// derives a transparent `sqlx::Type`.
///
/// ```rust
/// # use vendly_core::define_id;
/// define_id!(WarehouseId);
///
/// let id: WarehouseId = "7".parse().unwrap();
/// assert_eq!(id, WarehouseId::new(7));
/// assert_eq!(id.as_i64(), 7);
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        #[cfg_attr(feature = "postgres", derive(::sqlx::Type))]
        #[cfg_attr(feature = "postgres", sqlx(transparent))]
        pub struct $name(i64);

        impl $name {
            #[must_use]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            #[must_use]
            pub const fn as_i64(self) -> i64 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                ::core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = ::core::num::ParseIntError;

            fn from_str(raw: &str) -> ::core::result::Result<Self, Self::Err> {
                raw.parse::<i64>().map(Self)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(UserId);
define_id!(ProductId);
define_id!(CategoryId);
define_id!(OrderId);
define_id!(OrderItemId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_round_trip() {
        let id = OrderId::new(42);
        assert_eq!(id.as_i64(), 42);
        assert_eq!(i64::from(id), 42);
        assert_eq!(OrderId::from(42), id);
    }

    #[test]
    fn test_id_serde_transparent() {
        let id = UserId::new(7);
        let json = serde_json::to_string(&id).expect("serialize");
        assert_eq!(json, "7");
        let back: UserId = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, id);
    }

    #[test]
    fn test_id_parses_from_decimal_string() {
        let id: ProductId = "3".parse().expect("parse");
        assert_eq!(id, ProductId::new(3));
        assert!("3.5".parse::<ProductId>().is_err());
        assert!("abc".parse::<ProductId>().is_err());
    }

    #[test]
    fn test_id_display() {
        assert_eq!(CategoryId::new(12).to_string(), "12");
    }

    #[test]
    fn test_ids_order_by_value() {
        let mut ids = vec![OrderId::new(9), OrderId::new(1), OrderId::new(4)];
        ids.sort();
        assert_eq!(ids, vec![OrderId::new(1), OrderId::new(4), OrderId::new(9)]);
    }
}
