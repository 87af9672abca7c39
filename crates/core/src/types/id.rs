//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types.

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `i64` (SQLite rowid) with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_i64()`
/// - `From<i64>` and `Into<i64>` implementations
/// - `sqlx` `Type`, `Encode`, and `Decode` implementations (with `sqlite` feature)
///
/// # Example
///
/// ```rust
/// # use mashtal_core::define_id;
/// define_id!(UserId);
/// define_id!(OrderId);
///
/// let user_id = UserId::new(1);
/// let order_id = OrderId::new(1);
///
/// // These are different types, so this won't compile:
/// // let _: UserId = order_id;
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
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Create a new ID from an i64 value.
            #[must_use]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Get the underlying i64 value.
            #[must_use]
            pub const fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
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

        #[cfg(feature = "sqlite")]
        impl ::sqlx::Type<::sqlx::Sqlite> for $name {
            fn type_info() -> ::sqlx::sqlite::SqliteTypeInfo {
                <i64 as ::sqlx::Type<::sqlx::Sqlite>>::type_info()
            }

            fn compatible(ty: &::sqlx::sqlite::SqliteTypeInfo) -> bool {
                <i64 as ::sqlx::Type<::sqlx::Sqlite>>::compatible(ty)
            }
        }

        #[cfg(feature = "sqlite")]
        impl<'r> ::sqlx::Decode<'r, ::sqlx::Sqlite> for $name {
            fn decode(
                value: ::sqlx::sqlite::SqliteValueRef<'r>,
            ) -> ::core::result::Result<Self, ::sqlx::error::BoxDynError> {
                let id = <i64 as ::sqlx::Decode<::sqlx::Sqlite>>::decode(value)?;
                Ok(Self(id))
            }
        }

        #[cfg(feature = "sqlite")]
        impl<'q> ::sqlx::Encode<'q, ::sqlx::Sqlite> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut Vec<::sqlx::sqlite::SqliteArgumentValue<'q>>,
            ) -> ::std::result::Result<::sqlx::encode::IsNull, ::sqlx::error::BoxDynError> {
                <i64 as ::sqlx::Encode<'q, ::sqlx::Sqlite>>::encode_by_ref(&self.0, buf)
            }
        }
    };
}

// Define standard entity IDs
define_id!(UserId);
define_id!(ProductId);
define_id!(ShippingZoneId);
define_id!(OrderId);
define_id!(OrderItemId);
