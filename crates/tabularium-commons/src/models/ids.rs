//! Type-safe wrappers for catalog row identifiers.
//!
//! Ensures a dataset id cannot be accidentally used where a table id is
//! expected when several identifiers travel through the same call path.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
            Serialize, Deserialize, sqlx::Type,
        )]
        #[sqlx(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wrap a raw row id.
            #[inline]
            pub fn new(id: i64) -> Self {
                Self(id)
            }

            /// The raw row id.
            #[inline]
            pub fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }
    };
}

define_id!(
    /// Identifier of a [`crate::models::Dataset`] row.
    DatasetId
);
define_id!(
    /// Identifier of a [`crate::models::Version`] row.
    VersionId
);
define_id!(
    /// Identifier of a [`crate::models::Table`] row. Also the key of the
    /// process-wide record-type registry.
    TableId
);
define_id!(
    /// Identifier of a [`crate::models::Field`] row.
    FieldId
);
