//! Closed status sets for procurement entities.
//!
//! Statuses are stored as `TEXT` columns guarded by `CHECK` constraints in
//! the database. Each enum here maps one-to-one to the labels accepted by
//! those constraints and serializes to the same lowercase label.

use crate::error::CoreError;

macro_rules! define_status_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $label:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $label)] $variant ),+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$( $name::$variant ),+];

            /// The label stored in the database and sent over the wire.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $label ),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::error::CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $label => Ok($name::$variant), )+
                    other => Err($crate::error::CoreError::Validation(format!(
                        "Unknown {} '{}'. Allowed: {}",
                        stringify!($name),
                        other,
                        [$( $label ),+].join(", ")
                    ))),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

pub(crate) use define_status_enum;

define_status_enum! {
    /// Procurement solicitation lifecycle. Transitions are not constrained.
    MarketStatus {
        Draft = "draft",
        Published = "published",
        InProgress = "in_progress",
        Completed = "completed",
        Cancelled = "cancelled",
    }
}

define_status_enum! {
    /// Awarded contract lifecycle.
    ContractStatus {
        Draft = "draft",
        Active = "active",
        Completed = "completed",
        Suspended = "suspended",
        Cancelled = "cancelled",
    }
}

define_status_enum! {
    /// Review state of a partial payment (décompte).
    SettlementStatus {
        Pending = "pending",
        Validated = "validated",
        Rejected = "rejected",
    }
}

define_status_enum! {
    /// Kind of schedule event attached to a contract.
    DelaiType {
        Initial = "initial",
        Extension = "extension",
        Suspension = "suspension",
    }
}

define_status_enum! {
    DelaiStatus {
        Pending = "pending",
        Active = "active",
        Expired = "expired",
    }
}

define_status_enum! {
    ExpenseStatus {
        Pending = "pending",
        Approved = "approved",
        Paid = "paid",
        Rejected = "rejected",
    }
}

define_status_enum! {
    /// Payment progress of a contract, derived from its settlements.
    PaymentStatus {
        Pending = "pending",
        Partial = "partial",
        Paid = "paid",
    }
}

/// Check that `value` is a valid label for `T`, returning the label unchanged.
///
/// Used by write paths that keep the label as a `String` in the row struct.
pub fn validate_label<T>(value: &str) -> Result<String, CoreError>
where
    T: std::str::FromStr<Err = CoreError>,
{
    value.parse::<T>().map(|_| value.to_string())
}
