//! Resolved caller identity

use serde::{Deserialize, Serialize};

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Administrator,
    Employee,
    Customer,
}

impl Role {
    /// Parse a role from its lowercase wire name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "administrator" => Some(Self::Administrator),
            "employee" => Some(Self::Employee),
            "customer" => Some(Self::Customer),
            _ => None,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Administrator)
    }
}

/// Resolved caller identity
///
/// Produced by the identity middleware from trusted upstream headers and
/// passed into every engine call. The engine never authenticates; it only
/// consumes this value. Guest callers are addressed by the cart id their
/// token resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Identity {
    Account { id: i64, role: Role },
    Guest { cart_id: i64 },
}

impl Identity {
    pub fn is_admin(&self) -> bool {
        matches!(self, Identity::Account { role, .. } if role.is_admin())
    }

    /// Account id for account callers, `None` for guests
    pub fn account_id(&self) -> Option<i64> {
        match self {
            Identity::Account { id, .. } => Some(*id),
            Identity::Guest { .. } => None,
        }
    }
}
