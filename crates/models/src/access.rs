use crate::role::{Principal, Role};

/// Whether `actor` may mutate a resource owned by `owner_id`.
///
/// Admins may touch anything. Everyone else must be the recorded owner, so a
/// resource with no owner (an unclaimed venue and its courts) is admin-only.
pub fn is_authorized(actor: &Principal, owner_id: Option<i64>) -> bool {
    actor.role == Role::Admin || owner_id.is_some_and(|owner| owner == actor.id)
}

/// Whose reservations a principal is allowed to see
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Only reservations where the principal is the customer
    Customer(i64),
    /// Only reservations on courts of venues owned by the principal
    Owner(i64),
    /// Every reservation
    All,
}

impl Visibility {
    pub fn for_principal(actor: &Principal) -> Self {
        match actor.role {
            Role::Usuario => Self::Customer(actor.id),
            Role::Propietario => Self::Owner(actor.id),
            Role::Admin => Self::All,
        }
    }
}
