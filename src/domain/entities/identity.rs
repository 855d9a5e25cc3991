//! Principal attached to a request by the identity resolver.

use super::User;

/// Resolved principal for the remainder of a request.
///
/// `Anonymous` is the sentinel used when no credential was presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Identity {
    #[default]
    Anonymous,
    User { id: i64, activated: bool },
}

impl Identity {
    pub fn is_anonymous(&self) -> bool {
        matches!(self, Identity::Anonymous)
    }

    pub fn is_activated(&self) -> bool {
        matches!(self, Identity::User { activated: true, .. })
    }

    pub fn id(&self) -> Option<i64> {
        match self {
            Identity::Anonymous => None,
            Identity::User { id, .. } => Some(*id),
        }
    }
}

impl From<&User> for Identity {
    fn from(user: &User) -> Self {
        Identity::User {
            id: user.id,
            activated: user.activated,
        }
    }
}
