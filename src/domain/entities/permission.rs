//! Permission codes granted to a user.

use std::collections::HashSet;

/// Read access to quotes; granted to every new user.
pub const QUOTES_READ: &str = "quotes:read";

/// Create, update and delete access to quotes.
pub const QUOTES_WRITE: &str = "quotes:write";

/// Permission codes for one user, e.g. `quotes:read`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Permissions(HashSet<String>);

impl Permissions {
    pub fn includes(&self, code: &str) -> bool {
        self.0.contains(code)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for Permissions {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}
