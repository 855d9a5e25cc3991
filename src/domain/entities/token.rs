//! Activation and authentication tokens.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// What a token may be exchanged for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenScope {
    Activation,
    Authentication,
}

impl TokenScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenScope::Activation => "activation",
            TokenScope::Authentication => "authentication",
        }
    }
}

/// A freshly issued token.
///
/// `plaintext` is handed to the user exactly once; only `hash` is stored.
#[derive(Debug, Clone, Serialize)]
pub struct Token {
    #[serde(rename = "token")]
    pub plaintext: String,
    #[serde(skip)]
    pub hash: String,
    #[serde(skip)]
    pub user_id: i64,
    pub expiry: DateTime<Utc>,
    #[serde(skip)]
    pub scope: TokenScope,
}

/// Row written to the tokens table.
#[derive(Debug, Clone)]
pub struct NewToken {
    pub hash: String,
    pub user_id: i64,
    pub expiry: DateTime<Utc>,
    pub scope: TokenScope,
}

impl From<&Token> for NewToken {
    fn from(token: &Token) -> Self {
        Self {
            hash: token.hash.clone(),
            user_id: token.user_id,
            expiry: token.expiry,
            scope: token.scope,
        }
    }
}
