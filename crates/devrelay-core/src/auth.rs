//! Chat identities and the static allow-list guarding them.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// An opaque chat/session identifier the relay may address.
///
/// Telegram reports chat ids as integers while web dashboards usually send
/// strings, so both JSON shapes deserialize into the same trimmed string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawIdentity", into = "String")]
pub struct Identity(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawIdentity {
    Number(i64),
    Text(String),
}

impl From<RawIdentity> for Identity {
    fn from(raw: RawIdentity) -> Self {
        match raw {
            RawIdentity::Number(n) => Identity::from(n),
            RawIdentity::Text(s) => Identity::new(s),
        }
    }
}

impl Identity {
    /// Create an identity, trimming surrounding whitespace.
    pub fn new(value: impl AsRef<str>) -> Self {
        Self(value.as_ref().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the identity has no content after normalization.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<i64> for Identity {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for Identity {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<Identity> for String {
    fn from(identity: Identity) -> Self {
        identity.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Immutable allow-list of identities permitted to use the relay.
#[derive(Debug, Clone, Default)]
pub struct AuthorizationGuard {
    allowed: HashSet<Identity>,
}

impl AuthorizationGuard {
    pub fn new(identities: impl IntoIterator<Item = Identity>) -> Self {
        Self {
            allowed: identities
                .into_iter()
                .filter(|id| !id.is_empty())
                .collect(),
        }
    }

    /// Build a guard from a comma-separated list such as `"123, 456"`.
    pub fn from_list(list: &str) -> Self {
        Self::new(parse_identity_list(list))
    }

    /// Returns true if `identity` is on the allow-list.
    ///
    /// Absence is an ordinary `false`; callers decide how to reject.
    pub fn is_authorized(&self, identity: &Identity) -> bool {
        self.allowed.contains(identity)
    }

    /// Number of distinct authorized identities.
    pub fn len(&self) -> usize {
        self.allowed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.allowed.is_empty()
    }

    /// Authorized identities in sorted order (for startup logging).
    pub fn identities(&self) -> Vec<&Identity> {
        let mut ids: Vec<&Identity> = self.allowed.iter().collect();
        ids.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        ids
    }
}

/// Split a comma-separated identity list, dropping blank entries.
pub fn parse_identity_list(list: &str) -> Vec<Identity> {
    list.split(',')
        .map(Identity::new)
        .filter(|id| !id.is_empty())
        .collect()
}
