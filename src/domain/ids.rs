//! Caller-supplied string identifiers: groups and virtual machines.
//!
//! Both are opaque to the hub. A [`GroupId`] names one fleet's broadcast
//! domain; a [`VmId`] names a machine within it and is only ever compared
//! for equality against a listener's own identity.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of one fleet-scoped broadcast domain.
///
/// Supplied by the caller (one per management scope) and validated
/// upstream; the hub never inspects its content. A group exists only
/// while it has at least one member.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(String);

impl GroupId {
    /// Creates a new group identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for GroupId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for GroupId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Identifier of one virtual machine inside a fleet.
///
/// Used purely as a structured routing target on relayed request frames:
/// every VM agent in a group receives the frame, but only the listener
/// whose own `VmId` matches acts on it (see
/// [`crate::domain::ServerFrame::is_for`]).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VmId(String);

impl VmId {
    /// Creates a new VM identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for VmId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for VmId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}
