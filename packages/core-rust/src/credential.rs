//! Bearer credentials and the precedence chain used to pick one per invocation.
//!
//! A credential is resolved from three tiers, first match wins:
//!
//! 1. an explicit credential passed with the tool call (`api_key` argument)
//! 2. the ambient credential installed by the transport for the current invocation
//! 3. the process-wide fallback credential from static configuration
//!
//! Resolution never fails. When no tier supplies a credential the request is
//! forwarded unauthenticated and the backend decides whether to reject it.

use std::fmt;

use crate::context;

/// An opaque bearer token.
///
/// `Debug` and `Display` are redacted so a credential can sit inside spans,
/// error values, and request structs without leaking into logs.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Credential(String);

impl Credential {
    /// Wraps a raw token. Returns `None` for empty or whitespace-only input,
    /// which every tier treats as "no credential supplied".
    #[must_use]
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            None
        } else {
            Some(Self(token))
        }
    }

    /// Returns the raw token for building the `Authorization` header.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Formats the value of an `Authorization` header for this credential.
    #[must_use]
    pub fn bearer_header(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<redacted>")
    }
}

/// Which precedence tier supplied the resolved credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    /// Passed directly with the operation call.
    Explicit,
    /// Installed by the transport for the current invocation.
    Ambient,
    /// Process-wide default from configuration.
    Fallback,
    /// No tier supplied a credential.
    None,
}

impl CredentialSource {
    /// Stable lowercase label used in spans and metrics.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Explicit => "explicit",
            Self::Ambient => "ambient",
            Self::Fallback => "fallback",
            Self::None => "none",
        }
    }
}

/// Outcome of a resolution: the credential (if any) and the tier it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub credential: Option<Credential>,
    pub source: CredentialSource,
}

/// Resolves the credential for one invocation.
///
/// Holds only the immutable fallback; the ambient tier is read from the
/// task-local invocation context on every call, so a single resolver is
/// shared by all concurrent invocations without locking.
#[derive(Debug, Clone, Default)]
pub struct CredentialResolver {
    fallback: Option<Credential>,
}

impl CredentialResolver {
    /// Creates a resolver with the given process-wide fallback.
    #[must_use]
    pub fn new(fallback: Option<Credential>) -> Self {
        Self { fallback }
    }

    /// Picks the credential for the current invocation.
    #[must_use]
    pub fn resolve(&self, explicit: Option<Credential>) -> Resolved {
        self.resolve_with(explicit, context::current())
    }

    /// Precedence rule with the ambient tier supplied by the caller.
    ///
    /// Split out from [`resolve`](Self::resolve) so the rule can be exercised
    /// without installing a task-local scope.
    #[must_use]
    pub fn resolve_with(
        &self,
        explicit: Option<Credential>,
        ambient: Option<Credential>,
    ) -> Resolved {
        if let Some(credential) = explicit {
            return Resolved {
                credential: Some(credential),
                source: CredentialSource::Explicit,
            };
        }
        if let Some(credential) = ambient {
            return Resolved {
                credential: Some(credential),
                source: CredentialSource::Ambient,
            };
        }
        match &self.fallback {
            Some(credential) => Resolved {
                credential: Some(credential.clone()),
                source: CredentialSource::Fallback,
            },
            None => Resolved {
                credential: None,
                source: CredentialSource::None,
            },
        }
    }
}
