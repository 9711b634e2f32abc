use serde::Serialize;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    Allow,
    Deny,
}

/// Why a request was denied. Internal only; never sent to the caller.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialKind {
    /// Route template is missing from the route table.
    Unclassified,
    /// The resource kind has no rule for this method.
    NoRule,
    /// The rule needs a caller identity and none was resolved.
    Unauthenticated,
    /// Identity resolved, rule predicate failed.
    InsufficientPrivilege,
    /// A collaborator lookup failed while evaluating.
    CollaboratorFailure,
}

/// Terminal value of the policy evaluator.
///
/// Request-scoped: logged at the boundary, never persisted or cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Decision {
    pub outcome: Outcome,
    pub reason: String,
    pub denial: Option<DenialKind>,
}

impl Decision {
    pub fn allow(reason: impl Into<String>) -> Self {
        Self {
            outcome: Outcome::Allow,
            reason: reason.into(),
            denial: None,
        }
    }

    pub fn deny(kind: DenialKind, reason: impl Into<String>) -> Self {
        Self {
            outcome: Outcome::Deny,
            reason: reason.into(),
            denial: Some(kind),
        }
    }

    pub fn is_allowed(&self) -> bool {
        self.outcome == Outcome::Allow
    }

    pub fn is_internal_error(&self) -> bool {
        self.denial == Some(DenialKind::CollaboratorFailure)
    }
}
