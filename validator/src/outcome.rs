use common::TransportError;

/// What a single range query told us.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    Found,
    NotFound,
    TransportError(TransportError),
}

/// What to do when the range service can't be reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// availability first: an unverifiable password passes
    Open,
    /// security first: an unverifiable password is rejected
    Closed,
}

impl FailurePolicy {
    pub fn from_fail_safe(fail_safe: bool) -> Self {
        if fail_safe { Self::Open } else { Self::Closed }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Valid,
    Invalid,
    Unavailable,
}

pub fn resolve(outcome: &LookupOutcome, policy: FailurePolicy) -> Resolution {
    match (outcome, policy) {
        (LookupOutcome::Found, _) => Resolution::Invalid,
        (LookupOutcome::NotFound, _) => Resolution::Valid,
        (LookupOutcome::TransportError(_), FailurePolicy::Open) => Resolution::Valid,
        (LookupOutcome::TransportError(_), FailurePolicy::Closed) => Resolution::Unavailable,
    }
}
