//! Route outcomes and their precedence.

use crate::payload::Payload;

/// Precedence between outcomes of different routes for one URI.
///
/// The order keeps the most specific knowledge about the request: an actual
/// match, then "this URI exists with another verb", then "this URI exists
/// with a trailing slash", then everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OutcomeRank {
    /// Not found, and any status without a dedicated rank.
    Unranked,
    TrailingSlashRedirect,
    MethodMismatch,
    Matched,
}

impl OutcomeRank {
    /// Rank carried by a response status.
    ///
    /// This precedence (200 > 405 > 303 > rest) looks arbitrary but callers
    /// rely on it; revisit together with them, not in isolation.
    pub fn for_status(code: u16) -> Self {
        match code {
            200 => OutcomeRank::Matched,
            405 => OutcomeRank::MethodMismatch,
            303 => OutcomeRank::TrailingSlashRedirect,
            _ => OutcomeRank::Unranked,
        }
    }
}

/// What one route makes of one request.
#[derive(Debug, Clone)]
pub enum RouteOutcome {
    /// URI and method matched; the handler produced this payload.
    Matched(Payload),
    /// The URI only matches with a trailing slash appended.
    TrailingSlashRedirect(String),
    /// The URI matched but the method did not.
    MethodNotAllowed,
    NotFound,
}

impl RouteOutcome {
    /// A matched route outranks everything, whatever status its handler chose.
    pub fn rank(&self) -> OutcomeRank {
        match self {
            RouteOutcome::Matched(_) => OutcomeRank::Matched,
            RouteOutcome::MethodNotAllowed => OutcomeRank::MethodMismatch,
            RouteOutcome::TrailingSlashRedirect(_) => OutcomeRank::TrailingSlashRedirect,
            RouteOutcome::NotFound => OutcomeRank::Unranked,
        }
    }

    /// Strictly better than `other`; ties keep the earlier outcome.
    pub fn is_better(&self, other: &RouteOutcome) -> bool {
        self.rank() != OutcomeRank::Unranked && self.rank() > other.rank()
    }

    pub fn into_payload(self) -> Payload {
        match self {
            RouteOutcome::Matched(payload) => payload,
            RouteOutcome::TrailingSlashRedirect(target) => Payload::see_other(&target),
            RouteOutcome::MethodNotAllowed => Payload::method_not_allowed(),
            RouteOutcome::NotFound => Payload::not_found(),
        }
    }
}
