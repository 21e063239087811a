/// Page state definitions for tracking crawl progress
///
/// Lifecycle of a URL within one crawl session:
///
/// ```text
/// Discovered -> Queued -> Visited
///     |           |
///     +-----------+-----> Rejected
/// ```
use crate::{Result, SearchError};
use std::fmt;

/// Represents the current state of a page in the crawl process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageState {
    /// Seen as a link target but not admitted to the frontier
    Discovered,

    /// Admitted to the frontier and waiting for a worker (or being fetched)
    Queued,

    /// A fetch was attempted; terminal whether or not it succeeded
    Visited,

    /// Dropped by policy; never attempted again
    Rejected,
}

/// Why a URL was moved to [`PageState::Rejected`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectReason {
    /// The URL failed normalization
    Normalization,
    /// robots.txt disallows the URL
    Robots,
    /// The page budget was exhausted when the URL was found
    Budget,
}

impl PageState {
    /// Returns true if this is a terminal state (no further processing needed)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Visited | Self::Rejected)
    }

    /// Returns true if `next` is a legal successor of this state
    pub fn can_transition_to(&self, next: PageState) -> bool {
        matches!(
            (self, next),
            (Self::Discovered, Self::Queued)
                | (Self::Discovered, Self::Rejected)
                | (Self::Queued, Self::Visited)
                | (Self::Queued, Self::Rejected)
        )
    }

    /// Validates a transition, returning the new state
    ///
    /// # Errors
    ///
    /// Returns `SearchError::InvalidTransition` for any move the lifecycle
    /// does not allow, including leaving a terminal state.
    pub fn transition(self, next: PageState) -> Result<PageState> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(SearchError::InvalidTransition {
                from: self,
                to: next,
            })
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Discovered => "discovered",
            Self::Queued => "queued",
            Self::Visited => "visited",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Normalization => "normalization",
            Self::Robots => "robots",
            Self::Budget => "budget",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_terminal() {
        assert!(!PageState::Discovered.is_terminal());
        assert!(!PageState::Queued.is_terminal());
        assert!(PageState::Visited.is_terminal());
        assert!(PageState::Rejected.is_terminal());
    }

    #[test]
    fn test_legal_transitions() {
        assert_eq!(
            PageState::Discovered.transition(PageState::Queued).unwrap(),
            PageState::Queued
        );
        assert_eq!(
            PageState::Queued.transition(PageState::Visited).unwrap(),
            PageState::Visited
        );
        assert!(PageState::Discovered
            .transition(PageState::Rejected)
            .is_ok());
        assert!(PageState::Queued.transition(PageState::Rejected).is_ok());
    }

    #[test]
    fn test_terminal_states_cannot_move() {
        for next in [
            PageState::Discovered,
            PageState::Queued,
            PageState::Visited,
            PageState::Rejected,
        ] {
            assert!(PageState::Visited.transition(next).is_err());
            assert!(PageState::Rejected.transition(next).is_err());
        }
    }

    #[test]
    fn test_cannot_skip_queue() {
        let err = PageState::Discovered
            .transition(PageState::Visited)
            .unwrap_err();
        assert!(matches!(
            err,
            SearchError::InvalidTransition {
                from: PageState::Discovered,
                to: PageState::Visited
            }
        ));
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", PageState::Discovered), "discovered");
        assert_eq!(format!("{}", PageState::Visited), "visited");
        assert_eq!(format!("{}", RejectReason::Robots), "robots");
    }
}
