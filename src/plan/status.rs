//! Consumption plan status state machine.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    Pending,
    InProgress,
    Testing,
    Review,
    Done,
    Blocked,
}

impl PlanStatus {
    #[allow(dead_code)]
    pub const ALL: [PlanStatus; 6] = [
        PlanStatus::Pending,
        PlanStatus::InProgress,
        PlanStatus::Testing,
        PlanStatus::Review,
        PlanStatus::Done,
        PlanStatus::Blocked,
    ];

    pub fn allowed_transitions(self) -> &'static [PlanStatus] {
        match self {
            PlanStatus::Pending => &[PlanStatus::InProgress, PlanStatus::Blocked],
            PlanStatus::InProgress => {
                &[PlanStatus::Testing, PlanStatus::Blocked, PlanStatus::Done]
            }
            PlanStatus::Testing => &[
                PlanStatus::Review,
                PlanStatus::InProgress,
                PlanStatus::Blocked,
            ],
            PlanStatus::Review => &[
                PlanStatus::Done,
                PlanStatus::InProgress,
                PlanStatus::Blocked,
            ],
            PlanStatus::Done => &[],
            PlanStatus::Blocked => &[PlanStatus::InProgress, PlanStatus::Pending],
        }
    }
}

impl std::fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlanStatus::Pending => write!(f, "pending"),
            PlanStatus::InProgress => write!(f, "in_progress"),
            PlanStatus::Testing => write!(f, "testing"),
            PlanStatus::Review => write!(f, "review"),
            PlanStatus::Done => write!(f, "done"),
            PlanStatus::Blocked => write!(f, "blocked"),
        }
    }
}

impl FromStr for PlanStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(PlanStatus::Pending),
            "in_progress" => Ok(PlanStatus::InProgress),
            "testing" => Ok(PlanStatus::Testing),
            "review" => Ok(PlanStatus::Review),
            "done" => Ok(PlanStatus::Done),
            "blocked" => Ok(PlanStatus::Blocked),
            _ => Err(()),
        }
    }
}

/// Pure membership check against the transition table. Unlike the
/// handoff-level check, identity moves are not implicitly legal here;
/// the table is authoritative for all ordered pairs.
pub fn is_valid_transition(from: PlanStatus, to: PlanStatus) -> bool {
    from.allowed_transitions().contains(&to)
}

/// Derive plan status from completion counts. Pure and idempotent.
/// Full completion lands in `testing`, never directly in `done`; a
/// human or CI action is required to advance past testing.
pub fn calculate_auto_status(total: usize, done: usize) -> PlanStatus {
    if done == 0 {
        PlanStatus::Pending
    } else if done < total {
        PlanStatus::InProgress
    } else {
        PlanStatus::Testing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_table_all_pairs() {
        use PlanStatus::*;
        let legal: [(PlanStatus, PlanStatus); 13] = [
            (Pending, InProgress),
            (Pending, Blocked),
            (InProgress, Testing),
            (InProgress, Blocked),
            (InProgress, Done),
            (Testing, Review),
            (Testing, InProgress),
            (Testing, Blocked),
            (Review, Done),
            (Review, InProgress),
            (Review, Blocked),
            (Blocked, InProgress),
            (Blocked, Pending),
        ];

        for from in PlanStatus::ALL {
            for to in PlanStatus::ALL {
                let expected = legal.contains(&(from, to));
                assert_eq!(
                    is_valid_transition(from, to),
                    expected,
                    "transition {} -> {}",
                    from,
                    to
                );
            }
        }
    }

    #[test]
    fn test_done_is_terminal() {
        for to in PlanStatus::ALL {
            assert!(!is_valid_transition(PlanStatus::Done, to));
        }
    }

    #[test]
    fn test_auto_status_zero_done_is_pending() {
        assert_eq!(calculate_auto_status(5, 0), PlanStatus::Pending);
        assert_eq!(calculate_auto_status(0, 0), PlanStatus::Pending);
    }

    #[test]
    fn test_auto_status_partial_is_in_progress() {
        assert_eq!(calculate_auto_status(5, 1), PlanStatus::InProgress);
        assert_eq!(calculate_auto_status(5, 4), PlanStatus::InProgress);
    }

    #[test]
    fn test_auto_status_full_completion_lands_in_testing() {
        assert_eq!(calculate_auto_status(5, 5), PlanStatus::Testing);
        assert_eq!(calculate_auto_status(1, 1), PlanStatus::Testing);
    }

    #[test]
    fn test_auto_status_is_idempotent() {
        for total in 0..4usize {
            for done in 0..=total {
                assert_eq!(
                    calculate_auto_status(total, done),
                    calculate_auto_status(total, done)
                );
            }
        }
    }
}
