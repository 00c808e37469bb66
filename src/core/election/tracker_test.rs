use super::*;
use crate::Criteria;
use crate::Params;

fn concession_to(
    winner: u32,
    sender: u32,
) -> Criteria {
    Criteria {
        sender_id: sender,
        params: Params {
            master_id: winner,
            age: u64::from(winner),
        },
    }
}

/// # Case 1: unanimity termination
///
/// Fixed membership of 3 peers. Once both non-leader peers have relayed a
/// claim naming this peer, the tracker reports done with this peer as
/// winner.
#[test]
fn test_unanimity_reports_done_with_self_as_winner() {
    let mut tracker = StopConditionTracker::new(7);
    let members = [3, 7, 2];

    let t = tracker.update(&concession_to(7, 3), &members);
    assert!(!t.done);
    assert_eq!(t.winner, None);
    assert_eq!(tracker.voter_count(), 1);

    let t = tracker.update(&concession_to(7, 2), &members);
    assert!(t.done);
    assert_eq!(t.winner, Some(7));
    assert_eq!(tracker.voter_count(), 2);
}

/// # Case 2: monotonic voter set
///
/// ## Validation criteria:
/// 1. The voter count never decreases
/// 2. Duplicate concessions from the same sender are not double counted
/// 3. The count never exceeds the number of other known peers
#[test]
fn test_voter_set_is_monotonic_and_deduplicated() {
    let mut tracker = StopConditionTracker::new(7);
    let members = [3, 7, 2];

    tracker.update(&concession_to(7, 3), &members);
    assert_eq!(tracker.voter_count(), 1);

    tracker.update(&concession_to(7, 3), &members);
    assert_eq!(tracker.voter_count(), 1);

    // a claim for someone else never shrinks the set
    tracker.update(&concession_to(3, 2), &members);
    assert_eq!(tracker.voter_count(), 1);

    tracker.update(&concession_to(7, 2), &members);
    assert_eq!(tracker.voter_count(), 2);
    assert!(tracker.voter_count() <= members.iter().filter(|m| **m != 7).count());
}

/// # Case 3: self-echo immunity
///
/// A criteria whose sender is this peer never becomes a voter, even when it
/// names this peer as leader.
#[test]
fn test_own_relay_is_not_a_concession() {
    let mut tracker = StopConditionTracker::new(7);
    let members = [3, 7];

    let t = tracker.update(&concession_to(7, 7), &members);
    assert_eq!(tracker.voter_count(), 0);
    assert!(!t.done);
}

/// # Case 4: others-count is recomputed at tally time
///
/// A registry that grows mid-round pushes the finish line out instead of
/// being compared against a stale cached count.
#[test]
fn test_membership_growth_is_reevaluated() {
    let mut tracker = StopConditionTracker::new(7);

    let t = tracker.update(&concession_to(7, 3), &[3, 7]);
    assert!(t.done);

    // peer 2 registered after the first tally
    let t = tracker.update(&concession_to(3, 3), &[3, 7, 2]);
    assert!(!t.done);

    let t = tracker.update(&concession_to(7, 2), &[3, 7, 2]);
    assert!(t.done);
    assert_eq!(t.winner, Some(7));
}

/// # Case 5: reset forgets all concessions
#[test]
fn test_reset_clears_voters() {
    let mut tracker = StopConditionTracker::new(7);
    let members = [3, 7, 2];

    tracker.update(&concession_to(7, 3), &members);
    tracker.update(&concession_to(7, 2), &members);
    assert_eq!(tracker.voter_count(), 2);

    tracker.reset();
    assert_eq!(tracker.voter_count(), 0);
    assert!(!tracker.update(&concession_to(7, 3), &members).done);
}
