mod election;
mod event;
mod phase;

pub use election::*;
pub use event::*;
pub use phase::*;

use crate::Params;

/// The "who wins" rule: ranks two candidacy claims by priority.
///
/// Ties favor the locally held claim (`>=`, not `>`). This deliberate
/// tie-break toward self-retention avoids churn when ages coincide, which
/// happens whenever identifiers collide in range, since `age` is simply the
/// identifier.
pub fn is_better_or_equal(
    mine: &Params,
    theirs: &Params,
) -> bool {
    mine.age >= theirs.age
}
