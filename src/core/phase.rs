/// The election state machine's phases.
///
/// `Decided` is terminal for a round but revocable: a `LeaderLost` event
/// drives it back to `Electing` so a future liveness monitor can re-arm the
/// protocol without touching the state machine itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElectionPhase {
    /// Before the first broadcast.
    Idle,
    /// Actively comparing and propagating candidacies.
    Electing,
    /// Result published (or observed); broadcasting stopped.
    Decided,
}

impl ElectionPhase {
    pub fn is_decided(&self) -> bool {
        matches!(self, ElectionPhase::Decided)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ElectionPhase::Idle => "idle",
            ElectionPhase::Electing => "electing",
            ElectionPhase::Decided => "decided",
        }
    }
}
