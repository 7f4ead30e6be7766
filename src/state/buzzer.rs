/// One-shot expiry signal for a single countdown cycle.
///
/// A controller starts `Armed`; the first zero sample dispatches the expiry
/// action and moves it to `Fired`. Only [`BuzzerController::rearm`], called by
/// the owning clock on start/resume/reset, brings it back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuzzerController {
    /// Waiting for the clock to reach zero.
    #[default]
    Armed,
    /// Already sounded in this cycle.
    Fired,
}

impl BuzzerController {
    /// Dispatch once when `remaining_ms` has reached zero.
    ///
    /// Returns `true` when `dispatch` was invoked by this call.
    pub fn check_and_fire<F>(&mut self, remaining_ms: u64, dispatch: F) -> bool
    where
        F: FnOnce(),
    {
        if remaining_ms > 0 || *self == Self::Fired {
            return false;
        }

        dispatch();
        *self = Self::Fired;
        true
    }

    /// Start a new cycle.
    pub fn rearm(&mut self) {
        *self = Self::Armed;
    }

    /// Whether the expiry was dispatched in this cycle.
    pub fn has_fired(&self) -> bool {
        *self == Self::Fired
    }
}
