//! Table state types.

/// Round state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    /// Accepting players and bets.
    Forming,
    /// Dealer dealt; naturals are being paid.
    NaturalCheck,
    /// Waiting for player actions.
    PlayerTurns,
    /// Dealer plays out their hand and hands are settled.
    DealerResolution,
    /// Round is over. Terminal; the table is retired.
    Finished,
}

/// Represents the current turn position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TurnPosition {
    /// Index into the players list (join order).
    pub player_index: usize,
    /// Index into that player's hands.
    pub hand_index: usize,
}
