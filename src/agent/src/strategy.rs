use common::model::{
    game::{Move, PlayerId},
    history::History,
};
use rand::{rngs::SmallRng, Rng, SeedableRng};

/// Picks a move for the next round given every round committed so far.
pub trait Strategy: Send {
    fn make_move(&mut self, history: &History) -> Move;
}

impl<S: Strategy + ?Sized> Strategy for Box<S> {
    fn make_move(&mut self, history: &History) -> Move {
        (**self).make_move(history)
    }
}

// Trivial strategies
pub struct FixedMove(pub Move);
impl Strategy for FixedMove {
    fn make_move(&mut self, _: &History) -> Move {
        self.0
    }
}

/// Plays `moves` in order, starting over once exhausted.
pub struct ScriptedMoves {
    moves: Vec<Move>,
    next: usize,
}
impl ScriptedMoves {
    pub fn new(moves: Vec<Move>) -> Self {
        ScriptedMoves { moves, next: 0 }
    }
}
impl Strategy for ScriptedMoves {
    fn make_move(&mut self, _: &History) -> Move {
        let Some(next_move) = self.moves.get(self.next).copied() else {
            return Move::Unknown;
        };
        self.next = (self.next + 1) % self.moves.len();
        next_move
    }
}

// Random
pub struct RandomMove<R = SmallRng> {
    rng: R,
}
impl<R: Rng> RandomMove<R> {
    pub fn new(rng: R) -> Self {
        RandomMove { rng }
    }
}
impl RandomMove<SmallRng> {
    pub fn seeded(seed: u64) -> Self {
        RandomMove::new(SmallRng::seed_from_u64(seed))
    }
}
impl<R: Rng + Send> Strategy for RandomMove<R> {
    fn make_move(&mut self, _: &History) -> Move {
        Move::PLAYABLE[self.rng.random_range(0..Move::PLAYABLE.len())]
    }
}

/// Replays whatever `opponent` played last round. Everything it needs comes
/// from the history argument, so it keeps no memory between calls.
pub struct MirrorOpponent {
    opponent: PlayerId,
    opening: Move,
}
impl MirrorOpponent {
    pub fn new(opponent: PlayerId, opening: Move) -> Self {
        MirrorOpponent { opponent, opening }
    }
}
impl Default for MirrorOpponent {
    fn default() -> Self {
        MirrorOpponent::new(PlayerId::Player1, Move::Rock)
    }
}
impl Strategy for MirrorOpponent {
    fn make_move(&mut self, history: &History) -> Move {
        history
            .last()
            .map(|round| round.inputs.get(self.opponent))
            .unwrap_or(self.opening)
    }
}
