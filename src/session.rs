//! The single shared puzzle instance.

use crate::grid::Grid;

/// Lifecycle phase of the room's puzzle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No puzzle yet; fewer than two participants have been present.
    Waiting,
    /// A puzzle has been generated and distributed.
    Active,
}

/// The one game instance shared by every participant.
///
/// The session never returns to [`SessionPhase::Waiting`] on its own; only a
/// process restart resets it.
pub struct Session {
    phase: SessionPhase,
    puzzle: Option<Grid>,
    solution: Option<Grid>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            phase: SessionPhase::Waiting,
            puzzle: None,
            solution: None,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn puzzle(&self) -> Option<&Grid> {
        self.puzzle.as_ref()
    }

    /// The canonical solved grid submissions are checked against.
    pub fn solution(&self) -> Option<&Grid> {
        self.solution.as_ref()
    }

    /// Install a freshly generated puzzle/solution pair and mark the session
    /// active. Any previous pair is replaced wholesale, never edited.
    pub fn install(&mut self, puzzle: Grid, solution: Grid) {
        self.puzzle = Some(puzzle);
        self.solution = Some(solution);
        self.phase = SessionPhase::Active;
    }

    /// Whether `proposed` matches the canonical solution exactly — full
    /// structural equality, no partial credit. `None` while no puzzle has
    /// been generated.
    pub fn check(&self, proposed: &Grid) -> Option<bool> {
        self.solution.as_ref().map(|solution| solution == proposed)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(v: u8) -> Grid {
        Grid::new(vec![vec![Some(v)]])
    }

    #[test]
    fn starts_waiting_with_no_grids() {
        let session = Session::new();
        assert_eq!(session.phase(), SessionPhase::Waiting);
        assert!(session.puzzle().is_none());
        assert!(session.solution().is_none());
        assert_eq!(session.check(&grid(1)), None);
    }

    #[test]
    fn install_activates_and_sets_canonical_grid() {
        let mut session = Session::new();
        session.install(grid(1), grid(2));

        assert_eq!(session.phase(), SessionPhase::Active);
        assert_eq!(session.check(&grid(2)), Some(true));
        assert_eq!(session.check(&grid(3)), Some(false));
    }

    #[test]
    fn reinstall_replaces_the_pair_wholesale() {
        let mut session = Session::new();
        session.install(grid(1), grid(2));
        session.install(grid(8), grid(9));

        assert_eq!(session.puzzle(), Some(&grid(8)));
        assert_eq!(session.check(&grid(2)), Some(false));
        assert_eq!(session.check(&grid(9)), Some(true));
        assert_eq!(session.phase(), SessionPhase::Active);
    }
}
