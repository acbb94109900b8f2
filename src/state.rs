//! Shared coordinator state and the session state machine.

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::broadcast;
use crate::config::ServerConfig;
use crate::engine::{EngineError, PuzzleEngine};
use crate::grid::Grid;
use crate::keepalive;
use crate::protocol::ServerMessage;
use crate::registry::{ConnectionId, ConnectionRegistry, ConnectionSender};
use crate::session::{Session, SessionPhase};

/// Everything the coordinator may mutate, behind one lock.
///
/// Connection events are processed strictly one at a time, so two
/// registrations crossing the two-participant threshold can never race into
/// a double generation, and broadcasts are totally ordered.
pub struct Coordinator {
    pub registry: ConnectionRegistry,
    pub session: Session,
}

/// Shared application state
pub struct AppState {
    coord: Mutex<Coordinator>,
    engine: Arc<dyn PuzzleEngine>,
    pub config: ServerConfig,
}

impl AppState {
    pub fn new(engine: Arc<dyn PuzzleEngine>, config: ServerConfig) -> Self {
        Self {
            coord: Mutex::new(Coordinator {
                registry: ConnectionRegistry::new(),
                session: Session::new(),
            }),
            engine,
            config,
        }
    }

    /// Register a new participant and run the transition rule: once two or
    /// more participants are connected, a fresh puzzle is generated and
    /// broadcast to everyone — including connections registered before this
    /// one, and regardless of any puzzle already in play.
    pub async fn register_connection(&self, sender: ConnectionSender) -> ConnectionId {
        let mut coord = self.coord.lock().await;
        let id = coord.registry.register(sender.clone());
        let probe = keepalive::spawn(sender, self.config.keepalive_interval);
        coord.registry.attach_keepalive(&id, probe);
        tracing::info!(
            connection = %id,
            participants = coord.registry.count(),
            "connection registered"
        );

        if coord.registry.count() >= 2 {
            match self.new_puzzle().await {
                Ok((puzzle, solution)) => {
                    let message = ServerMessage::Puzzle(puzzle.clone());
                    coord.session.install(puzzle, solution);
                    broadcast::broadcast(&mut coord.registry, &message);
                    tracing::info!("new puzzle generated and distributed");
                }
                Err(e) => {
                    tracing::warn!("puzzle generation failed, keeping previous session: {e}");
                }
            }
        }

        id
    }

    /// Drop a participant. Its keepalive stops and it no longer appears in
    /// broadcasts; the session itself is untouched.
    pub async fn unregister_connection(&self, id: &str) {
        let mut coord = self.coord.lock().await;
        coord.registry.unregister(id);
        tracing::info!(
            connection = %id,
            participants = coord.registry.count(),
            "connection closed"
        );
    }

    /// Handle a decoded submission: remember the sender's display name,
    /// judge the proposed grid against the canonical solution, and announce
    /// the outcome to every participant. Every submission produces a
    /// broadcast, win or not.
    pub async fn handle_submission(&self, id: &str, username: String, proposed: Grid) {
        let mut coord = self.coord.lock().await;
        coord.registry.set_display_name(id, &username);

        let Some(is_winner) = coord.session.check(&proposed) else {
            tracing::debug!(
                connection = %id,
                "submission arrived before any puzzle was generated, ignoring"
            );
            return;
        };

        tracing::info!(connection = %id, username = %username, is_winner, "submission judged");
        let message = ServerMessage::Result {
            username,
            is_winner,
        };
        broadcast::broadcast(&mut coord.registry, &message);
    }

    pub async fn participant_count(&self) -> usize {
        self.coord.lock().await.registry.count()
    }

    pub async fn session_phase(&self) -> SessionPhase {
        self.coord.lock().await.session.phase()
    }

    /// Run generate + solve on the blocking pool under a generous timeout,
    /// so a stalled engine fails the attempt instead of hanging the
    /// coordinator. Keepalive probes keep flowing either way; they only use
    /// their own channel ends.
    async fn new_puzzle(&self) -> Result<(Grid, Grid), EngineError> {
        let engine = Arc::clone(&self.engine);
        let attempt = tokio::task::spawn_blocking(move || {
            let puzzle = engine.generate()?;
            let solution = engine.solve(&puzzle)?;
            Ok((puzzle, solution))
        });

        match tokio::time::timeout(self.config.engine_timeout, attempt).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_err)) => Err(EngineError::Task(join_err.to_string())),
            Err(_) => Err(EngineError::Timeout(self.config.engine_timeout)),
        }
    }
}
