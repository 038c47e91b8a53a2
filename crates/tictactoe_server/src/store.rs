//! Session-scoped game storage.
//!
//! Every client session owns one [`GameStore`]. Stores are never shared
//! between sessions; the [`SessionManager`] only hands out the handle that
//! belongs to the presented session.

use crate::error::StoreError;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tictactoe_core::{Game, GameError, GameId, now_millis};
use tracing::{debug, info, instrument, warn};

/// Reserved identifier that reads every game in the session.
pub const ALL_GAMES: &str = "all";

/// Unique identifier for a client session.
pub type SessionId = String;

/// Result of a read.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Lookup {
    /// A single game.
    Game(Game),
    /// Every game in the session, keyed by id.
    All(BTreeMap<GameId, Game>),
}

/// Games belonging to one session.
///
/// Cloning yields another handle to the same games. Every operation takes the
/// session lock, so concurrent requests from one client never interleave.
#[derive(Debug, Clone, Default)]
pub struct GameStore {
    games: Arc<Mutex<HashMap<GameId, Game>>>,
}

impl GameStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<GameId, Game>> {
        // Entries are whole values, so a panicking holder cannot leave one half-written.
        self.games.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Creates and stores a new 3x3 game.
    #[instrument(skip(self))]
    pub fn create(&self) -> Game {
        self.insert_new(Game::new())
    }

    /// Creates and stores a new game with the given side length.
    #[instrument(skip(self))]
    pub fn create_with_dimension(&self, dimension: usize) -> Result<Game, GameError> {
        Ok(self.insert_new(Game::with_dimension(dimension)?))
    }

    fn insert_new(&self, game: Game) -> Game {
        self.lock().insert(game.id().clone(), game.clone());
        info!(game_id = %game.id(), dimension = game.dimension(), "Created game");
        game
    }

    /// Reads one game, or every game when `id` is [`ALL_GAMES`] in any case.
    #[instrument(skip(self))]
    pub fn get(&self, id: &str) -> Result<Lookup, StoreError> {
        if id.eq_ignore_ascii_case(ALL_GAMES) {
            return Ok(Lookup::All(self.all()));
        }
        self.game(id).map(Lookup::Game)
    }

    /// Reads one game.
    #[instrument(skip(self))]
    pub fn game(&self, id: &str) -> Result<Game, StoreError> {
        match self.lock().get(id) {
            Some(game) => Ok(game.clone()),
            None => {
                debug!(game_id = id, "Game not found");
                Err(StoreError::not_found(id))
            }
        }
    }

    /// Snapshot of every game.
    #[instrument(skip(self))]
    pub fn all(&self) -> BTreeMap<GameId, Game> {
        let games: BTreeMap<_, _> = self
            .lock()
            .iter()
            .map(|(id, game)| (id.clone(), game.clone()))
            .collect();
        debug!(count = games.len(), "Listed games");
        games
    }

    /// Overwrites the entry for `id` without validation.
    ///
    /// Callers must already have validated the transition; use
    /// [`advance`](Self::advance) to do both under one lock.
    #[instrument(skip(self, game))]
    pub fn put(&self, id: GameId, game: Game) {
        debug!(game_id = %id, "Game stored");
        self.lock().insert(id, game);
    }

    /// Removes the entry for `id`. Returns whether it existed.
    #[instrument(skip(self))]
    pub fn delete(&self, id: &str) -> bool {
        let removed = self.lock().remove(id).is_some();
        if removed {
            info!(game_id = id, "Deleted game");
        } else {
            debug!(game_id = id, "Delete of unknown game");
        }
        removed
    }

    /// Validates `proposed` against the stored game and persists it if legal.
    ///
    /// The stored game is left untouched on rejection.
    #[instrument(skip(self, proposed))]
    pub fn advance(&self, id: &str, proposed: Game) -> Result<Game, StoreError> {
        let mut games = self.lock();
        let current = games.get(id).ok_or_else(|| StoreError::not_found(id))?;
        let next = tictactoe_core::advance(current, proposed, now_millis())?;
        games.insert(next.id().clone(), next.clone());
        Ok(next)
    }

    /// Number of stored games.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// True when the session has no games.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

/// A session resolved for one request.
#[derive(Debug, Clone)]
pub struct Attached {
    /// Session identifier.
    pub id: SessionId,
    /// The session's games.
    pub games: GameStore,
    /// True when the session was created by this request.
    pub issued: bool,
}

#[derive(Debug)]
struct SessionEntry {
    games: GameStore,
    last_seen: Instant,
}

/// Manages all client sessions.
///
/// Every request without a live cookie registers a session, so the map is
/// bounded twice: idle entries expire after `ttl` and at most `max_sessions`
/// are held, the least recently seen being evicted first.
#[derive(Debug, Clone)]
pub struct SessionManager {
    sessions: Arc<Mutex<HashMap<SessionId, SessionEntry>>>,
    ttl: Duration,
    max_sessions: usize,
}

impl SessionManager {
    /// Creates a session manager whose sessions expire after `ttl` without use
    /// and which holds at most `max_sessions` at once.
    #[instrument]
    pub fn new(ttl: Duration, max_sessions: usize) -> Self {
        info!("Creating session manager");
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            ttl,
            max_sessions: max_sessions.max(1),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<SessionId, SessionEntry>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Resolves the session for a request.
    ///
    /// A live presented id is reused. Anything else, including ids this
    /// manager never issued, gets a fresh session. Expired sessions are
    /// purged first, and a full manager evicts before issuing.
    #[instrument(skip(self))]
    pub fn attach(&self, presented: Option<&str>) -> Attached {
        let now = Instant::now();
        let mut sessions = self.lock();

        let ttl = self.ttl;
        let before = sessions.len();
        sessions.retain(|_, entry| now.duration_since(entry.last_seen) < ttl);
        let expired = before - sessions.len();
        if expired > 0 {
            info!(expired, "Purged idle sessions");
        }

        if let Some(id) = presented
            && let Some(entry) = sessions.get_mut(id)
        {
            entry.last_seen = now;
            debug!(session_id = id, "Resumed session");
            return Attached {
                id: id.to_string(),
                games: entry.games.clone(),
                issued: false,
            };
        }

        if let Some(id) = presented {
            warn!(session_id = id, "Unknown or expired session presented");
        }

        while sessions.len() >= self.max_sessions {
            let Some(stale) = sessions
                .iter()
                .min_by_key(|(_, entry)| entry.last_seen)
                .map(|(id, _)| id.clone())
            else {
                break;
            };
            sessions.remove(&stale);
            warn!(session_id = %stale, "Session limit reached, evicted least recently seen");
        }

        let id = uuid::Uuid::new_v4().to_string();
        let games = GameStore::new();
        sessions.insert(
            id.clone(),
            SessionEntry {
                games: games.clone(),
                last_seen: now,
            },
        );
        info!(session_id = %id, "Issued new session");
        Attached {
            id,
            games,
            issued: true,
        }
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// True when there are no live sessions.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
