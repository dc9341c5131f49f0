use std::collections::HashMap;
use std::sync::RwLock;

use anyhow::{Context, Result, anyhow};
use pokearena_battle::{BattleError, BattleSession};

use crate::source::UserId;

/// Opaque session key (the cookie value)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

/// Everything kept per session
#[derive(Debug, Clone, Default)]
pub struct SessionRecord {
    pub user: Option<UserId>,
    pub battle: BattleSession,
}

/// Session-scoped state, keyed by session id.
///
/// Each session's battle is only touched by that session's requests.
pub struct SessionStore {
    sessions: RwLock<HashMap<SessionId, SessionRecord>>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Attach a user to a session, creating it if needed
    pub fn login(&self, id: &SessionId, user: UserId) -> Result<()> {
        let mut sessions = self.write()?;
        sessions.entry(id.clone()).or_default().user = Some(user);
        Ok(())
    }

    /// Destroy a session and any battle it held
    pub fn logout(&self, id: &SessionId) -> Result<bool> {
        Ok(self.write()?.remove(id).is_some())
    }

    /// The logged-in user, or `BattleError::Unauthenticated`
    pub fn require_user(&self, id: &SessionId) -> Result<UserId> {
        self.read()?
            .get(id)
            .and_then(|record| record.user)
            .ok_or_else(|| BattleError::Unauthenticated.into())
    }

    /// Run `f` against an authenticated session's battle
    pub fn with_battle<T>(&self, id: &SessionId, f: impl FnOnce(&mut BattleSession) -> T) -> Result<T> {
        let mut sessions = self.write()?;
        let record = sessions
            .get_mut(id)
            .filter(|record| record.user.is_some())
            .ok_or(BattleError::Unauthenticated)?;
        Ok(f(&mut record.battle))
    }

    /// JSON of the running battle, for persisting by session key
    pub fn export_battle(&self, id: &SessionId) -> Result<Option<String>> {
        let sessions = self.read()?;
        let Some(state) = sessions.get(id).and_then(|record| record.battle.state()) else {
            return Ok(None);
        };
        let json = serde_json::to_string(state).context("Failed to serialize battle state")?;
        Ok(Some(json))
    }

    pub fn len(&self) -> usize {
        self.sessions.read().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, HashMap<SessionId, SessionRecord>>> {
        self.sessions
            .read()
            .map_err(|_| anyhow!("Session store lock poisoned"))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, HashMap<SessionId, SessionRecord>>> {
        self.sessions
            .write()
            .map_err(|_| anyhow!("Session store lock poisoned"))
    }
}
