//! In-memory collaborators.
//!
//! Each store wraps its data in a `parking_lot::RwLock`, so a single instance
//! can be shared across concurrent requests behind an `Arc`.

use parking_lot::RwLock;

use crate::error::StoreError;

use super::{
    hash_password, Ban, BanStore, PlayerDirectory, PlayerInfo, UserAccount, UserStore, WorldInfo,
    WorldState,
};

// =============================================================================
// Users
// =============================================================================

/// User accounts held in memory.
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    inner: RwLock<UserTable>,
}

#[derive(Debug, Default)]
struct UserTable {
    accounts: Vec<UserAccount>,
    next_id: i64,
}

impl MemoryUserStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an account, returning its id.
    pub fn add_user(&self, name: &str, password: &str, group: &str) -> Result<i64, StoreError> {
        let mut table = self.inner.write();
        if table.accounts.iter().any(|a| a.name == name) {
            return Err(StoreError::Conflict(format!("user {}", name)));
        }
        table.next_id += 1;
        let id = table.next_id;
        table.accounts.push(UserAccount {
            id,
            name: name.to_string(),
            group: group.to_string(),
            password_hash: hash_password(password),
        });
        Ok(id)
    }

    /// Builder-style [`add_user`](Self::add_user) for seeding.
    pub fn with_user(self, name: &str, password: &str, group: &str) -> Self {
        // Seeding ignores duplicates
        let _ = self.add_user(name, password, group);
        self
    }

    /// Number of accounts.
    pub fn len(&self) -> usize {
        self.inner.read().accounts.len()
    }

    /// Whether there are no accounts.
    pub fn is_empty(&self) -> bool {
        self.inner.read().accounts.is_empty()
    }

    fn update<F>(&self, name: &str, apply: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut UserAccount),
    {
        let mut table = self.inner.write();
        let account = table
            .accounts
            .iter_mut()
            .find(|a| a.name == name)
            .ok_or_else(|| StoreError::NotFound(format!("user {}", name)))?;
        apply(account);
        Ok(())
    }
}

impl UserStore for MemoryUserStore {
    fn get_user_by_name(&self, name: &str) -> Result<Option<UserAccount>, StoreError> {
        Ok(self
            .inner
            .read()
            .accounts
            .iter()
            .find(|a| a.name == name)
            .cloned())
    }

    fn set_user_password(&self, name: &str, password: &str) -> Result<(), StoreError> {
        let hash = hash_password(password);
        self.update(name, |account| account.password_hash = hash)
    }

    fn set_user_group(&self, name: &str, group: &str) -> Result<(), StoreError> {
        self.update(name, |account| account.group = group.to_string())
    }

    fn remove_user(&self, name: &str) -> Result<(), StoreError> {
        let mut table = self.inner.write();
        let before = table.accounts.len();
        table.accounts.retain(|a| a.name != name);
        if table.accounts.len() == before {
            return Err(StoreError::NotFound(format!("user {}", name)));
        }
        Ok(())
    }
}

// =============================================================================
// Bans
// =============================================================================

/// Bans held in memory.
#[derive(Debug, Default)]
pub struct MemoryBanStore {
    bans: RwLock<Vec<Ban>>,
}

impl MemoryBanStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all bans.
    pub fn bans(&self) -> Vec<Ban> {
        self.bans.read().clone()
    }
}

impl BanStore for MemoryBanStore {
    fn add_ban(&self, ip: &str, name: &str, reason: &str) -> Result<(), StoreError> {
        if ip.is_empty() && name.is_empty() {
            return Err(StoreError::Backend(
                "a ban needs an ip or a name".to_string(),
            ));
        }
        self.bans.write().push(Ban {
            ip: ip.to_string(),
            name: name.to_string(),
            reason: reason.to_string(),
        });
        Ok(())
    }

    fn get_ban_by_ip(&self, ip: &str) -> Result<Option<Ban>, StoreError> {
        Ok(self.bans.read().iter().find(|b| b.ip == ip).cloned())
    }

    fn get_ban_by_name(&self, name: &str) -> Result<Option<Ban>, StoreError> {
        Ok(self
            .bans
            .read()
            .iter()
            .find(|b| b.name.eq_ignore_ascii_case(name))
            .cloned())
    }

    fn remove_ban(&self, ban: &Ban) -> Result<(), StoreError> {
        let mut bans = self.bans.write();
        let position = bans
            .iter()
            .position(|b| b == ban)
            .ok_or_else(|| StoreError::NotFound("ban".to_string()))?;
        bans.remove(position);
        Ok(())
    }
}

// =============================================================================
// Players
// =============================================================================

/// Connected players held in memory.
#[derive(Debug, Default)]
pub struct MemoryPlayerDirectory {
    players: RwLock<Vec<PlayerInfo>>,
    kicks: RwLock<Vec<(String, String)>>,
}

impl MemoryPlayerDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Connect a player. The slot index is assigned from the current count.
    pub fn connect(&self, mut player: PlayerInfo) -> usize {
        let mut players = self.players.write();
        let index = players.iter().map(|p| p.index + 1).max().unwrap_or(0);
        player.index = index;
        players.push(player);
        index
    }

    /// Builder-style [`connect`](Self::connect) for seeding.
    pub fn with_player(self, player: PlayerInfo) -> Self {
        self.connect(player);
        self
    }

    /// `(player, reason)` for every kick so far.
    pub fn kicks(&self) -> Vec<(String, String)> {
        self.kicks.read().clone()
    }
}

impl PlayerDirectory for MemoryPlayerDirectory {
    fn active_players(&self) -> Vec<PlayerInfo> {
        self.players.read().clone()
    }

    fn find_players(&self, query: &str) -> Vec<PlayerInfo> {
        let players = self.players.read();

        if let Ok(index) = query.parse::<usize>() {
            if let Some(player) = players.iter().find(|p| p.index == index) {
                return vec![player.clone()];
            }
        }

        let wanted = query.to_lowercase();
        let mut found = Vec::new();
        for player in players.iter() {
            let name = player.name.to_lowercase();
            if name == wanted {
                return vec![player.clone()];
            }
            if name.starts_with(&wanted) {
                found.push(player.clone());
            }
        }
        found
    }

    fn kick(&self, player: &PlayerInfo, reason: &str) -> Result<(), StoreError> {
        let mut players = self.players.write();
        let position = players
            .iter()
            .position(|p| p.index == player.index)
            .ok_or_else(|| StoreError::NotFound(format!("player {}", player.name)))?;
        players.remove(position);
        self.kicks
            .write()
            .push((player.name.clone(), reason.to_string()));
        Ok(())
    }
}

// =============================================================================
// World
// =============================================================================

/// World state held in memory.
#[derive(Debug)]
pub struct MemoryWorld {
    info: RwLock<WorldInfo>,
    meteors: RwLock<u32>,
}

impl MemoryWorld {
    /// Create a world with the given name and size, at dawn.
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            info: RwLock::new(WorldInfo {
                name: name.into(),
                width,
                height,
                time: 0.0,
                day_time: true,
                blood_moon: false,
                invasion_size: 0,
            }),
            meteors: RwLock::new(0),
        }
    }

    /// Number of meteors dropped so far.
    pub fn meteor_count(&self) -> u32 {
        *self.meteors.read()
    }
}

impl WorldState for MemoryWorld {
    fn snapshot(&self) -> WorldInfo {
        self.info.read().clone()
    }

    fn drop_meteor(&self) -> Result<(), StoreError> {
        *self.meteors.write() += 1;
        Ok(())
    }

    fn set_blood_moon(&self, enabled: bool) {
        self.info.write().blood_moon = enabled;
    }
}

// =============================================================================
// Tests
// =============================================================================
