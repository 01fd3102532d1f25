//! Domain collaborators the built-in commands call into.
//!
//! The REST engine does not own user accounts, bans, connected players or
//! world state. Commands reach them through these traits, so a deployment can
//! back them with a database or a live game server. [`memory`] provides
//! thread-safe in-memory implementations for the bundled binary and tests.
//!
//! All methods are synchronous from the caller's point of view.

pub mod memory;

use sha2::{Digest, Sha256};

use crate::error::StoreError;

pub use memory::{MemoryBanStore, MemoryPlayerDirectory, MemoryUserStore, MemoryWorld};

// =============================================================================
// Users
// =============================================================================

/// A registered user account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    /// Numeric account id
    pub id: i64,

    /// Account name, unique
    pub name: String,

    /// Permission group
    pub group: String,

    /// Hex-encoded SHA-256 of the password
    pub password_hash: String,
}

/// Persistent user accounts.
pub trait UserStore: Send + Sync {
    /// Look up an account by name. `Ok(None)` when it does not exist.
    fn get_user_by_name(&self, name: &str) -> Result<Option<UserAccount>, StoreError>;

    /// Replace the account's password. Fails when the user does not exist.
    fn set_user_password(&self, name: &str, password: &str) -> Result<(), StoreError>;

    /// Move the account to another group. Fails when the user does not exist.
    fn set_user_group(&self, name: &str, group: &str) -> Result<(), StoreError>;

    /// Delete the account. Fails when the user does not exist.
    fn remove_user(&self, name: &str) -> Result<(), StoreError>;
}

/// Hash a password the way [`UserAccount::password_hash`] stores it.
pub fn hash_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

// =============================================================================
// Bans
// =============================================================================

/// A ban entry. Either `ip` or `name` may be empty, not both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ban {
    pub ip: String,
    pub name: String,
    pub reason: String,
}

/// Persistent bans.
pub trait BanStore: Send + Sync {
    /// Add a ban.
    fn add_ban(&self, ip: &str, name: &str, reason: &str) -> Result<(), StoreError>;

    /// First ban matching the IP exactly.
    fn get_ban_by_ip(&self, ip: &str) -> Result<Option<Ban>, StoreError>;

    /// First ban matching the name (case-insensitive).
    fn get_ban_by_name(&self, name: &str) -> Result<Option<Ban>, StoreError>;

    /// Remove a ban previously returned by a lookup.
    fn remove_ban(&self, ban: &Ban) -> Result<(), StoreError>;
}

// =============================================================================
// Players
// =============================================================================

/// A connected player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerInfo {
    /// Slot index on the server
    pub index: usize,

    /// Character name
    pub name: String,

    /// Logged-in account, if any
    pub account_name: Option<String>,

    pub ip: String,
    pub group: String,
    pub tile_x: i32,
    pub tile_y: i32,

    /// Names of active inventory items
    pub inventory: Vec<String>,

    /// Active buff ids
    pub buffs: Vec<i32>,
}

/// Players currently connected.
pub trait PlayerDirectory: Send + Sync {
    /// All active players in slot order.
    fn active_players(&self) -> Vec<PlayerInfo>;

    /// Players matching a query.
    ///
    /// A numeric query selects that slot. Otherwise an exact
    /// (case-insensitive) name match returns just that player, and failing
    /// that every player whose name starts with the query is returned.
    fn find_players(&self, query: &str) -> Vec<PlayerInfo>;

    /// Disconnect a player.
    fn kick(&self, player: &PlayerInfo, reason: &str) -> Result<(), StoreError>;
}

// =============================================================================
// World
// =============================================================================

/// A point-in-time view of the world.
#[derive(Debug, Clone, PartialEq)]
pub struct WorldInfo {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub time: f64,
    pub day_time: bool,
    pub blood_moon: bool,
    pub invasion_size: i32,
}

/// Mutable world state.
pub trait WorldState: Send + Sync {
    /// Current world state.
    fn snapshot(&self) -> WorldInfo;

    /// Spawn a meteor somewhere in the world.
    fn drop_meteor(&self) -> Result<(), StoreError>;

    /// Start or stop a blood moon.
    fn set_blood_moon(&self, enabled: bool);
}
