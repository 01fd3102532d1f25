//! Built-in REST commands.
//!
//! # Endpoints
//!
//! ```text
//! /status                      server name, port and players (open)
//! /tokentest                   token check
//! /users/read/{user}/info      account group and id
//! /users/destroy/{user}        delete an account
//! /users/update/{user}         change password and/or group
//! /users/activelist            account names of connected players
//! /bans/create                 add a ban by ip and/or name
//! /bans/read/{user}/info       ban details, ?type=ip|name
//! /bans/destroy/{user}         remove a ban, ?type=ip|name
//! /lists/players               connected player names
//! /world/read                  world summary
//! /world/meteor                drop a meteor
//! /world/bloodmoon/{bool}      toggle the blood moon
//! /players/read/{player}       player details
//! /players/{player}/kick       kick, optional ?reason=
//! /players/{player}/ban        ban and kick, optional ?reason=
//! ```
//!
//! Every handler is a plain function taking the shared [`CommandContext`];
//! [`register_commands`] binds them to their templates in the order above.

mod bans;
mod players;
mod status;
mod users;
mod world;

use std::sync::Arc;

use crate::error::{CommandError, TemplateError};
use crate::rest::{CommandResult, ParameterView, RestCommand, RestHandler, RestVerbs, RouteRegistry};
use crate::store::{BanStore, PlayerDirectory, PlayerInfo, UserStore, WorldState};

// =============================================================================
// Context
// =============================================================================

/// Identity of the game server the commands report on.
#[derive(Debug, Clone)]
pub struct ServerInfo {
    /// Display name
    pub name: String,

    /// Game port
    pub port: u16,
}

/// Collaborators shared by every built-in command.
#[derive(Clone)]
pub struct CommandContext {
    pub server: ServerInfo,
    pub users: Arc<dyn UserStore>,
    pub bans: Arc<dyn BanStore>,
    pub players: Arc<dyn PlayerDirectory>,
    pub world: Arc<dyn WorldState>,
}

impl CommandContext {
    /// Bundle the collaborators.
    pub fn new(
        server: ServerInfo,
        users: Arc<dyn UserStore>,
        bans: Arc<dyn BanStore>,
        players: Arc<dyn PlayerDirectory>,
        world: Arc<dyn WorldState>,
    ) -> Self {
        Self {
            server,
            users,
            bans,
            players,
            world,
        }
    }

    /// Resolve a player query to exactly one connected player.
    pub(crate) fn find_one_player(&self, query: &str) -> Result<PlayerInfo, CommandError> {
        let mut found = self.players.find_players(query);
        match found.len() {
            0 => Err(CommandError::not_found(format!(
                "Name {} was not found",
                query
            ))),
            1 => Ok(found.remove(0)),
            n => Err(CommandError::bad_request(format!(
                "Name {} matches {} players",
                query, n
            ))),
        }
    }
}

impl std::fmt::Debug for CommandContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandContext")
            .field("server", &self.server)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Registration
// =============================================================================

/// Signature of a built-in command.
type ContextFn = fn(&CommandContext, &RestVerbs, &ParameterView<'_>) -> CommandResult;

/// A built-in command bound to its context.
struct Bound {
    ctx: Arc<CommandContext>,
    run: ContextFn,
}

impl RestHandler for Bound {
    fn handle(&self, verbs: &RestVerbs, params: &ParameterView<'_>) -> CommandResult {
        (self.run)(&self.ctx, verbs, params)
    }
}

/// Template, handler and whether a token is required.
const COMMANDS: &[(&str, ContextFn, bool)] = &[
    ("/status", status::status, false),
    ("/tokentest", status::token_test, true),
    ("/users/read/{user}/info", users::user_info, true),
    ("/users/destroy/{user}", users::user_destroy, true),
    ("/users/update/{user}", users::user_update, true),
    ("/users/activelist", users::user_list, true),
    ("/bans/create", bans::ban_create, true),
    ("/bans/read/{user}/info", bans::ban_info, true),
    ("/bans/destroy/{user}", bans::ban_destroy, true),
    ("/lists/players", players::player_list, true),
    ("/world/read", world::world_read, true),
    ("/world/meteor", world::world_meteor, true),
    ("/world/bloodmoon/{bool}", world::world_bloodmoon, true),
    ("/players/read/{player}", players::player_read, true),
    ("/players/{player}/kick", players::player_kick, true),
    ("/players/{player}/ban", players::player_ban, true),
];

/// Register the built-in command set.
pub fn register_commands(
    registry: &mut RouteRegistry,
    ctx: Arc<CommandContext>,
) -> Result<(), TemplateError> {
    for &(template, run, requires_token) in COMMANDS {
        let handler = Bound {
            ctx: Arc::clone(&ctx),
            run,
        };
        registry.register(RestCommand::new(template, handler)?.requires_token(requires_token));
    }
    Ok(())
}

/// A value captured from the path.
///
/// Always present once the template matched; a miss means the handler was
/// bound to the wrong template.
pub(crate) fn path_value<'a>(verbs: &'a RestVerbs, name: &str) -> Result<&'a str, CommandError> {
    verbs.get(name).ok_or_else(|| {
        CommandError::bad_request("Required parameters were missing from this API endpoint.")
    })
}

/// Join names the way list fields present them.
pub(crate) fn join_names<I, S>(names: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names
        .into_iter()
        .map(|s| s.as_ref().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

// =============================================================================
// Test fixtures
// =============================================================================
