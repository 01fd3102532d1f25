use tracing::{debug, info};

use crate::error::{CommandError, StoreError};
use crate::rest::{CommandResult, ParameterView, RestObject, RestVerbs};
use crate::store::PlayerInfo;

use super::{join_names, path_value, CommandContext};

const DEFAULT_KICK_REASON: &str = "Kicked via web";
const DEFAULT_BAN_REASON: &str = "Banned via web";

/// `/lists/players`
pub(super) fn player_list(ctx: &CommandContext, _: &RestVerbs, _: &ParameterView<'_>) -> CommandResult {
    let players = ctx.players.active_players();
    Ok(Some(
        RestObject::ok().with("players", join_names(players.iter().map(|p| p.name.as_str()))),
    ))
}

/// `/players/read/{player}`
pub(super) fn player_read(ctx: &CommandContext, verbs: &RestVerbs, _: &ParameterView<'_>) -> CommandResult {
    let player = ctx.find_one_player(path_value(verbs, "player")?)?;

    Ok(Some(
        RestObject::ok()
            .with("nickname", player.name.as_str())
            .with("username", player.account_name.clone().unwrap_or_default())
            .with("ip", player.ip.as_str())
            .with("group", player.group.as_str())
            .with("position", format!("{},{}", player.tile_x, player.tile_y))
            .with("inventory", join_names(&player.inventory))
            .with(
                "buffs",
                join_names(player.buffs.iter().map(|b| b.to_string())),
            ),
    ))
}

/// `/players/{player}/kick`, optional `reason`.
pub(super) fn player_kick(
    ctx: &CommandContext,
    verbs: &RestVerbs,
    params: &ParameterView<'_>,
) -> CommandResult {
    let player = ctx.find_one_player(path_value(verbs, "player")?)?;
    let reason = params.get("reason").unwrap_or(DEFAULT_KICK_REASON);

    ctx.players
        .kick(&player, reason)
        .map_err(|e| gone_or_fault(&player, e))?;
    info!(player = %player.name, reason = reason, "Player kicked via REST");

    Ok(Some(RestObject::ok().with(
        "response",
        format!("Player {} was kicked", player.name),
    )))
}

/// `/players/{player}/ban`, optional `reason`. Bans by ip and name, then kicks.
///
/// The two steps are not atomic. A player who disconnects between them stays
/// banned and the ban is still reported as done.
pub(super) fn player_ban(
    ctx: &CommandContext,
    verbs: &RestVerbs,
    params: &ParameterView<'_>,
) -> CommandResult {
    let player = ctx.find_one_player(path_value(verbs, "player")?)?;
    let reason = params.get("reason").unwrap_or(DEFAULT_BAN_REASON);

    ctx.bans.add_ban(&player.ip, &player.name, reason)?;
    match ctx.players.kick(&player, reason) {
        Ok(()) => {}
        Err(StoreError::NotFound(_)) => {
            debug!(player = %player.name, "Banned player already disconnected");
        }
        Err(e) => return Err(e.into()),
    }
    info!(player = %player.name, reason = reason, "Player banned via REST");

    Ok(Some(RestObject::ok().with(
        "response",
        format!("Player {} was banned", player.name),
    )))
}

/// A player that vanished after lookup reads as not found.
fn gone_or_fault(player: &PlayerInfo, err: StoreError) -> CommandError {
    match err {
        StoreError::NotFound(_) => {
            CommandError::not_found(format!("Name {} was not found", player.name))
        }
        other => other.into(),
    }
}
