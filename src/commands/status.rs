use crate::rest::{CommandResult, ParameterView, RestObject, RestVerbs};

use super::{join_names, CommandContext};

/// `/status`: server identity and who is online.
pub(super) fn status(ctx: &CommandContext, _: &RestVerbs, _: &ParameterView<'_>) -> CommandResult {
    let players = ctx.players.active_players();

    Ok(Some(
        RestObject::ok()
            .with("name", ctx.server.name.as_str())
            .with("port", ctx.server.port.to_string())
            .with("playercount", players.len().to_string())
            .with("players", join_names(players.iter().map(|p| p.name.as_str()))),
    ))
}

/// `/tokentest`
pub(super) fn token_test(_: &CommandContext, _: &RestVerbs, _: &ParameterView<'_>) -> CommandResult {
    Ok(Some(
        RestObject::ok().with("response", "Token is valid and was passed through correctly."),
    ))
}
