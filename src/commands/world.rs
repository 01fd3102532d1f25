use tracing::info;

use crate::error::CommandError;
use crate::rest::{CommandResult, ParameterView, RestObject, RestVerbs};

use super::CommandContext;

/// `/world/read`
pub(super) fn world_read(ctx: &CommandContext, _: &RestVerbs, _: &ParameterView<'_>) -> CommandResult {
    let world = ctx.world.snapshot();
    Ok(Some(
        RestObject::ok()
            .with("name", world.name)
            .with("size", format!("{}*{}", world.width, world.height))
            .with("time", world.time)
            .with("daytime", world.day_time)
            .with("bloodmoon", world.blood_moon)
            .with("invasionsize", world.invasion_size),
    ))
}

/// `/world/meteor`
pub(super) fn world_meteor(ctx: &CommandContext, _: &RestVerbs, _: &ParameterView<'_>) -> CommandResult {
    ctx.world.drop_meteor()?;
    info!("Meteor dropped via REST");
    Ok(Some(RestObject::ok().with("response", "Meteor has been spawned.")))
}

/// `/world/bloodmoon/{bool}`
pub(super) fn world_bloodmoon(
    ctx: &CommandContext,
    verbs: &RestVerbs,
    _: &ParameterView<'_>,
) -> CommandResult {
    let raw = verbs
        .get("bool")
        .ok_or_else(|| CommandError::bad_request("No parameter was passed."))?;
    let enabled =
        parse_bool(raw).ok_or_else(|| CommandError::bad_request("Unable to parse parameter."))?;

    ctx.world.set_blood_moon(enabled);
    info!(enabled = enabled, "Blood moon toggled via REST");
    Ok(Some(RestObject::ok().with(
        "response",
        format!("Blood Moon has been set to {}", enabled),
    )))
}

/// Case-insensitive `true`/`false`, surrounding whitespace ignored.
fn parse_bool(raw: &str) -> Option<bool> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("true") {
        Some(true)
    } else if raw.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}
