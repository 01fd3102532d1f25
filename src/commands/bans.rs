use tracing::{info, warn};

use crate::error::CommandError;
use crate::rest::{CommandResult, ParameterView, RestObject, RestVerbs};
use crate::store::Ban;

use super::{path_value, CommandContext};

const BAN_MISSING: &str = "The specified ban does not exist.";

/// Which ban field `{user}` refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BanKey {
    Ip,
    Name,
}

impl BanKey {
    fn from_param(value: Option<&str>) -> Result<Self, CommandError> {
        match value {
            Some("ip") => Ok(BanKey::Ip),
            Some("name") => Ok(BanKey::Name),
            _ => Err(CommandError::bad_request("Invalid Type")),
        }
    }
}

fn lookup_ban(
    ctx: &CommandContext,
    verbs: &RestVerbs,
    params: &ParameterView<'_>,
) -> Result<Ban, CommandError> {
    let key = BanKey::from_param(params.get("type"))?;
    let target = path_value(verbs, "user")?;

    let found = match key {
        BanKey::Ip => ctx.bans.get_ban_by_ip(target)?,
        BanKey::Name => ctx.bans.get_ban_by_name(target)?,
    };
    found.ok_or_else(|| CommandError::not_found(BAN_MISSING))
}

/// `/bans/create`: needs `ip` and/or `name`, optional `reason`.
pub(super) fn ban_create(ctx: &CommandContext, _: &RestVerbs, params: &ParameterView<'_>) -> CommandResult {
    let ip = params.get("ip");
    let name = params.get("name");

    if ip.is_none() && name.is_none() {
        return Err(CommandError::bad_request(
            "Required parameters were missing from this API endpoint.",
        ));
    }

    let ip = ip.unwrap_or_default();
    let name = name.unwrap_or_default();
    let reason = params.get("reason").unwrap_or_default();

    if let Err(e) = ctx.bans.add_ban(ip, name, reason) {
        warn!(ip = ip, name = name, error = %e, "Failed to create ban");
        return Err(CommandError::bad_request(
            "The specified ban was unable to be created.",
        ));
    }

    info!(ip = ip, name = name, "Ban created via REST");
    Ok(Some(RestObject::ok().with("response", "Ban created successfully.")))
}

/// `/bans/read/{user}/info?type=ip|name`
pub(super) fn ban_info(ctx: &CommandContext, verbs: &RestVerbs, params: &ParameterView<'_>) -> CommandResult {
    let ban = lookup_ban(ctx, verbs, params)?;
    Ok(Some(
        RestObject::ok()
            .with("name", ban.name)
            .with("ip", ban.ip)
            .with("reason", ban.reason),
    ))
}

/// `/bans/destroy/{user}?type=ip|name`
pub(super) fn ban_destroy(
    ctx: &CommandContext,
    verbs: &RestVerbs,
    params: &ParameterView<'_>,
) -> CommandResult {
    let ban = lookup_ban(ctx, verbs, params)?;

    if let Err(e) = ctx.bans.remove_ban(&ban) {
        warn!(ip = %ban.ip, name = %ban.name, error = %e, "Failed to remove ban");
        return Err(CommandError::bad_request(
            "The specified ban was unable to be removed.",
        ));
    }

    info!(ip = %ban.ip, name = %ban.name, "Ban removed via REST");
    Ok(Some(RestObject::ok().with("response", "Ban deleted successfully.")))
}
