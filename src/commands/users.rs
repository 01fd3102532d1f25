use tracing::{info, warn};

use crate::error::{CommandError, StoreError};
use crate::rest::{CommandResult, ParameterView, RestObject, RestVerbs};
use crate::store::UserAccount;

use super::{join_names, path_value, CommandContext};

const USER_MISSING: &str = "The specified user account does not exist.";

fn lookup_user(ctx: &CommandContext, verbs: &RestVerbs) -> Result<UserAccount, CommandError> {
    let name = path_value(verbs, "user")?;
    ctx.users
        .get_user_by_name(name)?
        .ok_or_else(|| CommandError::not_found(USER_MISSING))
}

fn missing_or_fault(err: StoreError) -> CommandError {
    match err {
        StoreError::NotFound(_) => CommandError::not_found(USER_MISSING),
        other => other.into(),
    }
}

/// `/users/read/{user}/info`
pub(super) fn user_info(ctx: &CommandContext, verbs: &RestVerbs, _: &ParameterView<'_>) -> CommandResult {
    let user = lookup_user(ctx, verbs)?;
    Ok(Some(
        RestObject::ok()
            .with("group", user.group)
            .with("id", user.id.to_string()),
    ))
}

/// `/users/destroy/{user}`
pub(super) fn user_destroy(
    ctx: &CommandContext,
    verbs: &RestVerbs,
    _: &ParameterView<'_>,
) -> CommandResult {
    let user = lookup_user(ctx, verbs)?;

    if let Err(e) = ctx.users.remove_user(&user.name) {
        warn!(user = %user.name, error = %e, "Failed to remove user");
        return Err(CommandError::bad_request(
            "The specified user was unable to be removed.",
        ));
    }

    info!(user = %user.name, "User removed via REST");
    Ok(Some(RestObject::ok().with("response", "User deleted successfully.")))
}

/// `/users/update/{user}`: takes `password` and/or `group`.
///
/// The password is written before the group and the two are not atomic. If
/// the account disappears in between, the password change stands and the
/// request reports the account as missing.
pub(super) fn user_update(
    ctx: &CommandContext,
    verbs: &RestVerbs,
    params: &ParameterView<'_>,
) -> CommandResult {
    let password = params.get("password");
    let group = params.get("group");

    if password.is_none() && group.is_none() {
        return Err(CommandError::bad_request("No parameters were passed."));
    }

    let user = lookup_user(ctx, verbs)?;
    let mut object = RestObject::ok();

    if let Some(password) = password {
        ctx.users
            .set_user_password(&user.name, password)
            .map_err(missing_or_fault)?;
        object.set("password-response", "Password updated successfully.");
    }

    if let Some(group) = group {
        ctx.users
            .set_user_group(&user.name, group)
            .map_err(missing_or_fault)?;
        object.set("group-response", "Group updated successfully.");
    }

    Ok(Some(object))
}

/// `/users/activelist`: account names of logged-in players.
pub(super) fn user_list(ctx: &CommandContext, _: &RestVerbs, _: &ParameterView<'_>) -> CommandResult {
    let players = ctx.players.active_players();
    let accounts = players.iter().filter_map(|p| p.account_name.as_deref());

    Ok(Some(RestObject::ok().with("activeusers", join_names(accounts))))
}
