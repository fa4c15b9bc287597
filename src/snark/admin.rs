use crate::context::Context;
use anyhow::Result;
use serenity::all::{GuildId, Member, RoleId};

/// Whether `member` holds the configured admin role.
///
/// Roles are fetched from Discord rather than trusted from the interaction payload.  Lookup
/// failures are returned as errors.
pub async fn is_admin(ctx: &Context<'_>, member: &Member) -> Result<bool> {
    let admin_role = ctx.cfg.snark.admin_role();
    let fresh = member
        .guild_id
        .member(ctx.cache_http, member.user.id)
        .await?;

    Ok(has_role(&fresh.roles, fresh.guild_id, admin_role))
}

/// Whether `role` is among `roles`, ignoring the guild's default `@everyone` role, which
/// shares its id with the guild.
pub fn has_role(roles: &[RoleId], guild_id: GuildId, role: RoleId) -> bool {
    roles
        .iter()
        .filter(|r| r.get() != guild_id.get())
        .any(|r| *r == role)
}
