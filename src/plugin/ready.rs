use crate::{command, event::*, log_internal, plugin::*};
use anyhow::Result;
use serenity::all::Command;

/// Registers slash commands once the connection to Discord is ready.
pub struct Ready;

#[serenity::async_trait]
impl Plugin for Ready {
    fn name(&self) -> &'static str {
        "ready"
    }

    async fn handle(&self, ctx: &Context, event: &Event) -> Result<EventHandled> {
        let Event::Ready(_) = event else {
            return Ok(EventHandled::No);
        };

        let commands = command::commands()
            .iter()
            .map(|command| command.descriptor().to_create_command())
            .collect();

        // Replaces whatever was registered before, so renamed or removed commands disappear.
        let registered = Command::set_global_commands(ctx.http, commands).await?;
        log_internal!("Registered {} slash command(s)", registered.len());

        Ok(EventHandled::Yes)
    }
}
