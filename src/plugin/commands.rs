use crate::{command, event::*, plugin::*};
use anyhow::Result;
use serenity::all::Interaction;

/// Routes slash command interactions to their handlers
pub struct Commands;

#[serenity::async_trait]
impl Plugin for Commands {
    fn name(&self) -> &'static str {
        "commands"
    }

    async fn handle(&self, ctx: &Context, event: &Event) -> Result<EventHandled> {
        let Event::Interaction(Interaction::Command(cmd)) = event else {
            return Ok(EventHandled::No);
        };

        // Possibly a command registered by an older build
        let Some(command) = command::find(&cmd.data.name) else {
            return Ok(EventHandled::No);
        };

        if let Err(err) = command.run(ctx, cmd).await {
            command.on_error(ctx, cmd, err).await?;
        }

        Ok(EventHandled::Yes)
    }
}
