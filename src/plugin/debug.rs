use crate::{event::*, log_event, logging::*, plugin::*};
use anyhow::Result;
use serenity::all::Interaction;

/// Prints debug information about event to stdout
pub struct Debug;

#[serenity::async_trait]
impl Plugin for Debug {
    fn name(&self) -> &'static str {
        "debug"
    }

    async fn handle(&self, ctx: &Context, event: &Event) -> Result<EventHandled> {
        match event {
            Event::Ready(ready) => {
                log_event!(
                    "Connected to {} server(s) as {}",
                    ready.guilds.len(),
                    ctx.cache.current_user().color(),
                );
            }
            Event::Message(msg) => {
                log_event!(
                    "{}{}{}{}{}{} {}",
                    msg.guild_id.color(ctx.http).await,
                    Glue {}.color(),
                    msg.channel_id.color(ctx.http).await,
                    Glue {}.color(),
                    msg.author.color(),
                    Glue {}.color(),
                    msg.content,
                );
            }
            Event::Interaction(Interaction::Command(cmd)) => {
                log_event!(
                    "{}{}{}{}{}{} {}",
                    cmd.guild_id.color(ctx.http).await,
                    Glue {}.color(),
                    cmd.channel_id.color(ctx.http).await,
                    Glue {}.color(),
                    cmd.user.color(),
                    Glue {}.color(),
                    cmd.color(),
                );
            }
            Event::Interaction(_) => {}
        }

        Ok(EventHandled::No)
    }
}
