use super::*;
use crate::{
    persistent_state::PersistentState,
    snark::{DEFAULT_PROMPT, PROMPT_KEY},
};
use serenity::all::CreateMessage;
use tokio::sync::RwLock;

pub struct GetPrompt;

static DESCRIPTOR: CommandDescriptor = CommandDescriptor {
    name: "getprompt",
    description: "Get LLM prompt",
    options: &[],
};

const ACKNOWLEDGEMENT: &str = "zzz... I'll slide into your DMs";

#[serenity::async_trait]
impl SlashCommand for GetPrompt {
    fn descriptor(&self) -> &'static CommandDescriptor {
        &DESCRIPTOR
    }

    async fn run(&self, ctx: &Context, cmd: &CommandInteraction) -> Result<()> {
        if let Some(denial) = admin_gate(ctx, cmd).await?.denial() {
            return respond(ctx, cmd, denial).await;
        }

        let revelation = revelation(ctx.pstate).await;
        respond(ctx, cmd, ACKNOWLEDGEMENT).await?;

        // The prompt stays out of the channel
        cmd.user
            .direct_message(ctx.cache_http, CreateMessage::new().content(revelation))
            .await?;

        Ok(())
    }
}

/// Direct message revealing the current prompt
async fn revelation(pstate: &RwLock<PersistentState>) -> String {
    let prompt = pstate.read().await.get_option(PROMPT_KEY, DEFAULT_PROMPT);
    format!("I reveal my programming:\n {}", prompt)
}
