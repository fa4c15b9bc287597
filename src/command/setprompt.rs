use super::*;
use crate::{log_internal, persistent_state::PersistentState, snark::PROMPT_KEY};
use anyhow::anyhow;
use tokio::sync::RwLock;

pub struct SetPrompt;

static DESCRIPTOR: CommandDescriptor = CommandDescriptor {
    name: "setprompt",
    description: "Update LLM prompt",
    options: &[OptionDescriptor {
        name: "prompt",
        description: "New prompt. {} is replaced with input.",
        kind: CommandOptionType::String,
        required: true,
    }],
};

#[serenity::async_trait]
impl SlashCommand for SetPrompt {
    fn descriptor(&self) -> &'static CommandDescriptor {
        &DESCRIPTOR
    }

    async fn run(&self, ctx: &Context, cmd: &CommandInteraction) -> Result<()> {
        if let Some(denial) = admin_gate(ctx, cmd).await?.denial() {
            return respond(ctx, cmd, denial).await;
        }

        let prompt =
            string_option(cmd, "prompt").ok_or(anyhow!("setprompt invoked without a prompt"))?;
        store_prompt(ctx.pstate, prompt).await?;

        respond(ctx, cmd, "OK").await
    }
}

async fn store_prompt(pstate: &RwLock<PersistentState>, prompt: &str) -> Result<()> {
    pstate.write().await.set_option(PROMPT_KEY, prompt).await?;
    log_internal!("Prompt is now: {}", prompt);
    Ok(())
}
