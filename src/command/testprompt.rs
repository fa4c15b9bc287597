use super::*;
use crate::{
    llm::Generate,
    snark::llm_reply::{fill_prompt, Generated},
};
use serenity::all::EditInteractionResponse;

/// Try a prompt without saving it
pub struct TestPrompt;

static DESCRIPTOR: CommandDescriptor = CommandDescriptor {
    name: "testprompt",
    description: "Test LLM prompt",
    options: &[
        OptionDescriptor {
            name: "prompt",
            description: "Prompt to test. {} is replaced with input.",
            kind: CommandOptionType::String,
            required: false,
        },
        OptionDescriptor {
            name: "input",
            description: "Input to test prompt with",
            kind: CommandOptionType::String,
            required: false,
        },
    ],
};

const MISSING_ARGUMENTS: &str = "Was I supposed to read your mind?";

#[serenity::async_trait]
impl SlashCommand for TestPrompt {
    fn descriptor(&self) -> &'static CommandDescriptor {
        &DESCRIPTOR
    }

    async fn run(&self, ctx: &Context, cmd: &CommandInteraction) -> Result<()> {
        let Some(prompt) = test_prompt(string_option(cmd, "prompt"), string_option(cmd, "input"))
        else {
            return respond(ctx, cmd, MISSING_ARGUMENTS).await;
        };

        // Generation easily outlasts Discord's three second response window
        cmd.defer(ctx.cache_http).await?;

        let edited = async {
            let reply = generate_reply(ctx.llm, &prompt).await?;
            cmd.edit_response(ctx.cache_http, EditInteractionResponse::new().content(reply))
                .await?;
            Ok::<_, anyhow::Error>(())
        };
        edited.await.map_err(|err| err.context(Deferred))
    }

    async fn on_error(
        &self,
        ctx: &Context,
        cmd: &CommandInteraction,
        err: anyhow::Error,
    ) -> Result<()> {
        let reply = error_reply(&err);
        if was_deferred(&err) {
            cmd.edit_response(ctx.cache_http, EditInteractionResponse::new().content(reply))
                .await?;
            Ok(())
        } else {
            respond(ctx, cmd, &reply).await
        }
    }
}

/// Marks errors raised after the response was deferred, which must edit that response rather
/// than create one.
#[derive(Debug)]
struct Deferred;

impl std::fmt::Display for Deferred {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str("testprompt response deferred")
    }
}

fn was_deferred(err: &anyhow::Error) -> bool {
    err.downcast_ref::<Deferred>().is_some()
}

async fn generate_reply(llm: &dyn Generate, prompt: &str) -> Result<String> {
    let response = llm.generate(prompt).await?;
    Ok(test_reply(Generated::from_response(&response)))
}

/// Prompt to send, if both the template and the input were given
fn test_prompt(template: Option<&str>, input: Option<&str>) -> Option<String> {
    Some(fill_prompt(template?, input?))
}

fn test_reply(generated: Generated) -> String {
    match generated {
        Generated::Text(text) => text,
        Generated::Refused | Generated::Interrupted => "No.".to_owned(),
    }
}

fn error_reply(err: &anyhow::Error) -> String {
    format!("Error: {}", err.root_cause())
}
