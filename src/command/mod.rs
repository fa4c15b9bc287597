//! Slash commands.  Each command is a descriptor, registered with Discord on ready, plus a
//! handler.

use crate::{context::Context, snark::admin::is_admin};
use anyhow::Result;
use serenity::all::{
    CommandInteraction, CommandOptionType, CreateCommand, CreateCommandOption,
    CreateInteractionResponse, CreateInteractionResponseMessage,
};

mod getprompt;
mod setprompt;
mod testprompt;

const NOT_ADMIN: &str = "Not an admin";

/// Everything Discord needs to know to offer a command
pub struct CommandDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub options: &'static [OptionDescriptor],
}

pub struct OptionDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub kind: CommandOptionType,
    pub required: bool,
}

impl CommandDescriptor {
    pub fn to_create_command(&self) -> CreateCommand {
        self.options.iter().fold(
            CreateCommand::new(self.name).description(self.description),
            |command, option| {
                command.add_option(
                    CreateCommandOption::new(option.kind, option.name, option.description)
                        .required(option.required),
                )
            },
        )
    }
}

#[serenity::async_trait]
pub trait SlashCommand: Sync + Send {
    fn descriptor(&self) -> &'static CommandDescriptor;
    async fn run(&self, ctx: &Context, cmd: &CommandInteraction) -> Result<()>;
    /// Called with the error when `run` fails.  By default the error goes back to the event loop,
    /// which logs it.
    async fn on_error(
        &self,
        _ctx: &Context,
        _cmd: &CommandInteraction,
        err: anyhow::Error,
    ) -> Result<()> {
        Err(err)
    }
}

/// Available commands
pub fn commands() -> Vec<Box<dyn SlashCommand>> {
    vec![
        Box::new(setprompt::SetPrompt),
        Box::new(getprompt::GetPrompt),
        Box::new(testprompt::TestPrompt),
    ]
}

pub fn find(name: &str) -> Option<Box<dyn SlashCommand>> {
    commands()
        .into_iter()
        .find(|command| command.descriptor().name == name)
}

/// Reply to the invoking user in the channel
async fn respond(ctx: &Context<'_>, cmd: &CommandInteraction, content: &str) -> Result<()> {
    cmd.create_response(
        ctx.cache_http,
        CreateInteractionResponse::Message(CreateInteractionResponseMessage::new().content(content)),
    )
    .await?;
    Ok(())
}

/// Text value of the option `name`, if given and non-empty
fn string_option<'a>(cmd: &'a CommandInteraction, name: &str) -> Option<&'a str> {
    cmd.data
        .options
        .iter()
        .find(|option| option.name == name)
        .and_then(|option| option.value.as_str())
        .filter(|value| !value.is_empty())
}

/// Outcome of the admin check for an admin-only command
#[derive(Debug, PartialEq, Eq)]
enum AdminGate {
    Granted,
    Denied,
}

impl AdminGate {
    /// `is_admin` is `None` when there is no guild member behind the invocation, e.g. in a DM.
    fn new(is_admin: Option<bool>) -> Self {
        match is_admin {
            Some(true) => AdminGate::Granted,
            Some(false) | None => AdminGate::Denied,
        }
    }

    /// Reply for an invoker who may not proceed
    fn denial(&self) -> Option<&'static str> {
        match self {
            AdminGate::Granted => None,
            AdminGate::Denied => Some(NOT_ADMIN),
        }
    }
}

async fn admin_gate(ctx: &Context<'_>, cmd: &CommandInteraction) -> Result<AdminGate> {
    let is_admin = match cmd.member.as_deref() {
        Some(member) => Some(is_admin(ctx, member).await?),
        None => None,
    };
    Ok(AdminGate::new(is_admin))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snark::admin::has_role;
    use serenity::all::{GuildId, RoleId};

    #[test]
    fn only_admins_pass_the_gate() {
        let guild = GuildId::new(500);
        let admin = RoleId::new(8);

        let gate = AdminGate::new(Some(has_role(&[RoleId::new(7), admin], guild, admin)));
        assert_eq!(gate, AdminGate::Granted);
        assert_eq!(gate.denial(), None);

        let gate = AdminGate::new(Some(has_role(&[RoleId::new(7)], guild, admin)));
        assert_eq!(gate, AdminGate::Denied);
        assert_eq!(gate.denial(), Some("Not an admin"));
    }

    #[test]
    fn invocations_without_a_member_are_denied() {
        let gate = AdminGate::new(None);
        assert_eq!(gate, AdminGate::Denied);
        assert_eq!(gate.denial(), Some("Not an admin"));
    }

    #[test]
    fn command_names_are_unique_and_lowercase() {
        let names: Vec<_> = commands().iter().map(|c| c.descriptor().name).collect();
        assert_eq!(names, ["setprompt", "getprompt", "testprompt"]);
        for name in names {
            assert_eq!(name, name.to_lowercase());
            assert!(find(name).is_some());
        }
        assert!(find("ping").is_none());
    }

    #[test]
    fn options_declare_their_requirements() {
        let set = find("setprompt").unwrap();
        let set = set.descriptor();
        assert_eq!(set.options.len(), 1);
        assert_eq!(set.options[0].name, "prompt");
        assert!(set.options[0].required);

        assert!(find("getprompt").unwrap().descriptor().options.is_empty());

        let test = find("testprompt").unwrap();
        let test = test.descriptor();
        let names: Vec<_> = test.options.iter().map(|o| o.name).collect();
        assert_eq!(names, ["prompt", "input"]);
        assert!(test.options.iter().all(|o| !o.required));
        assert!(test
            .options
            .iter()
            .all(|o| o.kind == CommandOptionType::String));
    }

    #[test]
    fn descriptors_build_discord_commands() {
        let json = serde_json::to_value(
            find("testprompt")
                .unwrap()
                .descriptor()
                .to_create_command(),
        )
        .unwrap();
        assert_eq!(json["name"], "testprompt");
        assert_eq!(json["description"], "Test LLM prompt");
        assert_eq!(json["options"][1]["name"], "input");
    }
}
