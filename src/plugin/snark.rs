use crate::{
    event::*,
    helper::MessageHelper,
    llm::Generate,
    persistent_state::PersistentState,
    plugin::*,
    snark::{
        llm_reply::{respond_via_llm, Incoming},
        DEFAULT_PROMPT, PROMPT_KEY,
    },
};
use anyhow::Result;
use serenity::all::ChannelId;
use tokio::sync::RwLock;

/// Answers mentions, with the LLM in the originality channel and classical rules elsewhere
pub struct Snark;

#[derive(Debug, PartialEq, Eq)]
enum Responder {
    Llm,
    Classical,
}

impl Responder {
    fn for_channel(channel: ChannelId, originality_channel: ChannelId) -> Self {
        if channel == originality_channel {
            Responder::Llm
        } else {
            Responder::Classical
        }
    }

    async fn reply(
        &self,
        llm: &dyn Generate,
        pstate: &RwLock<PersistentState>,
        incoming: &Incoming<'_>,
    ) -> Result<Option<String>> {
        match self {
            Responder::Llm => {
                let template = pstate.read().await.get_option(PROMPT_KEY, DEFAULT_PROMPT);
                respond_via_llm(llm, &template, incoming).await
            }
            Responder::Classical => Ok(incoming.classify()),
        }
    }
}

#[serenity::async_trait]
impl Plugin for Snark {
    fn name(&self) -> &'static str {
        "snark"
    }

    async fn handle(&self, ctx: &Context, event: &Event) -> Result<EventHandled> {
        let Event::Message(msg) = event else {
            return Ok(EventHandled::No);
        };

        let my_id = ctx.cache.current_user().id;
        if !msg.is_snark_candidate(my_id) {
            return Ok(EventHandled::No);
        }

        let author_mention = msg.author_mention();
        let incoming = Incoming {
            text: &msg.content,
            author_mention: &author_mention,
            replies_to_bot: msg.replies_to(my_id),
        };

        let responder =
            Responder::for_channel(msg.channel_id, ctx.cfg.snark.originality_channel());
        let typing = (responder == Responder::Llm).then(|| msg.channel_id.start_typing(ctx.http));
        let reply = responder.reply(ctx.llm, ctx.pstate, &incoming).await;
        if let Some(typing) = typing {
            typing.stop();
        }

        if let Some(reply) = reply? {
            msg.reply_ping(ctx.cache_http, reply).await?;
        }

        Ok(EventHandled::Yes)
    }
}
