use super::classical;
use crate::llm::{Generate, GenerateContentResponse};
use anyhow::Result;

/// What the model made of a prompt
#[derive(Debug, PartialEq, Eq)]
pub enum Generated {
    /// No candidates at all, typically because the prompt itself was blocked
    Refused,
    /// The first candidate did not finish normally, e.g. safety filter or token limit
    Interrupted,
    /// Text safe to post
    Text(String),
}

impl Generated {
    pub fn from_response(response: &GenerateContentResponse) -> Self {
        let Some(candidate) = response.candidates.first() else {
            return Generated::Refused;
        };

        if !candidate.finish_reason.is_stop() {
            return Generated::Interrupted;
        }

        Generated::Text(defuse_mass_mentions(&candidate.text()))
    }
}

/// Substitute `text` for every `{}` placeholder in `template`.
pub fn fill_prompt(template: &str, text: &str) -> String {
    template.replace("{}", text)
}

/// Keep the model from pinging the whole server.
pub fn defuse_mass_mentions(text: &str) -> String {
    text.replace("@everyone", "everyone").replace("@here", "here")
}

/// A message addressed to the bot
pub struct Incoming<'a> {
    pub text: &'a str,
    pub author_mention: &'a str,
    /// Whether the message is a reply to something the bot said
    pub replies_to_bot: bool,
}

impl Incoming<'_> {
    pub fn classify(&self) -> Option<String> {
        classical::classify(self.text, self.author_mention, self.replies_to_bot)
    }
}

/// Ask the model to reply to `incoming` using the prompt `template`.
///
/// An interrupted generation falls back to the classical responder.
pub async fn respond_via_llm(
    generator: &dyn Generate,
    template: &str,
    incoming: &Incoming<'_>,
) -> Result<Option<String>> {
    let prompt = fill_prompt(template, incoming.text);
    let response = generator.generate(&prompt).await?;

    Ok(match Generated::from_response(&response) {
        Generated::Refused => Some("No.".to_owned()),
        Generated::Interrupted => incoming.classify(),
        Generated::Text(text) => Some(text),
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::llm::{Candidate, Content, FinishReason, Part};
    use crate::snark::eight_ball::ANSWERS;
    use std::sync::Mutex;

    /// Returns a canned response and remembers the prompts it was given
    pub(crate) struct CannedGenerator {
        pub(crate) response: fn() -> Result<GenerateContentResponse>,
        pub(crate) prompts: Mutex<Vec<String>>,
    }

    impl CannedGenerator {
        pub(crate) fn new(response: fn() -> Result<GenerateContentResponse>) -> Self {
            Self {
                response,
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[serenity::async_trait]
    impl Generate for CannedGenerator {
        async fn generate(&self, prompt: &str) -> Result<GenerateContentResponse> {
            self.prompts.lock().unwrap().push(prompt.to_owned());
            (self.response)()
        }
    }

    pub(crate) fn candidate(finish_reason: FinishReason, text: &str) -> GenerateContentResponse {
        GenerateContentResponse {
            candidates: vec![Candidate {
                content: Some(Content {
                    parts: vec![Part {
                        text: Some(text.to_owned()),
                    }],
                }),
                finish_reason,
            }],
        }
    }

    fn incoming(text: &str) -> Incoming<'_> {
        Incoming {
            text,
            author_mention: "<@42>",
            replies_to_bot: false,
        }
    }

    #[tokio::test]
    async fn every_placeholder_is_filled() {
        let generator = CannedGenerator::new(|| Ok(candidate(FinishReason::Stop, "k")));
        respond_via_llm(&generator, "Q: {}\nAgain: {}", &incoming("why"))
            .await
            .unwrap();
        assert_eq!(
            generator.prompts.lock().unwrap().as_slice(),
            ["Q: why\nAgain: why"]
        );
    }

    #[tokio::test]
    async fn no_candidates_means_no() {
        let generator = CannedGenerator::new(|| Ok(GenerateContentResponse::default()));
        let reply = respond_via_llm(&generator, "{}", &incoming("anything"))
            .await
            .unwrap();
        assert_eq!(reply.as_deref(), Some("No."));
    }

    #[tokio::test]
    async fn interrupted_generation_falls_back_to_classical() {
        let generator =
            CannedGenerator::new(|| Ok(candidate(FinishReason::Safety, "something rude")));

        let reply = respond_via_llm(&generator, "{}", &incoming("thanks kitti"))
            .await
            .unwrap();
        assert_eq!(reply.as_deref(), Some("You're welcome <@42> :heart:"));

        let reply = respond_via_llm(&generator, "{}", &incoming("is cs unimelb hard?"))
            .await
            .unwrap();
        assert!(ANSWERS.contains(&reply.unwrap().as_str()));

        let quiet = Incoming {
            replies_to_bot: true,
            ..incoming("ok")
        };
        let reply = respond_via_llm(&generator, "{}", &quiet).await.unwrap();
        assert_eq!(reply, None);
    }

    #[tokio::test]
    async fn max_tokens_also_falls_back() {
        let generator = CannedGenerator::new(|| Ok(candidate(FinishReason::MaxTokens, "blah")));
        let reply = respond_via_llm(&generator, "{}", &incoming("does it work"))
            .await
            .unwrap();
        assert_eq!(reply.as_deref(), Some("<@42> I do work."));
    }

    #[tokio::test]
    async fn mass_mentions_are_defused() {
        let generator = CannedGenerator::new(|| {
            Ok(candidate(
                FinishReason::Stop,
                "hey @everyone and @here, not @Everyone",
            ))
        });
        let reply = respond_via_llm(&generator, "{}", &incoming("shout"))
            .await
            .unwrap();
        assert_eq!(
            reply.as_deref(),
            Some("hey everyone and here, not @Everyone")
        );
    }

    #[tokio::test]
    async fn generation_errors_propagate() {
        let generator = CannedGenerator::new(|| Err(anyhow::anyhow!("connection reset")));
        let err = respond_via_llm(&generator, "{}", &incoming("hi"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "connection reset");
    }
}
