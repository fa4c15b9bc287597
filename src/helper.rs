//! Miscellaneous convenience methods

use serenity::all::{Message, Mentionable, UserId};

pub trait MessageHelper {
    /// Whether the snark listener should look at this message at all
    fn is_snark_candidate(&self, me: UserId) -> bool;
    /// Whether this message replies to one of `me`'s messages
    fn replies_to(&self, me: UserId) -> bool;
    /// Mention string pinging the author, e.g. `<@1234>`
    fn author_mention(&self) -> String;
}

impl MessageHelper for Message {
    fn is_snark_candidate(&self, me: UserId) -> bool {
        self.guild_id.is_some()
            && is_snark_candidate(
                self.author.bot,
                &self.content,
                self.mentions.iter().map(|user| user.id),
                me,
            )
    }

    fn replies_to(&self, me: UserId) -> bool {
        self.referenced_message
            .as_ref()
            .is_some_and(|referenced| referenced.author.id == me)
    }

    fn author_mention(&self) -> String {
        self.author.mention().to_string()
    }
}

/// Human-authored, non-empty and mentioning `me` directly.
pub fn is_snark_candidate(
    author_is_bot: bool,
    content: &str,
    mut mentioned: impl Iterator<Item = UserId>,
    me: UserId,
) -> bool {
    !author_is_bot && !content.is_empty() && mentioned.any(|id| id == me)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn me() -> UserId {
        UserId::new(10)
    }

    #[test]
    fn needs_a_direct_mention() {
        let me = me();
        let others = [UserId::new(11), UserId::new(12)];
        assert!(!is_snark_candidate(false, "<@11> hi", others.into_iter(), me));
        assert!(is_snark_candidate(
            false,
            "<@10> hi",
            [UserId::new(11), me].into_iter(),
            me
        ));
    }

    #[test]
    fn ignores_bots_and_empty_messages() {
        let me = me();
        assert!(!is_snark_candidate(true, "<@10> hi", [me].into_iter(), me));
        assert!(!is_snark_candidate(false, "", [me].into_iter(), me));
    }
}
