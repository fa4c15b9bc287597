//! Rule-based replies for when the LLM isn't in play.

use super::eight_ball;
use regex::Regex;
use std::sync::LazyLock;

/// A question mark closing a word or standing on its own, e.g. `hard?` or `hard ?`.
static QUESTION: LazyLock<Regex> = LazyLock::new(|| whole_regex(r"(\S|\s)\?(\s|$)"));
static BROKEN: LazyLock<Regex> = LazyLock::new(|| whole_word(&["broken"]));
static THANKS: LazyLock<Regex> = LazyLock::new(|| whole_word(&["thanks", "thank"]));
static WORK: LazyLock<Regex> = LazyLock::new(|| whole_word(&["work"]));
static GREETING: LazyLock<Regex> = LazyLock::new(|| whole_word(&["hey", "hi", "hello"]));

fn whole_regex(pattern: &str) -> Regex {
    // Patterns are compile-time constants
    Regex::new(pattern).expect("invalid built-in pattern")
}

/// Case-insensitive match of any of `words`, not as part of a longer word.
fn whole_word(words: &[&str]) -> Regex {
    whole_regex(&format!(r"(?i)\b({})\b", words.join("|")))
}

/// Reply to `text` from the author mentioned as `author_mention`, using the current hour for any
/// eight-ball answer.
///
/// Returns `None` when the bot should stay quiet.
pub fn classify(text: &str, author_mention: &str, replies_to_bot: bool) -> Option<String> {
    classify_at(
        text,
        author_mention,
        replies_to_bot,
        &eight_ball::current_hour_bucket(),
    )
}

/// As [`classify`], with an explicit eight-ball hour bucket.
pub fn classify_at(
    text: &str,
    author_mention: &str,
    replies_to_bot: bool,
    hour_bucket: &str,
) -> Option<String> {
    let reply = if QUESTION.is_match(text) {
        eight_ball::select(text, hour_bucket).to_owned()
    } else if BROKEN.is_match(text) {
        format!("No {author_mention}, you're broken :disguised_face:")
    } else if THANKS.is_match(text) {
        format!("You're welcome {author_mention} :heart:")
    } else if WORK.is_match(text) {
        format!("{author_mention} I do work.")
    } else if GREETING.is_match(text) {
        format!(
            "Hey {author_mention}, I am a cat. With robot intestines. If you're bored, you should \
             ask me a question, or check out my `+userinfo`, `+ping`, `+fortune` and `+fact` \
             commands :cat:"
        )
    } else if replies_to_bot {
        // Someone answering the bot without asking anything; let the conversation end.
        return None;
    } else {
        format!("{author_mention}, did you forget a question mark? <:mmhmmm:872809423939174440>")
    };

    Some(reply)
}
