//! Magic eight-ball answers that are stable for an hour.

use md5::{Digest, Md5};

/// Canned answers.  Must not be empty.
pub const ANSWERS: [&str; 20] = [
    "It is certain.",
    "It is decidedly so.",
    "Without a doubt.",
    "Yes, definitely.",
    "You may rely on it.",
    "As I see it, yes.",
    "Most likely.",
    "Outlook good.",
    "Yes.",
    "Signs point to yes.",
    "Reply hazy, try again.",
    "Ask again later.",
    "Better not tell you now.",
    "Cannot predict now.",
    "Concentrate and ask again.",
    "Don't count on it.",
    "My reply is no.",
    "My sources say no.",
    "Outlook not so good.",
    "Very Doubtful.",
];

/// Local time truncated to the hour, e.g. `2024031714`.
pub fn current_hour_bucket() -> String {
    chrono::Local::now().format("%Y%m%d%H").to_string()
}

/// Pick an answer for `message`.  The same message within the same `hour_bucket` always gets
/// the same answer.
pub fn select(message: &str, hour_bucket: &str) -> &'static str {
    let mut hasher = Md5::new();
    hasher.update(message.as_bytes());
    hasher.update(hour_bucket.as_bytes());
    let digest = hasher.finalize();

    ANSWERS[usize::from(digest[0]) % ANSWERS.len()]
}
