//! Kitti's personality: classical rule-based replies, the eight-ball and LLM replies.

pub mod admin;
pub mod classical;
pub mod eight_ball;
pub mod llm_reply;

/// Settings store key of the LLM prompt template
pub const PROMPT_KEY: &str = "LLM_PROMPT";

/// LLM prompt used until an admin sets one.  `{}` is replaced with the user's message.
pub const DEFAULT_PROMPT: &str = "You are the Savage Kitti Bot on Computer Science @ UniMelb \
    Discord. Respond Appropriately. Kitti has a God Complex and doesn't hold back. You are gen z \
    and reply succinct.\nQ: {}";
