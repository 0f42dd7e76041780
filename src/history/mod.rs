#[cfg(test)]
#[path = "history_test.rs"]
mod tests;

use crate::models::chat::{ HistoryEntry, Role };

/// Number of prior turns carried into each prompt.
pub const HISTORY_FOR_PROMPT_LEN: usize = 5;

/// The most recent `HISTORY_FOR_PROMPT_LEN` entries, in their original order.
pub fn trailing_window(history: &[HistoryEntry]) -> &[HistoryEntry] {
    let start = history.len().saturating_sub(HISTORY_FOR_PROMPT_LEN);
    &history[start..]
}

pub fn role_label(role: Role) -> &'static str {
    match role {
        Role::User => "Visitor",
        Role::Assistant => "Assistant",
    }
}

pub fn format_history_for_prompt(history: &[HistoryEntry]) -> String {
    trailing_window(history)
        .iter()
        .map(|msg| format!("{}: {}", role_label(msg.role), msg.content))
        .collect::<Vec<_>>()
        .join("\n")
}
