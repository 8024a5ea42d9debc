use crate::agent::ConversationMessage;

/// Hooks around every model call made by [`Agent::send`](crate::agent::Agent::send).
///
/// Middleware runs in the order it was added. `before_send` edits a working copy
/// of the history that only feeds the prompt; the stored history is never rewritten.
pub trait AgentMiddleware: Send + Sync {
    fn before_send(&self, _history: &mut Vec<ConversationMessage>) {}

    fn after_receive(&self, text: String) -> String {
        text
    }
}

/// Keeps only the last `max_turns` turns in the prompt.
#[derive(Debug, Clone, Copy)]
pub struct HistoryWindow {
    pub max_turns: usize,
}

impl AgentMiddleware for HistoryWindow {
    fn before_send(&self, history: &mut Vec<ConversationMessage>) {
        if history.len() > self.max_turns {
            history.drain(..history.len() - self.max_turns);
        }
    }
}

/// Trims surrounding whitespace from model output.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrimResponse;

impl AgentMiddleware for TrimResponse {
    fn after_receive(&self, text: String) -> String {
        text.trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::Role;

    #[test]
    fn test_history_window_keeps_latest() {
        let mut history: Vec<ConversationMessage> = (0..5)
            .map(|i| ConversationMessage::new(Role::User, i.to_string()))
            .collect();
        HistoryWindow { max_turns: 2 }.before_send(&mut history);
        let kept: Vec<_> = history.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(kept, ["3", "4"]);
    }

    #[test]
    fn test_trim_response() {
        assert_eq!(TrimResponse.after_receive("  hi \n".into()), "hi");
    }
}
