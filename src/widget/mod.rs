#[cfg(test)]
#[path = "widget_test.rs"]
mod tests;

pub mod terminal;
pub mod transport;

use log::{ debug, error, warn };

use crate::history::HISTORY_FOR_PROMPT_LEN;
use crate::models::chat::{ ChatRequest, Conversation, Message, Role };
use self::transport::{ RelayTransport, WidgetError };

pub const GREETING: &str =
    "Hey there! I'm VIKI, your witty guide to all things Vikyath. What would you like to know about this tech wizard? 🚀";

pub const APOLOGY: &str =
    "I apologize, but I'm having trouble connecting right now. Please try again in a moment.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeState {
    Idle,
    Sending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter { shift: bool },
    Char(char),
    Backspace,
}

/// A submission that has been accepted and is waiting on the relay.
#[derive(Debug)]
pub struct PendingExchange {
    request: ChatRequest,
}

impl PendingExchange {
    pub fn request(&self) -> &ChatRequest {
        &self.request
    }
}

pub struct ChatWidget<T: RelayTransport> {
    transport: T,
    conversation: Conversation,
    input: String,
    state: ExchangeState,
    open: bool,
}

impl<T: RelayTransport> ChatWidget<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            conversation: Conversation::with_greeting(GREETING),
            input: String::new(),
            state: ExchangeState::Idle,
            open: false,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, value: impl Into<String>) {
        self.input = value.into();
    }

    pub fn push_char(&mut self, c: char) {
        self.input.push(c);
    }

    pub fn backspace(&mut self) {
        self.input.pop();
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn state(&self) -> ExchangeState {
        self.state
    }

    pub fn is_sending(&self) -> bool {
        self.state == ExchangeState::Sending
    }

    pub fn can_send(&self) -> bool {
        !self.is_sending() && !self.input.trim().is_empty()
    }

    /// Moves Idle -> Sending: records the user message, clears the input and
    /// returns the request to send. Returns `None` when there is nothing to
    /// send or an exchange is already in flight.
    pub fn begin_submit(&mut self) -> Option<PendingExchange> {
        if !self.can_send() {
            if self.is_sending() {
                debug!("Ignoring submit while an exchange is in flight");
            }
            return None;
        }

        let content = self.input.trim().to_string();
        let conversation_history = self.conversation.trailing_history(HISTORY_FOR_PROMPT_LEN);

        self.conversation.push(Message::new(Role::User, content.clone()));
        self.input.clear();
        self.state = ExchangeState::Sending;

        Some(PendingExchange {
            request: ChatRequest {
                message: Some(content),
                conversation_history: Some(conversation_history),
            },
        })
    }

    /// Moves Sending -> Idle, appending the reply or the apology.
    pub fn finish(&mut self, outcome: Result<String, WidgetError>) {
        if !self.is_sending() {
            warn!("Dropping relay outcome with no exchange in flight");
            return;
        }

        let content = match outcome {
            Ok(text) => text,
            Err(e) => {
                error!("Error sending message: {}", e);
                APOLOGY.to_string()
            }
        };

        self.conversation.push(Message::new(Role::Assistant, content));
        self.state = ExchangeState::Idle;
    }

    /// Runs one full round trip. Returns whether the submission was accepted.
    pub async fn submit(&mut self) -> bool {
        let pending = match self.begin_submit() {
            Some(p) => p,
            None => return false,
        };

        let outcome = self.transport.send(pending.request()).await;
        self.finish(outcome);
        true
    }

    /// Enter without Shift commits the input; Shift+Enter is ignored on the
    /// single-line input.
    pub async fn handle_key(&mut self, key: Key) -> bool {
        match key {
            Key::Enter { shift: false } => self.submit().await,
            Key::Enter { shift: true } => false,
            Key::Char(c) => {
                self.push_char(c);
                false
            }
            Key::Backspace => {
                self.backspace();
                false
            }
        }
    }
}
