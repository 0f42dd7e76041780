use super::*;
use crate::llm::chat::CompletionResponse;
use crate::models::chat::{ HistoryEntry, Role };
use async_trait::async_trait;
use std::error::Error as StdError;
use std::sync::Mutex;
use std::sync::atomic::{ AtomicUsize, Ordering };

pub(crate) enum Behaviour {
    Reply(&'static str),
    Fail,
    Hang,
}

pub(crate) struct FakeChatClient {
    behaviour: Behaviour,
    pub calls: AtomicUsize,
    pub prompts: Mutex<Vec<String>>,
}

impl FakeChatClient {
    pub(crate) fn new(behaviour: Behaviour) -> Arc<Self> {
        Arc::new(Self {
            behaviour,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl ChatClient for FakeChatClient {
    async fn complete(
        &self,
        prompt: &str
    ) -> Result<CompletionResponse, Box<dyn StdError + Send + Sync>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        match self.behaviour {
            Behaviour::Reply(text) => Ok(CompletionResponse { response: text.to_string() }),
            Behaviour::Fail => Err("upstream exploded with secret details".into()),
            Behaviour::Hang => {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(CompletionResponse { response: "too late".to_string() })
            }
        }
    }

    fn get_model(&self) -> String {
        "fake".to_string()
    }

    fn get_base_url(&self) -> Option<String> {
        None
    }
}

pub(crate) fn agent_with(client: &Arc<FakeChatClient>) -> RelayAgent {
    RelayAgent::new(
        Some(client.clone() as Arc<dyn ChatClient>),
        Arc::new(PromptConfig::default()),
        Duration::from_millis(50)
    )
}

fn request(message: Option<&str>, history: Option<Vec<HistoryEntry>>) -> ChatRequest {
    ChatRequest {
        message: message.map(str::to_string),
        conversation_history: history,
    }
}

fn history(n: usize) -> Vec<HistoryEntry> {
    (0..n)
        .map(|i| HistoryEntry {
            role: if i % 2 == 0 { Role::User } else { Role::Assistant },
            content: format!("history-{}", i),
        })
        .collect()
}

#[tokio::test]
async fn it_relays_generated_text() {
    let client = FakeChatClient::new(Behaviour::Reply("He builds things."));
    let agent = agent_with(&client);

    let res = agent.handle(request(Some("What does Vikyath do?"), None)).await.unwrap();

    assert_eq!(res, "He builds things.");
    assert_eq!(client.calls.load(Ordering::SeqCst), 1);
    let prompts = client.prompts.lock().unwrap();
    assert!(prompts[0].contains("Current visitor question: What does Vikyath do?"));
    assert!(prompts[0].contains("Previous conversation context:\n\n\n"));
    assert!(prompts[0].contains("You are \"Ask VIKI\""));
}

#[tokio::test]
async fn it_rejects_missing_and_empty_messages_without_calling_upstream() {
    let client = FakeChatClient::new(Behaviour::Reply("unused"));
    let agent = agent_with(&client);

    for req in [request(None, None), request(Some(""), Some(history(2)))] {
        let err = agent.handle(req).await.unwrap_err();
        assert!(matches!(err, RelayError::MissingMessage));
        assert_eq!(err.client_message(), "Message is required");
    }
    assert_eq!(client.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn it_rejects_requests_when_not_configured() {
    let agent = RelayAgent::new(
        None,
        Arc::new(PromptConfig::default()),
        DEFAULT_UPSTREAM_TIMEOUT
    );

    let err = agent.handle(request(Some("hello"), None)).await.unwrap_err();

    assert!(!agent.is_configured());
    assert!(matches!(err, RelayError::NotConfigured));
    assert_eq!(err.client_message(), "Gemini API key not configured");
}

#[tokio::test]
async fn it_validates_message_before_credentials() {
    let agent = RelayAgent::new(None, Arc::new(PromptConfig::default()), DEFAULT_UPSTREAM_TIMEOUT);
    let err = agent.handle(request(Some(""), None)).await.unwrap_err();
    assert!(matches!(err, RelayError::MissingMessage));
}

#[tokio::test]
async fn it_uses_only_the_last_five_history_entries() {
    let client = FakeChatClient::new(Behaviour::Reply("ok"));
    let agent = agent_with(&client);

    agent.handle(request(Some("next"), Some(history(7)))).await.unwrap();

    let prompts = client.prompts.lock().unwrap();
    let prompt = &prompts[0];
    assert!(!prompt.contains("history-0"));
    assert!(!prompt.contains("history-1"));
    let expected = "Visitor: history-2\nAssistant: history-3\nVisitor: history-4\nAssistant: history-5\nVisitor: history-6";
    assert!(prompt.contains(expected));
}

#[tokio::test]
async fn it_hides_upstream_errors() {
    let client = FakeChatClient::new(Behaviour::Fail);
    let agent = agent_with(&client);

    let err = agent.handle(request(Some("hello"), None)).await.unwrap_err();

    assert!(matches!(err, RelayError::Upstream(_)));
    assert!(err.to_string().contains("secret details"));
    assert_eq!(err.client_message(), "Failed to generate response");
    assert_eq!(client.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn it_times_out_hanging_upstream_calls() {
    let client = FakeChatClient::new(Behaviour::Hang);
    let agent = agent_with(&client);

    let err = agent.handle(request(Some("hello"), None)).await.unwrap_err();

    assert!(matches!(err, RelayError::Timeout(_)));
    assert_eq!(err.client_message(), "Failed to generate response");
}

#[tokio::test]
async fn it_keeps_the_api_key_out_of_upstream_errors() {
    let client = crate::llm::chat::gemini::GeminiChatClient::new(
        "SUPERSECRETKEY".to_string(),
        None,
        Some("http://127.0.0.1:9".to_string())
    );
    let agent = RelayAgent::new(
        Some(Arc::new(client) as Arc<dyn ChatClient>),
        Arc::new(PromptConfig::default()),
        Duration::from_secs(5)
    );

    let err = agent.handle(request(Some("hi"), None)).await.unwrap_err();

    assert!(matches!(err, RelayError::Upstream(_)));
    assert!(!err.to_string().contains("SUPERSECRETKEY"));
}
