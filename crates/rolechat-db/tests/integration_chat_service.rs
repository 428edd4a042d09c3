//! Chat service integration tests over the durable store.
//!
//! The completion API is replaced by a scripted fake; everything else is
//! the production stack.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rolechat_core::{
    ChatConfig, ChatError, ChatService, ChatSettings, CompletionClient, CompletionError,
    CompletionOutput, CompletionRequest, HistoryStore, MessageRole, PersistentHistoryStore,
    SimpleConfig, StructuredReply, UsageInfo,
};
use rolechat_db::{StoreFactory, setup_database};

#[derive(Default)]
struct ScriptedClient {
    outputs: Mutex<VecDeque<Result<CompletionOutput, CompletionError>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedClient {
    fn reply(self, text: &str, usage: Option<UsageInfo>) -> Self {
        self.outputs.lock().unwrap().push_back(Ok(CompletionOutput {
            reply: StructuredReply {
                text: text.to_string(),
                suggested_phrases: vec!["Thanks!".to_string(), "Tell me more.".to_string()],
            },
            usage,
        }));
        self
    }

    fn fail(self, error: CompletionError) -> Self {
        self.outputs.lock().unwrap().push_back(Err(error));
        self
    }
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionOutput, CompletionError> {
        self.requests.lock().unwrap().push(request);
        self.outputs
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected completion call")
    }
}

async fn service_with_store(
    client: Arc<ScriptedClient>,
) -> (ChatService, Arc<PersistentHistoryStore>, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("tempdir");
    let pool = setup_database(&dir.path().join("rolechat.db"))
        .await
        .expect("Failed to setup database");

    let config = ChatConfig::from(SimpleConfig::new("You are a helpful assistant."));
    let settings = ChatSettings::default();
    let store = Arc::new(StoreFactory::history_store(pool, &config, &settings, None));

    let service = ChatService::new(config, settings, client)
        .expect("valid settings")
        .with_history(store.clone());

    (service, store, dir)
}

#[tokio::test]
async fn test_hello_round_trip_is_persisted() {
    let client = Arc::new(ScriptedClient::default().reply("Hi there!", Some(UsageInfo::new(20, 5))));
    let (service, store, _dir) = service_with_store(client.clone()).await;

    let response = service.send("Hello").await.expect("send");
    assert_eq!(response.text, "Hi there!");
    assert_eq!(response.suggested_phrases.len(), 2);

    let history = store.get_messages(None).await.expect("history");
    let turns: Vec<_> = history
        .iter()
        .map(|m| (m.role, m.content.as_str()))
        .collect();
    assert_eq!(
        turns,
        vec![
            (MessageRole::User, "Hello"),
            (MessageRole::Assistant, "Hi there!")
        ]
    );

    let session = store.session().await.expect("session");
    assert_eq!(session.total_tokens(), 25);

    // the stored user turn is the request tail, not duplicated
    let requests = client.requests.lock().unwrap();
    let contents: Vec<_> = requests[0]
        .messages
        .iter()
        .map(|m| m.content.as_str())
        .collect();
    assert_eq!(contents, vec!["You are a helpful assistant.", "Hello"]);
}

#[tokio::test]
async fn test_failed_call_leaves_only_user_message() {
    let client = Arc::new(ScriptedClient::default().fail(CompletionError::Network(
        "connection reset".to_string(),
    )));
    let (service, store, _dir) = service_with_store(client).await;

    let err = service.send("Anyone there?").await.expect_err("should fail");
    assert!(matches!(err, ChatError::ExternalApi(CompletionError::Network(_))));

    let history = store.get_messages(None).await.expect("history");
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].role, MessageRole::User);
    assert_eq!(store.session().await.expect("session").total_tokens(), 0);
}

#[tokio::test]
async fn test_second_turn_sees_first() {
    let client = Arc::new(
        ScriptedClient::default()
            .reply("Nice to meet you.", None)
            .reply("You said your name is Ana.", None),
    );
    let (service, store, _dir) = service_with_store(client.clone()).await;

    service.send("I'm Ana.").await.expect("first send");
    service.send("What's my name?").await.expect("second send");
    assert_eq!(store.message_count().await.expect("count"), 4);

    let requests = client.requests.lock().unwrap();
    let roles: Vec<_> = requests[1].messages.iter().map(|m| m.role).collect();
    assert_eq!(
        roles,
        vec![
            MessageRole::System,
            MessageRole::User,
            MessageRole::Assistant,
            MessageRole::User
        ]
    );
}
