use std::sync::Arc;

use defense_core::model::{BlockId, Phase, QuestionKind};
use defense_core::time::fixed_clock;
use serde_json::json;
use services::{
    FetchError, GameLauncher, HttpQuestionSource, HttpSourceConfig, LauncherError,
    QuestionSource, SessionEngine,
};
use storage::InMemoryProgressStore;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn source_for(server: &MockServer) -> HttpQuestionSource {
    HttpQuestionSource::new(HttpSourceConfig::new(server.uri())).unwrap()
}

#[tokio::test]
async fn fetches_question_set() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/questions/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "questions": [
                {
                    "id": 1,
                    "type": "text_input",
                    "text": "Which tool captures packets?",
                    "accepted_answers": ["wireshark", "tcpdump"]
                }
            ]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let set = source_for(&mock_server)
        .fetch_questions(BlockId::new(3))
        .await
        .unwrap();
    assert_eq!(set.questions.len(), 1);
    assert_eq!(set.questions[0].kind, QuestionKind::TextInput);
    assert!(set.meta.is_none());
}

#[tokio::test]
async fn lists_blocks_sorted() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/blocks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"blocks": [3, 1, 2]})))
        .mount(&mock_server)
        .await;

    let blocks = source_for(&mock_server).list_blocks().await.unwrap();
    assert_eq!(blocks, vec![BlockId::new(1), BlockId::new(2), BlockId::new(3)]);
}

#[tokio::test]
async fn maps_error_statuses() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/questions/7"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/questions/8"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let source = source_for(&mock_server);
    assert!(matches!(
        source.fetch_questions(BlockId::new(7)).await,
        Err(FetchError::NotFound(_))
    ));
    assert!(matches!(
        source.fetch_questions(BlockId::new(8)).await,
        Err(FetchError::HttpStatus(status)) if status.as_u16() == 500
    ));
}

#[tokio::test]
async fn malformed_body_never_starts_a_game() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/questions/1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&mock_server)
        .await;

    let store = InMemoryProgressStore::new();
    let mut engine = SessionEngine::new(fixed_clock(), Arc::new(store.clone()));
    let launcher = GameLauncher::new(Arc::new(source_for(&mock_server)));

    let result = launcher.start_block(&mut engine, BlockId::new(1)).await;
    assert!(matches!(
        result,
        Err(LauncherError::Fetch(FetchError::Malformed(_)))
    ));
    assert_eq!(engine.phase(), Phase::Menu);
    assert!(store.is_empty());
}
