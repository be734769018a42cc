//! Behavior tests for [`ChatSession`] against a scripted model.

use std::sync::Arc;

use aula_model::{APOLOGY, ChatMessage, ChatSession, MockChatModel, ModelError, Role};
use proptest::prelude::*;

fn remote_failure() -> ModelError {
    ModelError::RemoteCall { provider: "mock".into(), message: "connection reset".into() }
}

#[tokio::test]
async fn successful_turn_appends_user_and_assistant() {
    let model = Arc::new(MockChatModel::new().with_reply("  Hi there!  "));
    let mut session = ChatSession::new(model.clone(), "You are friendly.");

    let reply = session.talk("Hello").await.unwrap();

    assert_eq!(reply, "Hi there!");
    assert_eq!(
        session.history(),
        &[
            ChatMessage::system("You are friendly."),
            ChatMessage::user("Hello"),
            ChatMessage::assistant("Hi there!"),
        ]
    );
    assert_eq!(model.requests()[0].len(), 2);
}

#[tokio::test]
async fn failed_turn_leaves_history_unchanged() {
    let model = Arc::new(MockChatModel::new().with_reply("first").with_failure(remote_failure()));
    let mut session = ChatSession::new(model, "sys");
    session.talk("one").await.unwrap();
    let before = session.history().to_vec();

    let err = session.talk("two").await.unwrap_err();

    assert_eq!(err, remote_failure());
    assert_eq!(session.history(), before.as_slice());
}

#[tokio::test]
async fn user_can_retry_after_failure() {
    let model = Arc::new(MockChatModel::new().with_failure(remote_failure()).with_reply("ok"));
    let mut session = ChatSession::new(model.clone(), "sys");

    assert!(session.talk("question").await.is_err());
    assert_eq!(session.talk("question").await.unwrap(), "ok");

    assert_eq!(session.history().len(), 3);
    // Both attempts sent the same request; the failed one left no trace.
    let requests = model.requests();
    assert_eq!(requests[0], requests[1]);
}

#[tokio::test]
async fn reply_turns_errors_into_apology() {
    let model = Arc::new(MockChatModel::new().with_failure(ModelError::Auth {
        provider: "mock".into(),
        message: "bad key".into(),
    }));
    let mut session = ChatSession::new(model, "sys");

    assert_eq!(session.reply("hola").await, APOLOGY);
    assert_eq!(session.history().len(), 1);
}

#[tokio::test]
async fn blank_reply_is_an_error_and_rolls_back() {
    let model = Arc::new(MockChatModel::new().with_reply("   "));
    let mut session = ChatSession::new(model, "sys");

    let err = session.talk("hello").await.unwrap_err();
    assert!(matches!(err, ModelError::EmptyResponse { .. }));
    assert_eq!(session.history().len(), 1);
}

#[tokio::test]
async fn request_is_windowed_before_sending() {
    let model = Arc::new(MockChatModel::new());
    let mut session = ChatSession::new(model.clone(), "historian").with_max_history(1);

    session.talk("a").await.unwrap();
    session.talk("b").await.unwrap();

    let requests = model.requests();
    let last = requests.last().unwrap();
    // system + the last two messages of (history + new user message)
    assert_eq!(last.len(), 3);
    assert_eq!(last[0], ChatMessage::system("historian"));
    assert_eq!(last[1], ChatMessage::assistant("echo: a"));
    assert_eq!(last[2], ChatMessage::user("b"));
}

#[tokio::test]
async fn reset_keeps_only_system_prompt() {
    let mut session = ChatSession::new(Arc::new(MockChatModel::new()), "sys");
    session.talk("x").await.unwrap();
    session.reset();
    assert_eq!(session.history(), &[ChatMessage::system("sys")]);
    assert_eq!(session.system_prompt(), "sys");
}

#[test]
fn zero_history_limit_is_raised_to_one_pair() {
    let session = ChatSession::new(Arc::new(MockChatModel::new()), "sys").with_max_history(0);
    assert_eq!(session.max_history_pairs(), Some(1));
}

/// After any number of turns past the limit, the conversation is the system
/// prompt followed by exactly `2 × max_history_pairs` messages, newest last.
mod prop_sliding_window {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        #[test]
        fn system_pinned_and_window_exact(max_pairs in 1usize..6, extra in 1usize..8) {
            let turns = max_pairs + extra;
            let rt = tokio::runtime::Runtime::new().unwrap();
            let history = rt.block_on(async {
                let mut session = ChatSession::new(Arc::new(MockChatModel::new()), "sys")
                    .with_max_history(max_pairs);
                for i in 0..turns {
                    session.talk(format!("msg {i}")).await.unwrap();
                }
                session.history().to_vec()
            });

            prop_assert_eq!(history.len(), 2 * max_pairs + 1);
            prop_assert_eq!(history[0].role, Role::System);
            prop_assert!(history[1..].iter().all(|m| m.role != Role::System));
            let last_user = format!("msg {}", turns - 1);
            prop_assert_eq!(&history[history.len() - 2].content, &last_user);
        }
    }
}
