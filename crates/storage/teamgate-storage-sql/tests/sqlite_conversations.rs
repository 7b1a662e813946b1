//! Chat history round trips against SQLite

use teamgate_core::{ConversationStore, TeamgateError};
use teamgate_storage_sql::SqliteConversationStore;

async fn memory_store() -> SqliteConversationStore {
    SqliteConversationStore::new("sqlite::memory:").await.unwrap()
}

#[tokio::test]
async fn test_conversation_round_trip() {
    let store = memory_store().await;

    let conv = store.create_conversation("Market study").await.unwrap();
    assert!(conv.id > 0);
    assert_eq!(conv.created_at, conv.updated_at);

    store
        .add_message(conv.id, "user", "analyze the market", None)
        .await
        .unwrap();
    let reply = store
        .add_message(conv.id, "assistant", "Here is the analysis", Some("Research"))
        .await
        .unwrap();
    assert_eq!(reply.model_used.as_deref(), Some("Research"));

    let messages = store.messages(conv.id).await.unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, "user");
    assert!(messages[0].model_used.is_none());
    assert_eq!(messages[1], reply);

    let fetched = store.get_conversation(conv.id).await.unwrap().unwrap();
    assert_eq!(fetched.title, "Market study");
    assert!(fetched.updated_at >= conv.updated_at);
}

#[tokio::test]
async fn test_list_orders_by_recent_activity() {
    let store = memory_store().await;
    let first = store.create_conversation("first").await.unwrap();
    let second = store.create_conversation("second").await.unwrap();

    let ids: Vec<i64> = store
        .list_conversations()
        .await
        .unwrap()
        .iter()
        .map(|c| c.id)
        .collect();
    assert_eq!(ids, vec![second.id, first.id]);

    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    store.add_message(first.id, "user", "bump", None).await.unwrap();

    let ids: Vec<i64> = store
        .list_conversations()
        .await
        .unwrap()
        .iter()
        .map(|c| c.id)
        .collect();
    assert_eq!(ids, vec![first.id, second.id]);
}

#[tokio::test]
async fn test_message_for_unknown_conversation() {
    let store = memory_store().await;
    let err = store.add_message(42, "user", "hi", None).await.unwrap_err();
    assert!(matches!(err, TeamgateError::NotFound(_)));
    assert!(store.messages(42).await.unwrap().is_empty());
    assert!(store.get_conversation(42).await.unwrap().is_none());
}

#[tokio::test]
async fn test_delete_conversation() {
    let store = memory_store().await;
    let conv = store.create_conversation("temp").await.unwrap();
    store.add_message(conv.id, "user", "x", None).await.unwrap();

    assert!(store.delete_conversation(conv.id).await.unwrap());
    assert!(store.messages(conv.id).await.unwrap().is_empty());
    assert!(!store.delete_conversation(conv.id).await.unwrap());
}

#[tokio::test]
async fn test_file_database_persists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("chat.sqlite");
    let url = format!("sqlite://{}", path.display());

    let store = SqliteConversationStore::new(&url).await.unwrap();
    let conv = store.create_conversation("kept").await.unwrap();
    store.add_message(conv.id, "user", "hello", None).await.unwrap();
    store.close().await;

    let reopened = SqliteConversationStore::new(&url).await.unwrap();
    let convs = reopened.list_conversations().await.unwrap();
    assert_eq!(convs.len(), 1);
    assert_eq!(reopened.messages(conv.id).await.unwrap()[0].content, "hello");
}
