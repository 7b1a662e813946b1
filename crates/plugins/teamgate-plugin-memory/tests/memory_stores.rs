use std::sync::Arc;
use teamgate_core::Message;
use teamgate_plugin_memory::{
    JsonFileMemoryStore, McpMemoryStore, NewMemory, DEFAULT_SEARCH_LIMIT,
};

#[tokio::test]
async fn test_create_list_search_delete() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileMemoryStore::new(dir.path());

    let mut req = NewMemory::new(
        "alice",
        vec![
            Message::user("My favourite drink is Oolong tea"),
            Message::assistant("I'll remember that"),
        ],
    );
    req.agent_id = Some("Researcher".to_string());
    req.metadata
        .insert("source".to_string(), serde_json::json!("chat"));

    let entry = store.create(req).await.unwrap();
    assert_eq!(
        entry.content,
        "My favourite drink is Oolong tea I'll remember that"
    );
    assert_eq!(entry.user_id, "alice");
    assert_eq!(entry.agent_id.as_deref(), Some("Researcher"));
    assert!(chrono::DateTime::parse_from_rfc3339(&entry.timestamp).is_ok());
    assert!(uuid::Uuid::parse_str(&entry.id).is_ok());

    store
        .create(NewMemory::new("alice", vec![Message::user("Lives in Lisbon")]))
        .await
        .unwrap();

    let all = store.list("alice").await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0], entry);

    let hits = store
        .search("alice", "oolong", DEFAULT_SEARCH_LIMIT)
        .await
        .unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, entry.id);

    assert!(store.list("bob").await.unwrap().is_empty());

    assert!(store.delete("alice").await.unwrap());
    assert!(!dir.path().join("alice_memories.json").exists());
    assert!(store.list("alice").await.unwrap().is_empty());
    assert!(!store.delete("alice").await.unwrap());
}

#[tokio::test]
async fn test_search_respects_limit() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileMemoryStore::new(dir.path());
    for i in 0..4 {
        store
            .create(NewMemory::new("u", vec![Message::user(format!("note {}", i))]))
            .await
            .unwrap();
    }

    let hits = store.search("u", "NOTE", 2).await.unwrap();
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].content, "note 0");
    assert_eq!(hits[1].content, "note 1");
}

#[tokio::test]
async fn test_concurrent_creates_keep_every_entry() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(JsonFileMemoryStore::new(dir.path()));

    let mut handles = Vec::new();
    for i in 0..20 {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            store
                .create(NewMemory::new("shared", vec![Message::user(format!("m{}", i))]))
                .await
                .unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let all = store.list("shared").await.unwrap();
    assert_eq!(all.len(), 20);
    for i in 0..20 {
        let want = format!("m{}", i);
        assert!(all.iter().any(|m| m.content == want), "missing {}", want);
    }
}

#[tokio::test]
async fn test_concurrent_mcp_adds_keep_every_entry() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(McpMemoryStore::new(dir.path()));

    let mut handles = Vec::new();
    for i in 0..10 {
        let store = Arc::clone(&store);
        let user = if i % 2 == 0 { "even" } else { "odd" };
        handles.push(tokio::spawn(async move {
            store.add(user, &format!("fact {}", i)).await.unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let even = store.list("even").await.unwrap();
    let odd = store.list("odd").await.unwrap();
    assert_eq!(even.len(), 5);
    assert_eq!(odd.len(), 5);

    let mut stamps: Vec<_> = even.iter().map(|m| m.timestamp.clone()).collect();
    stamps.sort();
    assert_eq!(stamps, vec!["1", "2", "3", "4", "5"]);
}

#[tokio::test]
async fn test_stores_share_a_directory() {
    let dir = tempfile::tempdir().unwrap();
    let files = JsonFileMemoryStore::new(dir.path());
    let mcp = McpMemoryStore::new(dir.path());

    files
        .create(NewMemory::new("carol", vec![Message::user("likes jazz")]))
        .await
        .unwrap();
    mcp.add("carol", "likes blues").await.unwrap();

    assert_eq!(files.list("carol").await.unwrap().len(), 1);
    assert_eq!(mcp.list("carol").await.unwrap().len(), 1);
    assert!(dir.path().join("carol_memories.json").exists());
    assert!(dir.path().join("memories.json").exists());
}
