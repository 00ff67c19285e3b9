use pressroom_core::{ContentStore, KeyValueStore, MemoryKvStore, NewComment, StorageKeys, StoreConfig};

fn new_store() -> ContentStore<MemoryKvStore> {
    ContentStore::new(MemoryKvStore::new())
}

#[test]
fn blank_body_does_not_grow_the_list() {
    let store = new_store();
    let id = store.articles()[0].id.clone();
    store.add_comment(&id, NewComment::new("hello"));

    let after = store.add_comment(&id, NewComment::new("   \n"));
    assert_eq!(after.len(), 1);
    assert_eq!(store.comments(&id).len(), 1);
}

#[test]
fn blank_article_id_writes_nothing() {
    let store = new_store();
    let keys = StorageKeys::default();

    assert!(store.add_comment("  ", NewComment::new("orphan")).is_empty());
    assert!(store.substrate().get(&keys.comments).unwrap().is_none());
}

#[test]
fn list_is_capped_newest_first() {
    let store = new_store();
    let id = store.articles()[1].id.clone();
    for n in 0..101 {
        store.add_comment(&id, NewComment::new(format!("comment {n}")));
    }

    let list = store.comments(&id);
    assert_eq!(list.len(), 100);
    assert_eq!(list[0].body, "comment 100");
    assert_eq!(list[99].body, "comment 1");
}

#[test]
fn comment_limit_is_configurable() {
    let config = StoreConfig {
        comment_limit: 2,
        ..StoreConfig::default()
    };
    let store = ContentStore::with_config(MemoryKvStore::new(), config);
    for body in ["one", "two", "three"] {
        store.add_comment_at(0, NewComment::new(body));
    }
    let bodies: Vec<String> = store.comments_at(0).into_iter().map(|c| c.body).collect();
    assert_eq!(bodies, vec!["three", "two"]);
}

#[test]
fn author_and_body_are_trimmed_with_anonymous_fallback() {
    let store = new_store();
    let id = store.articles()[0].id.clone();

    let list = store.add_comment(&id, NewComment::new("  first  "));
    assert_eq!(list[0].author, "anonymous");
    assert_eq!(list[0].body, "first");

    let list = store.add_comment(&id, NewComment::new("second").by("  Mika "));
    assert_eq!(list[0].author, "Mika");
    assert_ne!(list[0].id, list[1].id);
    assert!(list[0].created_at >= list[1].created_at);
}

#[test]
fn malformed_comment_map_recovers_from_backup() {
    let store = new_store();
    let keys = StorageKeys::default();
    let id = store.articles()[2].id.clone();
    store.add_comment(&id, NewComment::new("kept"));

    store.substrate().set(&keys.comments, "not json").unwrap();
    assert_eq!(store.comments(&id)[0].body, "kept");
    assert_eq!(
        store.substrate().get(&keys.comments).unwrap().as_deref(),
        Some("not json")
    );
}

#[test]
fn positional_keys_move_onto_assigned_article_ids() {
    let store = new_store();
    let keys = StorageKeys::default();
    store
        .substrate()
        .set(&keys.articles, r#"[{"title": "a"}, {"title": "b"}]"#)
        .unwrap();
    store
        .substrate()
        .set(
            &keys.comments,
            r#"{"1": [{"id": "c1", "author": "x", "body": "hi", "createdAt": 1}]}"#,
        )
        .unwrap();

    let articles = store.articles();
    let moved = store.comments(&articles[1].id);
    assert_eq!(moved.len(), 1);
    assert_eq!(moved[0].id, "c1");
    assert!(store.comments("1").is_empty());
    assert_eq!(store.comments_at(1), moved);
}

#[test]
fn comments_for_unknown_article_are_empty() {
    let store = new_store();
    assert!(store.comments("nope").is_empty());
    assert!(store.comments_at(42).is_empty());
    assert!(store.add_comment_at(42, NewComment::new("x")).is_empty());
}

#[test]
fn stored_comments_without_author_use_the_configured_fallback() {
    let config = StoreConfig {
        anonymous_author: "guest".to_string(),
        ..StoreConfig::default()
    };
    let store = ContentStore::with_config(MemoryKvStore::new(), config);
    let id = store.articles()[0].id.clone();
    store
        .substrate()
        .set(
            &store.config().keys.comments,
            &format!(r#"{{"{id}": [{{"body": "hi", "createdAt": 1}}]}}"#),
        )
        .unwrap();

    assert_eq!(store.comments(&id)[0].author, "guest");
}
