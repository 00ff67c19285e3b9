use pressroom_core::{
    seed_articles, Article, ContentStore, CopyDocument, CopyExtra, CopyField, ImportError,
    KeyValueStore, LoadOrigin, MemoryKvStore, NewComment, PageLink, Settings, StorageKeys,
};
use serde_json::{json, Value};
use std::collections::BTreeMap;

fn new_store() -> ContentStore<MemoryKvStore> {
    ContentStore::new(MemoryKvStore::new())
}

fn populated_store() -> ContentStore<MemoryKvStore> {
    let store = new_store();
    store.save_articles(vec![
        Article::new("one", "first body").with_tags(["a", "b"]),
        Article::new("two", "second body").with_image("/img/two.png"),
        Article::new("three", ""),
    ]);
    store.save_settings(&Settings {
        hero_id: Some(1),
        featured_id: Some(2),
        footer_ids: vec![2, 0],
        home_latest_ids: vec![1],
        home_featured_ids: vec![0, 2],
        card_height: 420,
    });
    store.save_copy(&CopyDocument::default().with(CopyField::HeroTitle, "Welcome"));
    store.save_copy_extras(vec![CopyExtra::new("extra note")]);
    store.save_page_links(&[PageLink::new("home", "Home", "", "/")]);
    store.add_comment_at(1, NewComment::new("nice").by("kai"));
    store
}

fn dump(store: &ContentStore<MemoryKvStore>) -> BTreeMap<String, Option<String>> {
    store
        .substrate()
        .keys()
        .into_iter()
        .map(|key| {
            let value = store.substrate().get(&key).unwrap();
            (key, value)
        })
        .collect()
}

#[test]
fn import_of_export_reproduces_every_sub_store() {
    let source = populated_store();
    let snapshot = source.export();
    assert_eq!(snapshot.version, 1);

    let target = new_store();
    let bundle = target
        .import_state(&serde_json::to_value(&snapshot).unwrap())
        .unwrap();

    assert_eq!(bundle.articles, source.articles());
    assert_eq!(target.articles(), source.articles());
    assert_eq!(target.settings(), source.settings());
    assert_eq!(target.copy(), source.copy());
    assert_eq!(target.copy_extras(), source.copy_extras());
    assert_eq!(target.page_links(), source.page_links());
    assert_eq!(target.comment_map(), source.comment_map());
}

#[test]
fn import_of_non_object_is_rejected_and_store_untouched() {
    let store = populated_store();
    let before = dump(&store);

    for payload in [Value::Null, json!([1, 2]), json!("text"), json!(4)] {
        let err = store.import_state(&payload).unwrap_err();
        assert!(matches!(err, ImportError::InvalidPayload(_)));
    }
    assert!(matches!(
        store.import_json("{not json").unwrap_err(),
        ImportError::InvalidPayload(_)
    ));
    assert_eq!(dump(&store), before);
}

#[test]
fn wrong_shaped_sections_fall_back_to_empty_or_default() {
    let store = new_store();
    let bundle = store
        .import_state(&json!({
            "articles": "not-an-array",
            "settings": 7,
            "copy": [],
            "copyExtras": {},
            "comments": []
        }))
        .unwrap();

    assert!(bundle.articles.is_empty());
    assert!(store.articles().is_empty());
    assert_eq!(bundle.settings.hero_id, None);
    assert_eq!(bundle.settings.card_height, 380);
    assert_eq!(bundle.copy, CopyDocument::defaults());
    assert!(bundle.copy_extras.is_empty());
    assert_eq!(bundle.page_links.len(), 6);
    assert!(bundle.comments.is_empty());
}

#[test]
fn imported_settings_are_normalized_against_imported_articles() {
    let store = new_store();
    let bundle = store
        .import_state(&json!({
            "articles": [{ "title": "only one" }, { "title": "two" }],
            "settings": { "heroId": 5, "footerIds": [1, 1, 4], "cardHeight": 10 }
        }))
        .unwrap();

    assert_eq!(bundle.settings.hero_id, Some(0));
    assert_eq!(bundle.settings.footer_ids, vec![1]);
    assert_eq!(bundle.settings.card_height, 240);
    assert_eq!(store.settings(), bundle.settings);
}

#[test]
fn import_assigns_ids_and_moves_positional_comments() {
    let store = new_store();
    let bundle = store
        .import_state(&json!({
            "articles": [{ "title": "a" }, { "title": "b" }],
            "comments": { "0": [{ "author": "x", "body": "hey", "createdAt": 10 }] }
        }))
        .unwrap();

    let first_id = &bundle.articles[0].id;
    assert!(!first_id.is_empty());
    assert_eq!(store.comments(first_id)[0].body, "hey");
    assert!(store.comments("0").is_empty());
}

#[test]
fn import_stamps_backup_with_imported_at() {
    let store = new_store();
    store.import_state(&json!({ "articles": [] })).unwrap();

    let backup = store.latest_backup().unwrap();
    assert!(backup.imported_at.is_some());
    assert!(backup.articles.is_empty());
}

#[test]
fn every_mutator_refreshes_the_backup() {
    let store = new_store();
    store.save_copy(&CopyDocument::default().with(CopyField::PinnedTitle, "Picks"));
    let backup = store.latest_backup().unwrap();
    assert_eq!(backup.copy.get(CopyField::PinnedTitle), "Picks");
    assert_eq!(backup.articles, seed_articles());

    let id = store.articles()[0].id.clone();
    store.add_comment(&id, NewComment::new("backed up"));
    let backup = store.latest_backup().unwrap();
    assert_eq!(backup.comments[&id][0].body, "backed up");
    assert_eq!(backup.copy.get(CopyField::PinnedTitle), "Picks");
}

#[test]
fn wiped_primary_keys_are_served_from_backup_and_restorable() {
    let store = populated_store();
    let keys = StorageKeys::default();
    let expected_articles = store.articles();
    let expected_settings = store.settings();

    for key in [&keys.articles, &keys.settings, &keys.copy, &keys.page_links] {
        store.substrate().remove(key).unwrap();
    }
    let loaded = store.load_articles();
    assert_eq!(loaded.origin, LoadOrigin::Backup);
    assert_eq!(loaded.value, expected_articles);
    assert_eq!(store.load_settings().origin, LoadOrigin::Backup);

    store.restore_from_backup().unwrap();
    let loaded = store.load_articles();
    assert_eq!(loaded.origin, LoadOrigin::Primary);
    assert_eq!(loaded.value, expected_articles);
    assert_eq!(store.settings(), expected_settings);
    assert_eq!(store.load_page_links().origin, LoadOrigin::Primary);
}

#[test]
fn restore_without_backup_is_invalid_payload() {
    let store = new_store();
    assert!(matches!(
        store.restore_from_backup().unwrap_err(),
        ImportError::InvalidPayload(_)
    ));
}

#[test]
fn legacy_array_backup_still_recovers_articles() {
    let store = new_store();
    let keys = StorageKeys::default();
    store
        .substrate()
        .set(&keys.backup, r#"[{"title": "old"}]"#)
        .unwrap();

    let loaded = store.load_articles();
    assert_eq!(loaded.origin, LoadOrigin::Backup);
    assert_eq!(loaded.value[0].title, "old");
    assert!(!loaded.value[0].id.is_empty());
}

#[test]
fn import_surfaces_storage_failures() {
    let store = ContentStore::new(MemoryKvStore::with_quota(64));
    let err = store
        .import_state(&json!({ "articles": [{ "title": "big", "body": "x".repeat(500) }] }))
        .unwrap_err();

    assert!(matches!(err, ImportError::Storage(_)));
    assert!(store.substrate().is_empty());
}

#[test]
fn mutators_tolerate_storage_failures() {
    let store = ContentStore::new(MemoryKvStore::with_quota(64));

    let result = store.save_articles(vec![Article::new("big", "y".repeat(500))]);
    assert_eq!(result, seed_articles());

    let settings = store.save_settings_value(&json!({ "heroId": 2 }));
    assert_eq!(settings, store.settings());

    let export = store.export();
    assert_eq!(export.articles, seed_articles());
}

#[test]
fn import_gives_duplicate_article_ids_fresh_ones() {
    let store = new_store();
    let bundle = store
        .import_state(&json!({
            "articles": [{ "id": "x", "title": "a" }, { "id": "x", "title": "b" }],
            "comments": { "x": [{ "author": "p", "body": "for a", "createdAt": 1 }] }
        }))
        .unwrap();

    assert_eq!(bundle.articles[0].id, "x");
    assert_ne!(bundle.articles[1].id, "x");
    assert_eq!(store.comments_at(0)[0].body, "for a");
    assert!(store.comments_at(1).is_empty());
    assert_eq!(store.find_article_by_id("x").unwrap().index, 0);
}
