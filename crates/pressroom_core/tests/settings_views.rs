use pressroom_core::{
    Article, ContentStore, KeyValueStore, LoadOrigin, MemoryKvStore, Settings, StorageKeys,
};
use serde_json::{json, Value};

fn new_store() -> ContentStore<MemoryKvStore> {
    ContentStore::new(MemoryKvStore::new())
}

#[test]
fn empty_store_yields_default_card_height() {
    let store = new_store();
    let loaded = store.load_settings();
    assert_eq!(loaded.origin, LoadOrigin::Default);
    assert_eq!(loaded.value.card_height, 380);
    assert_eq!(loaded.value.hero_id, Some(0));
}

#[test]
fn out_of_range_hero_is_coerced_on_save() {
    let store = new_store();
    let saved = store.save_settings_value(&json!({ "heroId": 999 }));
    assert_eq!(saved.hero_id, Some(0));

    let typed = store.save_settings(&Settings {
        hero_id: Some(999),
        ..Settings::default()
    });
    assert_eq!(typed.hero_id, Some(0));
}

#[test]
fn saved_settings_are_exactly_what_was_persisted() {
    let store = new_store();
    let keys = StorageKeys::default();
    let saved = store.save_settings_value(&json!({
        "homeLatestIds": [2, 2, 9],
        "footerIds": [1, "x", 1, 0],
        "cardHeight": 9000
    }));
    assert_eq!(saved.home_latest_ids, vec![2]);
    assert_eq!(saved.footer_ids, vec![1, 0]);
    assert_eq!(saved.card_height, 800);

    let raw: Value =
        serde_json::from_str(&store.substrate().get(&keys.settings).unwrap().unwrap()).unwrap();
    assert_eq!(raw, serde_json::to_value(&saved).unwrap());
    assert_eq!(store.settings(), saved);
}

#[test]
fn malformed_settings_recover_from_backup() {
    let store = new_store();
    let keys = StorageKeys::default();
    store.save_settings_value(&json!({ "heroId": 2, "cardHeight": 500 }));

    store.substrate().set(&keys.settings, "{oops").unwrap();
    let loaded = store.load_settings();
    assert_eq!(loaded.origin, LoadOrigin::Backup);
    assert_eq!(loaded.value.hero_id, Some(2));
    assert_eq!(loaded.value.card_height, 500);
}

#[test]
fn no_articles_means_no_picks_and_empty_views() {
    let store = new_store();
    store.save_articles(Vec::new());

    let settings = store.settings();
    assert_eq!(settings.hero_id, None);
    assert_eq!(settings.featured_id, None);
    assert!(settings.home_latest_ids.is_empty());
    assert!(settings.home_featured_ids.is_empty());

    assert!(store.hero_article().is_none());
    assert!(store.featured_article().is_none());
    assert!(store.footer_articles().is_empty());
    assert!(store.home_latest_articles().is_empty());
}

#[test]
fn views_resolve_settings_in_order() {
    let store = new_store();
    store.save_settings(&Settings {
        hero_id: Some(2),
        featured_id: Some(1),
        footer_ids: vec![2, 0],
        home_featured_ids: vec![1, 2],
        ..Settings::default()
    });
    let articles = store.articles();

    let hero = store.hero_article().unwrap();
    assert_eq!(hero.index, 2);
    assert_eq!(hero.article, articles[2]);
    assert_eq!(store.featured_article().unwrap().index, 1);

    let footer: Vec<usize> = store.footer_articles().iter().map(|p| p.index).collect();
    assert_eq!(footer, vec![2, 0]);
    let featured: Vec<usize> = store
        .home_featured_articles()
        .iter()
        .map(|p| p.index)
        .collect();
    assert_eq!(featured, vec![1, 2]);
    let latest: Vec<usize> = store
        .home_latest_articles()
        .iter()
        .map(|p| p.index)
        .collect();
    assert_eq!(latest, vec![0, 1, 2]);
}

#[test]
fn tag_cloud_groups_case_and_whitespace_variants() {
    let store = new_store();
    store.save_articles(vec![
        Article::new("a", "").with_tags(["Rust", "  web   dev "]),
        Article::new("b", "").with_tags(["rust", "Web dev"]),
        Article::new("c", "").with_tags(["rust", "", "cli"]),
    ]);

    let cloud = store.tag_cloud();
    let counts: Vec<(String, usize)> = cloud
        .into_iter()
        .map(|entry| (entry.tag.to_lowercase(), entry.count))
        .collect();
    assert_eq!(
        counts,
        vec![
            ("rust".to_string(), 3),
            ("web dev".to_string(), 2),
            ("cli".to_string(), 1),
        ]
    );
}

#[test]
fn line_share_url_encodes_target_and_account() {
    let store = new_store();
    let url = store.line_share_url("https://example.com/a?x=1&y=2");
    assert!(url.starts_with("https://social-plugins.line.me/lineit/share?url="));
    assert!(url.contains("https%3A%2F%2Fexample.com%2Fa%3Fx%3D1%26y%3D2"));
    assert!(url.contains("accountId=%40pressroom_official"));
}
