//! Content store use-case service.
//!
//! # Responsibility
//! - Expose load/save entry points for every sub-store over one injected
//!   substrate.
//! - Refresh the backup snapshot after every successful mutation.
//! - Derive hero/featured/footer/carousel views and the tag cloud.
//!
//! # Invariants
//! - Reads are infinitely tolerant: they always return a usable value.
//! - Mutations use the tolerant write policy: a substrate failure is logged,
//!   nothing else is written, and the currently persisted value is returned.
//! - Settings are normalized against the live article count on every load
//!   and every save.

use crate::config::StoreConfig;
use crate::kv::KeyValueStore;
use crate::model::article::{ensure_article_ids, Article};
use crate::model::comment::{rekey_positional, Comment, CommentMap, NewComment};
use crate::model::copy::{normalize_copy_extras, CopyDocument, CopyExtra};
use crate::model::page_link::{normalize_page_link_list, normalize_page_links, PageLink};
use crate::model::settings::{normalize_settings, Settings};
use crate::model::snapshot::SnapshotOverrides;
use crate::model::{generate_id, now_epoch_ms};
use crate::repo::article_repo::ArticleRepository;
use crate::repo::backup_repo::BackupRepository;
use crate::repo::comment_repo::CommentRepository;
use crate::repo::copy_repo::CopyRepository;
use crate::repo::page_link_repo::PageLinkRepository;
use crate::repo::settings_repo::SettingsRepository;
use crate::repo::Loaded;
use crate::service::tolerate;
use crate::service::views::{
    build_line_share_url, derive_tag_cloud, lookup, place_articles, ArticleLookup,
    PlacedArticle, TagCount,
};
use log::info;
use serde_json::Value;

/// Publishing content store over an injected key-value substrate.
pub struct ContentStore<S: KeyValueStore> {
    pub(crate) store: S,
    pub(crate) config: StoreConfig,
}

impl<S: KeyValueStore> ContentStore<S> {
    /// Creates a store with default keys and limits.
    pub fn new(store: S) -> Self {
        Self::with_config(store, StoreConfig::default())
    }

    pub fn with_config(store: S, config: StoreConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// The underlying substrate.
    pub fn substrate(&self) -> &S {
        &self.store
    }

    pub fn into_substrate(self) -> S {
        self.store
    }

    pub(crate) fn article_repo(&self) -> ArticleRepository<'_, S> {
        let keys = &self.config.keys;
        ArticleRepository::new(&self.store, &keys.articles, &keys.backup)
    }

    pub(crate) fn settings_repo(&self) -> SettingsRepository<'_, S> {
        let keys = &self.config.keys;
        SettingsRepository::new(&self.store, &keys.settings, &keys.backup)
    }

    pub(crate) fn copy_repo(&self) -> CopyRepository<'_, S> {
        let keys = &self.config.keys;
        CopyRepository::new(&self.store, &keys.copy, &keys.copy_extras, &keys.backup)
    }

    pub(crate) fn page_link_repo(&self) -> PageLinkRepository<'_, S> {
        let keys = &self.config.keys;
        PageLinkRepository::new(&self.store, &keys.page_links, &keys.backup)
    }

    pub(crate) fn comment_repo(&self) -> CommentRepository<'_, S> {
        let keys = &self.config.keys;
        CommentRepository::new(
            &self.store,
            &keys.comments,
            &keys.backup,
            &self.config.anonymous_author,
        )
    }

    pub(crate) fn backup_repo(&self) -> BackupRepository<'_, S> {
        BackupRepository::new(&self.store, &self.config.keys.backup)
    }

    // ---- articles -------------------------------------------------------

    /// Loads articles, assigning stable ids to legacy entries.
    ///
    /// # Side effects
    /// - Writes a bootstrap backup when none exists.
    /// - Persists newly assigned ids and moves positional comment keys onto them.
    pub fn load_articles(&self) -> Loaded<Vec<Article>> {
        let mut loaded = self.article_repo().load();
        if ensure_article_ids(&mut loaded.value)
            && tolerate(self.article_repo().save(&loaded.value), "article_ids_assign")
        {
            info!(
                "event=article_ids_assign module=service status=ok articles={}",
                loaded.value.len()
            );
            self.rekey_comments(&loaded.value);
        }
        loaded
    }

    pub fn articles(&self) -> Vec<Article> {
        self.load_articles().into_value()
    }

    /// Persists the list and refreshes the backup. Missing ids are assigned.
    pub fn save_articles(&self, mut articles: Vec<Article>) -> Vec<Article> {
        ensure_article_ids(&mut articles);
        if !tolerate(self.article_repo().save(&articles), "articles_save") {
            return self.articles();
        }
        self.export_state(SnapshotOverrides {
            articles: Some(articles.clone()),
            ..SnapshotOverrides::default()
        });
        articles
    }

    /// Replaces the article at `index` when valid, otherwise prepends.
    ///
    /// An in-place replacement keeps the existing id unless `article` brings
    /// its own unused one. A prepended article whose id is already taken gets
    /// a fresh id. Returns the new full list.
    pub fn upsert_article(&self, mut article: Article, index: Option<usize>) -> Vec<Article> {
        let mut list = self.articles();
        match index.filter(|index| *index < list.len()) {
            Some(index) => {
                if article.id.trim().is_empty() || id_taken(&list, Some(index), &article.id) {
                    article.id = list[index].id.clone();
                }
                list[index] = article;
            }
            None => {
                if !article.ensure_id() && id_taken(&list, None, &article.id) {
                    article.id = generate_id();
                }
                list.insert(0, article);
            }
        }
        self.save_articles(list)
    }

    /// Removes the article at `index`. An invalid index is "nothing to delete".
    pub fn delete_article(&self, index: usize) -> Vec<Article> {
        let mut list = self.articles();
        if index >= list.len() {
            return list;
        }
        let removed = list.remove(index);
        info!(
            "event=article_delete module=service status=ok index={index} id={}",
            removed.id
        );
        self.save_articles(list)
    }

    /// Positional lookup; missing or invalid indices clamp to 0.
    pub fn find_article(&self, index: Option<usize>) -> ArticleLookup {
        lookup(self.articles(), index)
    }

    /// Lookup by stable id, with the article's current position.
    pub fn find_article_by_id(&self, id: &str) -> Option<PlacedArticle> {
        self.articles()
            .into_iter()
            .enumerate()
            .find(|(_, article)| article.id == id)
            .map(|(index, article)| PlacedArticle { index, article })
    }

    // ---- settings -------------------------------------------------------

    /// Loads settings normalized against the current article list.
    pub fn load_settings(&self) -> Loaded<Settings> {
        let count = self.articles().len();
        self.settings_repo().load(count)
    }

    pub fn settings(&self) -> Settings {
        self.load_settings().into_value()
    }

    /// Normalizes against the current article list, persists, and returns
    /// exactly what was written.
    pub fn save_settings(&self, settings: &Settings) -> Settings {
        let normalized = settings.normalized(self.articles().len());
        self.persist_settings(normalized)
    }

    /// Like `save_settings`, for untyped (possibly malformed) input.
    pub fn save_settings_value(&self, raw: &Value) -> Settings {
        let normalized = normalize_settings(raw, self.articles().len());
        self.persist_settings(normalized)
    }

    fn persist_settings(&self, normalized: Settings) -> Settings {
        if !tolerate(self.settings_repo().save(&normalized), "settings_save") {
            return self.settings();
        }
        self.export_state(SnapshotOverrides {
            settings: Some(normalized.clone()),
            ..SnapshotOverrides::default()
        });
        normalized
    }

    // ---- copy -----------------------------------------------------------

    pub fn load_copy(&self) -> Loaded<CopyDocument> {
        self.copy_repo().load_copy()
    }

    pub fn copy(&self) -> CopyDocument {
        self.load_copy().into_value()
    }

    /// Merges `partial` over defaults, persists and returns the full document.
    pub fn save_copy(&self, partial: &CopyDocument) -> CopyDocument {
        let merged = partial.merged_over_defaults();
        if !tolerate(self.copy_repo().save_copy(&merged), "copy_save") {
            return self.copy();
        }
        self.export_state(SnapshotOverrides {
            copy: Some(merged.clone()),
            ..SnapshotOverrides::default()
        });
        merged
    }

    /// Loads extras; legacy entries without ids get one persisted.
    pub fn load_copy_extras(&self) -> Loaded<Vec<CopyExtra>> {
        let loaded = self.copy_repo().load_extras();
        let origin = loaded.origin;
        let (extras, assigned) = normalize_copy_extras(loaded.value);
        if assigned {
            tolerate(self.copy_repo().save_extras(&extras), "copy_extras_ids_assign");
        }
        Loaded::new(extras, origin)
    }

    pub fn copy_extras(&self) -> Vec<CopyExtra> {
        self.load_copy_extras().into_value()
    }

    /// Drops blank snippets, assigns ids, persists and returns the list.
    pub fn save_copy_extras(&self, extras: Vec<CopyExtra>) -> Vec<CopyExtra> {
        let (normalized, _) = normalize_copy_extras(extras);
        if !tolerate(self.copy_repo().save_extras(&normalized), "copy_extras_save") {
            return self.copy_extras();
        }
        self.export_state(SnapshotOverrides {
            copy_extras: Some(normalized.clone()),
            ..SnapshotOverrides::default()
        });
        normalized
    }

    // ---- page links -----------------------------------------------------

    pub fn load_page_links(&self) -> Loaded<Vec<PageLink>> {
        self.page_link_repo().load()
    }

    pub fn page_links(&self) -> Vec<PageLink> {
        self.load_page_links().into_value()
    }

    pub fn save_page_links(&self, links: &[PageLink]) -> Vec<PageLink> {
        self.persist_page_links(normalize_page_link_list(links))
    }

    /// Untyped variant: a non-array payload resets to the default registry.
    pub fn save_page_links_value(&self, raw: &Value) -> Vec<PageLink> {
        self.persist_page_links(normalize_page_links(raw))
    }

    fn persist_page_links(&self, normalized: Vec<PageLink>) -> Vec<PageLink> {
        if !tolerate(self.page_link_repo().save(&normalized), "page_links_save") {
            return self.page_links();
        }
        self.export_state(SnapshotOverrides {
            page_links: Some(normalized.clone()),
            ..SnapshotOverrides::default()
        });
        normalized
    }

    // ---- comments -------------------------------------------------------

    pub fn comment_map(&self) -> CommentMap {
        self.comment_repo().load_map().into_value()
    }

    /// Comments for one article id, newest first.
    pub fn comments(&self, article_id: &str) -> Vec<Comment> {
        self.comment_map()
            .remove(article_id.trim())
            .unwrap_or_default()
    }

    /// Comments for the article currently at `index`.
    pub fn comments_at(&self, index: usize) -> Vec<Comment> {
        match self.articles().get(index) {
            Some(article) => self.comments(&article.id),
            None => Vec::new(),
        }
    }

    /// Prepends a comment and caps the list.
    ///
    /// A blank article id or a body that trims to empty leaves the list
    /// unchanged. Returns the resulting list for `article_id`.
    pub fn add_comment(&self, article_id: &str, comment: NewComment) -> Vec<Comment> {
        let article_id = article_id.trim();
        if article_id.is_empty() {
            return Vec::new();
        }

        let mut map = self.comment_map();
        let existing = map.get(article_id).cloned().unwrap_or_default();
        let body = comment.body.trim();
        if body.is_empty() {
            return existing;
        }

        let author = comment
            .author
            .as_deref()
            .map(str::trim)
            .filter(|author| !author.is_empty())
            .unwrap_or(self.config.anonymous_author.as_str())
            .to_string();
        let mut next = Vec::with_capacity(existing.len() + 1);
        next.push(Comment {
            id: generate_id(),
            author,
            body: body.to_string(),
            created_at: now_epoch_ms(),
        });
        next.extend(existing.iter().cloned());
        next.truncate(self.config.comment_limit);

        map.insert(article_id.to_string(), next.clone());
        if !tolerate(self.comment_repo().save_map(&map), "comment_add") {
            return existing;
        }
        self.export_state(SnapshotOverrides {
            comments: Some(map),
            ..SnapshotOverrides::default()
        });
        next
    }

    /// `add_comment` for the article currently at `index`.
    pub fn add_comment_at(&self, index: usize, comment: NewComment) -> Vec<Comment> {
        match self.articles().get(index) {
            Some(article) => self.add_comment(&article.id, comment),
            None => Vec::new(),
        }
    }

    fn rekey_comments(&self, articles: &[Article]) {
        let mut map = self.comment_repo().load_map().into_value();
        if rekey_positional(&mut map, articles) {
            tolerate(self.comment_repo().save_map(&map), "comments_rekey");
        }
    }

    // ---- derived views --------------------------------------------------

    fn articles_with_settings(&self) -> (Vec<Article>, Settings) {
        let articles = self.articles();
        let settings = self.settings_repo().load(articles.len()).into_value();
        (articles, settings)
    }

    pub fn hero_article(&self) -> Option<PlacedArticle> {
        let (articles, settings) = self.articles_with_settings();
        single_view(articles, settings.hero_id)
    }

    pub fn featured_article(&self) -> Option<PlacedArticle> {
        let (articles, settings) = self.articles_with_settings();
        single_view(articles, settings.featured_id)
    }

    pub fn footer_articles(&self) -> Vec<PlacedArticle> {
        let (articles, settings) = self.articles_with_settings();
        place_articles(&articles, &settings.footer_ids)
    }

    pub fn home_latest_articles(&self) -> Vec<PlacedArticle> {
        let (articles, settings) = self.articles_with_settings();
        place_articles(&articles, &settings.home_latest_ids)
    }

    pub fn home_featured_articles(&self) -> Vec<PlacedArticle> {
        let (articles, settings) = self.articles_with_settings();
        place_articles(&articles, &settings.home_featured_ids)
    }

    pub fn tag_cloud(&self) -> Vec<TagCount> {
        derive_tag_cloud(&self.articles())
    }

    /// Share link for `url` attributed to the configured LINE account.
    pub fn line_share_url(&self, url: &str) -> String {
        build_line_share_url(url, &self.config.line_account_id)
    }
}

fn id_taken(list: &[Article], skip: Option<usize>, id: &str) -> bool {
    list.iter()
        .enumerate()
        .any(|(position, other)| Some(position) != skip && other.id == id)
}

fn single_view(articles: Vec<Article>, index: Option<usize>) -> Option<PlacedArticle> {
    let found = lookup(articles, Some(index?));
    found.article.map(|article| PlacedArticle {
        index: found.index,
        article,
    })
}

#[cfg(test)]
mod tests {
    use super::ContentStore;
    use crate::kv::{KeyValueStore, KvError, KvResult, MemoryKvStore};
    use crate::model::article::{seed_articles, Article};
    use crate::model::settings::Settings;
    use crate::repo::LoadOrigin;
    use std::cell::RefCell;
    use std::collections::HashSet;

    /// Memory store whose reads fail for selected keys.
    #[derive(Default)]
    struct FailingReads {
        inner: MemoryKvStore,
        unreadable: RefCell<HashSet<String>>,
    }

    impl FailingReads {
        fn fail_reads_of(&self, key: &str) {
            self.unreadable.borrow_mut().insert(key.to_string());
        }
    }

    impl KeyValueStore for FailingReads {
        fn get(&self, key: &str) -> KvResult<Option<String>> {
            if self.unreadable.borrow().contains(key) {
                return Err(KvError::Sqlite(rusqlite::Error::InvalidQuery));
            }
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> KvResult<()> {
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> KvResult<()> {
            self.inner.remove(key)
        }
    }

    #[test]
    fn unreadable_primary_keys_fall_back_to_backup() {
        let store = ContentStore::new(FailingReads::default());
        let saved = store.save_articles(vec![Article::new("kept", ""), Article::new("also", "")]);
        store.save_settings(&Settings {
            hero_id: Some(1),
            ..Settings::default()
        });

        let keys = store.config().keys.clone();
        store.substrate().fail_reads_of(&keys.articles);
        store.substrate().fail_reads_of(&keys.settings);

        let articles = store.load_articles();
        assert_eq!(articles.origin, LoadOrigin::Backup);
        assert_eq!(articles.value, saved);
        let settings = store.load_settings();
        assert_eq!(settings.origin, LoadOrigin::Backup);
        assert_eq!(settings.value.hero_id, Some(1));
    }

    #[test]
    fn unreadable_primary_and_backup_fall_back_to_defaults() {
        let store = ContentStore::new(FailingReads::default());
        store.save_articles(vec![Article::new("lost", "")]);

        let keys = store.config().keys.clone();
        store.substrate().fail_reads_of(&keys.articles);
        store.substrate().fail_reads_of(&keys.backup);
        store.substrate().fail_reads_of(&keys.settings);

        let articles = store.load_articles();
        assert_eq!(articles.origin, LoadOrigin::Default);
        assert_eq!(articles.value, seed_articles());
        let settings = store.load_settings();
        assert_eq!(settings.origin, LoadOrigin::Default);
        assert_eq!(settings.value.card_height, 380);

        let backup = store.substrate().inner.get(&keys.backup).unwrap().unwrap();
        assert!(backup.contains("lost"));
    }
}
