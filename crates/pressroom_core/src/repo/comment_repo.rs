//! Comment map persistence. The whole map lives under one key.

use crate::kv::{read_json, write_json, KeyValueStore, KvResult};
use crate::model::comment::{comment_map_from_value, CommentMap};
use crate::repo::backup_repo::BackupRepository;
use crate::repo::{LoadOrigin, Loaded};

pub struct CommentRepository<'s, S: KeyValueStore + ?Sized> {
    store: &'s S,
    key: &'s str,
    anonymous_author: &'s str,
    backup: BackupRepository<'s, S>,
}

impl<'s, S: KeyValueStore + ?Sized> CommentRepository<'s, S> {
    pub fn new(
        store: &'s S,
        key: &'s str,
        backup_key: &'s str,
        anonymous_author: &'s str,
    ) -> Self {
        Self {
            store,
            key,
            anonymous_author,
            backup: BackupRepository::new(store, backup_key),
        }
    }

    pub fn load_map(&self) -> Loaded<CommentMap> {
        if let Some(map) = read_json(self.store, self.key)
            .into_value()
            .and_then(|value| comment_map_from_value(&value, self.anonymous_author))
        {
            return Loaded::new(map, LoadOrigin::Primary);
        }

        match self
            .backup
            .read_sections()
            .and_then(|sections| sections.comments)
            .and_then(|value| comment_map_from_value(&value, self.anonymous_author))
        {
            Some(map) => Loaded::new(map, LoadOrigin::Backup),
            None => Loaded::new(CommentMap::new(), LoadOrigin::Default),
        }
    }

    pub fn save_map(&self, map: &CommentMap) -> KvResult<()> {
        write_json(self.store, self.key, map)
    }
}
