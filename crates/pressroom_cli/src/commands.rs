use crate::cli::{Cli, Command, ExportArgs, ImportArgs};
use anyhow::{Context, Result};
use log::info;
use pressroom_core::db::open_db;
use pressroom_core::{
    init_logging, ContentStore, KeyValueStore, PlacedArticle, SqliteKvStore, StorageKeys,
    StoreConfig,
};

pub fn run(cli: Cli) -> Result<()> {
    if let Some(log_dir) = &cli.log_dir {
        init_logging(&cli.log_level, log_dir).context("failed to initialize logging")?;
    }

    if let Command::Version = cli.command {
        println!("pressroom_core version={}", pressroom_core::core_version());
        return Ok(());
    }

    let conn = open_db(&cli.db)
        .with_context(|| format!("failed to open store `{}`", cli.db.display()))?;
    let config = StoreConfig {
        keys: StorageKeys::with_namespace(&cli.namespace),
        ..StoreConfig::default()
    };
    let store = ContentStore::with_config(SqliteKvStore::new(&conn), config);

    match cli.command {
        Command::Export(args) => export(&store, args),
        Command::Import(args) => import(&store, args),
        Command::Restore => {
            let bundle = store.restore_from_backup()?;
            println!("restored {} articles from backup", bundle.articles.len());
            Ok(())
        }
        Command::Show => show(&store),
        Command::Version => Ok(()),
    }
}

fn export<S: KeyValueStore>(store: &ContentStore<S>, args: ExportArgs) -> Result<()> {
    let snapshot = store.export();
    let encoded = serde_json::to_string_pretty(&snapshot)?;
    match args.out {
        Some(path) => {
            std::fs::write(&path, encoded)
                .with_context(|| format!("failed to write `{}`", path.display()))?;
            info!(
                "event=cli_export module=cli status=ok articles={}",
                snapshot.articles.len()
            );
            println!("exported {} articles to {}", snapshot.articles.len(), path.display());
        }
        None => println!("{encoded}"),
    }
    Ok(())
}

fn import<S: KeyValueStore>(store: &ContentStore<S>, args: ImportArgs) -> Result<()> {
    let text = std::fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read `{}`", args.file.display()))?;
    let bundle = store.import_json(&text)?;
    println!(
        "imported {} articles, {} page links, {} comment threads",
        bundle.articles.len(),
        bundle.page_links.len(),
        bundle.comments.len()
    );
    Ok(())
}

fn show<S: KeyValueStore>(store: &ContentStore<S>) -> Result<()> {
    let describe = |placed: &PlacedArticle| format!("#{} {}", placed.index, placed.article.title);

    match store.hero_article() {
        Some(hero) => println!("hero: {}", describe(&hero)),
        None => println!("hero: -"),
    }
    match store.featured_article() {
        Some(featured) => println!("featured: {}", describe(&featured)),
        None => println!("featured: -"),
    }
    for (label, list) in [
        ("latest", store.home_latest_articles()),
        ("carousel", store.home_featured_articles()),
        ("footer", store.footer_articles()),
    ] {
        println!("{label}:");
        for placed in &list {
            println!("  {}", describe(placed));
        }
    }

    println!("tags:");
    for entry in store.tag_cloud() {
        println!("  {} ({})", entry.tag, entry.count);
    }
    println!("links:");
    for link in store.page_links() {
        println!("  {} -> {}", link.title, link.url);
    }
    Ok(())
}
