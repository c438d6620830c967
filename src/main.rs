use anyhow::Context;
use draft::{DraftConfig, GraphStore, PropertyMap, PropertyValue, QueryEngine};
use tracing::info;

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    println!("Draft Graph Database v{}", draft::version());
    println!("==========================================");
    println!();

    // Optional YAML config as the first argument
    let config = match std::env::args().nth(1) {
        Some(path) => DraftConfig::load(&path)
            .with_context(|| format!("failed to load config from {}", path))?,
        None => DraftConfig::default(),
    };

    let store = match &config.snapshot_path {
        Some(path) if path.exists() => GraphStore::load_snapshot(path)
            .with_context(|| format!("failed to load snapshot {}", path.display()))?,
        _ => seed_sample_graph(&config)?,
    };

    let stats = store.stats();
    println!(
        "Loaded {} nodes and {} edges",
        stats.node_count, stats.edge_count
    );
    println!();

    let engine = QueryEngine::with_config(&config);
    for query in [
        "MATCH (n) RETURN n",
        "MATCH (n:animal) RETURN n",
        r#"MATCH (n:person {name: "bar"}) MATCH (m:animal) RETURN n, m"#,
    ] {
        let result = engine.execute(query, &store)?;
        println!("=== {} ===", query);
        println!("{}", result.to_json()?);
        println!();
    }

    let neighbourhood = store.sub_graph("node-dog", 1)?;
    println!("=== neighbourhood of node-dog ===");
    println!("{}", neighbourhood.to_json()?);

    if let Some(path) = &config.snapshot_path {
        store.save_snapshot(path)?;
        info!(path = %path.display(), "snapshot written");
    }

    Ok(())
}

fn name(value: &str) -> PropertyMap {
    PropertyMap::from([("name".to_string(), PropertyValue::from(value))])
}

fn seed_sample_graph(config: &DraftConfig) -> anyhow::Result<GraphStore> {
    let store = GraphStore::with_config(config);

    store.add_node("node-foo", "person", name("foo"))?;
    store.add_node("node-bar", "person", name("bar"))?;
    store.add_node("node-dog", "animal", name("socks"))?;

    store.add_edge("edge-knows", "node-foo", "knows", "node-bar", PropertyMap::new())?;
    store.add_edge("edge-owns", "node-foo", "owns", "node-dog", PropertyMap::new())?;
    store.add_edge("edge-likes", "node-foo", "likes", "node-bar", PropertyMap::new())?;
    store.add_edge("edge-dislike", "node-bar", "dislike", "node-dog", PropertyMap::new())?;

    info!("seeded sample graph");
    Ok(store)
}
