use crate::config::Config;
use crate::db::Store;

pub async fn cmd_init(config: &Config) -> anyhow::Result<()> {
    if Config::create_default_if_missing()? {
        println!("✓ Created potluck.toml");
    } else {
        println!("potluck.toml already exists, leaving it untouched.");
    }

    let store = Store::with_pool_options(
        &config.general.database_path,
        config.general.max_db_connections,
        config.general.min_db_connections,
    )
    .await?;
    store.ping().await?;

    println!("✓ Database ready at {}", config.general.database_path);
    Ok(())
}
