mod categorize;
mod codec;
mod models;
mod run;
mod service;
mod store;

use anyhow::{Context, Result};

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let data_dir = get_data_dir()?;
    let store = store::ExpenseStore::new(&data_dir);
    let service = service::ExpenseService::new(store, service::ServiceConfig::default());

    match args.len() {
        1 => run::as_menu(&service),
        2.. => run::as_cli(&args, &service),
        _ => {
            eprintln!("Usage: spendlog [command]");
            Ok(())
        }
    }
}

fn get_data_dir() -> Result<std::path::PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "spendlog", "spendlog")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
    Ok(data_dir.to_path_buf())
}
