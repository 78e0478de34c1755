//! Status command handler

use anyhow::Result;

use stickies_core::{Config, NoteColor, NoteStore, StorageBackend};

use crate::output::{Output, OutputFormat};

/// Show storage location and board contents
pub fn show(store: &NoteStore, config: &Config, output: &Output) -> Result<()> {
    let location = storage_location(config);
    let viewport = store.viewport();
    let counts: Vec<(NoteColor, usize)> = NoteColor::ALL
        .iter()
        .map(|&color| {
            let count = store.notes().iter().filter(|n| n.color == color).count();
            (color, count)
        })
        .collect();

    match output.format {
        OutputFormat::Json => {
            let by_color: serde_json::Map<String, serde_json::Value> = counts
                .iter()
                .map(|(color, count)| (color.to_string(), (*count).into()))
                .collect();
            println!(
                "{}",
                serde_json::json!({
                    "storage": {
                        "backend": config.storage.to_string(),
                        "location": location,
                    },
                    "viewport": viewport,
                    "notes": store.len(),
                    "by_color": by_color,
                    "highest_z_index": store.highest_z_index()
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", store.len());
        }
        OutputFormat::Human => {
            println!("Stickies Status");
            println!("===============");
            println!();
            println!("Storage:");
            println!("  Backend:  {}", config.storage);
            println!("  Location: {}", location);
            println!();
            println!("Board:");
            println!("  Viewport: {}x{}", viewport.width, viewport.height);
            println!("  Top z:    {}", store.highest_z_index());
            println!();
            println!("Contents:");
            println!("  Notes: {}", store.len());
            for (color, count) in &counts {
                if *count > 0 {
                    println!("    {:<7}{}", color.as_str(), count);
                }
            }
        }
    }

    Ok(())
}

fn storage_location(config: &Config) -> String {
    match config.storage {
        StorageBackend::File => config.kv_dir().display().to_string(),
        StorageBackend::Sqlite => config.sqlite_path().display().to_string(),
        StorageBackend::Memory => "(in memory, not persisted)".to_string(),
    }
}
