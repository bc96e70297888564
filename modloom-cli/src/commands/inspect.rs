//! Inspect a single mod folder's manifest

use std::path::Path;

use modloom::prelude::*;

pub fn execute(path: &Path) -> anyhow::Result<()> {
    let parser = ManifestParser::new();
    let manifest = parser.parse_folder(path)?;

    println!("Name:         {}", manifest.name);
    if !manifest.author.is_empty() {
        println!("Author:       {}", manifest.author);
    }
    println!("Unique ID:    {}", manifest.unique_id);
    println!("Version:      {}", manifest.version);
    match manifest.kind() {
        ManifestKind::CodeMod { entry_dll } => println!("Entry DLL:    {entry_dll}"),
        ManifestKind::ContentPack { for_id } => println!("Content pack: for {for_id}"),
    }
    if let Some(minimum) = &manifest.minimum_api_version {
        println!("Needs SMAPI:  {minimum} or later");
    }

    if !manifest.dependencies.is_empty() {
        println!("Dependencies:");
        for dependency in &manifest.dependencies {
            let mut line = format!("  - {}", dependency.unique_id);
            if let Some(minimum) = &dependency.minimum_version {
                line.push_str(&format!(" (>= {minimum})"));
            }
            if !dependency.is_required {
                line.push_str(" [optional]");
            }
            println!("{line}");
        }
    }

    if !manifest.update_keys.is_empty() {
        println!("Update keys:  {}", manifest.update_keys.join(", "));
    }

    if !manifest.extra_fields.is_empty() {
        println!("Extra fields:");
        for (key, value) in &manifest.extra_fields {
            println!("  {key} = {value}");
        }
    }

    Ok(())
}
