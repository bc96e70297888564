//! Resolve a mods folder into a load plan

use std::path::Path;

use anyhow::Context;
use modloom::prelude::*;

use crate::updates;

pub fn execute(
    root: &Path,
    api_version: &str,
    compat_db: Option<&Path>,
    quiet: bool,
) -> anyhow::Result<()> {
    let api_version = SemanticVersion::parse(api_version).context("invalid --api-version")?;
    let db = match compat_db {
        Some(path) => CompatibilityDatabase::from_file(path)
            .with_context(|| format!("failed to load compatibility database from {}", path.display()))?,
        None => embedded_database(),
    };

    let parser = ManifestParser::new();
    let mut records = read_manifests(root, &parser, &db);
    validate_manifests(&mut records, &api_version, updates::update_url);
    let records = process_dependencies(records, &db);

    let mut loaded = 0usize;
    let mut failed = 0usize;
    for record in &records {
        match record.error() {
            None => {
                loaded += 1;
                if !quiet {
                    let version = record
                        .manifest
                        .as_ref()
                        .map(|manifest| manifest.version.to_string())
                        .unwrap_or_default();
                    println!("✓ {loaded:>3}. {} {version}", record.display_name);
                }
            }
            Some(error) => {
                failed += 1;
                if !quiet {
                    println!(
                        "✗      {} ({}): {error}",
                        record.display_name,
                        record.directory_path.display()
                    );
                }
            }
        }
    }

    println!("{loaded} mod(s) in load order, {failed} failed");

    if failed == 0 {
        Ok(())
    } else {
        std::process::exit(1);
    }
}
