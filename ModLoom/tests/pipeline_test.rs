//! End-to-end pipeline tests over real mod folders.

use std::fs;
use std::path::Path;

use modloom::prelude::*;
use tempfile::TempDir;

fn no_update_url(_key: &str) -> Option<String> {
    None
}

fn api_version() -> SemanticVersion {
    SemanticVersion::parse("4.0.0").unwrap()
}

/// Write a mod folder with a manifest and its entry DLL.
fn write_mod(root: &Path, folder: &str, manifest: &str) {
    let dir = root.join(folder);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("manifest.json"), manifest).unwrap();
    fs::write(dir.join("Mod.dll"), b"").unwrap();
}

fn run_pipeline(root: &Path, db: &CompatibilityDatabase) -> Vec<ModMetadata> {
    let parser = ManifestParser::new();
    let mut records = read_manifests(root, &parser, db);
    validate_manifests(&mut records, &api_version(), no_update_url);
    process_dependencies(records, db)
}

fn ids(records: &[ModMetadata]) -> Vec<&str> {
    records
        .iter()
        .map(|record| record.unique_id().unwrap_or("<none>"))
        .collect()
}

#[test]
fn empty_root_yields_no_records() {
    let temp = TempDir::new().unwrap();
    let db = CompatibilityDatabase::default();
    let records = read_manifests(temp.path(), &ManifestParser::new(), &db);
    assert!(records.is_empty());
}

#[test]
fn nonexistent_root_yields_no_records() {
    let temp = TempDir::new().unwrap();
    let db = CompatibilityDatabase::default();
    let missing = temp.path().join("nope");
    let records = read_manifests(&missing, &ManifestParser::new(), &db);
    assert!(records.is_empty());
}

#[test]
fn empty_mod_folder_fails_with_error() {
    let temp = TempDir::new().unwrap();
    fs::create_dir(temp.path().join("Empty")).unwrap();

    let db = CompatibilityDatabase::default();
    let records = read_manifests(temp.path(), &ManifestParser::new(), &db);

    assert_eq!(records.len(), 1);
    assert!(records[0].is_failed());
    assert_eq!(records[0].error(), Some("no manifest found"));
}

#[test]
fn pipeline_orders_dependency_chain() {
    let temp = TempDir::new().unwrap();
    // Folder names sort so the scan sees C, then A, then B.
    write_mod(
        temp.path(),
        "1-C",
        r#"{ "Name": "C", "UniqueID": "C", "Version": "1.0", "EntryDll": "Mod.dll",
             "Dependencies": [ { "UniqueID": "B" } ] }"#,
    );
    write_mod(
        temp.path(),
        "2-A",
        r#"{ "Name": "A", "UniqueID": "A", "Version": "1.0", "EntryDll": "Mod.dll" }"#,
    );
    write_mod(
        temp.path(),
        "3-B",
        r#"{ "Name": "B", "UniqueID": "B", "Version": "1.0", "EntryDll": "Mod.dll",
             "Dependencies": [ { "UniqueID": "A" } ] }"#,
    );

    let ordered = run_pipeline(temp.path(), &CompatibilityDatabase::default());
    assert_eq!(ids(&ordered), ["A", "B", "C"]);
    assert!(ordered.iter().all(ModMetadata::is_found));
}

#[test]
fn broken_mod_fails_with_compatibility_message() {
    let temp = TempDir::new().unwrap();
    write_mod(
        temp.path(),
        "Storage",
        r#"{ "Name": "Storage Overhaul", "UniqueID": "Acme.StorageOverhaul",
             "Version": "1.2.0", "EntryDll": "Mod.dll" }"#,
    );

    let db = CompatibilityDatabase::from_json_str(
        r#"{
            "mods": [
                {
                    "id": "Acme.StorageOverhaul",
                    "status": "AssumeBroken",
                    "upperVersion": "1.4.2",
                    "alternativeUrl": "https://example.test/storage"
                }
            ]
        }"#,
    )
    .unwrap();

    let ordered = run_pipeline(temp.path(), &db);
    let error = ordered[0].error().unwrap();
    assert!(error.starts_with("broken: "), "got: {error}");
    assert!(error.contains("https://example.test/storage"));
}

#[test]
fn api_floor_failure_names_both_versions() {
    let temp = TempDir::new().unwrap();
    write_mod(
        temp.path(),
        "Future",
        r#"{ "Name": "Future", "UniqueID": "future.mod", "Version": "1.0",
             "EntryDll": "Mod.dll", "MinimumApiVersion": "99.0" }"#,
    );

    let ordered = run_pipeline(temp.path(), &CompatibilityDatabase::default());
    let error = ordered[0].error().unwrap();
    assert!(error.starts_with("needs newer SMAPI version: "), "got: {error}");
    assert!(error.contains("99.0.0"));
    assert!(error.contains("4.0.0"));
}

#[test]
fn missing_dll_fails_validation() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("NoDll");
    fs::create_dir_all(&dir).unwrap();
    fs::write(
        dir.join("manifest.json"),
        r#"{ "Name": "NoDll", "UniqueID": "no.dll", "Version": "1.0", "EntryDll": "Gone.dll" }"#,
    )
    .unwrap();

    let ordered = run_pipeline(temp.path(), &CompatibilityDatabase::default());
    assert!(ordered[0].error().unwrap().starts_with("missing DLL: "));
}

#[test]
fn duplicate_unique_ids_fail_both_folders() {
    let temp = TempDir::new().unwrap();
    let manifest =
        r#"{ "Name": "Twin", "UniqueID": "twin.mod", "Version": "1.0", "EntryDll": "Mod.dll" }"#;
    write_mod(temp.path(), "TwinOne", manifest);
    write_mod(temp.path(), "TwinTwo", manifest);

    let ordered = run_pipeline(temp.path(), &CompatibilityDatabase::default());
    assert_eq!(ordered.len(), 2);
    for record in &ordered {
        let error = record.error().unwrap();
        assert!(error.starts_with("duplicate unique ID: "), "got: {error}");
        assert!(error.contains("TwinOne"));
        assert!(error.contains("TwinTwo"));
    }
}

#[test]
fn content_pack_loads_after_its_target() {
    let temp = TempDir::new().unwrap();
    write_mod(
        temp.path(),
        "Outfits",
        r#"{ "Name": "Seasonal Outfits", "UniqueID": "Quill.SeasonalOutfits",
             "Version": "1.0", "EntryDll": "Mod.dll" }"#,
    );
    // Content packs have no DLL, only a manifest.
    let pack_dir = temp.path().join("AutumnPack");
    fs::create_dir_all(&pack_dir).unwrap();
    fs::write(
        pack_dir.join("manifest.json"),
        r#"{ "Name": "Autumn Pack", "UniqueID": "quill.autumn", "Version": "1.0",
             "ContentPackFor": { "UniqueID": "Quill.SeasonalOutfits" } }"#,
    )
    .unwrap();

    let ordered = run_pipeline(temp.path(), &CompatibilityDatabase::default());
    assert_eq!(ids(&ordered), ["Quill.SeasonalOutfits", "quill.autumn"]);
    assert!(ordered.iter().all(ModMetadata::is_found));
}

#[test]
fn nested_mod_folder_is_discovered() {
    let temp = TempDir::new().unwrap();
    let inner = temp.path().join("Download").join("RealMod");
    fs::create_dir_all(&inner).unwrap();
    fs::write(
        inner.join("manifest.json"),
        r#"{ "Name": "Real", "UniqueID": "real.mod", "Version": "1.0", "EntryDll": "Mod.dll" }"#,
    )
    .unwrap();
    fs::write(inner.join("Mod.dll"), b"").unwrap();

    let ordered = run_pipeline(temp.path(), &CompatibilityDatabase::default());
    assert_eq!(ids(&ordered), ["real.mod"]);
    assert_eq!(ordered[0].directory_path, inner);
}

#[test]
fn failed_records_keep_their_error_through_every_stage() {
    let temp = TempDir::new().unwrap();
    fs::create_dir(temp.path().join("Empty")).unwrap();
    write_mod(
        temp.path(),
        "Good",
        r#"{ "Name": "Good", "UniqueID": "good.mod", "Version": "1.0", "EntryDll": "Mod.dll" }"#,
    );

    let db = CompatibilityDatabase::default();
    let mut records = read_manifests(temp.path(), &ManifestParser::new(), &db);
    let failed_error = records
        .iter()
        .find(|record| record.is_failed())
        .unwrap()
        .error()
        .unwrap()
        .to_string();

    validate_manifests(&mut records, &api_version(), no_update_url);
    let records = process_dependencies(records, &db);

    let failed: Vec<_> = records.iter().filter(|record| record.is_failed()).collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].error(), Some(failed_error.as_str()));
    // Failed records are emitted before the ordered survivors.
    assert!(records[0].is_failed());
    assert!(records[1].is_found());
}

#[test]
fn pipeline_output_is_stable_across_runs() {
    let build = |temp: &TempDir| {
        write_mod(
            temp.path(),
            "Alpha",
            r#"{ "Name": "Alpha", "UniqueID": "alpha", "Version": "1.0", "EntryDll": "Mod.dll",
                 "Dependencies": [ { "UniqueID": "beta" }, { "UniqueID": "gone" } ] }"#,
        );
        write_mod(
            temp.path(),
            "Beta",
            r#"{ "Name": "Beta", "UniqueID": "beta", "Version": "1.0", "EntryDll": "Mod.dll" }"#,
        );
    };

    let first_dir = TempDir::new().unwrap();
    build(&first_dir);
    let second_dir = TempDir::new().unwrap();
    build(&second_dir);

    let db = CompatibilityDatabase::default();
    let first = run_pipeline(first_dir.path(), &db);
    let second = run_pipeline(second_dir.path(), &db);

    assert_eq!(ids(&first), ids(&second));
    let errors = |records: &[ModMetadata]| -> Vec<Option<String>> {
        records
            .iter()
            .map(|record| record.error().map(str::to_string))
            .collect()
    };
    assert_eq!(errors(&first), errors(&second));
}
