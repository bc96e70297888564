//! Dependency resolution and load ordering
//!
//! Turns the textual dependency references in manifests into links between
//! sibling records, fails mods whose requirements can't be met, breaks
//! dependency cycles, and emits everything in an order where each mod
//! follows all of its resolved dependencies. The graph lives in call-local
//! index vectors; records only keep the resolved unique IDs.

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::compat::CompatibilityDatabase;
use crate::metadata::ModMetadata;
use crate::version::SemanticVersion;

/// Resolve dependencies and return the records in load order.
///
/// Records that arrive `Failed` keep their relative order and come first,
/// untouched. Surviving records follow in topological order (dependencies
/// before dependents, ties broken by input order). Records that fail during
/// this call come last, in input order. Nothing is dropped and no error
/// escapes; the caller always receives every record back.
///
/// The compatibility database is only consulted to suggest a download URL
/// when a required dependency is not installed.
#[must_use]
pub fn process_dependencies(
    records: Vec<ModMetadata>,
    db: &CompatibilityDatabase,
) -> Vec<ModMetadata> {
    let mut records = records;
    let count = records.len();

    let entered_failed: Vec<bool> = records.iter().map(ModMetadata::is_failed).collect();

    // Found records by lowercased unique ID. After validation there is at
    // most one per id; if callers skip validation, the first one wins.
    let mut by_id: HashMap<String, usize> = HashMap::new();
    for (index, record) in records.iter().enumerate() {
        if record.is_failed() {
            continue;
        }
        if let Some(unique_id) = record.unique_id() {
            by_id.entry(unique_id.to_ascii_lowercase()).or_insert(index);
        }
    }

    // Resolve manifest references into arena edges.
    let mut edges: Vec<Vec<usize>> = vec![Vec::new(); count];
    for index in 0..count {
        if records[index].is_failed() {
            continue;
        }

        let mut resolved: Vec<(usize, String)> = Vec::new();
        let mut missing: Vec<String> = Vec::new();
        let mut version_failure: Option<String> = None;

        for requirement in requirements_of(&records[index]) {
            let Some(&target) = by_id.get(&requirement.unique_id.to_ascii_lowercase()) else {
                if requirement.required {
                    missing.push(requirement.unique_id);
                } else {
                    trace!(
                        mod_name = %records[index].display_name,
                        dependency = %requirement.unique_id,
                        "optional dependency not installed; ignoring"
                    );
                }
                continue;
            };

            if let Some(minimum) = &requirement.minimum_version {
                let found = records[target]
                    .manifest
                    .as_ref()
                    .map(|manifest| manifest.version.clone())
                    .unwrap_or_default();
                if &found < minimum {
                    version_failure.get_or_insert_with(|| {
                        format!(
                            "needs a newer version of {}: at least {minimum}, found {found}",
                            requirement.unique_id
                        )
                    });
                    continue;
                }
            }

            if !resolved.iter().any(|(existing, _)| *existing == target) {
                let target_id = records[target].unique_id().unwrap_or_default().to_string();
                resolved.push((target, target_id));
            }
        }

        if let Some(message) = version_failure {
            records[index].fail(message);
            continue;
        }
        if !missing.is_empty() {
            let mut message = format!("missing dependencies: {}", missing.join(", "));
            if let Some((unique_id, url)) = download_hint(db, &missing) {
                message.push_str(&format!(" (you can get {unique_id} at {url})"));
            }
            records[index].fail(message);
            continue;
        }

        for (target, target_id) in resolved {
            edges[index].push(target);
            records[index].add_dependency(target_id);
        }
    }

    // Propagate failures and break cycles until a sweep finds neither.
    loop {
        propagate_failures(&mut records, &edges);
        let Some(cycle) = find_cycle(&records, &edges) else {
            break;
        };
        let label = cycle_label(&records, &cycle);
        debug!(cycle = %label, "dependency cycle detected");
        for &index in &cycle {
            records[index].fail(format!("dependency cycle: {label}"));
        }
    }

    // Topological emit: failed-on-entry preamble, ordered survivors, then
    // the records that failed during this call.
    let mut emitted = vec![false; count];
    let mut order: Vec<usize> = Vec::with_capacity(count);
    for index in 0..count {
        if entered_failed[index] {
            emitted[index] = true;
            order.push(index);
        }
    }
    for index in 0..count {
        if !records[index].is_failed() && !emitted[index] {
            emit(index, &records, &edges, &mut emitted, &mut order);
        }
    }
    for index in 0..count {
        if !emitted[index] {
            emitted[index] = true;
            order.push(index);
        }
    }

    let mut slots: Vec<Option<ModMetadata>> = records.into_iter().map(Some).collect();
    order
        .into_iter()
        .map(|index| slots[index].take().expect("each record is emitted exactly once"))
        .collect()
}

struct Requirement {
    unique_id: String,
    minimum_version: Option<SemanticVersion>,
    required: bool,
}

/// The record's dependency requirements: its manifest dependencies plus,
/// for a content pack, the mod it provides content for.
fn requirements_of(record: &ModMetadata) -> Vec<Requirement> {
    let Some(manifest) = &record.manifest else {
        return Vec::new();
    };

    let mut requirements: Vec<Requirement> = manifest
        .dependencies
        .iter()
        .map(|dependency| Requirement {
            unique_id: dependency.unique_id.clone(),
            minimum_version: dependency.minimum_version.clone(),
            required: dependency.is_required,
        })
        .collect();

    if let Some(pack) = &manifest.content_pack_for {
        requirements.push(Requirement {
            unique_id: pack.unique_id.clone(),
            minimum_version: None,
            required: true,
        });
    }

    requirements
}

/// A download URL for the first missing dependency the database knows.
fn download_hint<'a>(
    db: &'a CompatibilityDatabase,
    missing: &'a [String],
) -> Option<(&'a str, &'a str)> {
    missing.iter().find_map(|unique_id| {
        db.entries_for(unique_id).iter().find_map(|record| {
            record
                .alternative_url
                .as_deref()
                .map(|url| (unique_id.as_str(), url))
        })
    })
}

/// Fail every record with a failed resolved dependency, to fixpoint.
fn propagate_failures(records: &mut [ModMetadata], edges: &[Vec<usize>]) {
    loop {
        let mut changed = false;
        for index in 0..records.len() {
            if records[index].is_failed() {
                continue;
            }
            let failed_dependency = edges[index]
                .iter()
                .copied()
                .find(|&target| records[target].is_failed());
            if let Some(target) = failed_dependency {
                let dependency = records[target].unique_id().unwrap_or_default().to_string();
                records[index].fail(format!("dependency '{dependency}' failed to load"));
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }
}

/// Node colors for the cycle-detection walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    White,
    Gray,
    Black,
}

/// Find one dependency cycle among the surviving records, as the list of
/// record indices along the cycle path.
fn find_cycle(records: &[ModMetadata], edges: &[Vec<usize>]) -> Option<Vec<usize>> {
    let mut marks = vec![Mark::White; records.len()];
    let mut stack = Vec::new();
    for start in 0..records.len() {
        if records[start].is_failed() || marks[start] != Mark::White {
            continue;
        }
        if let Some(cycle) = visit(start, records, edges, &mut marks, &mut stack) {
            return Some(cycle);
        }
    }
    None
}

fn visit(
    node: usize,
    records: &[ModMetadata],
    edges: &[Vec<usize>],
    marks: &mut [Mark],
    stack: &mut Vec<usize>,
) -> Option<Vec<usize>> {
    marks[node] = Mark::Gray;
    stack.push(node);

    for &next in &edges[node] {
        if records[next].is_failed() {
            continue;
        }
        match marks[next] {
            // A gray node is on the current path: the tail of the stack
            // from its position is the cycle.
            Mark::Gray => {
                let start = stack
                    .iter()
                    .position(|&on_path| on_path == next)
                    .expect("gray nodes are on the walk stack");
                return Some(stack[start..].to_vec());
            }
            Mark::White => {
                if let Some(cycle) = visit(next, records, edges, marks, stack) {
                    return Some(cycle);
                }
            }
            Mark::Black => {}
        }
    }

    stack.pop();
    marks[node] = Mark::Black;
    None
}

fn cycle_label(records: &[ModMetadata], cycle: &[usize]) -> String {
    let mut ids: Vec<&str> = cycle
        .iter()
        .map(|&index| records[index].unique_id().unwrap_or_default())
        .collect();
    ids.push(ids[0]);
    ids.join(" -> ")
}

/// Emit `node` after all of its surviving dependencies.
fn emit(
    node: usize,
    records: &[ModMetadata],
    edges: &[Vec<usize>],
    emitted: &mut [bool],
    order: &mut Vec<usize>,
) {
    // Pre-marking is safe: cycles are broken before emission starts.
    emitted[node] = true;
    for &dependency in &edges[node] {
        if !records[dependency].is_failed() && !emitted[dependency] {
            emit(dependency, records, edges, emitted, order);
        }
    }
    order.push(node);
}
