use crate::diff::result::DiffEntry;

/// One line per entry, prefixed by its change marker.
///
/// `~` modified, `-` left only, `+` right only, `!` structural.
pub fn format_text(entries: &[DiffEntry]) -> String {
    entries
        .iter()
        .map(|entry| match entry {
            DiffEntry::Modified { path, left, right } => format!("~ {path}: {left} -> {right}"),
            DiffEntry::OnlyLeft { path, node } => format!("- {path}: {node}"),
            DiffEntry::OnlyRight { path, node } => format!("+ {path}: {node}"),
            DiffEntry::Structural { path, description } => format!("! {path}: {description}"),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Default)]
struct Tally {
    modified: usize,
    removed: usize,
    added: usize,
    structural: usize,
}

/// Count entries per kind on a single line.
pub fn format_summary(entries: &[DiffEntry]) -> String {
    let tally = entries.iter().fold(Tally::default(), |mut tally, entry| {
        let slot = match entry {
            DiffEntry::Modified { .. } => &mut tally.modified,
            DiffEntry::OnlyLeft { .. } => &mut tally.removed,
            DiffEntry::OnlyRight { .. } => &mut tally.added,
            DiffEntry::Structural { .. } => &mut tally.structural,
        };
        *slot += 1;
        tally
    });
    format!(
        "modified={} removed={} added={} structural={}",
        tally.modified, tally.removed, tally.added, tally.structural
    )
}
