//! Turning transliterated node groups into files on disk.

use console::style;
use similar::{ChangeTag, TextDiff};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use adx_core::ir::group_by_path;
use adx_core::{FileNodes, emit_nodes};

/// One generated TypeScript module, rendered but not yet written.
#[derive(Debug)]
pub struct GeneratedFile {
    /// Path relative to the output directory, `/`-separated, with extension.
    pub rel_path: String,
    /// Rendered module text.
    pub new_content: String,
    /// Content currently on disk (None if the file doesn't exist).
    pub existing_content: Option<String>,
}

impl GeneratedFile {
    /// Nothing on disk yet.
    pub fn is_new(&self) -> bool {
        self.existing_content.is_none()
    }

    /// On disk with different content.
    pub fn is_modified(&self) -> bool {
        match &self.existing_content {
            Some(existing) => existing != &self.new_content,
            None => false,
        }
    }

    /// Unified diff of the on-disk content against the generated content.
    pub fn generate_diff(&self) -> Option<String> {
        let existing = self.existing_content.as_ref()?;
        if existing == &self.new_content {
            return None;
        }

        let diff = TextDiff::from_lines(existing, &self.new_content);
        let mut output = String::new();

        output.push_str(&format!(
            "{}\n",
            style(format!("--- {} (on disk)", self.rel_path)).bold()
        ));
        output.push_str(&format!(
            "{}\n",
            style(format!("+++ {} (generated)", self.rel_path)).bold()
        ));

        for (idx, group) in diff.grouped_ops(3).iter().enumerate() {
            if idx > 0 {
                output.push_str("...\n");
            }
            for op in group {
                for change in diff.iter_changes(op) {
                    let mut line = String::new();
                    line.push_str(match change.tag() {
                        ChangeTag::Delete => "-",
                        ChangeTag::Insert => "+",
                        ChangeTag::Equal => " ",
                    });
                    line.push_str(change.value().trim_end_matches('\n'));
                    let line = match change.tag() {
                        ChangeTag::Delete => style(line).red().to_string(),
                        ChangeTag::Insert => style(line).green().to_string(),
                        ChangeTag::Equal => line,
                    };
                    output.push_str(&line);
                    output.push('\n');
                }
            }
        }

        Some(output)
    }
}

/// Merge the groups by path and render each file, reading whatever is
/// currently on disk under `output_dir` for comparison.
pub fn render_files(output_dir: &Path, files: Vec<FileNodes>) -> Result<Vec<GeneratedFile>, String> {
    let mut rendered = Vec::new();
    for (segments, nodes) in group_by_path(files) {
        let rel_path = format!("{}.ts", segments.join("/"));
        let target = target_path(output_dir, &segments);
        let existing_content = if target.is_file() {
            Some(
                fs::read_to_string(&target)
                    .map_err(|err| format!("Failed to read {}: {err}", target.display()))?,
            )
        } else {
            None
        };
        rendered.push(GeneratedFile {
            rel_path,
            new_content: emit_nodes(&nodes),
            existing_content,
        });
    }
    Ok(rendered)
}

/// Write every new or changed file. Returns (created, modified).
pub fn write_files(output_dir: &Path, files: &[GeneratedFile]) -> Result<(usize, usize), String> {
    let mut created = 0;
    let mut modified = 0;

    for file in files {
        if !(file.is_new() || file.is_modified()) {
            debug!(file = %file.rel_path, "Unchanged, skipping.");
            continue;
        }
        let target = output_dir.join(&file.rel_path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .map_err(|err| format!("Failed to create directory {}: {err}", parent.display()))?;
        }
        fs::write(&target, &file.new_content)
            .map_err(|err| format!("Failed to write {}: {err}", target.display()))?;
        debug!(file = %file.rel_path, "Wrote generated file.");

        if file.is_new() {
            created += 1;
        } else {
            modified += 1;
        }
    }

    Ok((created, modified))
}

fn target_path(output_dir: &Path, segments: &[String]) -> PathBuf {
    let mut path = output_dir.to_path_buf();
    if let Some((last, dirs)) = segments.split_last() {
        for dir in dirs {
            path.push(dir);
        }
        path.push(format!("{last}.ts"));
    }
    path
}
