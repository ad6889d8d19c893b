//! Lays a tracking plan out into logical files of TypeScript nodes.
//!
//! - `shared-definitions`: `FeatureNames`, `ScreenNames` and every `$defs` type
//! - `screens/<Key>`: one module per screen
//! - `tracks`: every module-level track
//! - `shared-traits`: every trait

use indexmap::IndexMap;
use tracing::debug;

use super::codegen::{SynthesisOptions, codegen_screen_module, codegen_track_export};
use super::render::{
    ImportMappings, SHARED_ALIAS, SHARED_DEFINITIONS, ToTsType, default_import_mappings,
};
use super::types::{TsImport, TsNode, TsPrimitive, TsType};
use crate::error::Result;
use crate::model::plan::TrackingPlan;
use crate::model::types::{StringType, TypeNode};
use crate::schema::Literal;

pub const SCREENS_DIR: &str = "screens";
pub const TRACKS: &str = "tracks";
pub const SHARED_TRAITS: &str = "shared-traits";

/// Nodes destined for one logical path. Several groups may share a path; the
/// writer concatenates them in order.
#[derive(Debug, Clone, PartialEq)]
pub struct FileNodes {
    pub path: Vec<String>,
    pub nodes: Vec<TsNode>,
}

impl FileNodes {
    fn new(path: &[&str], nodes: Vec<TsNode>) -> Self {
        Self {
            path: path.iter().map(|s| s.to_string()).collect(),
            nodes,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Transliterator {
    /// Import path of the implementation module, relative to the output root.
    pub implementation: Option<String>,
    pub methods_async: bool,
}

impl Default for Transliterator {
    fn default() -> Self {
        Self {
            implementation: None,
            methods_async: true,
        }
    }
}

impl Transliterator {
    pub fn transliterate(&self, plan: &TrackingPlan) -> Result<Vec<FileNodes>> {
        let options = SynthesisOptions {
            has_implementation: self.implementation.is_some(),
            methods_async: self.methods_async,
            import_mappings: default_import_mappings(),
        };
        let mut files = Vec::new();

        let feature_names: Vec<&str> = plan.features().iter().map(|f| f.name.as_str()).collect();
        let screen_names: Vec<&str> = plan.screens().iter().map(|s| s.event.name.as_str()).collect();
        files.push(FileNodes::new(
            &[SHARED_DEFINITIONS],
            [
                names_alias("FeatureNames", "List of all the feature names", &feature_names)?,
                names_alias("ScreenNames", "List of all the screen names", &screen_names)?,
            ]
            .concat(),
        ));

        for screen in plan.screens() {
            let mut nodes = self.imports(1);
            nodes.extend(codegen_screen_module(screen, plan, &options)?);
            let key = screen.event.escape_key();
            debug!(screen = %key, nodes = nodes.len(), "Generated screen module.");
            files.push(FileNodes::new(&[SCREENS_DIR, &key], nodes));
        }

        files.push(FileNodes::new(&[TRACKS], self.imports(0)));
        files.push(FileNodes::new(&[SHARED_TRAITS], vec![shared_import(0)]));
        for track in plan.tracks() {
            files.push(FileNodes::new(
                &[TRACKS],
                codegen_track_export(track, plan, &options)?,
            ));
        }

        let local = ImportMappings::new();
        for def in plan.defs() {
            files.push(FileNodes::new(&[SHARED_DEFINITIONS], def.to_ts_nodes(&local)));
        }
        for trait_type in plan.traits() {
            files.push(FileNodes::new(
                &[SHARED_TRAITS],
                trait_type.to_ts_nodes(&options.import_mappings),
            ));
        }

        debug!(groups = files.len(), "Transliterated tracking plan.");
        Ok(files)
    }

    /// Shared-definitions import plus the implementation import, if any, for
    /// a module `depth` directories below the output root.
    fn imports(&self, depth: usize) -> Vec<TsNode> {
        let mut nodes = vec![shared_import(depth)];
        if let Some(implementation) = &self.implementation {
            nodes.push(TsNode::Import(TsImport::Default {
                name: "implementation".to_string(),
                from: relative_to(depth, implementation),
            }));
        }
        nodes
    }
}

/// Path of a root-relative module as seen from `depth` directories down.
fn relative_to(depth: usize, path: &str) -> String {
    let path = path.strip_prefix("./").unwrap_or(path);
    if depth > 0 {
        format!("{}{path}", "../".repeat(depth))
    } else if path.starts_with("../") {
        path.to_string()
    } else {
        format!("./{path}")
    }
}

/// Merge groups sharing a path, keeping first-seen path order and node order.
pub fn group_by_path(files: Vec<FileNodes>) -> IndexMap<Vec<String>, Vec<TsNode>> {
    let mut grouped: IndexMap<Vec<String>, Vec<TsNode>> = IndexMap::new();
    for file in files {
        grouped.entry(file.path).or_default().extend(file.nodes);
    }
    grouped
}

fn shared_import(depth: usize) -> TsNode {
    TsNode::Import(TsImport::Namespace {
        alias: SHARED_ALIAS.to_string(),
        from: relative_to(depth, SHARED_DEFINITIONS),
    })
}

/// `export type <name> = "a" | "b";`, or `never` when there are no names.
fn names_alias(name: &str, doc: &str, names: &[&str]) -> Result<Vec<TsNode>> {
    let ty = if names.is_empty() {
        TsType::Primitive(TsPrimitive::Never)
    } else {
        let values = names.iter().map(|n| Literal::from(*n)).collect();
        TypeNode::enumeration(values, &TypeNode::String(StringType::default()))?
            .to_ts_type(&ImportMappings::new())
    };
    Ok(vec![
        TsNode::Doc(doc.to_string()),
        TsNode::TypeAlias {
            name: name.to_string(),
            ty,
        },
    ])
}
