//! `adx transliterate`: tracking plan in, TypeScript modules out.

use clap::Args;
use console::style;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info};

use crate::config::load_config;
use crate::run_command;
use crate::writer::{GeneratedFile, render_files, write_files};
use adx_core::{TrackingPlan, Transliterator};

/// Flags of `adx transliterate`. Unset flags fall back to `adx.toml`.
#[derive(Args, Debug, Clone, Default)]
pub struct TransliterateArgs {
    #[arg(
        short = 'i',
        long = "input",
        value_name = "PLAN",
        help = "Tracking plan YAML file"
    )]
    pub input: Option<PathBuf>,

    #[arg(
        short = 'o',
        long = "output",
        value_name = "DIR",
        help = "Directory the generated modules are written to"
    )]
    pub output: Option<PathBuf>,

    #[arg(
        long = "implementation",
        value_name = "MODULE",
        help = "Module whose default export receives every tracked event. Without it, events are logged to the console"
    )]
    pub implementation: Option<PathBuf>,

    #[arg(
        long = "methods-async",
        alias = "methodsAsync",
        value_name = "BOOL",
        help = "Generate async tracking functions that await the implementation [default: true]"
    )]
    pub methods_async: Option<bool>,

    #[arg(
        long = "config",
        value_name = "FILE",
        help = "Project config file. Defaults to ./adx.toml when present"
    )]
    pub config: Option<PathBuf>,

    #[arg(
        long = "check",
        help = "Don't write anything; fail if the generated files are missing or out of date"
    )]
    pub check: bool,
}

/// Run the command and return its exit code.
pub fn run(args: TransliterateArgs) -> i32 {
    run_command(|| run_inner(args))
}

/// Arguments merged with the config file; flags win.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Settings {
    input: PathBuf,
    output: PathBuf,
    implementation: Option<PathBuf>,
    methods_async: bool,
}

fn run_inner(args: TransliterateArgs) -> Result<(), String> {
    let config = load_config(args.config.as_deref())?;
    let settings = Settings {
        input: args
            .input
            .or_else(|| config.input.clone())
            .ok_or("No tracking plan given. Pass --input or set transliterate.input in adx.toml")?,
        output: args
            .output
            .or_else(|| config.output.clone())
            .ok_or("No output directory given. Pass --output or set transliterate.output in adx.toml")?,
        implementation: args.implementation.or_else(|| config.implementation.clone()),
        methods_async: args.methods_async.or(config.methods_async).unwrap_or(true),
    };
    debug!(?settings, "Resolved transliterate settings.");

    let implementation = settings
        .implementation
        .as_deref()
        .map(|module| implementation_import(&settings.output, module))
        .transpose()?;

    let yaml = fs::read_to_string(&settings.input)
        .map_err(|err| format!("Failed to read {}: {err}", settings.input.display()))?;
    let plan = TrackingPlan::from_yaml_str(&yaml, &config.format_registry())
        .map_err(|err| format!("{}: {err}", settings.input.display()))?;

    let transliterator = Transliterator {
        implementation,
        methods_async: settings.methods_async,
    };
    let groups = transliterator
        .transliterate(&plan)
        .map_err(|err| format!("{}: {err}", settings.input.display()))?;

    // Everything is rendered before anything touches the output directory.
    let files = render_files(&settings.output, groups)?;

    if args.check {
        return check(&files);
    }

    let (created, modified) = write_files(&settings.output, &files)?;
    let unchanged = files.len() - created - modified;
    info!(created, modified, unchanged, "Transliteration finished.");
    println!(
        "{} Generated {} file(s) in {}: {} created, {} modified, {} unchanged",
        style("✓").green(),
        files.len(),
        settings.output.display(),
        created,
        modified,
        unchanged
    );
    Ok(())
}

fn check(files: &[GeneratedFile]) -> Result<(), String> {
    let missing: Vec<_> = files.iter().filter(|f| f.is_new()).collect();
    let modified: Vec<_> = files.iter().filter(|f| f.is_modified()).collect();

    if !missing.is_empty() {
        println!("{}", style("Missing files:").yellow());
        for file in &missing {
            println!("  {} {}", style("+").green(), file.rel_path);
        }
        println!();
    }
    for file in &modified {
        if let Some(diff) = file.generate_diff() {
            println!("{diff}");
        }
    }

    let stale = missing.len() + modified.len();
    if stale > 0 {
        return Err(format!(
            "{stale} generated file(s) are out of date. Run `adx transliterate` to regenerate them."
        ));
    }
    println!("{} All {} generated file(s) are up to date.", style("✓").green(), files.len());
    Ok(())
}

/// Import path of the implementation module as seen from the output root:
/// extension dropped, `/`-separated, relative to `output`.
fn implementation_import(output: &Path, module: &Path) -> Result<String, String> {
    let stem = match module.extension().and_then(|ext| ext.to_str()) {
        Some("ts" | "tsx" | "js" | "mjs") => module.with_extension(""),
        _ => module.to_path_buf(),
    };
    let from = normalized(output)?;
    let target = normalized(&stem)?;

    let common = from
        .iter()
        .zip(target.iter())
        .take_while(|(a, b)| a == b)
        .count();
    let mut parts: Vec<String> = vec!["..".to_string(); from.len() - common];
    parts.extend(target[common..].iter().cloned());
    Ok(parts.join("/"))
}

/// Absolute, lexically normalized path components.
fn normalized(path: &Path) -> Result<Vec<String>, String> {
    let absolute = std::path::absolute(path)
        .map_err(|err| format!("Failed to resolve {}: {err}", path.display()))?;
    let mut parts: Vec<String> = Vec::new();
    for component in absolute.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
            Component::ParentDir => {
                parts.pop();
            }
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
        }
    }
    Ok(parts)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_implementation_import_from_nested_output() {
        assert_eq!(
            implementation_import(Path::new("src/generated"), Path::new("./src/analytics.ts"))
                .unwrap(),
            "../analytics"
        );
        assert_eq!(
            implementation_import(Path::new("generated"), Path::new("src/track.js")).unwrap(),
            "../src/track"
        );
    }

    #[test]
    fn test_implementation_import_inside_output() {
        assert_eq!(
            implementation_import(Path::new("./out"), Path::new("out/impl/track.ts")).unwrap(),
            "impl/track"
        );
    }

    #[test]
    fn test_implementation_import_keeps_unknown_extensions() {
        assert_eq!(
            implementation_import(Path::new("out"), Path::new("lib/track.v2")).unwrap(),
            "../lib/track.v2"
        );
    }

    #[test]
    fn test_missing_config_is_reported() {
        let err = run_inner(TransliterateArgs {
            output: Some(PathBuf::from("out")),
            config: Some(PathBuf::from("/definitely/not/here/adx.toml")),
            ..TransliterateArgs::default()
        })
        .unwrap_err();
        assert!(err.starts_with("Failed to read"));
    }

    #[test]
    fn test_missing_input_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("adx.toml");
        fs::write(&config, "[transliterate]\noutput = \"out\"\n").unwrap();
        let err = run_inner(TransliterateArgs {
            config: Some(config),
            ..TransliterateArgs::default()
        })
        .unwrap_err();
        assert!(err.starts_with("No tracking plan given"), "{err}");
    }
}
