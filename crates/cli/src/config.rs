//! `adx.toml` project configuration.
//!
//! ```toml
//! [transliterate]
//! input = "tracking-plan.yml"
//! output = "src/analytics/generated"
//! implementation = "src/analytics/track.ts"
//! methods-async = true
//!
//! [formats]
//! email = "EmailAddress"
//! ```
//!
//! Paths are relative to the directory holding the config file.

use indexmap::IndexMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use adx_core::{FormatRegistry, FormatTarget};

/// Config file looked up in the working directory.
pub const CONFIG_FILENAME: &str = "adx.toml";

/// Values from `adx.toml`; every entry is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdxConfig {
    /// `transliterate.input`: the tracking plan.
    pub input: Option<PathBuf>,
    /// `transliterate.output`: the generated modules' root.
    pub output: Option<PathBuf>,
    /// `transliterate.implementation`: module receiving tracked events.
    pub implementation: Option<PathBuf>,
    /// `transliterate.methods-async`
    pub methods_async: Option<bool>,
    /// `format` keyword -> TypeScript type name.
    pub formats: IndexMap<String, String>,
}

impl AdxConfig {
    /// The built-in formats extended with the configured ones.
    pub fn format_registry(&self) -> FormatRegistry {
        let mut registry = FormatRegistry::default();
        for (format, type_name) in &self.formats {
            registry.register(format.clone(), FormatTarget::Named(type_name.clone()));
        }
        registry
    }
}

/// Load the config at `explicit`, or `adx.toml` in the working directory if
/// present. A missing explicit file is an error; a missing default is not.
pub fn load_config(explicit: Option<&Path>) -> Result<AdxConfig, String> {
    match explicit {
        Some(path) => read_config(path),
        None => {
            let default = Path::new(CONFIG_FILENAME);
            if default.is_file() {
                read_config(default)
            } else {
                debug!("No {CONFIG_FILENAME} found, using command line arguments only.");
                Ok(AdxConfig::default())
            }
        }
    }
}

/// Read and parse a config file; paths resolve against its directory.
pub fn read_config(path: &Path) -> Result<AdxConfig, String> {
    let contents = fs::read_to_string(path)
        .map_err(|err| format!("Failed to read {}: {err}", path.display()))?;
    let base = path.parent().unwrap_or_else(|| Path::new(""));
    debug!(config = %path.display(), "Loading configuration.");
    parse_config(&contents, base).map_err(|err| format!("{}: {err}", path.display()))
}

/// Parse config text, resolving paths against `base`.
pub fn parse_config(contents: &str, base: &Path) -> Result<AdxConfig, String> {
    let value: toml::Value = contents
        .parse()
        .map_err(|err| format!("Failed to parse config: {err}"))?;

    let section = value.get("transliterate");
    let path_value = |key: &str| -> Result<Option<PathBuf>, String> {
        match section.and_then(|s| s.get(key)) {
            None => Ok(None),
            Some(v) => v
                .as_str()
                .map(|s| Some(base.join(s)))
                .ok_or_else(|| format!("transliterate.{key} must be a string")),
        }
    };

    let methods_async = match section.and_then(|s| s.get("methods-async")) {
        None => None,
        Some(v) => Some(
            v.as_bool()
                .ok_or_else(|| "transliterate.methods-async must be a boolean".to_string())?,
        ),
    };

    let mut formats = IndexMap::new();
    if let Some(table) = value.get("formats") {
        let table = table
            .as_table()
            .ok_or_else(|| "formats must be a table".to_string())?;
        for (format, type_name) in table {
            let type_name = type_name
                .as_str()
                .ok_or_else(|| format!("formats.{format} must be a type name string"))?;
            formats.insert(format.clone(), type_name.to_string());
        }
    }

    Ok(AdxConfig {
        input: path_value("input")?,
        output: path_value("output")?,
        implementation: path_value("implementation")?,
        methods_async,
        formats,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_full_config() {
        let config = parse_config(
            r#"
[transliterate]
input = "plan.yml"
output = "generated"
implementation = "./src/track.ts"
methods-async = false

[formats]
email = "EmailAddress"
uuid = "Uuid"
"#,
            Path::new("project"),
        )
        .unwrap();

        assert_eq!(config.input, Some(PathBuf::from("project/plan.yml")));
        assert_eq!(config.output, Some(PathBuf::from("project/generated")));
        assert_eq!(
            config.implementation,
            Some(Path::new("project").join("./src/track.ts"))
        );
        assert_eq!(config.methods_async, Some(false));
        let formats: Vec<_> = config.formats.keys().cloned().collect();
        assert_eq!(formats, vec!["email", "uuid"]);

        let registry = config.format_registry();
        assert_eq!(
            registry.resolve("email"),
            Some(&FormatTarget::Named("EmailAddress".into()))
        );
        assert_eq!(registry.resolve("date-time"), Some(&FormatTarget::Date));
    }

    #[test]
    fn test_empty_config() {
        assert_eq!(parse_config("", Path::new("")).unwrap(), AdxConfig::default());
    }

    #[test]
    fn test_invalid_values() {
        let err = parse_config("[transliterate]\nmethods-async = \"yes\"\n", Path::new("")).unwrap_err();
        assert!(err.contains("methods-async"));
        let err = parse_config("[formats]\nemail = 3\n", Path::new("")).unwrap_err();
        assert!(err.contains("formats.email"));
    }

    #[test]
    fn test_missing_explicit_config() {
        let err = load_config(Some(Path::new("/definitely/not/here/adx.toml"))).unwrap_err();
        assert!(err.starts_with("Failed to read"));
    }
}
