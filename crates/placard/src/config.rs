//! YAML configuration.
//!
//! A configuration file carries a few settings and a `custom-placeholder`
//! section:
//!
//! ```yaml
//! symbol-prefix: "$"
//! cache-wire-shapes: true
//! max-depth: 32
//! custom-placeholder:
//!   greeting:
//!     type: string
//!     value: "<gold>Hello {0}"
//!     requirements:
//!       level:
//!         type: ">="
//!         input: "%player_level%"
//!         output: "10"
//!         deny: "<red>Too low"
//! ```
//!
//! Per placeholder `type` (default `string`):
//!
//! | Type | Keys |
//! |------|------|
//! | `string` | `value` (string or list of lines) |
//! | `colored_text` | `value` |
//! | `map` | `values` (mapping), `default`, `ignorecase` |
//! | `range` | `values` (`"A-B"` keys), `default` |
//! | `color` | `value`, `bold`, `italic`, `underlined`, `strikethrough`, `obfuscated` |
//! | `math` | `value`, `precision` |
//! | `progress_bar` | `symbol`, `completed-color`, `progress-color`, `remaining-color`, `length` |
//! | `random` | `values` (list) |
//! | `animation` | `values` (list), `interval` (ticks) |
//!
//! Problems inside a readable file never fail the load. The offending entry
//! is skipped and a diagnostic is recorded and logged.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use placard_render::Decoration;
use serde::Deserialize;
use serde_yaml::{Mapping, Value};
use thiserror::Error;

use crate::engine::TemplateEngine;
use crate::placeholder::{
    AnimationPlaceholder, ColorPlaceholder, ColoredTextPlaceholder, MapPlaceholder,
    MathPlaceholder, Placeholder, PlaceholderKind, PlaceholderType, ProgressBarPlaceholder,
    RandomPlaceholder, RangePlaceholder, StringPlaceholder,
};
use crate::requirement::Requirement;

/// Name of the main configuration file, skipped when scanning for
/// placeholder files.
pub const MAIN_FILE: &str = "config.yml";

/// Errors that stop a file from being read at all.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML in {origin}: {source}")]
    Yaml {
        origin: String,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Global settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Marks chat messages for processing.
    pub symbol_prefix: String,
    /// Remember the wire shape per packet kind.
    pub cache_wire_shapes: bool,
    /// Re-entry limit for the template engine.
    pub max_depth: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            symbol_prefix: "$".to_string(),
            cache_wire_shapes: true,
            max_depth: TemplateEngine::DEFAULT_MAX_DEPTH,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
struct RawConfig {
    symbol_prefix: Option<String>,
    cache_wire_shapes: Option<bool>,
    max_depth: Option<usize>,
    custom_placeholder: Mapping,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
struct RawPlaceholder {
    #[serde(rename = "type")]
    kind: Option<String>,
    value: Option<Value>,
    values: Option<Value>,
    default: Option<String>,
    #[serde(alias = "ignore-case")]
    ignorecase: bool,
    interval: Option<u64>,
    precision: Option<usize>,
    symbol: Option<String>,
    completed_color: Option<String>,
    progress_color: Option<String>,
    remaining_color: Option<String>,
    length: Option<usize>,
    bold: bool,
    italic: bool,
    underlined: bool,
    strikethrough: bool,
    obfuscated: bool,
    requirements: Mapping,
}

#[derive(Debug, Deserialize)]
struct RawRequirement {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    input: String,
    #[serde(default)]
    output: String,
    #[serde(default)]
    deny: String,
}

/// A loaded configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub settings: Settings,
    /// Placeholders in file order.
    pub placeholders: Vec<Placeholder>,
    pub diagnostics: Vec<String>,
}

impl Config {
    /// Parses one YAML document. `origin` names it in diagnostics.
    pub fn from_yaml(text: &str, origin: &str) -> Result<Config, ConfigError> {
        let raw: RawConfig = if text.trim().is_empty() {
            RawConfig::default()
        } else {
            serde_yaml::from_str(text).map_err(|source| ConfigError::Yaml {
                origin: origin.to_string(),
                source,
            })?
        };

        let defaults = Settings::default();
        let mut config = Config {
            settings: Settings {
                symbol_prefix: raw.symbol_prefix.unwrap_or(defaults.symbol_prefix),
                cache_wire_shapes: raw.cache_wire_shapes.unwrap_or(defaults.cache_wire_shapes),
                max_depth: raw.max_depth.unwrap_or(defaults.max_depth),
            },
            ..Config::default()
        };

        for (key, value) in &raw.custom_placeholder {
            let Some(name) = scalar(key) else {
                config.diagnose(origin, format!("placeholder name {:?} is not text", key));
                continue;
            };
            match build_placeholder(&name, value) {
                Ok((placeholder, notes)) => {
                    for note in notes {
                        config.diagnose(origin, format!("{}: {}", name, note));
                    }
                    debug!("loaded {} placeholder '{}'", placeholder.placeholder_type(), name);
                    config.placeholders.push(placeholder);
                }
                Err(reason) => config.diagnose(origin, format!("{}: {}, skipped", name, reason)),
            }
        }

        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
        let path = path.as_ref();
        let text = read(path)?;
        Self::from_yaml(&text, &path.display().to_string())
    }

    /// Loads `config.yml` from `dir` for settings and placeholders, then
    /// every other `.yml`/`.yaml` file beneath it for more placeholders.
    ///
    /// Files are read in path order. A name defined twice keeps the later
    /// definition. An extra file that cannot be read or parsed is skipped
    /// with a diagnostic; only a broken `config.yml` fails the load.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Config, ConfigError> {
        let dir = dir.as_ref();
        let main = dir.join(MAIN_FILE);
        let mut config = if main.is_file() {
            Self::from_file(&main)?
        } else {
            Config::default()
        };

        let mut files = Vec::new();
        collect_yaml_files(dir, &mut files)?;
        files.sort();

        for path in files {
            if path == main {
                continue;
            }
            let file = match Self::from_file(&path) {
                Ok(file) => file,
                Err(e) => {
                    config.diagnose(&path.display().to_string(), format!("skipped: {}", e));
                    continue;
                }
            };
            config.diagnostics.extend(file.diagnostics);
            for placeholder in file.placeholders {
                config.insert(placeholder, &path.display().to_string());
            }
        }
        Ok(config)
    }

    /// Adds a placeholder, replacing any earlier one with the same name.
    fn insert(&mut self, placeholder: Placeholder, origin: &str) {
        match self
            .placeholders
            .iter()
            .position(|p| p.name() == placeholder.name())
        {
            Some(i) => {
                self.diagnose(
                    origin,
                    format!("{} overrides an earlier definition", placeholder.name()),
                );
                self.placeholders[i] = placeholder;
            }
            None => self.placeholders.push(placeholder),
        }
    }

    fn diagnose(&mut self, origin: &str, message: String) {
        let message = format!("{}: {}", origin, message);
        warn!("{}", message);
        self.diagnostics.push(message);
    }
}

fn read(path: &Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn collect_yaml_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), ConfigError> {
    let io = |source| ConfigError::Io {
        path: dir.to_path_buf(),
        source,
    };
    for entry in fs::read_dir(dir).map_err(io)? {
        let path = entry.map_err(io)?.path();
        if path.is_dir() {
            collect_yaml_files(&path, out)?;
        } else if matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yml") | Some("yaml")
        ) && path.file_name().and_then(|n| n.to_str()) != Some(MAIN_FILE)
        {
            out.push(path);
        }
    }
    Ok(())
}

/// Text form of a scalar YAML value.
fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// A string, or a list of lines joined with `\n`.
fn text_value(value: &Value) -> Option<String> {
    match value {
        Value::Sequence(items) => Some(
            items
                .iter()
                .filter_map(scalar)
                .collect::<Vec<String>>()
                .join("\n"),
        ),
        other => scalar(other),
    }
}

fn list_value(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::Sequence(items) => Some(items.iter().filter_map(text_value).collect()),
        other => scalar(other).map(|s| vec![s]),
    }
}

fn mapping_pairs(value: &Value) -> Option<Vec<(String, String)>> {
    let Value::Mapping(mapping) = value else {
        return None;
    };
    Some(
        mapping
            .iter()
            .filter_map(|(k, v)| Some((scalar(k)?, text_value(v)?)))
            .collect(),
    )
}

/// Builds one placeholder, returning it with any non-fatal notes.
fn build_placeholder(name: &str, value: &Value) -> Result<(Placeholder, Vec<String>), String> {
    let raw: RawPlaceholder =
        serde_yaml::from_value(value.clone()).map_err(|e| format!("invalid definition ({})", e))?;
    let mut notes = Vec::new();

    let type_name = raw.kind.as_deref().unwrap_or("string");
    let kind = PlaceholderType::from_name(type_name)
        .ok_or_else(|| format!("unknown placeholder type '{}'", type_name))?;

    let value_text = || raw.value.as_ref().and_then(text_value);
    let required_value = || value_text().ok_or_else(|| "missing 'value'".to_string());
    let values_list = || {
        raw.values
            .as_ref()
            .or(raw.value.as_ref())
            .and_then(list_value)
            .ok_or_else(|| "missing 'values' list".to_string())
    };
    let values_map = || {
        raw.values
            .as_ref()
            .and_then(mapping_pairs)
            .ok_or_else(|| "missing 'values' mapping".to_string())
    };
    let default = raw.default.clone().unwrap_or_default();

    let payload = match kind {
        PlaceholderType::String => PlaceholderKind::String(StringPlaceholder::new(required_value()?)),
        PlaceholderType::ColoredText => {
            PlaceholderKind::ColoredText(ColoredTextPlaceholder::new(required_value()?))
        }
        PlaceholderType::Map => {
            PlaceholderKind::Map(MapPlaceholder::new(values_map()?, default, raw.ignorecase))
        }
        PlaceholderType::Range => {
            let (range, dropped) = RangePlaceholder::from_keys(values_map()?, default);
            notes.extend(dropped);
            PlaceholderKind::Range(range)
        }
        PlaceholderType::Color => {
            let flags = [
                (raw.bold, Decoration::Bold),
                (raw.italic, Decoration::Italic),
                (raw.underlined, Decoration::Underlined),
                (raw.strikethrough, Decoration::Strikethrough),
                (raw.obfuscated, Decoration::Obfuscated),
            ];
            let color = ColorPlaceholder::new(
                &required_value()?,
                flags.iter().filter(|(on, _)| *on).map(|(_, d)| *d),
            );
            if !color.is_valid() {
                notes.push("invalid color, resolves to empty text".to_string());
            }
            PlaceholderKind::Color(color)
        }
        PlaceholderType::Math => {
            let math = MathPlaceholder::new(required_value()?);
            PlaceholderKind::Math(match raw.precision {
                Some(precision) => math.with_precision(precision),
                None => math,
            })
        }
        PlaceholderType::ProgressBar => {
            let defaults = ProgressBarPlaceholder::default();
            PlaceholderKind::ProgressBar(ProgressBarPlaceholder {
                symbol: raw.symbol.clone().unwrap_or(defaults.symbol),
                completed_color: raw.completed_color.clone().unwrap_or(defaults.completed_color),
                progress_color: raw.progress_color.clone().unwrap_or(defaults.progress_color),
                remaining_color: raw.remaining_color.clone().unwrap_or(defaults.remaining_color),
                length: raw.length.unwrap_or(defaults.length),
            })
        }
        PlaceholderType::Random => PlaceholderKind::Random(RandomPlaceholder::new(values_list()?)),
        PlaceholderType::Animation => PlaceholderKind::Animation(AnimationPlaceholder::new(
            values_list()?,
            raw.interval.unwrap_or(AnimationPlaceholder::DEFAULT_INTERVAL),
        )),
    };

    let mut placeholder = Placeholder::new(name, payload);
    for (key, rule) in &raw.requirements {
        let id = scalar(key).unwrap_or_default();
        let parsed = serde_yaml::from_value::<RawRequirement>(rule.clone())
            .map_err(|e| e.to_string())
            .and_then(|r| {
                Requirement::new(&r.kind, r.input, r.output, r.deny).map_err(|e| e.to_string())
            });
        match parsed {
            Ok(requirement) => placeholder = placeholder.with_requirement(requirement),
            Err(reason) => notes.push(format!("requirement '{}' skipped: {}", id, reason)),
        }
    }

    Ok((placeholder, notes))
}
