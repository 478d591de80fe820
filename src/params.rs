use crate::config::Config;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

/// Sentinel in the command template replaced by the escaped completion prefix.
pub const PLACEHOLDER: &str = "{PLACEHOLDER}";

pub const MIN_LIMIT: i64 = 1;
pub const MAX_LIMIT: i64 = 2000;
pub const DEFAULT_MAX_SIZE: i64 = 100;

const PATTERN_TOKEN: &str = "^{PLACEHOLDER}[_A-Za-z0-9:-]*\t";
const REGEX_META: &[char] = &['\\', '[', ']', '^', '$', '.', '*'];

/// Fully resolved source parameters for one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Params {
    pub cmd: Vec<String>,
    pub args: Vec<String>,
    pub max_size: i64,
}

impl Default for Params {
    fn default() -> Self {
        Self::with_program("rg", DEFAULT_MAX_SIZE)
    }
}

impl Params {
    fn with_program(program: &str, max_size: i64) -> Self {
        Self {
            cmd: vec![
                program.to_string(),
                PATTERN_TOKEN.to_string(),
                "--color=never".to_string(),
            ],
            args: Vec::new(),
            max_size,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::with_program(&config.program, config.max_size)
    }

    /// Overlay caller-supplied fields on top of `self`.
    pub fn merge(&self, overlay: &ParamsOverride) -> Params {
        Params {
            cmd: overlay.cmd.clone().unwrap_or_else(|| self.cmd.clone()),
            args: overlay.args.clone().unwrap_or_else(|| self.args.clone()),
            max_size: overlay.max_size.unwrap_or(self.max_size),
        }
    }

    /// Effective output budget: `max_size` clamped to 1..=2000.
    pub fn limit(&self) -> usize {
        self.max_size.clamp(MIN_LIMIT, MAX_LIMIT) as usize
    }
}

/// Partial params as sent by a caller. Missing or mistyped fields stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamsOverride {
    pub cmd: Option<Vec<String>>,
    pub args: Option<Vec<String>>,
    pub max_size: Option<i64>,
}

impl ParamsOverride {
    pub fn from_value(value: &Value) -> Self {
        Self {
            cmd: string_list(value.get("cmd"))
                .filter(|cmd| cmd.first().is_some_and(|program| !program.trim().is_empty())),
            args: string_list(value.get("args")),
            max_size: value.get("maxSize").and_then(number_as_i64),
        }
    }

    /// Load an override from a YAML or JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = crate::util::read_to_string(path)?;
        let value: Value = serde_yaml_ng::from_str(&raw)
            .with_context(|| format!("parse params {}", path.display()))?;
        Ok(Self::from_value(&value))
    }

    /// Fields set in `other` win over fields set in `self`.
    pub fn overlay(self, other: ParamsOverride) -> ParamsOverride {
        ParamsOverride {
            cmd: other.cmd.or(self.cmd),
            args: other.args.or(self.args),
            max_size: other.max_size.or(self.max_size),
        }
    }
}

fn string_list(value: Option<&Value>) -> Option<Vec<String>> {
    let items = value?.as_array()?;
    items
        .iter()
        .map(|item| item.as_str().map(str::to_string))
        .collect()
}

fn number_as_i64(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_f64().filter(|v| v.is_finite()).map(|v| v as i64))
}

/// Backslash-escape the regex metacharacters `\ [ ] ^ $ . *`.
pub fn escape_pattern(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        if REGEX_META.contains(&ch) {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// Replace the first placeholder in each template token.
pub fn substitute(template: &[String], pattern: &str) -> Vec<String> {
    template
        .iter()
        .map(|token| token.replacen(PLACEHOLDER, pattern, 1))
        .collect()
}
