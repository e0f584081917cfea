use std::collections::HashMap;

use super::substitute_args;

/// Keyed lookup: `args[0]` selects a template, `args[1..]` fill it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapPlaceholder {
    values: HashMap<String, String>,
    default: String,
    ignore_case: bool,
}

impl MapPlaceholder {
    pub fn new<I, K, V>(values: I, default: impl Into<String>, ignore_case: bool) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let values = values
            .into_iter()
            .map(|(k, v)| {
                let key: String = k.into();
                let key = if ignore_case { key.to_lowercase() } else { key };
                (key, v.into())
            })
            .collect();
        Self {
            values,
            default: default.into(),
            ignore_case,
        }
    }

    pub fn ignore_case(&self) -> bool {
        self.ignore_case
    }

    pub fn default_value(&self) -> &str {
        &self.default
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        let found = if self.ignore_case {
            self.values.get(&key.to_lowercase())
        } else {
            self.values.get(key)
        };
        found.map(String::as_str)
    }

    pub(crate) fn resolve(&self, args: &[String]) -> String {
        let Some(key) = args.first() else {
            return self.default.clone();
        };
        match self.get(key) {
            Some(template) if !template.is_empty() => substitute_args(template, args, 1),
            _ => self.default.clone(),
        }
    }
}
