use rand::seq::SliceRandom;

use super::substitute_args;

/// One of several templates, picked uniformly on every resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RandomPlaceholder {
    values: Vec<String>,
}

impl RandomPlaceholder {
    pub fn new(values: Vec<String>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub(crate) fn resolve(&self, args: &[String]) -> String {
        self.values
            .choose(&mut rand::thread_rng())
            .map(|template| substitute_args(template, args, 0))
            .unwrap_or_default()
    }
}
