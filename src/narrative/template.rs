//! `{placeholder}` templates and weighted template buckets

use rand::Rng;
use regex::{Captures, Regex};
use std::collections::BTreeMap;
use std::sync::OnceLock;
use tracing::warn;

fn placeholder() -> Option<&'static Regex> {
    static PLACEHOLDER: OnceLock<Option<Regex>> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| Regex::new(r"\{([a-z_]+)\}").ok()).as_ref()
}

/// Variables bound into a template
pub type Vars = BTreeMap<&'static str, String>;

/// A text template with `{name}` placeholders
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Template(pub &'static str);

impl Template {
    /// Substitute every placeholder found in `vars`.
    ///
    /// Unknown placeholders are left verbatim so a missing field is visible
    /// in the output instead of silently disappearing.
    pub fn render(&self, vars: &Vars) -> String {
        let Some(re) = placeholder() else {
            return self.0.to_string();
        };
        re.replace_all(self.0, |caps: &Captures| match vars.get(&caps[1]) {
            Some(value) => value.clone(),
            None => {
                warn!(placeholder = &caps[1], "Template placeholder has no value");
                caps[0].to_string()
            }
        })
        .into_owned()
    }

    /// Names of all placeholders, in order of appearance
    pub fn placeholders(&self) -> Vec<&'static str> {
        match placeholder() {
            Some(re) => re
                .captures_iter(self.0)
                .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
                .collect(),
            None => Vec::new(),
        }
    }
}

/// Variants of one template bucket with relative weights
#[derive(Debug, Clone)]
pub struct WeightedTemplates {
    variants: Vec<(Template, f64)>,
}

impl WeightedTemplates {
    pub fn uniform(templates: &[&'static str]) -> Self {
        Self {
            variants: templates.iter().map(|t| (Template(t), 1.0)).collect(),
        }
    }

    /// Weights are applied positionally; missing weights default to 1.0
    pub fn weighted(templates: &[&'static str], weights: &[f64]) -> Self {
        Self {
            variants: templates
                .iter()
                .enumerate()
                .map(|(i, t)| (Template(t), weights.get(i).copied().unwrap_or(1.0)))
                .collect(),
        }
    }

    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Template {
        if self.variants.is_empty() {
            return Template("");
        }
        crate::sampling::weighted(rng, &self.variants)
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }
}
