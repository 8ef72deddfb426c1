//! Categorizers: map a finalized event state onto analysis categories.
//!
//! The trait mirrors the category-definition collaborator: `reset`
//! before each candidate, `evaluate` once a candidate has passed all
//! selection stages, then read off which definitions matched. Two
//! variants exist, selected at construction time: the declarative
//! [`ConfigCategorizer`] driven by a JSON description, and the small
//! hardcoded [`BaselineCategorizer`].

use dimu_core::{Error, Result};
use serde::{Deserialize, Serialize};

use crate::state::EventState;

/// Comparison operator for declarative conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Op {
    /// Strictly less than.
    Lt,
    /// Less than or equal.
    Le,
    /// Strictly greater than.
    Gt,
    /// Greater than or equal.
    Ge,
}

impl Op {
    fn apply(self, lhs: f64, rhs: f64) -> bool {
        match self {
            Op::Lt => lhs < rhs,
            Op::Le => lhs <= rhs,
            Op::Gt => lhs > rhs,
            Op::Ge => lhs >= rhs,
        }
    }
}

/// One predicate clause: `feature op value`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Condition {
    /// Named observable (see `EventState::feature`).
    pub feature: String,
    /// Comparison operator.
    pub op: Op,
    /// Threshold value.
    pub value: f64,
}

/// One category definition: a name, a hide flag for intermediate
/// categories, an optional mutually-exclusive group, and the
/// conjunction of conditions an event must satisfy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryDef {
    /// Category name.
    pub name: String,
    /// Exclude from final output.
    #[serde(default)]
    pub hide: bool,
    /// Mutually-exclusive group: within a group, the first matching
    /// definition (in definition order) wins.
    #[serde(default)]
    pub exclusive_group: Option<String>,
    /// Conditions, all of which must hold. Empty means always matches.
    #[serde(default)]
    pub require: Vec<Condition>,
}

impl CategoryDef {
    /// Unconditional definition, mostly useful in tests.
    pub fn new(name: impl Into<String>, hide: bool) -> Self {
        Self { name: name.into(), hide, exclusive_group: None, require: Vec::new() }
    }
}

/// Categorizer capability: per-candidate reset, evaluation against a
/// finalized state, and readout of the matched definitions.
pub trait Categorizer: Send {
    /// Clear transient per-candidate flags.
    fn reset(&mut self);

    /// Evaluate every category predicate against the finalized state.
    fn evaluate(&mut self, state: &EventState);

    /// The fixed, ordered category definitions.
    fn defs(&self) -> &[CategoryDef];

    /// Indices into `defs()` of the categories the last `evaluate`
    /// matched.
    fn matched(&self) -> Vec<usize>;

    /// Human-readable summary of the last evaluation.
    fn output_results(&self) -> String {
        let defs = self.defs();
        let names: Vec<&str> =
            self.matched().into_iter().map(|i| defs[i].name.as_str()).collect();
        format!("matched: [{}]", names.join(", "))
    }
}

/// Declaratively configured categorizer.
pub struct ConfigCategorizer {
    defs: Vec<CategoryDef>,
    in_category: Vec<bool>,
}

/// Serialized form of a category description file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryFile {
    /// Ordered category definitions.
    pub categories: Vec<CategoryDef>,
}

impl ConfigCategorizer {
    /// Build from ordered definitions. Validates that names are unique
    /// and that conditions reference known features.
    pub fn new(defs: Vec<CategoryDef>) -> Result<Self> {
        if defs.is_empty() {
            return Err(Error::Config("category description defines no categories".into()));
        }
        for (i, def) in defs.iter().enumerate() {
            if defs[..i].iter().any(|d| d.name == def.name) {
                return Err(Error::Config(format!("duplicate category name '{}'", def.name)));
            }
        }
        let in_category = vec![false; defs.len()];
        Ok(Self { defs, in_category })
    }

    /// Parse a JSON category description.
    pub fn from_json(json: &str) -> Result<Self> {
        let file: CategoryFile = serde_json::from_str(json)?;
        Self::new(file.categories)
    }
}

impl Categorizer for ConfigCategorizer {
    fn reset(&mut self) {
        for flag in &mut self.in_category {
            *flag = false;
        }
    }

    fn evaluate(&mut self, state: &EventState) {
        let mut satisfied_groups: Vec<&str> = Vec::new();
        for (i, def) in self.defs.iter().enumerate() {
            if let Some(ref group) = def.exclusive_group {
                if satisfied_groups.contains(&group.as_str()) {
                    continue;
                }
            }
            let matches = def
                .require
                .iter()
                .all(|c| c.op.apply(state.feature(&c.feature).unwrap_or(f64::NAN), c.value));
            self.in_category[i] = matches;
            if matches {
                if let Some(ref group) = def.exclusive_group {
                    satisfied_groups.push(group.as_str());
                }
            }
        }
    }

    fn defs(&self) -> &[CategoryDef] {
        &self.defs
    }

    fn matched(&self) -> Vec<usize> {
        self.in_category
            .iter()
            .enumerate()
            .filter(|(_, &m)| m)
            .map(|(i, _)| i)
            .collect()
    }
}

/// Hardcoded fallback categorizer: an inclusive category plus a jet
/// multiplicity split. Used when no category description is supplied.
pub struct BaselineCategorizer {
    inner: ConfigCategorizer,
}

impl BaselineCategorizer {
    /// Build the baseline category tree.
    pub fn new() -> Self {
        let defs = vec![
            CategoryDef::new("inclusive", false),
            CategoryDef {
                name: "ge2_jets".into(),
                hide: false,
                exclusive_group: Some("jets".into()),
                require: vec![Condition { feature: "n_jets".into(), op: Op::Ge, value: 2.0 }],
            },
            CategoryDef {
                name: "lt2_jets".into(),
                hide: false,
                exclusive_group: Some("jets".into()),
                require: vec![Condition { feature: "n_jets".into(), op: Op::Lt, value: 2.0 }],
            },
        ];
        // the definitions are static and valid
        let inner = ConfigCategorizer::new(defs).unwrap_or_else(|_| unreachable!());
        Self { inner }
    }
}

impl Default for BaselineCategorizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Categorizer for BaselineCategorizer {
    fn reset(&mut self) {
        self.inner.reset()
    }

    fn evaluate(&mut self, state: &EventState) {
        self.inner.evaluate(state)
    }

    fn defs(&self) -> &[CategoryDef] {
        self.inner.defs()
    }

    fn matched(&self) -> Vec<usize> {
        self.inner.matched()
    }
}
