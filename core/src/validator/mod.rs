pub mod report;

use crate::checklist::{RequiredList, DEFAULT_ROOT_GROUP, DEFAULT_SUB_GROUP};
use crate::document::flatten::flatten;
use crate::document::host::DocumentHost;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

pub use report::ValidationReport;

/// A lookup that ends a run before any comparison happens.
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name")]
pub enum LookupError {
    #[error("Group '{0}' not found.")]
    GroupNotFound(String),
    #[error("Subgroup '{0}' not found.")]
    SubgroupNotFound(String),
}

/// Which group of the document holds the checklist layers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationTarget {
    pub root_group: String,
    pub sub_group: String,
}

impl ValidationTarget {
    pub fn new(root_group: impl Into<String>, sub_group: impl Into<String>) -> Self {
        Self {
            root_group: root_group.into(),
            sub_group: sub_group.into(),
        }
    }
}

impl Default for ValidationTarget {
    fn default() -> Self {
        Self::new(DEFAULT_ROOT_GROUP, DEFAULT_SUB_GROUP)
    }
}

/// Required names (one entry per occurrence) with no exact match in `existing`.
pub fn find_missing(existing: &[String], required: &[String]) -> Vec<String> {
    let present: HashSet<&str> = existing.iter().map(String::as_str).collect();
    required
        .iter()
        .filter(|r| !present.contains(r.as_str()))
        .cloned()
        .collect()
}

pub struct ChecklistValidator {
    pub target: ValidationTarget,
}

impl ChecklistValidator {
    pub fn new(target: ValidationTarget) -> Self {
        Self { target }
    }

    pub fn resolve_root<'a, H: DocumentHost>(
        &self,
        host: &'a H,
    ) -> Result<&'a H::Container, LookupError> {
        host.top_level_group(&self.target.root_group)
            .ok_or_else(|| LookupError::GroupNotFound(self.target.root_group.clone()))
    }

    pub fn resolve_sub<'a, H: DocumentHost>(
        &self,
        host: &'a H,
        root: &'a H::Container,
    ) -> Result<&'a H::Container, LookupError> {
        host.nested_group(root, &self.target.sub_group)
            .ok_or_else(|| LookupError::SubgroupNotFound(self.target.sub_group.clone()))
    }

    pub fn resolve<'a, H: DocumentHost>(
        &self,
        host: &'a H,
    ) -> Result<&'a H::Container, LookupError> {
        let root = self.resolve_root(host)?;
        self.resolve_sub(host, root)
    }

    pub fn validate<H: DocumentHost>(
        &self,
        host: &H,
        required: &RequiredList,
    ) -> Result<ValidationReport, LookupError> {
        let sub = self.resolve(host)?;
        let existing = flatten(sub);
        Ok(self.compare(&existing, required))
    }

    pub fn compare(&self, existing: &[String], required: &RequiredList) -> ValidationReport {
        ValidationReport {
            root_group: self.target.root_group.clone(),
            sub_group: self.target.sub_group.clone(),
            existing_count: existing.len(),
            required_count: required.len(),
            missing: find_missing(existing, required.names()),
        }
    }
}

impl Default for ChecklistValidator {
    fn default() -> Self {
        Self::new(ValidationTarget::default())
    }
}
