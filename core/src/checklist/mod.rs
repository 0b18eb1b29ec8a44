use crate::determinism::json_canonical::to_canonical_bytes;
use crate::determinism::run_id::sha256_hex;
use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_ROOT_GROUP: &str = "INTRO";
pub const DEFAULT_SUB_GROUP: &str = "EQUIPA CASA";

/// Ordered list of layer names that must exist. Repeated entries are kept and
/// checked one occurrence at a time.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct RequiredList {
    names: Vec<String>,
}

impl RequiredList {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// `(name, count)` for every name listed more than once, in order of first
    /// occurrence.
    pub fn duplicate_entries(&self) -> Vec<(String, usize)> {
        let mut out: Vec<(String, usize)> = Vec::new();
        for n in &self.names {
            match out.iter_mut().find(|(name, _)| name == n) {
                Some((_, count)) => *count += 1,
                None => out.push((n.clone(), 1)),
            }
        }
        out.retain(|(_, count)| *count > 1);
        out
    }

    pub fn sha256(&self) -> CoreResult<String> {
        Ok(sha256_hex(&to_canonical_bytes(&self.names)?))
    }
}

/// A checklist file: the required names plus, optionally, which group they
/// belong to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Checklist {
    pub checklist_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_group: Option<String>,
    pub required_layers: RequiredList,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ChecklistJson {
    Full(Checklist),
    Bare(Vec<String>),
}

impl Checklist {
    fn bare(version: &str, required_layers: RequiredList) -> Self {
        Self {
            checklist_version: version.to_string(),
            root_group: None,
            sub_group: None,
            required_layers,
        }
    }

    pub fn root_group_or_default(&self) -> &str {
        self.root_group.as_deref().unwrap_or(DEFAULT_ROOT_GROUP)
    }

    pub fn sub_group_or_default(&self) -> &str {
        self.sub_group.as_deref().unwrap_or(DEFAULT_SUB_GROUP)
    }
}

/// The checklist shipped with the tool for the INTRO / EQUIPA CASA group.
pub fn default_checklist() -> CoreResult<Checklist> {
    parse_json(include_str!("default_checklist.json"))
}

pub fn parse_json(s: &str) -> CoreResult<Checklist> {
    Ok(match serde_json::from_str::<ChecklistJson>(s)? {
        ChecklistJson::Full(c) => c,
        ChecklistJson::Bare(names) => Checklist::bare("json", RequiredList::new(names)),
    })
}

/// Reads names from the `layer_name` column, or the first column when the
/// header has no such name.
pub fn parse_csv(s: &str) -> CoreResult<Checklist> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::None)
        .from_reader(s.as_bytes());
    let col = rdr
        .headers()?
        .iter()
        .position(|h| h == "layer_name")
        .unwrap_or(0);
    let mut names = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        match rec.get(col) {
            Some(name) if !name.is_empty() => names.push(name.to_string()),
            _ => continue,
        }
    }
    Ok(Checklist::bare("csv", RequiredList::new(names)))
}

/// One name per line. Blank lines are skipped; other lines are taken literally.
pub fn parse_text(s: &str) -> Checklist {
    let names = s
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(str::to_string);
    Checklist::bare("text", RequiredList::new(names))
}

pub fn load_checklist(path: impl AsRef<Path>) -> CoreResult<Checklist> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path)?;
    let raw = raw.strip_prefix('\u{feff}').unwrap_or(&raw);
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    let checklist = match ext.as_str() {
        "json" => parse_json(raw)?,
        "csv" => parse_csv(raw)?,
        _ => parse_text(raw),
    };
    if checklist.required_layers.is_empty() {
        return Err(CoreError::InvalidInput(format!(
            "checklist {} lists no layers",
            path.display()
        )));
    }
    Ok(checklist)
}
