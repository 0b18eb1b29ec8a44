use serde::{Deserialize, Serialize};

pub const MISSING_HEADER: &str = "Missing layers:";
pub const ALL_PRESENT: &str = "All layers are present.";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationReport {
    pub root_group: String,
    pub sub_group: String,
    pub existing_count: usize,
    pub required_count: usize,
    pub missing: Vec<String>,
}

impl ValidationReport {
    pub fn all_present(&self) -> bool {
        self.missing.is_empty()
    }

    pub fn overall(&self) -> &'static str {
        if self.all_present() {
            "PASS"
        } else {
            "FAIL"
        }
    }

    /// The single message shown to the user for this report.
    pub fn message(&self) -> String {
        if self.all_present() {
            ALL_PRESENT.to_string()
        } else {
            format!("{}\n{}", MISSING_HEADER, self.missing.join("\n"))
        }
    }
}
