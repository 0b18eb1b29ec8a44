use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Layer {
    pub name: String,
}

impl Layer {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A layer group as exported from the editing application: direct leaf layers
/// plus nested groups, both in the document's own stacking order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LayerGroup {
    pub name: String,
    #[serde(default)]
    pub layers: Vec<Layer>,
    #[serde(default)]
    pub groups: Vec<LayerGroup>,
}

impl LayerGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_layers<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.layers.extend(names.into_iter().map(Layer::new));
        self
    }

    pub fn with_group(mut self, group: LayerGroup) -> Self {
        self.groups.push(group);
        self
    }

    /// First direct child group with exactly this name.
    pub fn group(&self, name: &str) -> Option<&LayerGroup> {
        self.groups.iter().find(|g| g.name == name)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LayeredDocument {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub layers: Vec<Layer>,
    pub groups: Vec<LayerGroup>,
}

impl LayeredDocument {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_group(mut self, group: LayerGroup) -> Self {
        self.groups.push(group);
        self
    }

    pub fn group(&self, name: &str) -> Option<&LayerGroup> {
        self.groups.iter().find(|g| g.name == name)
    }
}
