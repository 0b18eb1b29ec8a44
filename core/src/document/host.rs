use crate::document::model::{LayerGroup, LayeredDocument};

/// Read-only view of a node in a layer hierarchy.
pub trait LayerContainer {
    /// Names of the leaf layers owned directly by this container.
    fn leaf_names(&self) -> Vec<&str>;
    /// Containers nested directly under this one.
    fn child_containers(&self) -> Vec<&Self>;
}

/// The slice of a host document the checklist run is allowed to query.
pub trait DocumentHost {
    type Container: LayerContainer;

    fn top_level_group(&self, name: &str) -> Option<&Self::Container>;
    fn nested_group<'a>(
        &'a self,
        parent: &'a Self::Container,
        name: &str,
    ) -> Option<&'a Self::Container>;
}

impl LayerContainer for LayerGroup {
    fn leaf_names(&self) -> Vec<&str> {
        self.layers.iter().map(|l| l.name.as_str()).collect()
    }

    fn child_containers(&self) -> Vec<&Self> {
        self.groups.iter().collect()
    }
}

impl DocumentHost for LayeredDocument {
    type Container = LayerGroup;

    fn top_level_group(&self, name: &str) -> Option<&LayerGroup> {
        self.group(name)
    }

    fn nested_group<'a>(&'a self, parent: &'a LayerGroup, name: &str) -> Option<&'a LayerGroup> {
        parent.group(name)
    }
}
