use crate::document::host::LayerContainer;

/// Names of every leaf layer under `container`, at any depth.
///
/// Order is depth-first: a container's own leaves come before the contents of
/// its nested containers, each in enumeration order. Names are not deduplicated.
pub fn flatten<C: LayerContainer>(container: &C) -> Vec<String> {
    let mut out = Vec::new();
    flatten_into(container, &mut out);
    out
}

fn flatten_into<C: LayerContainer>(container: &C, out: &mut Vec<String>) {
    out.extend(container.leaf_names().into_iter().map(str::to_string));
    for child in container.child_containers() {
        flatten_into(child, out);
    }
}

pub fn leaf_count<C: LayerContainer>(container: &C) -> usize {
    container.leaf_names().len()
        + container
            .child_containers()
            .into_iter()
            .map(leaf_count)
            .sum::<usize>()
}

#[cfg(test)]
mod tests {
    use super::{flatten, leaf_count};
    use crate::document::model::LayerGroup;

    #[test]
    fn leaves_come_before_nested_groups() {
        let g = LayerGroup::new("root")
            .with_group(LayerGroup::new("a").with_layers(["a1", "a2"]))
            .with_layers(["r1"])
            .with_group(
                LayerGroup::new("b")
                    .with_layers(["b1"])
                    .with_group(LayerGroup::new("c").with_layers(["c1"])),
            );
        assert_eq!(flatten(&g), vec!["r1", "a1", "a2", "b1", "c1"]);
        assert_eq!(leaf_count(&g), 5);
    }

    #[test]
    fn empty_group_flattens_to_nothing() {
        let g = LayerGroup::new("empty").with_group(LayerGroup::new("also empty"));
        assert!(flatten(&g).is_empty());
        assert_eq!(leaf_count(&g), 0);
    }
}
