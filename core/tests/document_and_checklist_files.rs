use layercheck_core::checklist::{load_checklist, RequiredList};
use layercheck_core::document::flatten::flatten;
use layercheck_core::document::host::DocumentHost;
use layercheck_core::document::loader::{discover_documents, load_document};
use layercheck_core::validator::ChecklistValidator;
use std::fs;

#[test]
fn exported_document_loads_with_omitted_lists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("jornada_12.json");
    fs::write(
        &path,
        serde_json::json!({
            "groups": [{
                "name": "INTRO",
                "groups": [{
                    "name": "EQUIPA CASA",
                    "layers": [{"name": "SÃO PAULO FC"}],
                    "groups": [{"name": "B", "layers": [{"name": "CD EAF B"}]}]
                }]
            }]
        })
        .to_string(),
    )
    .unwrap();

    let doc = load_document(&path).unwrap();
    assert_eq!(doc.name, "jornada_12.json");
    assert!(doc.layers.is_empty());
    let intro = doc.top_level_group("INTRO").unwrap();
    let casa = doc.nested_group(intro, "EQUIPA CASA").unwrap();
    assert_eq!(flatten(casa), vec!["SÃO PAULO FC", "CD EAF B"]);

    let report = ChecklistValidator::default()
        .validate(&doc, &RequiredList::new(["CD EAF B", "CD EAF A"]))
        .unwrap();
    assert_eq!(report.missing, vec!["CD EAF A"]);
    assert_eq!(report.overall(), "FAIL");
}

#[test]
fn malformed_document_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "{\"groups\": [ {\"layers\": []} ]}").unwrap();
    assert!(load_document(&path).is_err());
}

#[test]
fn json_that_is_not_a_layer_export_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    for (file, body) in [
        ("array.json", "[\"X\"]"),
        ("empty.json", "{}"),
        ("no_groups.json", "{\"name\": \"match.psd\", \"layers\": []}"),
        ("nothing.json", "{\"layers\": [], \"groups\": []}"),
    ] {
        let path = dir.path().join(file);
        fs::write(&path, body).unwrap();
        assert!(load_document(&path).is_err(), "{} should be rejected", file);
    }

    let flat = dir.path().join("flat.json");
    fs::write(&flat, "{\"layers\": [{\"name\": \"Background\"}], \"groups\": []}").unwrap();
    assert_eq!(load_document(&flat).unwrap().layers.len(), 1);
}

#[test]
fn directory_discovery_is_sorted_and_json_only() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("round_2")).unwrap();
    fs::write(dir.path().join("round_2").join("a.json"), "{}").unwrap();
    fs::write(dir.path().join("b.json"), "{}").unwrap();
    fs::write(dir.path().join("notes.txt"), "").unwrap();

    let found = discover_documents(dir.path()).unwrap();
    let rel: Vec<String> = found
        .iter()
        .map(|p| {
            p.strip_prefix(dir.path())
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect();
    assert_eq!(rel, vec!["b.json", "round_2/a.json"]);
    assert!(discover_documents(dir.path().join("nope")).is_err());
}

#[test]
fn checklist_formats_load_by_extension() {
    let dir = tempfile::tempdir().unwrap();

    let json = dir.path().join("casa.json");
    fs::write(
        &json,
        r#"{"checklist_version":"v2","root_group":"INTRO","sub_group":"EQUIPA FORA","required_layers":["UR MERCÊS","UR MERCÊS"]}"#,
    )
    .unwrap();
    let c = load_checklist(&json).unwrap();
    assert_eq!(c.sub_group_or_default(), "EQUIPA FORA");
    assert_eq!(c.required_layers.names(), &["UR MERCÊS", "UR MERCÊS"]);

    let csv = dir.path().join("casa.csv");
    fs::write(&csv, "order,layer_name\n1,ANÇÃ FC\n2,GUIA FC\n3,\n").unwrap();
    let c = load_checklist(&csv).unwrap();
    assert_eq!(c.required_layers.names(), &["ANÇÃ FC", "GUIA FC"]);
    assert_eq!(c.root_group_or_default(), "INTRO");

    let txt = dir.path().join("casa.txt");
    fs::write(&txt, "\u{feff}NADADOURO\n\nUD BATALHA\n").unwrap();
    let c = load_checklist(&txt).unwrap();
    assert_eq!(c.required_layers.names(), &["NADADOURO", "UD BATALHA"]);

    let empty = dir.path().join("empty.txt");
    fs::write(&empty, "\n\n").unwrap();
    assert!(load_checklist(&empty).is_err());
}

#[test]
fn checklist_digest_depends_on_order_and_repeats() {
    let a = RequiredList::new(["X", "Y"]).sha256().unwrap();
    let b = RequiredList::new(["Y", "X"]).sha256().unwrap();
    let c = RequiredList::new(["X", "Y", "Y"]).sha256().unwrap();
    assert_ne!(a, b);
    assert_ne!(a, c);
    assert_eq!(a, RequiredList::new(["X", "Y"]).sha256().unwrap());
}
