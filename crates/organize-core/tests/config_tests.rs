//! Tests for loading rules documents and building rules from them

use organize_core::config::{Definition, Format, LocationDefinition};
use organize_core::{Error, Executor, Registry, load_document, parse_document};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;
use tempfile::TempDir;

const YAML: &str = r#"
trash_dir: /tmp/organize-bin
rules:
  - name: Invoices
    locations:
      - ~/Downloads
      - path: ~/Desktop
        max_depth: 2
    subfolders: true
    filters:
      - extension: pdf
      - name:
          startswith: Invoice
    actions:
      - rename: "{path.stem}.pdf"
      - move: { dest: "~/Documents/Invoices/", overwrite: true }
  - locations: ~/Downloads
    enabled: false
    actions:
      - trash
"#;

const TOML: &str = r#"
trash_dir = "/tmp/organize-bin"

[[rules]]
name = "Invoices"
locations = ["~/Downloads", { path = "~/Desktop", max_depth = 2 }]
subfolders = true
filters = [{ extension = "pdf" }, { name = { startswith = "Invoice" } }]
actions = [
    { rename = "{path.stem}.pdf" },
    { move = { dest = "~/Documents/Invoices/", overwrite = true } },
]

[[rules]]
locations = "~/Downloads"
enabled = false
actions = ["trash"]
"#;

const JSON: &str = r#"{
  "trash_dir": "/tmp/organize-bin",
  "rules": [
    {
      "name": "Invoices",
      "locations": ["~/Downloads", {"path": "~/Desktop", "max_depth": 2}],
      "subfolders": true,
      "filters": [{"extension": "pdf"}, {"name": {"startswith": "Invoice"}}],
      "actions": [
        {"rename": "{path.stem}.pdf"},
        {"move": {"dest": "~/Documents/Invoices/", "overwrite": true}}
      ]
    },
    {"locations": "~/Downloads", "enabled": false, "actions": ["trash"]}
  ]
}"#;

#[rstest]
#[case(YAML, Format::Yaml)]
#[case(TOML, Format::Toml)]
#[case(JSON, Format::Json)]
fn all_formats_describe_the_same_rules(#[case] content: &str, #[case] format: Format) {
    let document = parse_document(content, format).unwrap();

    assert_eq!(document.trash_dir, Some("/tmp/organize-bin".into()));
    assert_eq!(document.rules.len(), 2);

    let invoices = &document.rules[0];
    assert_eq!(invoices.name.as_deref(), Some("Invoices"));
    assert_eq!(
        invoices.locations,
        vec![
            LocationDefinition::Path("~/Downloads".into()),
            LocationDefinition::Detailed {
                path: "~/Desktop".into(),
                recursive: None,
                max_depth: Some(2),
                targets: None,
                include_hidden: None,
            },
        ]
    );
    assert_eq!(
        invoices.filters,
        vec![
            Definition::new("extension", json!("pdf")),
            Definition::new("name", json!({"startswith": "Invoice"})),
        ]
    );
    assert_eq!(
        invoices.actions[1],
        Definition::new("move", json!({"dest": "~/Documents/Invoices/", "overwrite": true}))
    );

    let second = &document.rules[1];
    assert!(!second.enabled);
    assert_eq!(second.actions, vec![Definition::new("trash", json!(null))]);

    let executor = Executor::from_document(&document, &Registry::with_builtins()).unwrap();
    assert_eq!(executor.rules().len(), 2);
    assert!(executor.rejected().is_empty());
    assert_eq!(executor.rules()[1].name(), "rule #2");
}

#[test]
fn failing_rules_are_rejected_individually() {
    let document = parse_document(
        r#"
rules:
  - name: good
    locations: /tmp
    actions: [trash]
  - name: typo
    locations: /tmp
    actions: [shred]
  - name: collision
    locations: /tmp
    filters: [{extension: pdf}, {extension: txt}]
  - name: bad template
    locations: /tmp
    actions: [{rename: "{unclosed"}]
"#,
        Format::Yaml,
    )
    .unwrap();

    let executor = Executor::from_document(&document, &Registry::with_builtins()).unwrap();

    assert_eq!(executor.rules().len(), 1);
    let rejected: Vec<_> = executor
        .rejected()
        .iter()
        .map(|r| (r.rule.as_str(), r.error.as_str()))
        .collect();
    assert_eq!(
        rejected,
        vec![
            ("typo", "Unknown action 'shred'"),
            ("collision", "Attribute 'extension' is already provided by another filter"),
            ("bad template", "Invalid template '{unclosed': unclosed placeholder"),
        ]
    );
}

#[test]
fn load_document_dispatches_on_extension() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("rules.yml");
    std::fs::write(&path, YAML).unwrap();

    let document = load_document(&path).unwrap();
    assert_eq!(document.rules.len(), 2);

    let ini = temp.path().join("rules.ini");
    std::fs::write(&ini, "").unwrap();
    assert!(matches!(
        load_document(&ini),
        Err(Error::UnsupportedFormat { .. })
    ));
}

#[test]
fn parse_errors_carry_path_and_format() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("rules.toml");
    std::fs::write(&path, "rules = [").unwrap();

    let err = load_document(&path).unwrap_err();

    let Error::ConfigParse { path: at, format, .. } = &err else {
        panic!("expected a parse error, got {err:?}");
    };
    assert_eq!(at, &path);
    assert_eq!(format, "TOML");
}

#[test]
fn unknown_document_keys_are_rejected() {
    let err = parse_document("rule: []", Format::Yaml).unwrap_err();
    assert!(err.to_string().contains("unknown field"));
}

#[test]
fn missing_file_is_an_io_error() {
    let temp = TempDir::new().unwrap();
    let err = load_document(&temp.path().join("absent.yaml")).unwrap_err();
    assert!(matches!(err, Error::Fs(_)));
}
