use layercheck_core::audit::log::AuditLog;
use layercheck_core::checklist::{default_checklist, load_checklist, Checklist};
use layercheck_core::document::loader::{discover_documents, load_document};
use layercheck_core::error::CoreResult;
use layercheck_core::run::manager::{RunManager, RunOutcome};
use layercheck_core::sink::{CollectingSink, StdoutSink};
use layercheck_core::validator::ValidationTarget;
use std::path::{Path, PathBuf};

const USAGE: &str = "usage: layer_checklist <document.json|dir> [--group NAME] [--subgroup NAME] \
[--checklist PATH] [--json] [--audit-log PATH] [--lint]";

#[derive(Debug, Default)]
struct Args {
    documents: PathBuf,
    group: Option<String>,
    subgroup: Option<String>,
    checklist: Option<PathBuf>,
    json: bool,
    audit_log: Option<PathBuf>,
    lint: bool,
}

fn parse_args(argv: &[String]) -> Result<Args, String> {
    let mut args = Args::default();
    let mut positional: Option<PathBuf> = None;
    let mut it = argv.iter();
    while let Some(a) = it.next() {
        let mut value = |flag: &str| {
            it.next()
                .cloned()
                .ok_or_else(|| format!("{} requires a value", flag))
        };
        match a.as_str() {
            "--group" => args.group = Some(value(a)?),
            "--subgroup" => args.subgroup = Some(value(a)?),
            "--checklist" => args.checklist = Some(PathBuf::from(value(a)?)),
            "--audit-log" => args.audit_log = Some(PathBuf::from(value(a)?)),
            "--json" => args.json = true,
            "--lint" => args.lint = true,
            flag if flag.starts_with("--") => return Err(format!("unknown flag: {}", flag)),
            path => {
                if positional.is_some() {
                    return Err(format!("unexpected argument: {}", path));
                }
                positional = Some(PathBuf::from(path));
            }
        }
    }
    args.documents = positional.ok_or_else(|| "missing document path".to_string())?;
    Ok(args)
}

fn main() {
    let argv: Vec<String> = std::env::args().skip(1).collect();
    let args = match parse_args(&argv) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("{}", e);
            eprintln!("{}", USAGE);
            std::process::exit(2);
        }
    };
    match run(&args) {
        Ok(true) => std::process::exit(0),
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("layer_checklist error: {}", e);
            std::process::exit(1);
        }
    }
}

fn run(args: &Args) -> CoreResult<bool> {
    let checklist: Checklist = match &args.checklist {
        Some(p) => load_checklist(p)?,
        None => default_checklist()?,
    };
    let target = ValidationTarget::new(
        args.group
            .clone()
            .unwrap_or_else(|| checklist.root_group_or_default().to_string()),
        args.subgroup
            .clone()
            .unwrap_or_else(|| checklist.sub_group_or_default().to_string()),
    );

    if args.lint {
        for (name, count) in checklist.required_layers.duplicate_entries() {
            eprintln!("warning: checklist lists '{}' {} times", name, count);
        }
    }

    let documents = discover_documents(&args.documents)?;
    if documents.is_empty() {
        eprintln!("no document exports found under {}", args.documents.display());
        return Ok(false);
    }

    let mut audit = match &args.audit_log {
        Some(p) => Some(AuditLog::open_or_create(p)?),
        None => None,
    };
    let mut all_passed = true;
    for path in &documents {
        let doc = match load_document(path) {
            Ok(doc) => doc,
            Err(e) => {
                eprintln!("skipping {}: {}", path.display(), e);
                all_passed = false;
                continue;
            }
        };
        let mut mgr = RunManager::new(path.to_string_lossy().to_string());
        if let Some(log) = audit.take() {
            mgr = mgr.with_audit(log);
        }

        if documents.len() > 1 && !args.json {
            eprintln!("== {}", path.display());
        }
        let outcome = if args.json {
            let mut sink = CollectingSink::default();
            let outcome = mgr.run(&doc, &target, &checklist.required_layers, &mut sink)?;
            println!(
                "{}",
                json_line(path, &mgr.run_id, &sink.messages.join("\n"), &outcome)?
            );
            outcome
        } else {
            mgr.run(&doc, &target, &checklist.required_layers, &mut StdoutSink)?
        };
        audit = mgr.into_audit();
        all_passed &= outcome.passed();
    }
    Ok(all_passed)
}

/// One compact JSON object per document, so a batch prints NDJSON.
fn json_line(
    path: &Path,
    run_id: &str,
    message: &str,
    outcome: &RunOutcome,
) -> CoreResult<String> {
    Ok(serde_json::to_string(&serde_json::json!({
        "document": path.to_string_lossy(),
        "run_id": run_id,
        "message": message,
        "outcome": outcome
    }))?)
}
