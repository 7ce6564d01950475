use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use supcount_core::{StreamSummary, analyze_sup_file};

const GOLDEN_ROOT: &str = "tests/golden";
const INPUT_NAME: &str = "input.sup";
const SUMMARY_NAME: &str = "expected_summary.json";

/// Rewrite `expected_summary.json` for every golden case, or only for the
/// case names given on the command line.
fn main() -> ExitCode {
    let only: Vec<String> = env::args().skip(1).collect();
    match run(&only) {
        Ok(0) => {
            eprintln!("error: no golden cases found under {GOLDEN_ROOT}");
            ExitCode::from(1)
        }
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(1)
        }
    }
}

fn run(only: &[String]) -> Result<usize, String> {
    let root = PathBuf::from(GOLDEN_ROOT);
    let mut cases = list_cases(&root)?;
    if !only.is_empty() {
        for name in only {
            if !cases.iter().any(|case| case_name(case) == name.as_str()) {
                return Err(format!("unknown golden case '{name}'"));
            }
        }
        cases.retain(|case| only.iter().any(|name| name.as_str() == case_name(case)));
    }

    for case in &cases {
        let summary = regenerate_case(case)?;
        println!("{}: {summary}", case_name(case));
    }
    Ok(cases.len())
}

/// Case directories holding an input stream, sorted by name.
fn list_cases(root: &Path) -> Result<Vec<PathBuf>, String> {
    let entries =
        fs::read_dir(root).map_err(|err| format!("failed to read {}: {err}", root.display()))?;
    let mut cases = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|err| format!("failed to read entry: {err}"))?
            .path();
        if path.join(INPUT_NAME).is_file() {
            cases.push(path);
        }
    }
    cases.sort();
    Ok(cases)
}

fn case_name(case: &Path) -> &str {
    case.file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default()
}

fn regenerate_case(case: &Path) -> Result<StreamSummary, String> {
    let input = case.join(INPUT_NAME);
    let summary = analyze_sup_file(&input)
        .map_err(|err| format!("analysis failed for {}: {err}", input.display()))?;
    if summary.forced_objects > summary.total_objects {
        return Err(format!(
            "{}: forced objects exceed total objects ({summary})",
            input.display()
        ));
    }
    let json = serde_json::to_string(&summary)
        .map_err(|err| format!("JSON serialization failed: {err}"))?;
    let output = case.join(SUMMARY_NAME);
    fs::write(&output, json)
        .map_err(|err| format!("failed to write {}: {err}", output.display()))?;
    Ok(summary)
}
