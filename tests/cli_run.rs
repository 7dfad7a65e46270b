//! Runs the `lid-inject` binary against files on disk.

mod common;

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

const PARAMETERS: &str = r#"{
    "lids": [
        {
            "type": "RB",
            "location": {"subcatchment": "S1"},
            "number": 1, "area": 50, "width": 0,
            "initSat": 0, "fromImp": 100, "toPerv": 0
        },
        {
            "type": "BC1",
            "location": {"map": {"x": 150, "y": 50}},
            "drainTo": {"node": "J1"},
            "number": 2, "area": 5, "width": 1,
            "initSat": 10, "fromImp": 40, "toPerv": 1
        }
    ]
}"#;

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_lid-inject"))
        .args(args)
        .output()
        .expect("lid-inject process should run")
}

fn path_arg(path: &Path) -> &str {
    path.to_str().expect("temp paths should be UTF-8")
}

#[test]
fn flags_run_writes_model_and_report() {
    let tmp = common::scratch_dir("flags");
    let dir = tmp.path();
    let template = dir.join("model.inp");
    let parameters = dir.join("lids.json");
    let output = dir.join("model_lid.inp");
    let report = dir.join("lids.csv");
    fs::write(&template, common::SI_MODEL).expect("write template");
    fs::write(&parameters, PARAMETERS).expect("write parameters");

    let out = run(&[
        "--template",
        path_arg(&template),
        "--parameters",
        path_arg(&parameters),
        "--output",
        path_arg(&output),
        "--report-out",
        path_arg(&report),
    ]);
    assert!(
        out.status.success(),
        "run failed: stderr={}",
        String::from_utf8_lossy(&out.stderr)
    );

    let stdout = String::from_utf8(out.stdout).expect("stdout should be valid UTF-8");
    assert!(stdout.contains("RB_1\tRB\tS1##RB_1\t"), "stdout was {stdout}");
    assert!(stdout.contains("BC1_1\tBC\tS2\tJ1"), "stdout was {stdout}");

    let written = fs::read_to_string(&output).expect("output model exists");
    assert!(written.contains("[LID_USAGE]"));
    assert!(written.contains("S1##RB_1"));
    // template is left alone
    assert_eq!(fs::read_to_string(&template).expect("template exists"), common::SI_MODEL);

    let csv = fs::read_to_string(&report).expect("report exists");
    let rows: Vec<&str> = csv.lines().collect();
    assert_eq!(rows.len(), 3);
    assert!(rows[0].starts_with("lid_id,"));
    assert!(rows[2].starts_with("BC1_1,BC1,BC,S2,S2,2,,J1"));
}

#[test]
fn config_file_run_resolves_relative_paths() {
    let tmp = common::scratch_dir("config");
    let dir = tmp.path();
    fs::write(dir.join("model.inp"), common::SI_MODEL).expect("write template");
    fs::write(dir.join("lids.json"), PARAMETERS).expect("write parameters");
    let config = dir.join("inject.toml");
    fs::write(
        &config,
        "input_template_path = \"model.inp\"\n\
         input_parameters_path = \"lids.json\"\n\
         input_path = \"out.inp\"\n",
    )
    .expect("write config");

    let out = run(&["--config", path_arg(&config)]);
    assert!(
        out.status.success(),
        "run failed: stderr={}",
        String::from_utf8_lossy(&out.stderr)
    );
    assert!(dir.join("out.inp").is_file());
}

#[test]
fn capacity_error_exits_nonzero_without_output() {
    let tmp = common::scratch_dir("capacity");
    let dir = tmp.path();
    let template = dir.join("model.inp");
    let parameters = dir.join("lids.json");
    let output = dir.join("out.inp");
    fs::write(&template, common::SI_MODEL).expect("write template");
    fs::write(
        &parameters,
        r#"{"lids": [{"type": "RB", "location": {"subcatchment": "S2"},
            "number": 20, "area": 1000, "width": 0,
            "initSat": 0, "fromImp": 100, "toPerv": 0}]}"#,
    )
    .expect("write parameters");

    let out = run(&[
        "--template",
        path_arg(&template),
        "--parameters",
        path_arg(&parameters),
        "--output",
        path_arg(&output),
    ]);

    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("S2"), "stderr was {stderr}");
    assert!(!output.exists());
}

#[test]
fn missing_paths_are_reported() {
    let out = run(&["--output", "out.inp"]);
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("input_template_path"), "stderr was {stderr}");
}

#[test]
fn scratch_dir_is_removed_when_dropped() {
    let tmp = common::scratch_dir("cleanup");
    let path = tmp.path().to_path_buf();
    fs::write(path.join("model.inp"), common::SI_MODEL).expect("write template");
    assert!(path.is_dir());

    drop(tmp);
    assert!(!path.exists());
}
