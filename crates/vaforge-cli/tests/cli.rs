use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;

fn workdir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("vaforge_cli_{}", uuid::Uuid::new_v4()));
    fs::create_dir_all(&dir).expect("create work dir");
    dir
}

fn vaforge(dir: &PathBuf) -> Command {
    let mut cmd = Command::cargo_bin("vaforge").expect("binary");
    cmd.current_dir(dir).env_remove("RUST_LOG");
    cmd
}

#[test]
fn generate_writes_header_to_default_path() {
    let dir = workdir();
    vaforge(&dir).args(["generate", "--max-arity", "5"]).assert().success();

    let path = dir.join("include/zen/macros.h");
    let text = fs::read_to_string(&path).expect("header written");
    assert!(text.contains("#ifndef ZEN_MACRO_H"));
    assert!(text.contains("#define ZEN_VA_MAX_LENGTH 5"));
    assert!(text.contains("#define ZEN_GET_VA_ARG_4("));

    let leftovers: Vec<_> = fs::read_dir(path.parent().expect("parent"))
        .expect("list dir")
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty());
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn check_tracks_the_header_on_disk() {
    let dir = workdir();
    vaforge(&dir)
        .args(["check", "--max-arity", "4"])
        .assert()
        .failure()
        .stderr(contains("missing"));

    vaforge(&dir).args(["generate", "--max-arity", "4"]).assert().success();
    vaforge(&dir)
        .args(["check", "--max-arity", "4"])
        .assert()
        .success()
        .stdout(contains("up to date"));

    vaforge(&dir)
        .args(["check", "--max-arity", "6"])
        .assert()
        .failure()
        .stderr(contains("content differs"));

    let path = dir.join("include/zen/macros.h");
    let edited = fs::read_to_string(&path).expect("read header") + "#define EXTRA 1\n";
    fs::write(&path, edited).expect("edit header");
    vaforge(&dir)
        .args(["check", "--max-arity", "4"])
        .assert()
        .failure()
        .stderr(contains("content differs"));
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn config_file_is_picked_up_and_flags_win() {
    let dir = workdir();
    fs::write(
        dir.join("vaforge.toml"),
        "max_arity = 3\nprefix = \"VA_\"\nguard = \"VA_MACROS_H\"\nout = \"va.h\"\n",
    )
    .expect("write config");

    vaforge(&dir).arg("generate").assert().success();
    let text = fs::read_to_string(dir.join("va.h")).expect("header written");
    assert!(text.contains("#define VA_VA_MAX_LENGTH 3"));
    assert!(text.contains("#ifndef VA_MACROS_H"));
    assert!(!text.contains("ZEN_"));

    vaforge(&dir)
        .args(["generate", "--max-arity", "9", "--out", "wide.h"])
        .assert()
        .success();
    let wide = fs::read_to_string(dir.join("wide.h")).expect("header written");
    assert!(wide.contains("#define VA_VA_MAX_LENGTH 9"));
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn broken_config_is_reported() {
    let dir = workdir();
    fs::write(dir.join("vaforge.toml"), "max_arity = \"many\"\n").expect("write config");
    vaforge(&dir)
        .arg("generate")
        .assert()
        .failure()
        .stderr(contains("Config"));
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn stdout_mode_prints_without_writing() {
    let dir = workdir();
    vaforge(&dir)
        .args(["generate", "--stdout", "--max-arity", "2"])
        .assert()
        .success()
        .stdout(contains("// This file was generated by vaforge on").and(contains("#define ZEN_ARG_N(_0,_1,N,...) N")));
    assert!(!dir.join("include").exists());
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn out_of_range_arity_is_rejected() {
    let dir = workdir();
    vaforge(&dir)
        .args(["generate", "--max-arity", "0"])
        .assert()
        .failure()
        .stderr(contains("InvalidArity"));
    vaforge(&dir)
        .args(["generate", "--max-arity", "9223372036854775808"])
        .assert()
        .failure()
        .stderr(contains("InvalidArity"));
    assert!(!dir.join("include").exists());
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn expand_evaluates_expressions() {
    let dir = workdir();
    vaforge(&dir)
        .args([
            "expand",
            "-D",
            "square(i, x)=x*x",
            "ZEN_FOR_EACH_ENUM(square, 1, 2, 3)",
        ])
        .assert()
        .success()
        .stdout(contains("1*1").and(contains("2*2")).and(contains("3*3")));

    vaforge(&dir)
        .args(["expand", "ZEN_GET_VA_ARG(2, a, b, c, d, e)"])
        .assert()
        .success()
        .stdout("c\n");
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn expand_reads_an_existing_header() {
    let dir = workdir();
    vaforge(&dir)
        .args(["generate", "--max-arity", "4", "--out", "m.h"])
        .assert()
        .success();
    vaforge(&dir)
        .args(["expand", "--header", "m.h", "ZEN_VA_LENGTH(a, b, c, d)"])
        .assert()
        .success()
        .stdout("4\n");
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn surface_lists_macros() {
    let dir = workdir();
    vaforge(&dir)
        .args(["surface", "--max-arity", "3"])
        .assert()
        .success()
        .stdout(contains("ZEN_FOR_EACH_ENUM(m, ...)").and(contains("ZEN_DEFER_2(...)")));

    let output = vaforge(&dir)
        .args(["surface", "--json", "--max-arity", "3"])
        .output()
        .expect("run surface");
    assert!(output.status.success());
    let catalog: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json output");
    let names: Vec<&str> = catalog
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|entry| entry["name"].as_str())
        .collect();
    assert!(names.contains(&"ZEN_GET_VA_ARG"));
    assert!(!names.contains(&"ZEN_DEFER_3"));
    let _ = fs::remove_dir_all(&dir);
}
