use std::fs;
use std::path::Path;

use clap::Parser;
use serde_json::{json, Value};
use tempfile::TempDir;
use vinyl_component::cli::Args;
use vinyl_component::minijinja_compiler::MiniJinjaCompiler;
use vinyl_component::runner::{build_transformer, options_args, run_files, run_json};
use vinyl_component::{Error, FileTransformer, Options, VinylFile};

fn parse(args: &[&str]) -> Args {
    Args::try_parse_from(std::iter::once("vinyl-component").chain(args.iter().copied())).unwrap()
}

fn vinyl_line(path: &str, contents: &str) -> String {
    json!({"isVinyl": true, "vinylVersion": 2, "path": path, "contents": contents}).to_string()
}

fn output_lines(output: &[u8]) -> Vec<Value> {
    String::from_utf8_lossy(output)
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

fn sources(root: &Path) -> Vec<VinylFile> {
    let src = root.join("src");
    [("a.html", "<a></a>"), ("b.html", "{{"), ("c.html", "<i></i>")]
        .into_iter()
        .map(|(name, source)| VinylFile::new(source).with_path(src.join(name)).with_base(&src))
        .collect()
}

#[test]
fn test_extract_css_merged_into_config() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("opts.json");
    fs::write(&config, r#"{"extractCss": false, "dev": true}"#).unwrap();

    let args = parse(&["--extract-css", "-c", config.to_str().unwrap(), "src"]);
    let options = options_args(&args, temp_dir.path()).unwrap();

    assert_eq!(options.len(), 1);
    assert!(options[0].extract_css);
    assert_eq!(options[0].compiler_options["dev"], json!(true));
}

#[test]
fn test_extract_css_without_config() {
    let temp_dir = TempDir::new().unwrap();

    let options = options_args(&parse(&["--extract-css", "src"]), temp_dir.path()).unwrap();
    assert_eq!(options.len(), 1);
    assert!(options[0].extract_css);

    let options = options_args(&parse(&["src"]), temp_dir.path()).unwrap();
    assert!(options.is_empty());
}

#[test]
fn test_config_discovered_in_dir() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("component.config.yml"), "extractCss: true\n").unwrap();

    let options = options_args(&parse(&["src"]), temp_dir.path()).unwrap();

    assert_eq!(options.len(), 1);
    assert!(options[0].extract_css);
}

#[test]
fn test_two_configs_is_usage_error() {
    let temp_dir = TempDir::new().unwrap();
    let first = temp_dir.path().join("a.json");
    let second = temp_dir.path().join("b.json");
    fs::write(&first, "{}").unwrap();
    fs::write(&second, "{}").unwrap();

    let args = parse(&[
        "-c",
        first.to_str().unwrap(),
        "-c",
        second.to_str().unwrap(),
        "does-not-exist",
    ]);

    assert!(matches!(
        build_transformer(&args, temp_dir.path()),
        Err(Error::Usage { got: 2 })
    ));
}

#[test_log::test]
fn test_run_files_continues_after_error() {
    let temp_dir = TempDir::new().unwrap();
    let out_dir = temp_dir.path().join("dist");
    let transformer = FileTransformer::new(MiniJinjaCompiler::new(), Options::new());
    let (mut report, mut errors) = (Vec::new(), Vec::new());

    let ok = run_files(
        &transformer,
        sources(temp_dir.path()),
        &out_dir,
        false,
        &mut report,
        &mut errors,
    )
    .unwrap();

    assert!(!ok);
    assert!(out_dir.join("a.js").exists());
    assert!(!out_dir.join("b.js").exists());
    assert!(out_dir.join("c.js").exists());
    assert_eq!(String::from_utf8_lossy(&report).lines().count(), 2);
    let errors = String::from_utf8_lossy(&errors);
    assert_eq!(errors.lines().count(), 1);
    assert!(errors.contains("b.html"));
}

#[test]
fn test_run_files_bail() {
    let temp_dir = TempDir::new().unwrap();
    let out_dir = temp_dir.path().join("dist");
    let transformer = FileTransformer::new(MiniJinjaCompiler::new(), Options::new());
    let (mut report, mut errors) = (Vec::new(), Vec::new());

    let ok = run_files(
        &transformer,
        sources(temp_dir.path()),
        &out_dir,
        true,
        &mut report,
        &mut errors,
    )
    .unwrap();

    assert!(!ok);
    assert!(out_dir.join("a.js").exists());
    assert!(!out_dir.join("c.js").exists());
}

#[test]
fn test_run_json_continues_after_bad_line() {
    let transformer = FileTransformer::new(MiniJinjaCompiler::new(), Options::new());
    let stdin = [
        vinyl_line("a.html", "<a></a>"),
        "{not json".to_string(),
        String::new(),
        vinyl_line("c.html", "<i></i>"),
    ]
    .join("\n");
    let mut stdout = Vec::new();

    let ok = run_json(&transformer, stdin.as_bytes(), &mut stdout, false).unwrap();

    assert!(!ok);
    let lines = output_lines(&stdout);
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0]["path"], json!("a.js"));
    assert!(lines[1]["error"]["message"]
        .as_str()
        .unwrap()
        .starts_with("JSON error"));
    assert!(lines[1]["error"].get("fileName").is_none());
    assert_eq!(lines[2]["path"], json!("c.js"));
}

#[test]
fn test_run_json_error_records() {
    let transformer = FileTransformer::new(MiniJinjaCompiler::new(), Options::new());
    let stdin = [
        vinyl_line("broken.html", "{{"),
        json!({"isVinyl": true, "vinylVersion": 2, "contents": "{{"}).to_string(),
        json!(["foo"]).to_string(),
    ]
    .join("\n");
    let mut stdout = Vec::new();

    run_json(&transformer, stdin.as_bytes(), &mut stdout, false).unwrap();

    let lines = output_lines(&stdout);
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0]["error"]["fileName"], json!("broken.html"));
    assert!(lines[1]["error"].get("fileName").is_none());
    assert!(lines[1]["error"]["message"].is_string());
    assert_eq!(
        lines[2],
        json!({"error": {"message": "Expected a Vinyl file object of a component template, but got a non-Vinyl value [\"foo\"] (array)."}})
    );
}

#[test]
fn test_run_json_bail() {
    let transformer = FileTransformer::new(MiniJinjaCompiler::new(), Options::new());
    let stdin = ["{not json".to_string(), vinyl_line("c.html", "<i></i>")].join("\n");
    let mut stdout = Vec::new();

    let ok = run_json(&transformer, stdin.as_bytes(), &mut stdout, true).unwrap();

    assert!(!ok);
    let lines = output_lines(&stdout);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].get("error").is_some());
}
