use std::env;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn run_command(args: &[&str], test_dir: &str, extra_env: &[(&str, &str)]) -> (i32, String, String) {
    // Use cargo run which will build if needed
    // Set DCC_DIR in the environment for the subprocess
    let output = Command::new("cargo")
        .args(["run", "--quiet", "--"])
        .args(args)
        .env("DCC_DIR", test_dir)
        .env("DCC_PLUGIN_DELAY_MS", "0")
        .env("DCC_PAGE_DELAY_MS", "0")
        .envs(extra_env.iter().copied())
        .current_dir(env::current_dir().unwrap())
        .output()
        .expect("Failed to execute command");

    let code = output.status.code().unwrap_or(-1);
    let stdout = String::from_utf8(output.stdout).unwrap_or_default();
    let stderr = String::from_utf8(output.stderr).unwrap_or_default();

    // Filter out cargo compilation messages from stderr
    let filtered_stderr: String = stderr
        .lines()
        .filter(|line| {
            !line.contains("Compiling")
                && !line.contains("Finished")
                && !line.contains("warning:")
                && !line.contains("note:")
        })
        .collect::<Vec<_>>()
        .join("\n");

    (code, stdout, filtered_stderr)
}

fn setup_test_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp directory")
}

#[test]
fn test_init_creates_manifest() {
    let temp_dir = setup_test_dir();
    let test_dir = temp_dir.path().to_str().unwrap();

    let (code, stdout, stderr) = run_command(&["init", "9.1.0"], test_dir, &[]);

    assert_eq!(code, 0, "Init should succeed. stderr: {}", stderr);
    assert!(
        stdout.contains("Initialized plugins.toml"),
        "Expected 'Initialized plugins.toml' in output: {}",
        stdout
    );

    let manifest_path = format!("{}/plugins.toml", test_dir);
    assert!(Path::new(&manifest_path).exists(), "Manifest file should be created");

    let content = fs::read_to_string(&manifest_path).unwrap();
    assert!(content.contains("[platform]"));
    assert!(content.contains("9.1.0"));
}

#[test]
fn test_init_skips_if_exists() {
    let temp_dir = setup_test_dir();
    let test_dir = temp_dir.path().to_str().unwrap();

    run_command(&["init"], test_dir, &[]);
    let (code, stdout, _) = run_command(&["init"], test_dir, &[]);

    assert_eq!(code, 0);
    assert!(stdout.contains("Skipping"), "Expected skip message: {}", stdout);
}

#[test]
fn test_add_plugin() {
    let temp_dir = setup_test_dir();
    let test_dir = temp_dir.path().to_str().unwrap();

    run_command(&["init"], test_dir, &[]);
    let (code, stdout, stderr) = run_command(
        &[
            "add",
            "scriptrunner",
            "https://marketplace.atlassian.com/apps/1215215/scriptrunner-for-confluence",
            "9.1.0",
        ],
        test_dir,
        &[],
    );

    assert_eq!(code, 0, "Add should succeed. stderr: {}", stderr);
    assert!(stdout.contains("Added scriptrunner"), "output: {}", stdout);

    let content = fs::read_to_string(format!("{}/plugins.toml", test_dir)).unwrap();
    assert!(content.contains("[plugins.scriptrunner]"));
    assert!(content.contains("1215215"));
}

#[test]
fn test_add_fails_without_init() {
    let temp_dir = setup_test_dir();
    let test_dir = temp_dir.path().to_str().unwrap();

    let (code, _, stderr) = run_command(&["add", "x", "https://example.com/apps/1/x", "1.0"], test_dir, &[]);

    assert_ne!(code, 0);
    assert!(stderr.contains("Manifest not found"), "stderr: {}", stderr);
}

#[test]
fn test_compare_command() {
    let temp_dir = setup_test_dir();
    let test_dir = temp_dir.path().to_str().unwrap();

    let (_, stdout, _) = run_command(&["compare", "8.1", "8.10"], test_dir, &[]);
    assert_eq!(stdout.trim(), "8.1 < 8.10");

    let (_, stdout, _) = run_command(&["compare", "2.0.0", "2.0"], test_dir, &[]);
    assert_eq!(stdout.trim(), "2.0.0 = 2.0");
}

#[test]
fn test_parse_command() {
    let temp_dir = setup_test_dir();
    let test_dir = temp_dir.path().to_str().unwrap();

    let (code, stdout, _) = run_command(&["parse", "Confluence Data Center 9.0 - 8.0"], test_dir, &[]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "8.0 - 9.0");

    let (code, _, stderr) = run_command(&["parse", "no version info"], test_dir, &[]);
    assert_eq!(code, 1);
    assert!(stderr.contains("No version range found"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_check_json_against_mock_marketplace() {
    let server = MockServer::start().await;
    let state = serde_json::json!({
        "versions": [
            {"name": "2.1.0", "compatibilities": [{"hosting": "datacenter", "minVersion": "8.5", "maxVersion": "9.2"}]},
            {"name": "2.0.0", "compatibilities": [{"hosting": "datacenter", "minVersion": "8.0", "maxVersion": "9.0"}]}
        ]
    });
    Mock::given(method("GET"))
        .and(path("/apps/42/macro-pack/version-history"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            "<html><script id=\"initial-state\">{}</script></html>",
            state
        )))
        .mount(&server)
        .await;

    let temp_dir = setup_test_dir();
    let test_dir = temp_dir.path().to_str().unwrap().to_string();
    fs::write(
        format!("{}/plugins.toml", test_dir),
        format!(
            "[platform]\ntarget = \"8.7\"\n\n[plugins.macro-pack]\nurl = \"{}/apps/42/macro-pack\"\nversion = \"2.0.0\"\n",
            server.uri()
        ),
    )
    .unwrap();

    let uri = server.uri();
    let (code, stdout, stderr) = tokio::task::spawn_blocking(move || {
        run_command(
            &["check", "--json", "--no-browser"],
            &test_dir,
            &[("DCC_MARKETPLACE_URL", uri.as_str())],
        )
    })
    .await
    .unwrap();

    assert_eq!(code, 0, "check failed. stderr: {}", stderr);
    let results: serde_json::Value = serde_json::from_str(&stdout).expect("stdout is JSON");
    assert_eq!(results[0]["pluginName"], "macro-pack");
    assert_eq!(results[0]["compatible"], true);
    assert_eq!(results[0]["recommendedVersion"], "2.1.0");
    assert_eq!(results[0]["fetchMethod"], "embedded-state");
}
