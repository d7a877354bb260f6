//! End-to-end runs of the binary against the mock and an unreachable provider.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const FULL_HEADER: &str = "name,title,company_name,industry,country,email,phone,\
linkedin_profile_url,general_website_url,google_business_profile_website";

fn gmbleads(work_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("gmbleads").unwrap();
    cmd.current_dir(work_dir.path())
        .env_remove("GMBLEADS_API_KEY")
        .env_remove("RUST_LOG");
    cmd
}

fn fast_mock_args() -> [&'static str; 7] {
    [
        "--seed",
        "7",
        "--delay-ms",
        "0",
        "--mock-latency-ms",
        "0",
        "--max-pages=2",
    ]
}

#[test]
fn test_help_lists_filters() {
    let work_dir = TempDir::new().unwrap();
    gmbleads(&work_dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--industry"))
        .stdout(predicate::str::contains("--country"));
}

#[test]
fn test_mock_run_writes_csv() {
    let work_dir = TempDir::new().unwrap();
    let out_dir = work_dir.path().join("leads");

    gmbleads(&work_dir)
        .args(fast_mock_args())
        .args(["--industry", "Software", "--country", "USA"])
        .arg("--output-dir")
        .arg(&out_dir)
        .args(["--output-format", "plain"])
        .assert()
        .success()
        .stdout(predicate::str::contains("COMPLETED: Found"))
        .stdout(predicate::str::contains("gmb_no_website_leads_Software_USA.csv"));

    let content = fs::read_to_string(out_dir.join("gmb_no_website_leads_Software_USA.csv")).unwrap();
    let mut lines = content.lines();
    assert_eq!(lines.next().unwrap(), FULL_HEADER);
    assert!(lines.count() > 0);
}

#[test]
fn test_same_seed_same_file() {
    let work_dir = TempDir::new().unwrap();
    let first = work_dir.path().join("first");
    let second = work_dir.path().join("second");

    for dir in [&first, &second] {
        gmbleads(&work_dir)
            .args(fast_mock_args())
            .arg("--output-dir")
            .arg(dir)
            .arg("-q")
            .assert()
            .success();
    }

    let name = "gmb_no_website_leads_any_industry_any_country.csv";
    assert_eq!(
        fs::read_to_string(first.join(name)).unwrap(),
        fs::read_to_string(second.join(name)).unwrap()
    );
}

#[test]
fn test_json_report() {
    let work_dir = TempDir::new().unwrap();

    gmbleads(&work_dir)
        .args(fast_mock_args())
        .args(["--output-format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"stop_reason\""))
        .stdout(predicate::str::contains("\"page_ceiling\""));
}

#[test]
fn test_unreachable_provider_still_succeeds() {
    let work_dir = TempDir::new().unwrap();

    gmbleads(&work_dir)
        .args(["--source", "http", "--api-url", "http://127.0.0.1:9/contacts"])
        .args(["--api-key", "test-key", "--delay-ms", "0"])
        .args(["--output-format", "plain"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No leads found matching the criteria"));

    assert_eq!(fs::read_dir(work_dir.path()).unwrap().count(), 0);
}

#[test]
fn test_quiet_run_still_reports_empty_result() {
    let work_dir = TempDir::new().unwrap();

    gmbleads(&work_dir)
        .args(["--source", "http", "--api-url", "http://127.0.0.1:9/contacts"])
        .args(["--api-key", "test-key", "--delay-ms", "0", "-q"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No leads found matching the criteria"))
        .stdout(predicate::str::contains("Total time taken"));
}

#[test]
fn test_http_source_requires_api_key() {
    let work_dir = TempDir::new().unwrap();

    gmbleads(&work_dir)
        .args(["--source", "http", "--output-format", "plain"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("API key"));
}

#[test]
fn test_invalid_api_url_rejected() {
    let work_dir = TempDir::new().unwrap();

    gmbleads(&work_dir)
        .args(["--api-url", "ftp://example.com/contacts"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("http and https"));
}

#[test]
fn test_generate_config() {
    let work_dir = TempDir::new().unwrap();

    gmbleads(&work_dir)
        .arg("--generate-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("gmbleads.toml"));

    let content = fs::read_to_string(work_dir.path().join("gmbleads.toml")).unwrap();
    assert!(content.contains("[source]"));
    assert!(content.contains("page_limit = 50"));
}

#[test]
fn test_config_file_is_discovered() {
    let work_dir = TempDir::new().unwrap();
    fs::write(
        work_dir.path().join("gmbleads.toml"),
        "[pagination]\nmax_pages = 1\nrequest_delay_min_ms = 0\nrequest_delay_max_ms = 0\n",
    )
    .unwrap();

    gmbleads(&work_dir)
        .args(["--seed", "1", "--mock-latency-ms", "0", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Max pages: 1"));
}

#[test]
fn test_dry_run_writes_nothing() {
    let work_dir = TempDir::new().unwrap();

    gmbleads(&work_dir)
        .args(["--industry", "Healthcare", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "gmb_no_website_leads_Healthcare_any_country.csv",
        ));

    assert_eq!(fs::read_dir(work_dir.path()).unwrap().count(), 0);
}
