//! CLI integration tests for `crewfit score` and `crewfit taxonomy`.
//!
//! Each run gets a temp HOME so a developer's `~/.crewfit/config.toml`
//! cannot leak in.

use std::process::{Command, Output};

use anyhow::{Context, Result};
use crewfit_test_utils::TestFixture;

fn crewfit(fixture: &TestFixture, args: &[&str]) -> Result<Output> {
    let mut command = Command::new(env!("CARGO_BIN_EXE_crewfit"));
    command.env("HOME", fixture.home_path()).args(args);
    for (key, _) in std::env::vars() {
        if key.starts_with("CREWFIT_") {
            command.env_remove(key);
        }
    }
    command.output().context("failed to run crewfit")
}

const PERSON_REQUEST: &str = r#"{
    "person_skills": ["Python", "Django", "Docker", "SQL"],
    "teams": [
        {
            "team_id": 1,
            "name": "Storefront",
            "skills": {
                "Anna": ["React", "CSS", "HTML", "JavaScript"],
                "Boris": ["Tailwind", "Next", "Vue", "Git", "Figma"]
            },
            "required_roles": ["Frontend", "Python Backend"]
        },
        {
            "team_id": 2,
            "name": "Design Studio",
            "skills": {
                "Clara": ["React", "CSS", "HTML", "JavaScript", "Tailwind"],
                "Dmitri": ["Next", "Vue", "Git", "Figma", "Canva"]
            },
            "required_roles": ["Frontend"]
        }
    ]
}"#;

#[test]
fn score_team_to_person_prints_json() -> Result<()> {
    let fixture = TestFixture::new()?;
    let request = fixture.write_file("person.json", PERSON_REQUEST)?;

    let output = crewfit(
        &fixture,
        &[
            "score",
            "team-to-person",
            "--request",
            request.to_str().context("utf-8 path")?,
            "--embedder",
            "hashing",
        ],
    )?;
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let body: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    let teams = body["recommended_teams"].as_array().context("teams array")?;
    assert_eq!(teams.len(), 1);
    assert_eq!(teams[0]["team_id"], 1);
    assert_eq!(teams[0]["unfilled_roles"][0], "Python Backend");
    Ok(())
}

#[test]
fn config_file_selects_embedder() -> Result<()> {
    let fixture = TestFixture::new()?;
    fixture.write_config("[embedding]\nbackend = \"hashing\"\ndimension = 16\n")?;
    let request = fixture.write_file(
        "case.json",
        r#"{
            "case": {"id": 9, "title": "Infra", "description": "Kubernetes", "required_roles": "DevOps"},
            "teams": [{"team_id": 1, "name": "Ops", "skills": {"a": ["Docker", "Linux"]}}]
        }"#,
    )?;

    // No --embedder flag: the HTTP default would fail without a server.
    let output = crewfit(
        &fixture,
        &[
            "score",
            "team-to-case",
            "--request",
            request.to_str().context("utf-8 path")?,
        ],
    )?;
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let body: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(body["recommended_teams"][0]["team_id"], 1);
    Ok(())
}

#[test]
fn empty_candidates_exit_non_zero() -> Result<()> {
    let fixture = TestFixture::new()?;
    let request = fixture.write_file("empty.json", r#"{"person_skills": [], "teams": []}"#)?;

    let output = crewfit(
        &fixture,
        &[
            "score",
            "team-to-person",
            "--request",
            request.to_str().context("utf-8 path")?,
            "--embedder",
            "hashing",
        ],
    )?;
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("No suitable teams found"), "stderr: {stderr}");
    Ok(())
}

#[test]
fn taxonomy_json_lists_builtin_roles() -> Result<()> {
    let fixture = TestFixture::new()?;
    let output = crewfit(&fixture, &["taxonomy", "--format", "json"])?;
    assert!(output.status.success());

    let body: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(body["version"], "builtin-1");
    assert!(body["roles"]["DevOps"].as_array().is_some());
    Ok(())
}

#[test]
fn malformed_config_fails_loudly() -> Result<()> {
    let fixture = TestFixture::new()?;
    let config = fixture.write_config("[serve]\nauth_token = \"tok\"\n[embedding\nbackend = \"hashing\"\n")?;

    let output = crewfit(&fixture, &["taxonomy", "--format", "json"])?;
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to parse"), "stderr: {stderr}");
    assert!(
        stderr.contains(&config.display().to_string()),
        "stderr: {stderr}"
    );
    Ok(())
}
