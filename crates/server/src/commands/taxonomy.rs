//! Handler for the `taxonomy` command.

use crate::cli::OutputFormat;
use crate::engine::load_taxonomy;
use anyhow::Result;
use crewfit_scoring::Taxonomy;
use std::fmt::Write as _;
use std::path::PathBuf;

/// Handle the `taxonomy` command.
pub(crate) fn handle_taxonomy_command(format: OutputFormat, path: Option<PathBuf>) -> Result<()> {
    let taxonomy = load_taxonomy(path.as_deref())?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&taxonomy.to_file())?),
        OutputFormat::Text => print!("{}", render_text(&taxonomy)),
    }
    Ok(())
}

fn render_text(taxonomy: &Taxonomy) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Taxonomy {}", taxonomy.version());
    let _ = writeln!(out, "\nSkills ({}):", taxonomy.dimension());
    for (i, skill) in taxonomy.vocabulary().iter().enumerate() {
        let _ = writeln!(out, "  {i:>3}  {skill}");
    }
    let _ = writeln!(out, "\nRoles ({}):", taxonomy.role_count());
    for (role, skills) in taxonomy.roles() {
        let listed: Vec<&str> = skills.iter().map(String::as_str).collect();
        let _ = writeln!(out, "  {role} ({}): {}", skills.len(), listed.join(", "));
    }
    out
}
