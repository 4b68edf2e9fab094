//! Parses a project's direct dependencies out of `pyproject.toml`'s
//! `[project] dependencies` array, grounded on
//! `original_source/pip_audit/_range_audit.py::_parse_pyproject` — invalid
//! requirement strings are logged and skipped rather than aborting the
//! whole parse, but a missing `[project]` table is fatal (there is nothing
//! to audit).

use anyhow::{bail, Context, Result};
use rangeaudit_metadata::parse_requires_dist;
use rangeaudit_version::Specifier;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct PyProjectToml {
    project: Option<ProjectTable>,
}

#[derive(Debug, Deserialize)]
struct ProjectTable {
    #[serde(default)]
    dependencies: Vec<String>,
}

pub fn parse_direct_dependencies(path: &Path) -> Result<Vec<(String, Specifier)>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let parsed: PyProjectToml = toml::from_str(&contents)
        .with_context(|| format!("parsing {}", path.display()))?;
    let Some(project) = parsed.project else {
        bail!("{} has no [project] section", path.display());
    };

    let mut deps = Vec::new();
    for raw in &project.dependencies {
        match parse_requires_dist(raw) {
            Some(pair) => deps.push(pair),
            None => tracing::warn!(dependency = %raw, "skipping invalid requirement"),
        }
    }
    Ok(deps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_dependencies_array() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[project]
name = "demo"
dependencies = ["requests>=2.0", "click (>=8.0,<9.0)", "six"]
"#
        )
        .unwrap();

        let deps = parse_direct_dependencies(file.path()).unwrap();
        assert_eq!(deps.len(), 3);
        assert_eq!(deps[0].0, "requests");
        assert_eq!(deps[2].0, "six");
        assert!(deps[2].1.is_empty());
    }

    #[test]
    fn missing_project_table_is_fatal() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[tool.other]\nkey = 1\n").unwrap();
        assert!(parse_direct_dependencies(file.path()).is_err());
    }

    #[test]
    fn invalid_requirement_strings_are_skipped_not_fatal() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[project]
name = "demo"
dependencies = ["requests>=2.0", "; extra == 'test'"]
"#
        )
        .unwrap();

        let deps = parse_direct_dependencies(file.path()).unwrap();
        assert_eq!(deps.len(), 1);
    }
}
