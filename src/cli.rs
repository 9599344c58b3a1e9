use anyhow::{bail, Context, Result};

use crate::config;
use crate::context::AppContext;
use crate::model::Project;
use crate::store::board::group_by_column;
use crate::store::NewIssue;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddArgs {
    pub title: String,
    pub description: Option<String>,
    pub project: Option<String>,
}

/// `projboard add`: create an issue in a project's first linked repository.
pub async fn handle_add(args: &[String]) -> Result<()> {
    let args = parse_add_args(args)?;

    let config = config::load_config()?;
    let ctx = AppContext::new(&config)?;
    ctx.projects.load(false).await?;

    let projects = ctx.projects.read(|s| s.projects.clone());
    let project = pick_project(&projects, args.project.as_deref())?;
    let Some(repository) = project.repositories.first() else {
        bail!(
            "Project \"{}\" has no linked repository. Link one on GitHub first.",
            project.name
        );
    };

    ctx.projects
        .create_issue(NewIssue {
            project_id: project.id.clone(),
            repository_id: repository.id.clone(),
            title: args.title.clone(),
            body: args.description,
            column_id: None,
        })
        .await
        .context("Failed to create issue")?;

    println!(
        "Created in {} ({}): {}",
        repository.name_with_owner, project.name, args.title
    );
    if !project.url.is_empty() {
        println!("  {}", project.url);
    }
    Ok(())
}

pub async fn handle_list() -> Result<()> {
    let config = config::load_config()?;
    let ctx = AppContext::new(&config)?;
    ctx.projects.load(false).await?;

    let projects = ctx.projects.read(|s| s.projects.clone());
    if projects.is_empty() {
        println!("No projects.");
        return Ok(());
    }
    for project in &projects {
        println!("{}", format_project(project));
    }
    Ok(())
}

fn format_project(project: &Project) -> String {
    let closed = if project.closed { " [closed]" } else { "" };
    let mut out = format!(
        "#{} {}{} ({} issues)",
        project.number,
        project.name,
        closed,
        project.issues.len()
    );
    for column in group_by_column(project) {
        out.push_str(&format!("\n  {:<16} {}", column.column.name, column.issues.len()));
    }
    out
}

/// Match by number (`3` or `#3`) first, then by name ignoring case.
/// Without a selector the first open project wins.
fn pick_project<'a>(projects: &'a [Project], selector: Option<&str>) -> Result<&'a Project> {
    let Some(selector) = selector else {
        return projects
            .iter()
            .find(|p| !p.closed)
            .or_else(|| projects.first())
            .context("No projects found for this account");
    };

    let by_number = selector
        .trim_start_matches('#')
        .parse::<u64>()
        .ok()
        .and_then(|n| projects.iter().find(|p| p.number == n));
    by_number
        .or_else(|| {
            projects
                .iter()
                .find(|p| p.name.eq_ignore_ascii_case(selector.trim()))
        })
        .with_context(|| format!("No project matches \"{selector}\""))
}

/// Parse `projboard add` arguments.
///
/// Supported forms:
///   projboard add "My issue title"
///   projboard add My issue title
///   projboard add "My issue" -d "The description"
///   projboard add "My issue" -p 3
///   projboard add "My issue" --project Roadmap
pub fn parse_add_args(args: &[String]) -> Result<AddArgs> {
    if args.is_empty() {
        bail!("Usage: projboard add <title> [-d <description>] [-p <project>]\n\nExamples:\n  projboard add \"Fix the login bug\"\n  projboard add \"Fix the login bug\" -d \"Users can't log in with SSO\" -p 1");
    }

    let mut title_parts: Vec<String> = Vec::new();
    let mut description: Option<String> = None;
    let mut project: Option<String> = None;
    let mut i = 0;

    while i < args.len() {
        match args[i].as_str() {
            "-d" | "--desc" | "--description" => {
                i += 1;
                if i < args.len() {
                    description = Some(args[i].clone());
                } else {
                    bail!("Missing value for -d/--desc flag");
                }
            }
            "-p" | "--project" => {
                i += 1;
                if i < args.len() {
                    project = Some(args[i].clone());
                } else {
                    bail!("Missing value for -p/--project flag");
                }
            }
            _ => {
                title_parts.push(args[i].clone());
            }
        }
        i += 1;
    }

    let title = title_parts.join(" ");
    if title.trim().is_empty() {
        bail!("Issue title cannot be empty");
    }

    Ok(AddArgs {
        title,
        description,
        project,
    })
}

pub fn print_help() {
    println!("projboard - terminal board for GitHub Projects\n");
    println!("USAGE:");
    println!("  projboard              Launch the TUI board");
    println!("  projboard add <title>  Create an issue and add it to a project");
    println!("  projboard list         List projects with column counts");
    println!("  projboard help         Show this help");
    println!();
    println!("ADD OPTIONS:");
    println!("  -d, --desc <text>       Set the issue body");
    println!("  -p, --project <n|name>  Target project by number or name");
    println!();
    println!("CONFIG:");
    println!("  ~/.projboard/config.toml, token from GITHUB_TOKEN or [github] token");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Actor, Column};

    fn args(strs: &[&str]) -> Vec<String> {
        strs.iter().map(|s| s.to_string()).collect()
    }

    fn project(number: u64, name: &str, closed: bool) -> Project {
        Project {
            id: format!("P_{number}"),
            number,
            name: name.to_string(),
            description: None,
            created_at: String::new(),
            updated_at: String::new(),
            url: String::new(),
            closed,
            owner: Actor::default(),
            created_by: Actor::default(),
            status_field_id: None,
            columns: vec![Column::no_status()],
            issues: Vec::new(),
            repositories: Vec::new(),
            collaborators: Vec::new(),
            labels: Vec::new(),
        }
    }

    #[test]
    fn parse_simple_title() {
        let parsed = parse_add_args(&args(&["Fix the login bug"])).unwrap();
        assert_eq!(parsed.title, "Fix the login bug");
        assert_eq!(parsed.description, None);
        assert_eq!(parsed.project, None);
    }

    #[test]
    fn parse_multi_word_title() {
        let parsed = parse_add_args(&args(&["Fix", "the", "login", "bug"])).unwrap();
        assert_eq!(parsed.title, "Fix the login bug");
    }

    #[test]
    fn parse_description_and_project() {
        let parsed =
            parse_add_args(&args(&["Fix login", "-d", "SSO is broken", "--project", "Roadmap"]))
                .unwrap();
        assert_eq!(parsed.title, "Fix login");
        assert_eq!(parsed.description.as_deref(), Some("SSO is broken"));
        assert_eq!(parsed.project.as_deref(), Some("Roadmap"));
    }

    #[test]
    fn parse_flags_between_title_words() {
        let parsed = parse_add_args(&args(&["Fix", "-p", "2", "login", "bug"])).unwrap();
        assert_eq!(parsed.title, "Fix login bug");
        assert_eq!(parsed.project.as_deref(), Some("2"));
    }

    #[test]
    fn parse_empty_args_fails() {
        assert!(parse_add_args(&args(&[])).is_err());
    }

    #[test]
    fn parse_only_flag_no_title_fails() {
        let result = parse_add_args(&args(&["-d", "some description"]));
        assert!(result.unwrap_err().to_string().contains("empty"));
    }

    #[test]
    fn parse_missing_flag_values_fail() {
        let result = parse_add_args(&args(&["My issue", "-d"]));
        assert!(result.unwrap_err().to_string().contains("Missing value"));
        let result = parse_add_args(&args(&["My issue", "-p"]));
        assert!(result.unwrap_err().to_string().contains("Missing value"));
    }

    #[test]
    fn parse_unicode_title() {
        let parsed = parse_add_args(&args(&["修复登录 bug 🐛"])).unwrap();
        assert_eq!(parsed.title, "修复登录 bug 🐛");
    }

    #[test]
    fn pick_by_number_then_name() {
        let projects = vec![project(1, "Roadmap", true), project(2, "Bugs", false)];

        assert_eq!(pick_project(&projects, Some("#1")).unwrap().id, "P_1");
        assert_eq!(pick_project(&projects, Some("bugs")).unwrap().id, "P_2");
        assert!(pick_project(&projects, Some("nope")).is_err());
        // first open project by default
        assert_eq!(pick_project(&projects, None).unwrap().id, "P_2");
        assert!(pick_project(&[], None).is_err());
    }

    #[test]
    fn list_line_shows_counts() {
        let line = format_project(&project(4, "Roadmap", true));
        assert!(line.starts_with("#4 Roadmap [closed] (0 issues)"));
        assert!(line.contains("No Status"));
    }
}
