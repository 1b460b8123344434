//!
//! civic-console binary
//! --------------------
//! Command-line front end for the admin console. Keeps the session in the state
//! directory between invocations, so `login` once and then run other commands.

use std::env;

use anyhow::{anyhow, Result};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use civic_console::config::ConsoleConfig;
use civic_console::console::Console;
use civic_console::navigation::Resolution;
use civic_console::workflow::IssueStatus;

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} login <email> <password>                 log in and print the landing page\n  {program} logout                                   clear the stored session\n  {program} whoami                                   show the current session\n  {program} open <path>                              resolve a navigation path for the current session\n  {program} menu                                     list the pages available to the current role\n  {program} issues                                   reported issues with status counts (admin)\n  {program} progress                                 cluster progress through the workflow (admin)\n  {program} department                               department dashboard: assignment counts and analytics (department)\n  {program} assignments                              cluster assignments (department)\n  {program} assignment <id>                          one assignment with its issues (department)\n  {program} update-assignment <id> <status> [comment]  move an assignment along the workflow (department)\n\nEnvironment:\n  CIVIC_API_BASE            backend base URL (default http://localhost:5000/api)\n  CIVIC_STATE_DIR           session state directory (default .civic)\n  CIVIC_HTTP_TIMEOUT_SECS   request timeout in seconds (default 30)\n  RUST_LOG                  log filter (default info)"
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let mut args: Vec<String> = env::args().collect();
    let program = if args.is_empty() { "civic-console".to_string() } else { args.remove(0) };
    let Some(cmd) = args.first().cloned() else {
        print_usage(&program);
        std::process::exit(2);
    };
    if cmd == "help" || cmd == "--help" || cmd == "-h" {
        print_usage(&program);
        return Ok(());
    }

    let config = ConsoleConfig::from_env()?;
    info!(target: "civic", "civic-console starting: api_base='{}', state_dir='{}'", config.api_base, config.state_dir.display());
    let console = Console::open(&config)?;

    let arg = |i: usize, name: &str| -> Result<String> {
        args.get(i).cloned().ok_or_else(|| anyhow!("{} requires <{}>", cmd, name))
    };

    match cmd.as_str() {
        "login" => {
            let email = arg(1, "email")?;
            let password = arg(2, "password")?;
            let landing = console.login(&email, &password).await?;
            println!("logged in; landing page {}", landing);
        }
        "logout" => {
            console.logout()?;
            println!("logged out");
        }
        "whoami" => match console.auth().identity() {
            Some(i) => println!("{} (id {}, role {})", i.username, i.id, i.role),
            None => println!("anonymous"),
        },
        "open" => {
            let path = arg(1, "path")?;
            match console.open_path(&path) {
                Resolution::Page { path, page } => println!("{} -> {:?}", path, page),
                Resolution::NotFound { path } => println!("{} -> not found", path),
            }
        }
        "menu" => {
            let entries = console.menu();
            if entries.is_empty() {
                println!("(log in to see pages)");
            }
            for e in entries {
                println!("{:<22} {}", e.label, e.path);
            }
        }
        "issues" => {
            let report = console.issues().await?;
            for p in &report.posts {
                println!("{:<26} {:<12} {:<16} {}", p.id, p.status.label(), p.reporter(), p.summary());
            }
            let t = report.tally;
            println!(
                "total: {}, pending: {}, in progress: {}, resolved: {}, on map: {}, overdue: {}",
                t.total, t.pending, t.in_progress, t.resolved, report.mappable, report.overdue
            );
        }
        "progress" => {
            for c in console.progress().await? {
                let name = c.title.as_deref().unwrap_or(&c.id);
                let dept = c.department.as_deref().unwrap_or("-");
                println!("{:<32} {:<16} stage {}/3 {}", name, dept, c.status.stage(), c.status.label());
            }
        }
        "assignments" => {
            for a in console.assignments().await? {
                println!("{:<26} {:<12} {} issue(s)", a.id, a.status.label(), a.issues.len());
            }
        }
        "department" => {
            let overview = console.department_dashboard().await?;
            let t = overview.tally;
            println!(
                "assignments: {}, pending: {}, in progress: {}, resolved: {}",
                overview.total_assignments(), t.pending, t.in_progress, t.resolved
            );
            for a in &overview.assignments {
                println!("{:<26} {:<12} {}", a.id, a.status.label(), a.department.as_deref().unwrap_or("-"));
            }
        }
        "assignment" => {
            let id = arg(1, "id")?;
            let a = console.assignment(&id).await?;
            println!("{} {} ({} issue(s))", a.id, a.status.label(), a.issues.len());
            for p in &a.issues {
                println!("  {:<26} {:<12} {}", p.id, p.status.label(), p.summary());
            }
        }
        "update-assignment" => {
            let id = arg(1, "id")?;
            let raw = arg(2, "status")?;
            let Some(status) = IssueStatus::from_label(&raw) else {
                eprintln!(
                    "unknown status '{}'; expected one of: {}",
                    raw,
                    IssueStatus::ALL.iter().map(|s| s.wire()).collect::<Vec<_>>().join(", ")
                );
                std::process::exit(2);
            };
            let comment = args.get(3).cloned().unwrap_or_default();
            let updated = console.update_assignment(&id, status, &comment).await?;
            println!("{} -> {}", updated.id, updated.status.label());
        }
        other => {
            eprintln!("unknown command '{}'", other);
            print_usage(&program);
            std::process::exit(2);
        }
    }
    Ok(())
}
