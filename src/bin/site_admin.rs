//! Site Admin CLI
//!
//! Command-line access to the admin console's content tables and
//! submissions.

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde_json::{Map, Value};
use std::io::{self, BufRead, Write};

use logistics_site::admin::{password_digest, AdminManager};
use logistics_site::database::models::{AdminTable, ContentRowInput, SubmissionKind, SubmissionStatus};
use logistics_site::database::Database;

#[derive(Parser)]
#[command(name = "site-admin")]
#[command(about = "Manage logistics site content and submissions")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Database URL
    #[arg(long, default_value = "sqlite://site.db")]
    database_url: String,
}

#[derive(Subcommand)]
enum Commands {
    /// List rows of a content table
    List {
        /// Table name (hero_content, about_content, services, testimonials, team_members, job_listings)
        table: AdminTable,
    },

    /// Show one row
    Show { table: AdminTable, id: String },

    /// Insert a row, or update it when --id is given
    Save {
        table: AdminTable,

        /// Existing row id
        #[arg(long)]
        id: Option<String>,

        /// Row fields as a JSON object
        #[arg(long, default_value = "{}")]
        fields: String,

        #[arg(long, default_value_t = 0)]
        display_order: i64,

        /// Store the row hidden from the public site
        #[arg(long)]
        hidden: bool,
    },

    /// Delete a row
    Delete {
        table: AdminTable,
        id: String,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Show or hide a row on the public site
    SetVisible {
        table: AdminTable,
        id: String,
        #[arg(action = clap::ArgAction::Set)]
        visible: bool,
    },

    /// List form submissions, newest first
    Submissions {
        /// booking, enquiry or application
        #[arg(short, long)]
        kind: Option<SubmissionKind>,
    },

    /// Set a submission's status (new, reviewed, contacted, closed)
    SetStatus { id: String, status: SubmissionStatus },

    /// Print the SHA-256 digest to configure as admin.password_sha256
    HashPassword { password: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Commands::HashPassword { password } = &cli.command {
        println!("{}", password_digest(password));
        return Ok(());
    }

    let database = Database::new(&cli.database_url)
        .await
        .with_context(|| format!("Failed to open database {}", cli.database_url))?;
    database.run_migrations().await?;
    let admin = AdminManager::new(database);

    match cli.command {
        Commands::List { table } => {
            let rows = admin.list(table).await?;
            if rows.is_empty() {
                println!("No rows in {}", table);
            }
            for row in rows {
                println!(
                    "{}  order={}  {}={}  {}",
                    row.id,
                    row.display_order,
                    table.visibility_column(),
                    row.visible,
                    summary(&row.fields)
                );
            }
        }
        Commands::Show { table, id } => {
            let row = admin.get(table, &id).await?;
            println!("{}", serde_json::to_string_pretty(&row)?);
        }
        Commands::Save {
            table,
            id,
            fields,
            display_order,
            hidden,
        } => {
            let fields: Map<String, Value> =
                serde_json::from_str(&fields).context("--fields must be a JSON object")?;
            let input = ContentRowInput {
                id,
                fields,
                display_order,
                visible: !hidden,
            };
            let outcome = admin.save(table, &input).await?;
            let verb = if outcome.created { "Inserted" } else { "Updated" };
            println!("{} {} row {}", verb, table, outcome.row.id);
        }
        Commands::Delete { table, id, yes } => {
            let pending = admin.request_delete(table, &id).await?;
            println!(
                "{} row {}: {}",
                table,
                pending.row().id,
                summary(&pending.row().fields)
            );

            if !yes && !confirm("Delete this row?")? {
                println!("Aborted");
                return Ok(());
            }

            let row = pending.confirm().await?;
            println!("Deleted {} row {}", table, row.id);
        }
        Commands::SetVisible { table, id, visible } => {
            admin.set_visibility(table, &id, visible).await?;
            println!("{} row {} {}={}", table, id, table.visibility_column(), visible);
        }
        Commands::Submissions { kind } => {
            for submission in admin.submissions(kind).await? {
                println!(
                    "{}  {}  {}  [{}]",
                    submission.created_at.format("%Y-%m-%d %H:%M"),
                    submission.id,
                    submission.kind.label(),
                    submission.status
                );
            }
        }
        Commands::SetStatus { id, status } => {
            let submission = admin.update_submission_status(&id, status).await?;
            println!("Submission {} is now {}", submission.id, submission.status);
        }
        // printed before the database is opened
        Commands::HashPassword { .. } => {}
    }

    Ok(())
}

/// First string field of a row, for one-line listings.
fn summary(fields: &Map<String, Value>) -> String {
    ["title", "name", "quote"]
        .iter()
        .find_map(|key| fields.get(*key).and_then(Value::as_str))
        .map(str::to_string)
        .unwrap_or_else(|| Value::Object(fields.clone()).to_string())
}

fn confirm(prompt: &str) -> anyhow::Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}
