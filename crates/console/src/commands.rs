//! Console subcommands.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tokio::sync::broadcast::error::RecvError;

use catalog_core::customers::CustomerLedger;
use catalog_core::{Attachment, Category, CategorySet, ProjectForm, ProjectId};
use catalog_engine::{CatalogEngine, MutationReport};
use catalog_gateway::{Credentials, GatewayError, HttpCatalogGateway, SessionContext};

use crate::config::ConsoleConfig;
use crate::{render, session_store};

#[derive(Parser, Debug)]
#[command(name = "catalog-console", version, about = "Admin console for the project catalog")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Log in and store the session for later commands.
    Login {
        /// Defaults to CATALOG_ADMIN_EMAIL.
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        password: String,
    },
    /// End the session.
    Logout,
    /// List projects, one page at a time or searched across the catalog.
    Projects(ProjectsArgs),
    /// Create a project.
    Create(ProjectFields),
    /// Update an existing project. Omitted fields keep their current value.
    Update {
        id: String,
        #[command(flatten)]
        fields: ProjectFields,
    },
    /// Delete a project.
    Delete {
        id: String,
        /// Page to show after the delete.
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Show dashboard statistics.
    Stats,
    /// List customer orders.
    Customers {
        /// Filter by customer name.
        #[arg(long)]
        search: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
}

#[derive(Args, Debug)]
pub struct ProjectsArgs {
    #[arg(long, default_value_t = 1)]
    pub page: u32,

    /// Search title, description, and categories across all projects.
    #[arg(long)]
    pub search: Option<String>,

    /// Print the view as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, Default)]
pub struct ProjectFields {
    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    /// Category label; repeat or comma-separate for several.
    #[arg(long = "category", value_delimiter = ',')]
    pub categories: Vec<String>,

    /// Sale price.
    #[arg(long)]
    pub price: Option<String>,

    /// List price; must not be below the sale price.
    #[arg(long)]
    pub actual_price: Option<String>,

    /// Documentation file (pdf, doc, docx, txt, md).
    #[arg(long)]
    pub documentation: Option<PathBuf>,

    /// Code archive (zip).
    #[arg(long)]
    pub code_files: Option<PathBuf>,
}

impl ProjectFields {
    /// Overlay the given fields onto `form`. Categories, when given,
    /// replace the current selection.
    pub async fn apply(self, form: &mut ProjectForm) -> anyhow::Result<()> {
        if let Some(title) = self.title {
            form.title = title;
        }
        if let Some(description) = self.description {
            form.description = description;
        }
        if !self.categories.is_empty() {
            form.categories = parse_category_args(&self.categories)?;
        }
        if let Some(price) = self.price {
            form.price = price;
        }
        if let Some(actual_price) = self.actual_price {
            form.actual_price = actual_price;
        }
        if let Some(path) = self.documentation {
            let (name, bytes) = read_file(&path).await?;
            form.attach(Attachment::documentation(name, bytes)?);
        }
        if let Some(path) = self.code_files {
            let (name, bytes) = read_file(&path).await?;
            form.attach(Attachment::code_archive(name, bytes)?);
        }
        Ok(())
    }
}

fn parse_category_args(raw: &[String]) -> anyhow::Result<CategorySet> {
    raw.iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|label| {
            Category::from_label(label).with_context(|| {
                let known: Vec<_> = Category::ALL.iter().map(|c| c.label()).collect();
                format!("unknown category {label:?}; expected one of: {}", known.join(", "))
            })
        })
        .collect()
}

async fn read_file(path: &Path) -> anyhow::Result<(String, Vec<u8>)> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok((name, bytes))
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub async fn run(command: Command, config: ConsoleConfig) -> anyhow::Result<()> {
    let session = Arc::new(SessionContext::new());
    if let Some(stored) = session_store::resolve(&config).await? {
        session.establish(stored).await;
    }

    let gateway = Arc::new(HttpCatalogGateway::new(
        config.gateway_config(),
        Arc::clone(&session),
    )?);
    let engine = CatalogEngine::new(Arc::clone(&gateway), Arc::clone(&session));
    let events = log_events(&engine);

    let result = dispatch(command, &config, &gateway, &engine).await;

    drop(engine);
    let _ = events.await;
    session_store::sync(&config.session_file, &session).await?;
    result
}

async fn dispatch(
    command: Command,
    config: &ConsoleConfig,
    gateway: &HttpCatalogGateway,
    engine: &CatalogEngine<HttpCatalogGateway>,
) -> anyhow::Result<()> {
    match command {
        Command::Login { email, password } => {
            let email = email
                .or_else(|| config.admin_email.clone())
                .context("pass --email or set CATALOG_ADMIN_EMAIL")?;
            let session = gateway.login(&Credentials::new(email, password)).await?;
            session_store::save(&config.session_file, &session).await?;
            println!("Logged in as {}", session.email.as_deref().unwrap_or_default());
        }

        Command::Logout => {
            gateway.logout().await;
            println!("Logged out");
        }

        Command::Projects(args) => {
            engine.load(args.page).await?;
            if let Some(query) = args.search {
                engine.refresh_snapshot().await?;
                engine.set_query(query).await;
            }
            let view = engine.view().await;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                print!("{}", render::catalog(&view));
            }
        }

        Command::Create(fields) => {
            let mut form = ProjectForm::default();
            fields.apply(&mut form).await?;
            let report = engine.create(form).await?;
            print_report(engine, report, "Project created").await;
        }

        Command::Update { id, fields } => {
            let id = ProjectId::new(id);
            engine.refresh_snapshot().await?;
            let existing = engine
                .project(&id)
                .await
                .with_context(|| format!("project {id} not found"))?;

            let mut form = ProjectForm::from_project(&existing);
            fields.apply(&mut form).await?;
            let report = engine.update(form, id).await?;
            print_report(engine, report, "Project updated").await;
        }

        Command::Delete { id, page } => {
            engine.load(page).await?;
            let report = engine.delete(&ProjectId::new(id)).await?;
            print_report(engine, report, "Project deleted").await;
        }

        Command::Stats => {
            let stats = checked(gateway, gateway.dashboard_stats().await).await?;
            print!("{}", render::stats(&stats));
        }

        Command::Customers { search, page } => {
            let orders = checked(gateway, gateway.customer_orders().await).await?;
            let mut ledger = CustomerLedger::new(orders);
            if let Some(query) = search {
                ledger.set_query(query);
            }
            ledger.set_page(page);
            print!("{}", render::customers(&ledger));
        }
    }
    Ok(())
}

/// Drop the session when the server refused the token.
async fn checked<T>(gateway: &HttpCatalogGateway, result: Result<T, GatewayError>) -> anyhow::Result<T> {
    if let Err(e) = &result {
        if e.is_unauthorized() {
            gateway.session().invalidate().await;
        }
    }
    Ok(result?)
}

async fn print_report(engine: &CatalogEngine<HttpCatalogGateway>, report: MutationReport, fallback: &str) {
    println!("{}", report.message.as_deref().unwrap_or(fallback));
    if let Err(e) = &report.reload {
        // The change went through; only the refreshed listing is missing.
        eprintln!("Could not refresh the project list: {e}");
        return;
    }
    print!("{}", render::catalog(&engine.view().await));
}

fn log_events(engine: &CatalogEngine<HttpCatalogGateway>) -> tokio::task::JoinHandle<()> {
    let mut events = engine.subscribe();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => tracing::debug!(?event, "Catalog event"),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Catalog event log fell behind");
                }
                Err(RecvError::Closed) => break,
            }
        }
    })
}
