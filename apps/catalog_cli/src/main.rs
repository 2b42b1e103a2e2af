use std::{fs::File, io::BufWriter, path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use client_core::{export::write_csv, CatalogApi, CatalogSession, HttpCatalogClient};
use shared::{domain::ProductId, protocol::DraftForm};
use tracing_subscriber::EnvFilter;
use view::{parse_page_size, QueryState, SortField};

mod browse;
mod config;
mod render;

use config::load_settings;
use render::{render_page, update_report};

#[derive(Parser, Debug)]
#[command(name = "catalog", about = "Browse and edit a remote product catalog")]
struct Cli {
    /// Collection endpoint, overrides config and environment.
    #[arg(long, global = true)]
    api_url: Option<String>,
    /// Settings file (defaults to ./catalog.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct QueryArgs {
    #[arg(long, default_value = "")]
    search: String,
    #[arg(long)]
    sort: Option<SortField>,
    #[arg(long, requires = "sort")]
    desc: bool,
    #[arg(long)]
    page_size: Option<String>,
    #[arg(long, default_value_t = 1)]
    page: usize,
}

#[derive(Args, Debug)]
struct DraftArgs {
    #[arg(long)]
    title: String,
    #[arg(long, default_value = "")]
    price: String,
    #[arg(long, default_value = "")]
    description: String,
    #[arg(long, default_value = "")]
    category: String,
    /// Comma-separated image URLs.
    #[arg(long, default_value = "")]
    images: String,
}

impl From<DraftArgs> for DraftForm {
    fn from(args: DraftArgs) -> Self {
        Self {
            title: args.title,
            price: args.price,
            description: args.description,
            category: args.category,
            images: args.images,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print one page of the table.
    List(QueryArgs),
    /// Write one page of the table as CSV.
    Export {
        #[arg(long, default_value = "products.csv")]
        out: PathBuf,
        #[command(flatten)]
        query: QueryArgs,
    },
    Create(DraftArgs),
    Update {
        id: String,
        #[command(flatten)]
        draft: DraftArgs,
    },
    Delete {
        id: String,
    },
    /// Interactive session reading searches and `:commands` from stdin.
    Browse,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let mut settings = load_settings(cli.config.as_deref())?;
    if let Some(api_url) = cli.api_url {
        settings.api_url = api_url;
    }
    let client = HttpCatalogClient::new(&settings.api_url)?;
    let default_query = QueryState::with_page_size(settings.page_size)?;

    match cli.command {
        Command::List(args) => {
            let mut session = loaded_session(client, default_query, &args).await?;
            let view = session.view()?;
            render_page(&view, &mut std::io::stdout().lock())?;
        }
        Command::Export { out, query } => {
            let mut session = loaded_session(client, default_query, &query).await?;
            let view = session.view()?;
            let file = File::create(&out)
                .with_context(|| format!("failed to create '{}'", out.display()))?;
            write_csv(&view.rows, BufWriter::new(file))?;
            println!("wrote {} rows to {}", view.rows.len(), out.display());
        }
        Command::Create(args) => {
            let draft = DraftForm::from(args).into_draft()?;
            let created = client.create(&draft).await?;
            println!("{}", serde_json::to_string_pretty(&created)?);
        }
        Command::Update { id, draft } => {
            let id: ProductId = id.parse()?;
            let draft = DraftForm::from(draft).into_draft()?;
            let updated = client.update(id, &draft).await?;
            println!("{}", update_report(id, updated.as_ref())?);
        }
        Command::Delete { id } => {
            let id: ProductId = id.parse()?;
            client.delete(id).await?;
            println!("deleted product {id}");
        }
        Command::Browse => {
            let mut session = CatalogSession::new(client, default_query);
            session.load().await?;
            browse::run(
                &mut session,
                Duration::from_millis(settings.search_debounce_ms),
            )
            .await?;
        }
    }

    Ok(())
}

async fn loaded_session<A: CatalogApi>(
    api: A,
    mut query: QueryState,
    args: &QueryArgs,
) -> Result<CatalogSession<A>> {
    if let Some(raw) = &args.page_size {
        query.set_page_size(parse_page_size(raw)?)?;
    }
    query.set_search(args.search.as_str());
    if let Some(field) = args.sort {
        query.toggle_sort(field);
        if args.desc {
            query.toggle_sort(field);
        }
    }
    query.set_page(args.page)?;

    let mut session = CatalogSession::new(api, query);
    session.load().await?;
    Ok(session)
}
