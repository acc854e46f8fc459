use std::path::PathBuf;

use anyhow::{Context, Result};
use catalog_core::{
    CreateForm, DetailView, HttpProductClient, MergeOutcome, RemoteClient, SortColumn,
};
use clap::{Args, Parser, Subcommand};
use shared::domain::ProductId;
use tracing_subscriber::EnvFilter;

mod browse;
mod config;
mod render;
mod session;

use config::load_settings;
use render::render_detail;
use session::{DetailEdits, Session};

#[derive(Parser, Debug)]
#[command(name = "catalog", about = "Browse, search and edit the product catalog")]
struct Cli {
    /// Product API base url (overrides catalog.toml and environment)
    #[arg(long, global = true)]
    api_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct ViewArgs {
    /// Case-insensitive title filter
    #[arg(long)]
    search: Option<String>,
    /// Column to sort by: id, title, price, category or image
    #[arg(long)]
    sort: Option<SortColumn>,
    /// Sort descending
    #[arg(long, requires = "sort")]
    desc: bool,
    #[arg(long, default_value_t = 1)]
    page: usize,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print one page of the catalog
    List(ViewArgs),
    /// Show a product's details
    Show { id: i64 },
    /// Write the filtered, sorted rows (every page) as CSV
    Export {
        #[command(flatten)]
        view: ViewArgs,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Create a product
    Create {
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        price: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        category_id: Option<String>,
        #[arg(long)]
        image: Option<String>,
    },
    /// Edit a product's title, price or description
    Update {
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        price: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Interactive catalog view
    Browse,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let mut settings = load_settings()?;
    if let Some(api_url) = cli.api_url {
        settings.api_base_url = api_url;
    }
    let client = HttpProductClient::new(&settings.api_base_url)
        .with_context(|| format!("invalid api url '{}'", settings.api_base_url))?;
    let mut session = Session::new(client, settings.export_path);

    session
        .load()
        .await
        .context("failed to load the product list")?;

    match cli.command {
        Command::List(view) => {
            apply_view(&mut session, &view)?;
            print!("{}", session.take_output());
        }
        Command::Show { id } => {
            let detail = session.detail(ProductId(id))?;
            print!("{}", render_detail(&detail));
        }
        Command::Export { view, output } => {
            apply_view(&mut session, &view)?;
            let written = session.export(output.as_deref()).await?;
            println!(
                "exported {} rows to {}",
                session.view().working_set().len(),
                written.display()
            );
        }
        Command::Create {
            title,
            price,
            description,
            category_id,
            image,
        } => {
            let form = CreateForm {
                title: title.unwrap_or_default(),
                price: price.unwrap_or_default(),
                description: description.unwrap_or_default(),
                category_id: category_id.unwrap_or_default(),
                image: image.unwrap_or_default(),
            };
            let created = session.create(&form).await.context("create failed")?;
            print!("{}", render_detail(&DetailView::open(created)));
        }
        Command::Update {
            id,
            title,
            price,
            description,
        } => {
            let edits = DetailEdits {
                title,
                price,
                description,
            };
            let (detail, outcome) = session
                .update(ProductId(id), &edits)
                .await
                .context("update failed")?;
            print!("{}", render_detail(&detail));
            if outcome == MergeOutcome::Missing {
                println!("note: the server's answer did not match a loaded product");
            }
        }
        Command::Browse => browse::run(&mut session).await?,
    }

    Ok(())
}

/// Replays the view flags as if typed into the UI, then renders the final page only.
fn apply_view<C: RemoteClient>(session: &mut Session<C>, args: &ViewArgs) -> Result<()> {
    let view = session.view_mut();
    if let Some(term) = &args.search {
        view.search(term.as_str());
    }
    if let Some(column) = args.sort {
        view.click_sort(column);
        if args.desc {
            view.click_sort(column);
        }
    }
    let total_pages = view.total_pages();
    anyhow::ensure!(
        view.go_to_page(args.page),
        "page {} is out of range (1-{total_pages})",
        args.page
    );

    session.take_output();
    session.view_mut().render();
    Ok(())
}
