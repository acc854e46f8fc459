use std::{
    collections::HashMap,
    io::{self, Write},
    path::PathBuf,
};

use anyhow::{bail, Context, Result};
use catalog_core::{CatalogError, CreateForm, MergeOutcome, RemoteClient, SortColumn};
use shared::domain::ProductId;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::error;

use crate::{
    render::render_detail,
    session::{DetailEdits, Session},
};

pub const HELP: &str = "\
commands:
  search [term]                 filter titles (empty term clears)
  sort <id|title|price|category|image>
                                sort by column; repeat to flip direction
  page <n> | next | prev        move between pages
  reset                         clear search, sort and page
  reload                        fetch the product list again
  show <id>                     product details
  add title=.. price=.. description=.. category=.. image=..
  edit <id> [title=..] [price=..] [description=..]
  export [path]                 write the visible rows (all pages) as CSV
  help | quit";

#[derive(Debug, Clone, PartialEq)]
pub enum BrowseCommand {
    Search(String),
    Sort(SortColumn),
    Page(usize),
    Next,
    Previous,
    Reset,
    Reload,
    Show(ProductId),
    Add(CreateForm),
    Edit(ProductId, DetailEdits),
    Export(Option<PathBuf>),
    Help,
    Quit,
}

/// Parses one input line. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Result<Option<BrowseCommand>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "search" | "s" => BrowseCommand::Search(rest.to_string()),
        "sort" => BrowseCommand::Sort(rest.parse()?),
        "page" | "p" => {
            let page = rest
                .parse()
                .with_context(|| format!("invalid page number '{rest}'"))?;
            BrowseCommand::Page(page)
        }
        "next" | "n" => BrowseCommand::Next,
        "prev" | "previous" => BrowseCommand::Previous,
        "reset" => BrowseCommand::Reset,
        "reload" => BrowseCommand::Reload,
        "show" => BrowseCommand::Show(parse_id(rest)?),
        "add" => {
            let mut fields = parse_fields(
                rest,
                &["title", "price", "description", "category", "image"],
            )?;
            let mut take = |key: &str| fields.remove(key).unwrap_or_default();
            BrowseCommand::Add(CreateForm {
                title: take("title"),
                price: take("price"),
                description: take("description"),
                category_id: take("category"),
                image: take("image"),
            })
        }
        "edit" => {
            let (id, rest) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            let mut fields = parse_fields(rest, &["title", "price", "description"])?;
            BrowseCommand::Edit(
                parse_id(id)?,
                DetailEdits {
                    title: fields.remove("title"),
                    price: fields.remove("price"),
                    description: fields.remove("description"),
                },
            )
        }
        "export" => BrowseCommand::Export((!rest.is_empty()).then(|| PathBuf::from(rest))),
        "help" | "?" => BrowseCommand::Help,
        "quit" | "exit" | "q" => BrowseCommand::Quit,
        other => bail!("unknown command '{other}' (type 'help')"),
    };
    Ok(Some(command))
}

fn parse_id(raw: &str) -> Result<ProductId> {
    raw.trim()
        .parse::<i64>()
        .map(ProductId)
        .with_context(|| format!("invalid product id '{raw}'"))
}

/// Splits `key=value` pairs. Values run until the next known `key=`, so they may contain
/// spaces.
fn parse_fields(raw: &str, keys: &[&str]) -> Result<HashMap<String, String>> {
    let mut fields: HashMap<String, String> = HashMap::new();
    let mut current: Option<String> = None;

    for token in raw.split_whitespace() {
        let starts_field = token
            .split_once('=')
            .filter(|(key, _)| keys.contains(key));
        if let Some((key, value)) = starts_field {
            fields.insert(key.to_string(), value.to_string());
            current = Some(key.to_string());
            continue;
        }

        let Some(key) = &current else {
            bail!(
                "expected key=value, got '{token}' (keys: {})",
                keys.join(", ")
            );
        };
        if let Some(value) = fields.get_mut(key) {
            if !value.is_empty() {
                value.push(' ');
            }
            value.push_str(token);
        }
    }
    Ok(fields)
}

/// Reads commands from stdin until `quit` or end of input. Failed actions are reported and
/// the loop carries on.
pub async fn run<C: RemoteClient>(session: &mut Session<C>) -> Result<()> {
    print!("{}", session.take_output());
    println!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };

        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                eprintln!("error: {err:#}");
                continue;
            }
        };
        if command == BrowseCommand::Quit {
            break;
        }

        match execute(session, command).await {
            Ok(message) => {
                print!("{}", session.take_output());
                if let Some(message) = message {
                    println!("{message}");
                }
            }
            Err(err) => {
                let code = err.downcast_ref::<CatalogError>().map(CatalogError::code);
                error!(?code, error = %format!("{err:#}"), "browse action failed");
                eprintln!("error: {err:#}");
            }
        }
    }
    Ok(())
}

/// Applies one command. Returns an optional status line for the user.
pub async fn execute<C: RemoteClient>(
    session: &mut Session<C>,
    command: BrowseCommand,
) -> Result<Option<String>> {
    let message = match command {
        BrowseCommand::Search(term) => {
            session.view_mut().search(term);
            None
        }
        BrowseCommand::Sort(column) => {
            session.view_mut().click_sort(column);
            None
        }
        BrowseCommand::Page(page) => (!session.view_mut().go_to_page(page))
            .then(|| format!("page {page} is not available")),
        BrowseCommand::Next => (!session.view_mut().next_page())
            .then(|| "already on the last page".to_string()),
        BrowseCommand::Previous => (!session.view_mut().previous_page())
            .then(|| "already on the first page".to_string()),
        BrowseCommand::Reset => {
            session.view_mut().reset();
            None
        }
        BrowseCommand::Reload => {
            session.load().await?;
            None
        }
        BrowseCommand::Show(id) => Some(render_detail(&session.detail(id)?)),
        BrowseCommand::Add(form) => {
            let created = session.create(&form).await?;
            Some(format!("created product {}", created.id))
        }
        BrowseCommand::Edit(id, edits) => {
            let (detail, outcome) = session.update(id, &edits).await?;
            let mut message = render_detail(&detail);
            if outcome == MergeOutcome::Missing {
                message.push_str("note: the server's answer did not match a loaded product\n");
            }
            Some(message)
        }
        BrowseCommand::Export(path) => {
            let written = session.export(path.as_deref()).await?;
            Some(format!("exported to {}", written.display()))
        }
        BrowseCommand::Help => Some(HELP.to_string()),
        BrowseCommand::Quit => None,
    };
    Ok(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> BrowseCommand {
        parse_command(line).expect("parse").expect("command")
    }

    #[test]
    fn blank_lines_are_skipped() {
        assert_eq!(parse_command("   ").expect("parse"), None);
    }

    #[test]
    fn parses_navigation_commands() {
        assert_eq!(parse("search red shirt"), BrowseCommand::Search("red shirt".into()));
        assert_eq!(parse("search"), BrowseCommand::Search(String::new()));
        assert_eq!(parse("sort Price"), BrowseCommand::Sort(SortColumn::Price));
        assert_eq!(parse("page 3"), BrowseCommand::Page(3));
        assert_eq!(parse("next"), BrowseCommand::Next);
        assert_eq!(parse("prev"), BrowseCommand::Previous);
        assert_eq!(parse("quit"), BrowseCommand::Quit);
    }

    #[test]
    fn parses_add_with_spaced_values() {
        let command = parse(
            "add title=Desk lamp price=12.5 description=Warm light, brass category=3 image=https://x/l.png",
        );

        assert_eq!(
            command,
            BrowseCommand::Add(CreateForm {
                title: "Desk lamp".into(),
                price: "12.5".into(),
                description: "Warm light, brass".into(),
                category_id: "3".into(),
                image: "https://x/l.png".into(),
            })
        );
    }

    #[test]
    fn add_with_missing_fields_leaves_them_blank() {
        let BrowseCommand::Add(form) = parse("add title=Mug") else {
            panic!("expected add");
        };
        assert_eq!(form.title, "Mug");
        assert!(form.price.is_empty());
    }

    #[test]
    fn parses_edit() {
        assert_eq!(
            parse("edit 7 price=30 title=Big lamp"),
            BrowseCommand::Edit(
                ProductId(7),
                DetailEdits {
                    title: Some("Big lamp".into()),
                    price: Some("30".into()),
                    description: None,
                }
            )
        );
    }

    #[test]
    fn parses_export_with_optional_path() {
        assert_eq!(parse("export"), BrowseCommand::Export(None));
        assert_eq!(
            parse("export out/rows.csv"),
            BrowseCommand::Export(Some(PathBuf::from("out/rows.csv")))
        );
    }

    #[test]
    fn rejects_bad_input() {
        assert!(parse_command("sort rating").is_err());
        assert!(parse_command("page two").is_err());
        assert!(parse_command("show x").is_err());
        assert!(parse_command("add Mug").is_err());
        assert!(parse_command("dance").is_err());
    }
}
