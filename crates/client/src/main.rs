//! `caducados` command-line client.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use caducados_client::dashboard::{self, DEFAULT_FAMILIES};
use caducados_client::{
    AutoAnswer, ClientConfig, ClientError, ExpiryEditor, HttpBackend, OrganizeOutcome, Organizer, Prompter,
    Reviewer, Session, WithdrawalRound, admin, export,
};
use caducados_core::{ItemId, ProductCode, StoreId, calendar};
use caducados_inventory::{Cell, ItemPatchForm, ModuleGrid, NewItem, ReviewProgress, WithdrawalView};

#[derive(Parser)]
#[command(name = "caducados", version, about = "Track perishable expiry dates on the shop floor")]
struct Cli {
    /// Backend base URL
    #[arg(long, env = "CADUCADOS_API_BASE_URL")]
    api_url: Option<String>,

    /// Store to log in as
    #[arg(long, env = "CADUCADOS_STORE")]
    store: StoreId,

    #[arg(long, env = "CADUCADOS_PASSWORD", hide_env_values = true)]
    password: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Overdue and due-today counts for the store and each family
    Status {
        #[arg(long = "family")]
        families: Vec<String>,
    },
    /// Show one product and its withdrawal date
    Show { code: ProductCode },
    /// Set a product's expiry date
    SetExpiry {
        code: ProductCode,
        /// New expiry (YYYY-MM-DD)
        #[arg(long, conflicts_with = "shift")]
        date: Option<String>,
        /// Move the current expiry by this many days
        #[arg(long, allow_hyphen_values = true)]
        shift: Option<i64>,
    },
    /// Print the grid of a module
    Grid {
        family: String,
        #[arg(long)]
        module: Option<String>,
    },
    /// Move or swap the item at FROM to TO (cells as ROW,COLUMN)
    Move {
        family: String,
        #[arg(value_parser = parse_cell)]
        from: Cell,
        #[arg(value_parser = parse_cell)]
        to: Cell,
        #[arg(long)]
        module: Option<String>,
        /// Do not ask for confirmation
        #[arg(long)]
        yes: bool,
    },
    /// Walk today's changes of a family and reconcile them
    Review { family: String },
    /// Walk the overdue items of a family and set new expiry dates
    Withdraw { family: String },
    /// Planogram PDF links, one per family
    Planogram {
        #[arg(long = "family")]
        families: Vec<String>,
    },
    /// Today's changes of the whole store as HTML
    Summary {
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Start tracking a product
    Add {
        code: ProductCode,
        family: String,
        module: String,
        row: u32,
        column: u32,
        #[arg(long)]
        expiry: Option<String>,
        #[arg(long)]
        shelf_life: Option<u32>,
    },
    /// Change some fields of an item
    Edit {
        id: ItemId,
        #[arg(long, default_value = "")]
        module: String,
        #[arg(long, default_value = "")]
        row: String,
        #[arg(long, default_value = "")]
        column: String,
        #[arg(long, default_value = "")]
        expiry: String,
        #[arg(long, default_value = "")]
        shelf_life: String,
    },
    /// Stop tracking a product
    Remove {
        code: ProductCode,
        #[arg(long)]
        yes: bool,
    },
}

fn parse_cell(raw: &str) -> Result<Cell, String> {
    let (row, column) = raw.split_once(',').ok_or("expected ROW,COLUMN")?;
    let row: u32 = row.trim().parse().map_err(|_| format!("bad row {row:?}"))?;
    let column: u32 = column.trim().parse().map_err(|_| format!("bad column {column:?}"))?;
    if row == 0 || column == 0 {
        return Err("rows and columns start at 1".into());
    }
    Ok(Cell { row, column })
}

struct StdinPrompter;

impl Prompter for StdinPrompter {
    fn confirm(&self, message: &str) -> bool {
        matches!(read_answer(&format!("{message} [y/N] ")).as_deref(), Some("y" | "Y" | "s" | "S"))
    }
}

fn read_answer(prompt: &str) -> Option<String> {
    print!("{prompt}");
    io::stdout().flush().ok()?;
    let mut line = String::new();
    match io::stdin().lock().read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line.trim().to_string()),
    }
}

fn describe_withdrawal(view: &WithdrawalView) -> String {
    match view.date {
        Some(date) => format!("{} ({}, {})", calendar::format_ymd(date), view.status, view.color().hex()),
        None => format!("- ({})", view.status),
    }
}

fn print_grid(grid: &ModuleGrid) {
    println!("{}", grid.module_name());
    for row in grid.rows() {
        let cells: Vec<String> = row
            .cells
            .iter()
            .map(|(_, item)| match item {
                Some(item) => format!("{:>8}", item.product_code),
                None => format!("{:>8}", "."),
            })
            .collect();
        println!("{:>3} {}", row.row, cells.join(" "));
    }
    for hidden in grid.shadowed() {
        println!("hidden at {}: {} ({})", hidden.cell(), hidden.label(), hidden.product_code);
    }
}

#[tokio::main]
async fn main() {
    caducados_observability::init();
    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        match e.downcast_ref::<ClientError>() {
            Some(client) => eprintln!("{}", client.user_message()),
            None => eprintln!("Error: {e:#}"),
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.api_url {
        Some(url) => ClientConfig::new(url)?,
        None => ClientConfig::from_env()?,
    };
    let backend = HttpBackend::new(&config);
    let session = Session::login(&backend, cli.store, &cli.password).await?;
    let today = calendar::today();

    match cli.command {
        Command::Status { families } => {
            let families = if families.is_empty() {
                DEFAULT_FAMILIES.iter().map(|f| f.to_string()).collect()
            } else {
                families
            };
            let store = dashboard::store_counts(&backend, &session).await?;
            println!("Store {}: {} overdue, {} due today", session.store_id(), store.overdue, store.due_today);
            let changes = dashboard::family_change_counts(&backend, &session, &families).await;
            for ((family, counts), (_, changed)) in dashboard::family_counts(&backend, &session, &families)
                .await
                .into_iter()
                .zip(changes)
            {
                println!("  {family}: {} overdue, {} due today, {changed} changed today", counts.overdue, counts.due_today);
            }
        }
        Command::Show { code } => {
            let editor = ExpiryEditor::open(&backend, &session, code).await?;
            let item = editor.item();
            println!("{} [{}] {} {}", item.label(), item.product_code, item.position(), item.family.as_deref().unwrap_or("-"));
            println!("expiry:     {}", item.expiry_date.as_deref().unwrap_or("-"));
            println!("withdrawal: {}", describe_withdrawal(&editor.preview(today)));
            println!("image:      {}", config.asset_url(&item.image_path()));
        }
        Command::SetExpiry { code, date, shift } => {
            let mut editor = ExpiryEditor::open(&backend, &session, code).await?;
            if let Some(date) = date {
                editor.set_draft(date);
            }
            if let Some(days) = shift {
                editor.shift_days(days);
            }
            println!("{} -> {}", editor.item().label(), editor.draft().text());
            println!("withdrawal: {}", describe_withdrawal(&editor.preview(today)));
            editor.save().await?;
            println!("Saved");
        }
        Command::Grid { family, module } => {
            let mut organizer = Organizer::open(&backend, &session, &family).await?;
            if let Some(module) = module {
                organizer.select_module(&module).await?;
            }
            println!("Modules: {}", organizer.modules().join(", "));
            if let Some(grid) = organizer.grid() {
                print_grid(grid);
            }
        }
        Command::Move { family, from, to, module, yes } => {
            let mut organizer = Organizer::open(&backend, &session, &family).await?;
            if let Some(module) = module {
                organizer.select_module(&module).await?;
            }
            let prompter: &dyn Prompter = if yes { &AutoAnswer(true) } else { &StdinPrompter };
            match organizer.tap(from, prompter).await? {
                OrganizeOutcome::Selected(_) => {}
                _ => anyhow::bail!("no product at {from}"),
            }
            match organizer.tap(to, prompter).await? {
                OrganizeOutcome::Moved => println!("Product relocated"),
                OrganizeOutcome::Swapped => println!("Swap completed"),
                OrganizeOutcome::Declined => println!("Nothing changed"),
                OrganizeOutcome::Cleared | OrganizeOutcome::Ignored | OrganizeOutcome::Selected(_) => {
                    println!("Source and destination are the same cell")
                }
            }
            if let Some(grid) = organizer.grid() {
                print_grid(grid);
            }
        }
        Command::Review { family } => {
            let mut reviewer = Reviewer::open(&backend, &session, &family).await?;
            loop {
                let ReviewProgress::Browsing { index, total } = reviewer.progress() else {
                    println!("Review complete");
                    break;
                };
                let Some(record) = reviewer.current() else { break };
                println!(
                    "[{}/{}] {} ({}) {} -> {}{}",
                    index + 1,
                    total,
                    record.label(),
                    record.product_code,
                    record.previous_date.as_deref().unwrap_or("-"),
                    record.new_date.as_deref().unwrap_or("-"),
                    if record.is_reconciled() { " (reconciled)" } else { "" }
                );
                match read_answer("[Enter] reconcile, [s] skip, [q] quit: ").as_deref() {
                    Some("") => {
                        if let Err(e) = reviewer.advance().await {
                            eprintln!("{}", e.user_message());
                        }
                    }
                    Some("s") => {
                        reviewer.skip();
                    }
                    _ => break,
                }
            }
        }
        Command::Withdraw { family } => {
            let mut round = WithdrawalRound::open(&backend, &session, &family).await?;
            while let Some(item) = round.current() {
                let (n, total) = round.position();
                let draft = round.draft().map(|d| d.text().to_string()).unwrap_or_default();
                println!("[{n}/{total}] {} at {}", item.label(), item.position());
                let answer = read_answer(&format!("new expiry [{draft}], [s] skip, [q] quit: "));
                match answer.as_deref() {
                    Some("s") => round.skip_current(),
                    Some("q") | None => break,
                    Some(text) => {
                        if !text.is_empty() {
                            round.set_draft(text);
                        }
                        if let Some(view) = round.preview(today) {
                            println!("withdrawal: {}", describe_withdrawal(&view));
                        }
                        if let Err(e) = round.confirm_current().await {
                            eprintln!("{}", e.user_message());
                        }
                    }
                }
            }
            if round.is_complete() {
                println!("Nothing left to withdraw");
            }
        }
        Command::Planogram { families } => {
            let families: Vec<String> = if families.is_empty() {
                DEFAULT_FAMILIES.iter().map(|f| f.to_string()).collect()
            } else {
                families
            };
            for family in &families {
                println!("{family}: {}", backend.planogram_url(session.store_id(), family)?);
            }
        }
        Command::Summary { out } => {
            let groups = export::today_summary(&backend, &session).await?;
            match export::render_summary_html(&groups, &config, today) {
                None => println!("No changes today"),
                Some(html) => match out {
                    Some(path) => {
                        std::fs::write(&path, html).with_context(|| format!("writing {}", path.display()))?;
                        println!("Summary written to {}", path.display());
                    }
                    None => print!("{html}"),
                },
            }
        }
        Command::Add { code, family, module, row, column, expiry, shelf_life } => {
            let item = NewItem {
                store_id: session.store_id(),
                product_code: code,
                family,
                module_name: module,
                row,
                column,
                expiry_date: expiry,
                shelf_life_days: shelf_life,
            };
            admin::add_item(&backend, &session, &item).await?;
            println!("Product {code} added");
        }
        Command::Edit { id, module, row, column, expiry, shelf_life } => {
            let form = ItemPatchForm {
                module_name: module,
                row,
                column,
                expiry_date: expiry,
                shelf_life_days: shelf_life,
            };
            admin::edit_item(&backend, id, &form).await?;
            println!("Item {id} updated");
        }
        Command::Remove { code, yes } => {
            let prompter: &dyn Prompter = if yes { &AutoAnswer(true) } else { &StdinPrompter };
            let id = admin::remove_item(&backend, &session, code, prompter).await?;
            println!("Item {id} removed");
        }
    }

    session.logout();
    Ok(())
}
