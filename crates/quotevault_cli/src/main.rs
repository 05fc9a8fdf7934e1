//! CLI smoke entry point.
//!
//! # Responsibility
//! - Wire config, logging, store and rotation the way a front-end would.
//! - Offer one-shot commands for quick local checks against `vault.db`.

use quotevault_core::{
    init_logging, NewQuote, Quote, QuoteId, QuoteRepository, QuoteRotation, QuoteStore,
    VaultConfig,
};
use std::error::Error;
use std::process::ExitCode;

const USAGE: &str = "usage: quotevault <command>
  add <body> [author] [date]
  update <id> <body> [author] [date]
  delete <id>
  get <id>
  list
  next [count]
  ping";

type CliResult = Result<(), Box<dyn Error>>;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("event=cli_command module=cli status=error error={err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &[String]) -> CliResult {
    let Some((command, rest)) = args.split_first() else {
        println!("{USAGE}");
        return Ok(());
    };

    if command == "ping" {
        println!("quotevault_core ping={}", quotevault_core::ping());
        println!("quotevault_core version={}", quotevault_core::core_version());
        return Ok(());
    }

    dotenvy::dotenv().ok();
    let config = VaultConfig::from_env()?;
    if let Some(log_dir) = config.log_dir.as_deref() {
        init_logging(config.log_level, log_dir)?;
    }
    let store = QuoteStore::initialize(&config.db_path)?;

    match command.as_str() {
        "add" => {
            let quote = quote_fields(rest, 0)?;
            let id = store.add_quote(&quote)?;
            println!("added quote {id}");
        }
        "update" => {
            let id = parse_id(rest.first())?;
            let quote = quote_fields(rest, 1)?.into_quote(id);
            store.update_quote(&quote)?;
            println!("updated quote {id}");
        }
        "delete" => {
            let id = parse_id(rest.first())?;
            store.delete_quote(id)?;
            println!("deleted quote {id}");
        }
        "get" => {
            let id = parse_id(rest.first())?;
            print_quote(&store.get_quote(id)?);
        }
        "list" => {
            for quote in store.list_quotes()? {
                print_quote(&quote);
            }
        }
        "next" => {
            let count = match rest.first() {
                Some(value) => value.parse::<usize>()?,
                None => 1,
            };
            let rotation = QuoteRotation::new(&store).with_policy(config.rotation_policy);
            rotation.initialize()?;
            for _ in 0..count {
                print_quote(&rotation.next()?);
            }
        }
        other => return Err(format!("unknown command `{other}`\n{USAGE}").into()),
    }

    Ok(())
}

fn quote_fields(args: &[String], offset: usize) -> Result<NewQuote, Box<dyn Error>> {
    let mut fields = args.iter().skip(offset);
    let body = fields.next().ok_or("missing quote body")?;
    let mut quote = NewQuote::new(body.as_str());
    if let Some(author) = fields.next() {
        quote = quote.with_author(author.as_str());
    }
    if let Some(date) = fields.next() {
        let date = date.trim();
        if !quotevault_core::is_well_formed_date(date) {
            return Err(format!("date `{date}` is not YYYY, YYYY-MM or YYYY-MM-DD").into());
        }
        quote = quote.with_date(date);
    }
    Ok(quote)
}

fn parse_id(value: Option<&String>) -> Result<QuoteId, Box<dyn Error>> {
    let value = value.ok_or("missing quote id")?;
    Ok(value.parse::<QuoteId>()?)
}

fn print_quote(quote: &Quote) {
    let date = quote.date.as_deref().unwrap_or("");
    println!(
        "[{}] {} | {} | {}",
        quote.id,
        quote.body,
        quote.author_or_empty(),
        date
    );
}
