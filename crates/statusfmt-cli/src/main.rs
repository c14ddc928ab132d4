use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use statusfmt_core::{Account, AccountDirectory, Formatter, FormatterOptions, Status};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Render a status body to display HTML.
#[derive(Debug, Parser)]
#[command(name = "statusfmt", version)]
struct Cli {
    /// Input file; reads stdin when omitted.
    input: Option<PathBuf>,

    /// Treat the input as markup received from another server.
    #[arg(long)]
    remote: bool,

    /// Treat the input as markup regardless of origin.
    #[arg(long, conflicts_with = "plaintext")]
    reformat: bool,

    /// Print the text content instead of HTML.
    #[arg(long)]
    plaintext: bool,

    /// TOML file with formatter options.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the instance domain.
    #[arg(long)]
    domain: Option<String>,

    /// Override the link scheme.
    #[arg(long)]
    scheme: Option<String>,

    /// Author of the status, as `user` or `user@domain`.
    #[arg(long, default_value = "you")]
    author: String,

    /// Render the status as boosted by this account.
    #[arg(long)]
    boosted_by: Option<String>,

    /// Known account (`user` or `user@domain`); mentions of others stay text.
    #[arg(long = "account")]
    accounts: Vec<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let options = load_options(&cli)?;
    debug!(?options, "loaded formatter options");

    let mut directory = AccountDirectory::new();
    for acct in &cli.accounts {
        directory.insert(parse_acct(acct, &options)?);
    }

    let source = read_input(cli.input.as_ref())?;
    let author = parse_acct(&cli.author, &options)?;
    let mut status = if cli.remote {
        Status::remote(author, source)
    } else {
        Status::local(author, source)
    };
    if let Some(booster) = &cli.boosted_by {
        status = Status::reblog_of(parse_acct(booster, &options)?, status);
    }

    let formatter = Formatter::with_resolver(options, directory);
    let output = if cli.plaintext {
        formatter.plaintext(&status)
    } else if cli.reformat {
        formatter.reformat(&status)
    } else {
        formatter.format(&status)
    }
    .context("failed to format status")?;

    print!("{}", output);
    Ok(())
}

fn load_options(cli: &Cli) -> Result<FormatterOptions> {
    let mut options = match &cli.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            toml::from_str(&text)
                .with_context(|| format!("invalid config in {}", path.display()))?
        }
        None => FormatterOptions::default(),
    };
    if let Some(domain) = &cli.domain {
        options.local_domain = domain.clone();
    }
    if let Some(scheme) = &cli.scheme {
        options.scheme = scheme.clone();
    }
    Ok(options)
}

fn read_input(path: Option<&PathBuf>) -> Result<String> {
    let mut source = match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read stdin")?;
            buffer
        }
    };
    // Editors and shells append a final newline that is not part of the text.
    if source.ends_with('\n') {
        source.pop();
        if source.ends_with('\r') {
            source.pop();
        }
    }
    Ok(source)
}

fn parse_acct(acct: &str, options: &FormatterOptions) -> Result<Account> {
    let acct = acct.strip_prefix('@').unwrap_or(acct);
    let (username, domain) = match acct.split_once('@') {
        Some((username, domain)) => (username, options.normalize_domain(Some(domain))),
        None => (acct, None),
    };
    if username.is_empty() || domain.is_some_and(str::is_empty) {
        bail!("invalid account {:?}, expected user or user@domain", acct);
    }
    Ok(match domain {
        Some(domain) => Account::remote(username, domain),
        None => Account::local(username),
    })
}
