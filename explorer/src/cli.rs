use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use explorer_common::{Clock, Day, FixedClock, SystemClock};
use explorer_config::Config;
use explorer_filter::{
    CountryOption, Field, FilterDraft, FilterEvent, FilterSession, NormalizedFilter,
    TestGroupOptions,
};
use serde::Serialize;

use crate::setup;

/// Builds and inspects measurement filters.
#[derive(Debug, Parser)]
#[command(name = "explorer", version)]
pub struct Cli {
    /// The path to the config folder.
    #[arg(short, long, global = true, env = "EXPLORER_CONFIG_PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Edits a filter and prints the submitted result.
    Filter(FilterArgs),
    /// Prints the selectable test names and countries.
    Options(OptionsArgs),
}

#[derive(Debug, Args)]
struct FilterArgs {
    /// A query string to restore the filter from.
    #[arg(short, long, default_value = "")]
    query: String,

    /// Sets a field, applied in order after restoring the query.
    #[arg(short, long = "set", value_name = "FIELD=VALUE", value_parser = parse_edit)]
    edits: Vec<(Field, String)>,

    /// Overrides the current day used for defaults and date checks.
    #[arg(long, value_name = "YYYY-MM-DD")]
    today: Option<Day>,

    /// Pretty prints the JSON output.
    #[arg(long)]
    pretty: bool,
}

#[derive(Debug, Args)]
struct OptionsArgs {
    /// The label of the entry that selects all countries.
    #[arg(long, default_value = "Any Country")]
    any_label: String,

    /// Pretty prints the JSON output.
    #[arg(long)]
    pretty: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Options {
    test_names: Vec<TestGroupOptions>,
    countries: Vec<CountryOption>,
}

fn parse_edit(s: &str) -> Result<(Field, String), String> {
    let (field, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=VALUE, got `{s}`"))?;
    let field = Field::try_from(field).map_err(|field| format!("unknown field `{field}`"))?;
    Ok((field, value.to_owned()))
}

fn write_json<W: Write, T: Serialize>(out: &mut W, value: &T, pretty: bool) -> Result<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut *out, value)?;
    } else {
        serde_json::to_writer(&mut *out, value)?;
    }
    writeln!(out)?;
    Ok(())
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let config = match self.config {
            Some(ref path) => Config::from_path(path)
                .with_context(|| format!("could not load config from {}", path.display()))?,
            None => Config::default(),
        };

        setup::init_logging(&config);
        setup::dump_spawn_infos(&config);

        let stdout = io::stdout();
        let mut out = stdout.lock();

        match self.command {
            Command::Filter(args) => run_filter(args, &mut out),
            Command::Options(args) => run_options(&config, args, &mut out),
        }
    }
}

fn run_filter<W: Write>(args: FilterArgs, out: &mut W) -> Result<()> {
    let today = args.today.unwrap_or_else(|| SystemClock.today());
    let clock = FixedClock(today);

    let draft =
        FilterDraft::from_query_string(&args.query, &clock).context("invalid filter query")?;
    let mut session = FilterSession::restore(draft, clock);

    for (field, value) in &args.edits {
        let event = FilterEvent::parse(*field, value)
            .with_context(|| format!("invalid value for {field}"))?;
        session.dispatch(event);
    }

    let mut submitted = None;
    if let Err(error) = session.submit(&mut |filter: NormalizedFilter| submitted = Some(filter)) {
        for (field, field_error) in error.errors() {
            explorer_log::error!("{field}: {field_error}");
        }
        return Err(error.into());
    }

    if let Some(filter) = submitted {
        write_json(out, &filter, args.pretty)?;
        writeln!(out, "{}", filter.to_query_string()?)?;
    }

    Ok(())
}

fn run_options<W: Write>(config: &Config, args: OptionsArgs, out: &mut W) -> Result<()> {
    let options = Options {
        test_names: explorer_filter::group_test_names(&config.test_names()?),
        countries: explorer_filter::country_options(&config.countries()?, &args.any_label),
    };

    write_json(out, &options, args.pretty)
}

pub fn execute() -> Result<()> {
    Cli::parse().run()
}
