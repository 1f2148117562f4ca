use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result, bail};
use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use dynform_engine::{
    FieldValue, FillTable, FormContainer, FormSchema, SchemaProvider, StaticSchemaProvider, SubmitOutcome, ValidationError, ValueSink,
    parse_fill_table_file, parse_schema_file, parse_values_file, render, submit,
};
use dynform_tui::{FormApp, FormExit, run_form};
use dynform_util::{default_log_path, init_file_tracing, init_tracing, load_form_settings};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli().get_matches();
    match matches.subcommand() {
        Some(("preview", sub)) => run_preview(sub).await,
        Some(("check", sub)) => {
            init_tracing();
            run_check(sub)
        }
        Some(("layout", sub)) => {
            init_tracing();
            run_layout(sub)
        }
        _ => bail!("expected a subcommand; see --help"),
    }
}

fn cli() -> Command {
    let schema = Arg::new("schema")
        .long("schema")
        .short('s')
        .required(true)
        .action(ArgAction::Set)
        .value_parser(value_parser!(PathBuf))
        .help("Form description (YAML or JSON)");
    let values = Arg::new("values")
        .long("values")
        .action(ArgAction::Set)
        .value_parser(value_parser!(PathBuf))
        .help("Stored field values; renders the form in modify mode");
    let fills = Arg::new("fills")
        .long("fills")
        .action(ArgAction::Set)
        .value_parser(value_parser!(PathBuf))
        .help("Fill table answering dependency callbacks");

    Command::new("dynform")
        .about("Render, check and preview server-described forms")
        .subcommand_required(true)
        .subcommand(
            Command::new("preview")
                .about("Open the form interactively and print the submitted values")
                .arg(schema.clone())
                .arg(values.clone())
                .arg(fills.clone()),
        )
        .subcommand(
            Command::new("check")
                .about("Render headlessly, fire dependency triggers, then extract and validate")
                .arg(schema.clone())
                .arg(values)
                .arg(fills)
                .arg(
                    Arg::new("trigger")
                        .long("trigger")
                        .action(ArgAction::Append)
                        .help("Field whose dependency callback fires before extraction (repeatable)"),
                ),
        )
        .subcommand(Command::new("layout").about("Print row order and preferred size").arg(schema))
}

/// Everything a subcommand needs to render a form.
struct LoadedForm {
    title: String,
    provider: Arc<StaticSchemaProvider>,
    prior_values: Vec<FieldValue>,
}

fn load_form(matches: &ArgMatches) -> Result<LoadedForm> {
    let schema_path = matches.get_one::<PathBuf>("schema").context("missing --schema")?;
    let FormSchema { title, fields } = parse_schema_file(schema_path)?;

    let prior_values = match matches.try_get_one::<PathBuf>("values").ok().flatten() {
        Some(path) => parse_values_file(path)?,
        None => Vec::new(),
    };
    let fills = match matches.try_get_one::<PathBuf>("fills").ok().flatten() {
        Some(path) => parse_fill_table_file(path)?,
        None => FillTable::default(),
    };

    Ok(LoadedForm {
        title: title.unwrap_or_else(|| schema_path.display().to_string()),
        provider: Arc::new(StaticSchemaProvider::new(fields, fills)),
        prior_values,
    })
}

fn new_container() -> FormContainer {
    let settings = load_form_settings().unwrap_or_else(|error| {
        warn!(%error, "falling back to default form settings");
        Default::default()
    });
    FormContainer::new(settings)
}

async fn run_preview(matches: &ArgMatches) -> Result<()> {
    let log_path = default_log_path();
    if let Err(error) = init_file_tracing(&log_path) {
        eprintln!("logging disabled: cannot open {}: {error}", log_path.display());
    }

    let form = load_form(matches)?;
    let descriptors = form.provider.descriptors()?;
    let mut container = new_container();
    render(&mut container, &descriptors, &form.prior_values)?;

    let provider: Arc<dyn SchemaProvider> = form.provider;
    match run_form(FormApp::new(form.title, descriptors, container), provider).await? {
        FormExit::Submitted(values) => println!("{}", serde_json::to_string_pretty(&values)?),
        FormExit::Cancelled => info!("form cancelled"),
    }
    Ok(())
}

/// Prints accepted values as JSON on stdout.
struct StdoutSink;

impl ValueSink for StdoutSink {
    fn accept(&mut self, values: &[FieldValue]) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(values)?);
        Ok(())
    }

    fn reject(&mut self, error: &ValidationError) {
        eprintln!("validation failed for field '{}': {error}", error.field);
    }
}

fn run_check(matches: &ArgMatches) -> Result<()> {
    let form = load_form(matches)?;
    let descriptors = form.provider.descriptors()?;
    let mut container = new_container();
    render(&mut container, &descriptors, &form.prior_values)?;

    for trigger in matches.get_many::<String>("trigger").into_iter().flatten() {
        let written = container.trigger_dependency(trigger, form.provider.as_ref())?;
        info!(trigger = %trigger, written = ?written, "dependency triggered");
    }

    match submit(&container, &descriptors, &mut StdoutSink)? {
        SubmitOutcome::Accepted(_) => Ok(()),
        SubmitOutcome::Rejected(error) => Err(error).context("form did not validate"),
    }
}

fn run_layout(matches: &ArgMatches) -> Result<()> {
    let form = load_form(matches)?;
    let descriptors = form.provider.descriptors()?;
    let mut container = new_container();
    let size = render(&mut container, &descriptors, &[])?;

    println!("{}", form.title);
    for (index, row) in container.rows().iter().enumerate() {
        let tab = row.tab.as_deref().unwrap_or("-");
        println!(
            "{index:>3}  {:<24} {:<24} {:<12} {}x{}",
            row.field, row.label.text, tab, row.size.width, row.size.height
        );
    }
    let hidden: Vec<&str> = container.editors().filter(|editor| editor.is_hidden()).map(|editor| editor.name()).collect();
    if !hidden.is_empty() {
        println!("hidden: {}", hidden.join(", "));
    }
    println!("preferred size: {}x{}", size.width, size.height);
    Ok(())
}
