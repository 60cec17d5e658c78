use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use std::path::PathBuf;
use std::process::ExitCode;
use steply_autocomplete::candidates::CandidateList;
use steply_autocomplete::config::AutocompleteConfig;
use steply_autocomplete::error::Result;
use steply_autocomplete::logging;
use steply_autocomplete::runner::{Runtime, Screen};
use steply_autocomplete::terminal::Terminal;
use steply_autocomplete::widgets::Autocomplete;

const DEFAULT_CANDIDATES: &[&str] = &[
    "Argentina",
    "Australia",
    "Austria",
    "Belgium",
    "Brazil",
    "Canada",
    "Chile",
    "China",
    "Colombia",
    "Cuba",
    "Denmark",
    "Egypt",
    "Finland",
    "France",
    "Germany",
    "Greece",
    "India",
    "Ireland",
    "Italy",
    "Japan",
    "Mexico",
    "Netherlands",
    "New Zealand",
    "Norway",
    "Peru",
    "Poland",
    "Portugal",
    "Spain",
    "Sweden",
    "Switzerland",
    "United Kingdom",
    "United States",
];

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn cli() -> Command {
    Command::new("steply-autocomplete")
        .about("Debounced autocomplete prompt for the terminal")
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .value_name("PATH")
                .value_parser(value_parser!(PathBuf))
                .help("YAML or JSON file with label, placeholder and candidates"),
        )
        .arg(
            Arg::new("candidate")
                .long("candidate")
                .value_name("TEXT")
                .action(ArgAction::Append)
                .help("Candidate string; repeat to build the list"),
        )
        .arg(
            Arg::new("label")
                .long("label")
                .value_name("TEXT")
                .help("Label shown before the input"),
        )
        .arg(
            Arg::new("placeholder")
                .long("placeholder")
                .value_name("TEXT")
                .help("Placeholder shown while the input is empty"),
        )
        .arg(
            Arg::new("log-file")
                .long("log-file")
                .value_name("PATH")
                .value_parser(value_parser!(PathBuf))
                .help("Write logs to PATH (filter with RUST_LOG)"),
        )
}

fn resolve_config(matches: &ArgMatches) -> Result<AutocompleteConfig> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => AutocompleteConfig::load(path)?,
        None => AutocompleteConfig::default()
            .with_candidates(&CandidateList::from(DEFAULT_CANDIDATES)),
    };

    let explicit: Vec<String> = matches
        .get_many::<String>("candidate")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();
    if !explicit.is_empty() {
        config = config.with_candidates(&CandidateList::new(explicit));
    }
    if let Some(label) = matches.get_one::<String>("label") {
        config.label = label.clone();
    }
    if let Some(placeholder) = matches.get_one::<String>("placeholder") {
        config.placeholder = placeholder.clone();
    }
    Ok(config)
}

fn run() -> Result<()> {
    let matches = cli().get_matches();
    if let Some(path) = matches.get_one::<PathBuf>("log-file") {
        logging::init_file(path)?;
    }

    let config = resolve_config(&matches)?;
    let widget = Autocomplete::new("autocomplete", config.label.clone(), config.candidates())
        .with_placeholder(config.placeholder.clone())
        .with_max_visible(config.max_visible);
    let screen = Screen::new("Autocomplete", widget);

    let terminal = Terminal::new()?;
    if let Some(value) = Runtime::new(terminal, screen).run()? {
        println!("{value}");
    }
    Ok(())
}
