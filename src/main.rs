use std::process::ExitCode;
use clap::{value_parser, Arg, ArgAction, Command};
use deadparam::{check_unused_params, report, Settings};
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    let output_formats = if cfg!(feature = "json-out") {
        &["plain", "human-readable", "json"][..]
    } else {
        &["plain", "human-readable"][..]
    };

    Command::new("deadparam")
        .about("Find unused function parameters in .go files")
        .arg(Arg::new("NAMED_RETURNS")
             .long("named-returns")
             .action(ArgAction::SetTrue)
             .help("Also report unused named return values")
        )
        .arg(Arg::new("RECEIVERS")
             .long("receivers")
             .value_name("BOOL")
             .value_parser(value_parser!(bool))
             .default_value("true")
             .help("Report unused method receivers")
        )
        .arg(Arg::new("TESTS")
             .long("tests")
             .value_name("BOOL")
             .value_parser(value_parser!(bool))
             .default_value("true")
             .help("Analyze *_test.go files")
        )
        .arg(Arg::new("SET_EXIT_STATUS")
             .long("set-exit-status")
             .value_name("BOOL")
             .value_parser(value_parser!(bool))
             .default_value("true")
             .help("Exit with status 1 if unused parameters were found")
        )
        .arg(Arg::new("HIDDEN")
             .long("hidden")
             .action(ArgAction::SetTrue)
             .help("Recurse into hidden subdirectories and process hidden .go files")
        )
        .arg(Arg::new("OUTPUT_FORMAT")
             .short('o')
             .long("output-format")
             .value_parser(output_formats.to_vec())
             .default_value("plain")
             .help("Output format to use")
        )
        .arg(Arg::new("QUIET")
             .short('q')
             .long("quiet")
             .action(ArgAction::SetTrue)
             .help("Don't print results")
        )
        .arg(Arg::new("VERBOSE")
             .short('v')
             .long("verbose")
             .action(ArgAction::Count)
             .help("Increase logging verbosity (-v: debug, -vv+: trace)")
        )
        .arg(Arg::new("FILE_PATHS")
             .num_args(0..)
             .default_value(".")
             .help(".go files or directories to search in")
        )
}

fn directive_for_verbosity(v: u8) -> &'static str {
    match v {
        0 => "deadparam=warn",
        1 => "deadparam=debug",
        _ => "deadparam=trace",
    }
}

fn main() -> ExitCode {
    let matches = cli().get_matches();

    let default_directive = directive_for_verbosity(matches.get_count("VERBOSE"));
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive)),
        )
        .with_writer(std::io::stderr)
        .init();

    let settings = Settings {
        include_named_returns: matches.get_flag("NAMED_RETURNS"),
        include_receivers: matches.get_one::<bool>("RECEIVERS").copied().unwrap_or(true),
        include_tests: matches.get_one::<bool>("TESTS").copied().unwrap_or(true),
        set_exit_status: matches.get_one::<bool>("SET_EXIT_STATUS").copied().unwrap_or(true),
    };
    let output_format = matches.get_one::<String>("OUTPUT_FORMAT")
        .map_or("plain", String::as_str);
    let quiet = matches.get_flag("QUIET");
    let file_paths = matches.get_many::<String>("FILE_PATHS")
        .into_iter()
        .flatten();

    let outcome = check_unused_params(file_paths, &settings, matches.get_flag("HIDDEN"));

    if !quiet {
        for file in &outcome.reports {
            if file.results.is_empty() {
                continue;
            }
            let path = file.path.display().to_string();
            match output_format {
                "human-readable" => {
                    if let Err(err) = report::print(path, &file.content, &file.results) {
                        tracing::error!("cannot print report: {}", err);
                    }
                }
                #[cfg(feature = "json-out")]
                "json" => match report::json(&path, &file.content, &file.results) {
                    Ok(json) => println!("{}", json),
                    Err(err) => tracing::error!("cannot serialize report: {}", err),
                },
                _ => {
                    for result in &file.results {
                        print!("{}", report::plain_line(&path, result));
                    }
                }
            }
        }
    }

    if !outcome.errors.is_empty() {
        ExitCode::from(2)
    } else if outcome.exit_with_status() {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}
