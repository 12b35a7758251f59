use clap::Parser;
use std::fs::File;
use std::io::BufWriter;
use std::process::ExitCode;
use tally2ledger::{Error, ErrorLevel, ErrorType, Export, RuleTable};

const VERSION: &str = env!("CARGO_PKG_VERSION");
const AUTHOR: &str = env!("CARGO_PKG_AUTHORS");

const EXIT_USAGE: u8 = 1;
const EXIT_PARSE: u8 = 2;
const EXIT_WRITE: u8 = 3;
const EXIT_SKIPPED: u8 = 4;

#[derive(Debug, Parser)]
#[command(
    name = "tally2ledger",
    about = "Converts a Tally export into a ledger journal.",
    version = VERSION,
    author = AUTHOR,
)]
struct Cli {
    /// Tally exported text file to convert
    #[arg(short, long = "text", required = true)]
    text: String,
    /// Ledger file to write, replaced if it exists
    #[arg(short, long = "output", required = true)]
    output: String,
    /// JSON file with account and payee renaming rules
    #[arg(short, long)]
    rules: Option<String>,
    /// Log filter, e.g. `debug` or `tally2ledger=trace`
    #[arg(long, default_value = "info")]
    log: String,
}

/// Exit code for an error that stops the conversion.
fn failure_code(error: &Error) -> u8 {
    match error.r#type {
        ErrorType::Io => EXIT_USAGE,
        _ => EXIT_PARSE,
    }
}

fn main() -> ExitCode {
    let args = match Cli::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::from(EXIT_USAGE)
            } else {
                ExitCode::SUCCESS
            };
        }
    };
    pretty_env_logger::formatted_builder()
        .parse_filters(&args.log)
        .init();

    let (mut export, errors) = match Export::from_file(&args.text) {
        Ok(result) => result,
        Err(error) => {
            log::error!("{}", error);
            return ExitCode::from(failure_code(&error));
        }
    };
    for error in &errors {
        match error.level {
            ErrorLevel::Error => log::error!("{}", error),
            ErrorLevel::Warning => log::warn!("{}", error),
            ErrorLevel::Info => log::info!("{}", error),
        }
    }
    log::info!("Vouchers found: {}", export.found());
    if export.skipped() > 0 {
        log::warn!("Vouchers skipped: {}", export.skipped());
    }

    if let Some(path) = &args.rules {
        match RuleTable::from_file(path) {
            Ok(rules) => export.rewrite(&rules),
            Err(error) => {
                log::error!("{}", error);
                return ExitCode::from(failure_code(&error));
            }
        }
    }

    let written = File::create(&args.output).and_then(|file| {
        let mut writer = BufWriter::new(file);
        export.write_to(&mut writer)
    });
    if let Err(e) = written {
        log::error!("Couldn't write {}: {}", args.output, e);
        return ExitCode::from(EXIT_WRITE);
    }
    log::info!(
        "Wrote {} vouchers to {}.",
        export.vouchers().len(),
        args.output
    );

    if export.skipped() > 0 {
        ExitCode::from(EXIT_SKIPPED)
    } else {
        ExitCode::SUCCESS
    }
}
