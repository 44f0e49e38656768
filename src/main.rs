use anyhow::{Context, Result, bail};
use clap::{Arg, ArgMatches, Command};
use std::path::Path;

use ly2mei::convert::{ConversionSettings, IdStrategy, MeiSettings};
use ly2mei::mei::DEFAULT_MEI_VERSION;
use ly2mei::whitelist::Whitelist;

#[derive(Debug, PartialEq, Clone, Copy)]
enum FileFormat {
    LilyPond,
    Mei,
}

fn detect_file_format(file_path: &str) -> Result<FileFormat> {
    let path = Path::new(file_path);
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .ok_or_else(|| anyhow::anyhow!("File has no extension: {}", file_path))?;

    match extension.to_lowercase().as_str() {
        "ly" | "ily" | "lilypond" => Ok(FileFormat::LilyPond),
        "mei" | "xml" => Ok(FileFormat::Mei),
        _ => Err(anyhow::anyhow!(
            "Unsupported file extension: .{}",
            extension
        )),
    }
}

fn command() -> Command {
    Command::new("ly2mei")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert between LilyPond and MEI")
        .arg(
            Arg::new("input")
                .help("Input file (.ly or .mei)")
                .required(true)
                .value_name("INPUT_FILE")
                .index(1),
        )
        .arg(
            Arg::new("output")
                .help("Output file (.mei or .ly); prints to stdout when omitted")
                .value_name("OUTPUT_FILE")
                .index(2),
        )
        .arg(
            Arg::new("verbose")
                .help("Enable verbose output")
                .short('v')
                .long("verbose")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("strict")
                .help("Reject accidentals, rests, spacers and dots")
                .long("strict")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("title")
                .help("Title written to the MEI header")
                .long("title")
                .value_name("TITLE"),
        )
        .arg(
            Arg::new("mei-version")
                .help("Value of the @meiversion attribute")
                .long("mei-version")
                .value_name("VERSION")
                .default_value(DEFAULT_MEI_VERSION),
        )
        .arg(
            Arg::new("indent")
                .help("Spaces per indentation level in MEI output (0 for one line)")
                .long("indent")
                .value_name("SPACES")
                .default_value("2")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("sequential-ids")
                .help("Use reproducible sequential xml:ids instead of UUIDs")
                .long("sequential-ids")
                .action(clap::ArgAction::SetTrue),
        )
}

fn settings_from_matches(matches: &ArgMatches) -> ConversionSettings {
    ConversionSettings {
        whitelist: if matches.get_flag("strict") {
            Whitelist::strict()
        } else {
            Whitelist::extended()
        },
        mei: MeiSettings {
            mei_version: matches
                .get_one::<String>("mei-version")
                .cloned()
                .unwrap_or_else(|| DEFAULT_MEI_VERSION.to_string()),
            title: matches.get_one::<String>("title").cloned(),
        },
        indent: matches.get_one::<usize>("indent").copied().unwrap_or(2),
        ids: if matches.get_flag("sequential-ids") {
            IdStrategy::Sequential
        } else {
            IdStrategy::Uuid
        },
    }
}

fn run(matches: &ArgMatches) -> Result<()> {
    let input_file = matches
        .get_one::<String>("input")
        .context("Missing input file")?;
    let output_file = matches.get_one::<String>("output");
    let settings = settings_from_matches(matches);

    let input_format = detect_file_format(input_file)
        .with_context(|| format!("Failed to detect input file format: {}", input_file))?;

    if let Some(output_file) = output_file {
        let output_format = detect_file_format(output_file)
            .with_context(|| format!("Failed to detect output file format: {}", output_file))?;
        if output_format == input_format {
            bail!(
                "Input and output are both {:?}; nothing to convert",
                input_format
            );
        }
    }

    log::debug!("Reading {:?} file: {}", input_format, input_file);
    let content = std::fs::read_to_string(input_file)
        .with_context(|| format!("Failed to read input file: {}", input_file))?;

    let output_content = match input_format {
        FileFormat::LilyPond => {
            log::debug!(
                "Whitelist features: {:?}",
                settings.whitelist.enabled_features()
            );
            ly2mei::convert_ly_to_mei(&content, &settings)
                .with_context(|| format!("Failed to convert {}", input_file))?
        }
        FileFormat::Mei => ly2mei::convert_mei_to_ly(&content)
            .with_context(|| format!("Failed to convert {}", input_file))?
            .to_string(),
    };

    match output_file {
        Some(output_file) => {
            std::fs::write(output_file, output_content)
                .with_context(|| format!("Failed to write output file: {}", output_file))?;
            log::info!("Wrote {}", output_file);
        }
        None => print!("{}", output_content),
    }

    Ok(())
}

fn main() {
    let matches = command().get_matches();

    let log_level = if matches.get_flag("verbose") {
        "debug"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    if let Err(e) = run(&matches) {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
}
