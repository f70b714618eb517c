use std::path::PathBuf;

use clap::Parser;

use runegen::emit::Language;
use runegen::GenerateOptions;

#[derive(Parser, Debug)]
#[clap(version, about)]
struct Args {
    /// Directory containing ucd.all.grouped.zip
    #[clap(value_parser, env = "DATA_DIR")]
    data_dir: PathBuf,

    /// Directory the generated file is written to
    #[clap(value_parser, env = "OUT_DIR")]
    out_dir: PathBuf,

    /// Dialect of the generated file
    #[clap(long, value_enum, default_value_t = Language::Go)]
    lang: Language,

    /// Also log debug output
    #[clap(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors
    #[clap(short, long)]
    quiet: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();

    let level = match (args.verbose, args.quiet) {
        (true, _) => tracing::Level::DEBUG,
        (_, true) => tracing::Level::WARN,
        _ => tracing::Level::INFO,
    };
    runegen::trace::init(level);

    let options = GenerateOptions::builder()
        .data_dir(args.data_dir)
        .out_dir(args.out_dir)
        .language(args.lang)
        .build();

    let summary = match runegen::generate(&options) {
        Ok(summary) => summary,
        Err(err) => {
            tracing::error!("{}", err);
            std::process::exit(1);
        }
    };
    println!("{}", serde_json::to_string(&summary)?);
    Ok(())
}
