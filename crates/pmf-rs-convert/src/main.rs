use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use pmf_rs_bedrock::{LevelDbWriter, MemoryWriter, WorldWriter};
use pmf_rs_blockstate::BlockStateMapper;
use pmf_rs_convert::{convert, ConvertError, ConvertStats, ConverterConfig};
use pmf_rs_format::Level;
use tracing::info;

/// Convert a PMF legacy world into a Bedrock world directory.
#[derive(Debug, Parser)]
#[command(version)]
struct Cli {
    /// Directory holding `level.pmf`, `tiles.yml` and `chunks/`
    source: PathBuf,

    /// Output world directory, created if missing
    destination: PathBuf,

    /// TOML config file (defaults to `pmf-convert.toml` if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Convert without writing anything to disk
    #[arg(long)]
    dry_run: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match ConverterConfig::discover(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {e}");
            return ExitCode::FAILURE;
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    let start = Instant::now();
    match run(&cli, &config) {
        Ok(stats) => {
            println!("Converted PMF world in {:.2?}: {stats}", start.elapsed());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            let mut source = e.source();
            while let Some(cause) = source {
                eprintln!("  caused by: {cause}");
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, config: &ConverterConfig) -> Result<ConvertStats, ConvertError> {
    let mut level = Level::open(&cli.source)?;
    let mapper = BlockStateMapper::bundled()?.with_policy(config.conversion.unmapped);
    info!(
        entries = mapper.len(),
        policy = ?mapper.policy(),
        "loaded block state table"
    );

    let stats = if cli.dry_run {
        info!("dry run, nothing will be written");
        convert_into(&mut level, &mapper, MemoryWriter::new())?
    } else {
        let writer = LevelDbWriter::create(&cli.destination)?;
        info!(path = %writer.dir().display(), "writing Bedrock world");
        convert_into(&mut level, &mapper, writer)?
    };

    level.close();
    Ok(stats)
}

fn convert_into<W: WorldWriter>(
    level: &mut Level,
    mapper: &BlockStateMapper,
    mut writer: W,
) -> Result<ConvertStats, ConvertError> {
    let stats = convert(level, mapper, &mut writer)?;
    writer.close()?;
    Ok(stats)
}
