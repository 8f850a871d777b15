use bucketree::{
    parse::{DateOrder, FileReader, HourFormat, ParserConfig},
    parse_time_bound, Container, Mode, OutputFormat, Resolution, Timestamp,
};
use clap::Parser;
use std::{fs::File, io::BufWriter, path::PathBuf, time::Instant};

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

fn separator(s: &str) -> Result<u8, String> {
    match s.as_bytes() {
        [b] if b.is_ascii() => Ok(*b),
        _ => Err(format!("separator must be a single ASCII character, got {s:?}")),
    }
}

fn time_bound(s: &str) -> Result<Timestamp, String> {
    parse_time_bound(s).map_err(|e| e.to_string())
}

/// Aggregates timestamped sensor readings by day, hour or minute
#[derive(Parser)]
#[command(name = "bucketree", version, about, long_about = None)]
struct Args {
    /// Delimited input file
    #[arg(short, long, required_unless_present = "load")]
    input: Option<PathBuf>,

    /// Result file
    #[arg(short, long)]
    output: PathBuf,

    /// Column (field) to query
    #[arg(short, long)]
    column: String,

    /// Field separator of input and CSV output
    #[arg(long, default_value = ",", value_parser = separator)]
    sep: u8,

    /// Start of the range, yyyy:mm:dd:hh:mm
    #[arg(long, default_value = "1980:10:10:10:10", value_parser = time_bound)]
    start: Timestamp,

    /// End of the range (inclusive), yyyy:mm:dd:hh:mm
    #[arg(long, default_value = "2050:10:10:10:10", value_parser = time_bound)]
    end: Timestamp,

    /// csv or json
    #[arg(long, default_value = "csv")]
    format_out: OutputFormat,

    /// auto, year, day or us
    #[arg(long, default_value = "auto")]
    date_format: DateOrder,

    /// day, hour or minute
    #[arg(long, default_value = "minute")]
    resolution: Resolution,

    /// none, mean, min or max
    #[arg(long, default_value = "none")]
    aggregation_type: Mode,

    /// Index of the timestamp column (detected by default)
    #[arg(long)]
    timestamp_column: Option<usize>,

    /// auto, 12 or 24
    #[arg(long, default_value = "auto")]
    hour_format: HourFormat,

    /// Name of the sensor that recorded the input
    #[arg(long, default_value = "")]
    sensor_name: String,

    /// Saves the parsed container to this file
    #[arg(long)]
    save: Option<PathBuf>,

    /// Loads a saved container instead of parsing an input file
    #[arg(long, conflicts_with = "input")]
    load: Option<PathBuf>,
}

fn read(args: &Args) -> bucketree::Result<Container> {
    if let Some(path) = &args.load {
        return Container::load_from_path(path);
    }

    let mut config = ParserConfig::new()
        .separator(args.sep)
        .column(args.column.as_str())
        .hour_format(args.hour_format)
        .date_order(args.date_format);

    if let Some(idx) = args.timestamp_column {
        config = config.timestamp_column(idx);
    }

    let mut container = Container::builder().sensor(args.sensor_name.as_str()).build();

    if let Some(path) = &args.input {
        let count = FileReader::new(config).read_path(path, &mut container)?;
        log::info!("read {count} record(s) from {}", path.display());
    }

    Ok(container)
}

fn main() -> bucketree::Result<()> {
    env_logger::builder()
        .filter_module("bucketree", log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = Args::parse();

    let start = Instant::now();
    let container = read(&args)?;
    log::info!("ingested in {:?}", start.elapsed());

    if let Some(path) = &args.save {
        container.save_to_path(path)?;
        log::info!("saved to {}", path.display());
    }

    let start = Instant::now();

    let points = container.query(
        &args.column,
        args.start,
        args.end,
        args.resolution,
        args.aggregation_type,
    )?;

    log::info!("{} point(s) in {:?}", points.len(), start.elapsed());

    let writer = BufWriter::new(File::create(&args.output)?);
    bucketree::write(
        writer,
        &points,
        &args.column,
        args.sep,
        args.format_out,
    )?;

    log::info!("written to {}", args.output.display());

    Ok(())
}
