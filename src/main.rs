//! rust_coxpress command-line interface

use clap::Parser;
use log::{info, LevelFilter};

use rust_coxpress::cli::{parse_delimiter, Cli, Commands};
use rust_coxpress::prelude::*;

fn main() {
    let cli = Cli::parse();

    // Set up logging
    let log_level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp(None)
        .init();

    let result = match cli.command {
        Commands::Preprocess {
            input,
            output,
            config,
            format,
            delimiter,
            expected_rows,
            layout,
            group,
            drop_rows,
            log2,
            normalize,
            out_delimiter,
            header,
            threads,
        } => {
            let options = PreprocessArgs {
                format,
                delimiter,
                expected_rows,
                layout,
                group,
                drop_rows,
                log2,
                normalize,
                out_delimiter,
                header,
            };
            run_preprocess(&input, &output, config.as_deref(), options, threads)
        }
        Commands::Inspect {
            input,
            format,
            layout,
        } => run_inspect(&input, &format, layout.as_deref()),
        Commands::Conditions {
            input,
            format,
            layout,
            first,
            second,
            prefix,
            header,
        } => run_conditions(&input, &format, &layout, &first, &second, &prefix, header),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

// ---------------------------------------------------------------------------
// Subcommand implementations
// ---------------------------------------------------------------------------

/// Pipeline flags collected from the `preprocess` subcommand
struct PreprocessArgs {
    format: String,
    delimiter: String,
    expected_rows: Option<usize>,
    layout: Option<String>,
    group: Option<String>,
    drop_rows: Vec<usize>,
    log2: bool,
    normalize: String,
    out_delimiter: String,
    header: bool,
}

fn delimiter_byte(name: &str) -> Result<u8> {
    parse_delimiter(name).ok_or_else(|| CoxpressError::InvalidInput {
        reason: format!("Unknown delimiter '{}'", name),
    })
}

fn build_config(args: PreprocessArgs) -> Result<PipelineConfig> {
    let in_delimiter = delimiter_byte(&args.delimiter)?;

    let layout = match args.layout.as_deref() {
        Some(name) => Some(DatasetLayout::resolve(name)?),
        None => None,
    };

    let config = PipelineConfig {
        format: args.format.parse()?,
        read: ReadOptions {
            delimiter: in_delimiter,
        },
        dataset: DatasetTableOptions {
            delimiter: in_delimiter,
            expected_rows: args.expected_rows,
            ..Default::default()
        },
        layout,
        group: args.group,
        drop_rows: args.drop_rows,
        log2: args.log2,
        normalization: args.normalize.parse()?,
        write: WriteOptions {
            delimiter: delimiter_byte(&args.out_delimiter)?,
            include_header: args.header,
            ..Default::default()
        },
    };
    config.validate()?;
    Ok(config)
}

fn run_preprocess(
    input: &str,
    output: &str,
    config_path: Option<&str>,
    args: PreprocessArgs,
    threads: usize,
) -> Result<()> {
    if threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .ok();
    }

    let config = match config_path {
        Some(path) => {
            info!("Loading pipeline configuration from: {}", path);
            PipelineConfig::from_json_file(path)?
        }
        None => build_config(args)?,
    };

    let result = run_pipeline_file(input, output, &config)?;
    info!("  wrote {} rows, {} samples", result.n_rows(), result.n_cols());
    info!("Done!");
    Ok(())
}

fn run_inspect(input: &str, format: &str, layout: Option<&str>) -> Result<()> {
    let config = PipelineConfig {
        format: format.parse()?,
        ..Default::default()
    };
    let matrix = load_matrix(input, &config)?;

    let preview: Vec<&str> = matrix.row_ids().iter().take(5).map(String::as_str).collect();
    info!("First row IDs: {}", preview.join(", "));
    let samples: Vec<&str> = matrix.sample_ids().iter().take(5).map(String::as_str).collect();
    info!("First samples: {}", samples.join(", "));

    if let Some(name) = layout {
        let layout = DatasetLayout::resolve(name)?;
        layout.validate_against(&matrix)?;
        info!("Layout '{}' matches", layout.name);
        for group in &layout.groups {
            info!("  group {}: {} columns", group.name, group.width());
        }
    }
    Ok(())
}

fn run_conditions(
    input: &str,
    format: &str,
    layout: &str,
    first: &str,
    second: &str,
    prefix: &str,
    header: bool,
) -> Result<()> {
    let config = PipelineConfig {
        format: format.parse()?,
        ..Default::default()
    };
    let matrix = load_matrix(input, &config)?;
    let layout = DatasetLayout::resolve(layout)?;

    let (c1, c2) = extract_conditions(&matrix, &layout, first, second)?;

    let options = WriteOptions {
        include_header: header,
        ..Default::default()
    };
    for (name, group) in [(first, &c1), (second, &c2)] {
        let path = format!("{}_{}.csv", prefix, name);
        write_labeled_matrix_file(&path, group, &options)?;
    }

    info!("Done!");
    Ok(())
}
