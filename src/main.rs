use clap::{value_parser, Arg, ArgAction, Command as ClapCommand};
use std::process;
use log::error;

use rasterclump::utils::logger::{level_for, Logger};
use rasterclump::commands::{CommandFactory, RasterclumpCommandFactory};

fn main() {
    let matches = ClapCommand::new("rasterclump")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Label connected regions of equal category in raster data")
        .arg(
            Arg::new("input")
                .help("Input rasters (.rcb band files or images)")
                .required(true)
                .num_args(1..)
                .index(1),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .help("Output file")
                .value_name("FILE")
                .required(false),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("log-file")
                .long("log-file")
                .help("Write log messages and job reports to this file")
                .value_name("FILE")
                .required(false),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .help("TOML job file with [clump] and [relabel] settings")
                .value_name("FILE")
                .required(false),
        )
        .arg(
            Arg::new("relabel")
                .short('r')
                .long("relabel")
                .help("Compact the labels of a label raster")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("info")
                .short('i')
                .long("info")
                .help("Describe the input rasters")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("convert")
                .short('c')
                .long("convert")
                .help("Convert an image to a band file or a band file to an image")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("no-data")
                .long("no-data")
                .help("Category value that never starts a clump, in every band")
                .value_name("VALUE")
                .value_parser(value_parser!(u32))
                .conflicts_with("band-no-data")
                .required(false),
        )
        .arg(
            Arg::new("band-no-data")
                .long("band-no-data")
                .help("Use the no-data value declared by each band")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("tolerance")
                .long("tolerance")
                .help("Largest difference between neighbouring values of one clump")
                .value_name("VALUE")
                .value_parser(value_parser!(u32))
                .required(false),
        )
        .arg(
            Arg::new("attributes")
                .long("attributes")
                .help("Write the category values of every clump to this CSV file")
                .value_name("FILE")
                .required(false),
        )
        .arg(
            Arg::new("expected-clumps")
                .long("expected-clumps")
                .help("Fail when the number of clumps differs from this")
                .value_name("COUNT")
                .value_parser(value_parser!(usize))
                .required(false),
        )
        .arg(
            Arg::new("in-memory")
                .long("in-memory")
                .help("Load all bands into memory before clumping")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("no-thematic")
                .long("no-thematic")
                .help("Do not tag the output as a thematic layer")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("progress")
                .long("progress")
                .help("Show progress bars")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("in-place")
                .long("in-place")
                .help("Relabel the input file where it lies")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("geotransform")
                .long("geotransform")
                .help("Geotransform for converted band files (ox,pw,rr,oy,cr,ph)")
                .value_name("TRANSFORM")
                .required(false),
        )
        .get_matches();

    let level = level_for(matches.get_flag("verbose"));

    let disabled_logger;
    let logger: &Logger = match matches.get_one::<String>("log-file") {
        Some(log_file) => {
            match Logger::init_global_logger(log_file, level.to_level().unwrap_or(log::Level::Info)) {
                Ok(logger) => logger,
                Err(e) => {
                    eprintln!("Error setting up global logger: {}", e);
                    process::exit(1);
                }
            }
        }
        None => {
            env_logger::Builder::new()
                .filter_level(level)
                .parse_default_env()
                .init();
            disabled_logger = Logger::disabled();
            &disabled_logger
        }
    };

    let factory = RasterclumpCommandFactory::new();

    let command_result = factory.create_command(&matches, logger);
    match command_result {
        Ok(command) => {
            if let Err(e) = command.execute() {
                error!("Command execution error: {}", e);
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        },
        Err(e) => {
            error!("Failed to create command: {}", e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };
}
