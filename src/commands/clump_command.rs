//! Clumping command
//!
//! Labels the clumps of one or more category rasters into a band file.

use std::path::PathBuf;

use clap::ArgMatches;
use log::{debug, info};

use crate::api::{clump_files, ClumpJob};
use crate::commands::command_traits::Command;
use crate::commands::{input_paths, job_config};
use crate::raster::{RasterError, RasterResult};
use crate::utils::logger::Logger;

/// Command for clumping category rasters
pub struct ClumpCommand<'a> {
    /// Inputs, output and options, after command-line overrides
    job: ClumpJob,
    /// Logger for recording operations
    logger: &'a Logger,
}

impl<'a> ClumpCommand<'a> {
    /// Create a new clump command
    ///
    /// Settings come from the `--config` job file when given; flags on the
    /// command line override them.
    ///
    /// # Arguments
    /// * `args` - CLI argument matches from clap
    /// * `logger` - Logger for recording operations
    ///
    /// # Returns
    /// A new ClumpCommand instance or an error
    pub fn new(args: &ArgMatches, logger: &'a Logger) -> RasterResult<Self> {
        let inputs = input_paths(args)?;
        let output = args.get_one::<String>("output")
            .map(PathBuf::from)
            .ok_or_else(|| RasterError::GenericError("Missing output file path for clumping".to_string()))?;

        let mut config = job_config(args)?.clump;

        if let Some(&no_data) = args.get_one::<u32>("no-data") {
            config.no_data = Some(no_data);
            config.band_no_data = false;
        }
        if args.get_flag("band-no-data") {
            config.band_no_data = true;
            config.no_data = None;
        }
        if let Some(&tolerance) = args.get_one::<u32>("tolerance") {
            config.tolerance = Some(tolerance);
        }
        if let Some(&expected) = args.get_one::<usize>("expected-clumps") {
            config.expected_clumps = Some(expected);
        }
        if let Some(attributes) = args.get_one::<String>("attributes") {
            config.attributes = Some(PathBuf::from(attributes));
        }
        if args.get_flag("in-memory") {
            config.in_memory = true;
        }
        if args.get_flag("no-thematic") {
            config.thematic = false;
        }
        if args.get_flag("progress") {
            config.progress = true;
        }

        debug!("Clump settings: {:?}", config);
        Ok(ClumpCommand {
            job: ClumpJob::from_config(inputs, output, &config),
            logger,
        })
    }
}

impl<'a> Command for ClumpCommand<'a> {
    fn execute(&self) -> RasterResult<()> {
        let summary = clump_files(&self.job, self.logger)?;

        info!("Wrote {} clump(s) to {}", summary.clump_count, self.job.output.display());
        println!("{} clump(s) written to {}", summary.clump_count, self.job.output.display());
        if let Some(attributes) = &self.job.attributes {
            println!("Clump categories written to {}", attributes.display());
        }
        Ok(())
    }
}
