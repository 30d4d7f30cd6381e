//! Relabelling command
//!
//! Compacts the labels of a label raster, either into a new file or in place.

use std::path::PathBuf;

use clap::ArgMatches;

use crate::api::relabel_file;
use crate::commands::command_traits::Command;
use crate::commands::{job_config, single_input};
use crate::raster::{RasterError, RasterResult};
use crate::utils::logger::Logger;

/// Command for compacting labels
pub struct RelabelCommand<'a> {
    input_file: PathBuf,
    /// Target file; `None` rewrites the input
    output_file: Option<PathBuf>,
    show_progress: bool,
    /// Logger for recording operations
    logger: &'a Logger,
}

impl<'a> RelabelCommand<'a> {
    /// Create a new relabel command
    ///
    /// Exactly one of `--output` and `--in-place` (or `in_place` in the job
    /// file) must say where the result goes.
    pub fn new(args: &ArgMatches, logger: &'a Logger) -> RasterResult<Self> {
        let input_file = single_input(args)?;
        let output_file = args.get_one::<String>("output").map(PathBuf::from);

        let config = job_config(args)?;
        let in_place = args.get_flag("in-place") || config.relabel.in_place;

        match (&output_file, in_place) {
            (Some(_), true) => {
                return Err(RasterError::GenericError(
                    "Give either an output file or --in-place, not both".to_string(),
                ))
            }
            (None, false) => {
                return Err(RasterError::GenericError(
                    "Missing output file path for relabelling; use --output or --in-place".to_string(),
                ))
            }
            _ => {}
        }

        Ok(RelabelCommand {
            input_file,
            output_file,
            show_progress: args.get_flag("progress") || config.clump.progress,
            logger,
        })
    }
}

impl<'a> Command for RelabelCommand<'a> {
    fn execute(&self) -> RasterResult<()> {
        let summary = relabel_file(
            &self.input_file,
            self.output_file.as_deref(),
            self.show_progress,
            self.logger,
        )?;

        let target = self.output_file.as_ref().unwrap_or(&self.input_file);
        println!(
            "Relabelled {} clump(s) (largest input label {}) into {}",
            summary.clump_count,
            summary.max_input_label,
            target.display()
        );
        Ok(())
    }
}
