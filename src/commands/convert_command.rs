//! Format conversion command
//!
//! This module implements the command for converting images into band
//! files and label band files into images.

use std::path::PathBuf;

use clap::ArgMatches;
use log::info;

use crate::api::convert_file;
use crate::commands::command_traits::Command;
use crate::commands::single_input;
use crate::coordinate::GeoTransform;
use crate::raster::{RasterError, RasterResult};
use crate::utils::logger::Logger;

/// Command for converting between images and band files
pub struct ConvertCommand<'a> {
    /// Path to the input file
    input_file: PathBuf,
    /// Path to the output file
    output_file: PathBuf,
    /// No-data value declared on created band files
    no_data: Option<u32>,
    /// Geotransform declared on created band files
    transform: Option<GeoTransform>,
    /// Logger for recording operations
    logger: &'a Logger,
}

impl<'a> ConvertCommand<'a> {
    /// Create a new convert command
    ///
    /// # Arguments
    /// * `args` - CLI argument matches from clap
    /// * `logger` - Logger for recording operations
    ///
    /// # Returns
    /// A new ConvertCommand instance or an error
    pub fn new(args: &ArgMatches, logger: &'a Logger) -> RasterResult<Self> {
        let input_file = single_input(args)?;

        let output_file = args.get_one::<String>("output")
            .map(PathBuf::from)
            .ok_or_else(|| RasterError::GenericError("Missing output file path for conversion".to_string()))?;

        let transform = match args.get_one::<String>("geotransform") {
            Some(text) => Some(GeoTransform::from_string(text)?),
            None => None,
        };

        Ok(ConvertCommand {
            input_file,
            output_file,
            no_data: args.get_one::<u32>("no-data").copied(),
            transform,
            logger,
        })
    }
}

impl<'a> Command for ConvertCommand<'a> {
    fn execute(&self) -> RasterResult<()> {
        info!("Converting {} to {}", self.input_file.display(), self.output_file.display());

        let written = convert_file(
            &self.input_file,
            &self.output_file,
            self.no_data,
            self.transform,
            self.logger,
        )?;

        for path in written {
            println!("Wrote {}", path.display());
        }
        Ok(())
    }
}
