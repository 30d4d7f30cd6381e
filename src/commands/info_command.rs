//! Raster description command

use std::path::PathBuf;

use clap::ArgMatches;
use log::debug;

use crate::api::describe_file;
use crate::commands::command_traits::Command;
use crate::commands::input_paths;
use crate::raster::RasterResult;
use crate::utils::logger::Logger;

/// Command for describing rasters
pub struct InfoCommand<'a> {
    input_files: Vec<PathBuf>,
    /// Logger for recording operations
    logger: &'a Logger,
}

impl<'a> InfoCommand<'a> {
    pub fn new(args: &ArgMatches, logger: &'a Logger) -> RasterResult<Self> {
        Ok(InfoCommand {
            input_files: input_paths(args)?,
            logger,
        })
    }
}

impl<'a> Command for InfoCommand<'a> {
    fn execute(&self) -> RasterResult<()> {
        for input in &self.input_files {
            debug!("Describing {}", input.display());
            let description = describe_file(input)?;
            print!("{}", description);
            self.logger.log(description.trim_end())?;
        }
        Ok(())
    }
}
