//! CLI command implementations
//!
//! This module contains implementations of various commands
//! supported by the CLI application using the Command pattern.

pub mod command_traits;
pub mod clump_command;
pub mod relabel_command;
pub mod info_command;
pub mod convert_command;

pub use command_traits::{Command, CommandFactory};
pub use clump_command::ClumpCommand;
pub use relabel_command::RelabelCommand;
pub use info_command::InfoCommand;
pub use convert_command::ConvertCommand;

use std::path::PathBuf;

use clap::ArgMatches;
use crate::config::JobConfig;
use crate::utils::logger::Logger;
use crate::raster::{RasterError, RasterResult};

/// Factory for creating command instances based on CLI arguments
///
/// This factory examines the command-line arguments and creates
/// the appropriate command instance for execution.
pub struct RasterclumpCommandFactory;

impl RasterclumpCommandFactory {
    /// Create a new factory instance
    pub fn new() -> Self {
        RasterclumpCommandFactory
    }
}

impl Default for RasterclumpCommandFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> CommandFactory<'a> for RasterclumpCommandFactory {
    fn create_command(&self, args: &ArgMatches, logger: &'a Logger) -> RasterResult<Box<dyn Command + 'a>> {
        // Determine which command to run based on args
        if args.get_flag("relabel") {
            Ok(Box::new(RelabelCommand::new(args, logger)?))
        } else if args.get_flag("info") {
            Ok(Box::new(InfoCommand::new(args, logger)?))
        } else if args.get_flag("convert") {
            Ok(Box::new(ConvertCommand::new(args, logger)?))
        } else {
            // Default to clumping
            Ok(Box::new(ClumpCommand::new(args, logger)?))
        }
    }
}

/// All positional input paths
pub(crate) fn input_paths(args: &ArgMatches) -> RasterResult<Vec<PathBuf>> {
    let inputs: Vec<PathBuf> = args.get_many::<String>("input")
        .map(|values| values.map(PathBuf::from).collect())
        .unwrap_or_default();

    if inputs.is_empty() {
        return Err(RasterError::GenericError("Missing input file".to_string()));
    }
    Ok(inputs)
}

/// The single positional input path of commands that take exactly one
pub(crate) fn single_input(args: &ArgMatches) -> RasterResult<PathBuf> {
    let mut inputs = input_paths(args)?;
    if inputs.len() > 1 {
        return Err(RasterError::GenericError(format!(
            "Expected one input file, got {}",
            inputs.len()
        )));
    }
    inputs.pop().ok_or_else(|| RasterError::GenericError("Missing input file".to_string()))
}

/// Job file named by `--config`, or the defaults
pub(crate) fn job_config(args: &ArgMatches) -> RasterResult<JobConfig> {
    match args.get_one::<String>("config") {
        Some(path) => JobConfig::from_file(path),
        None => Ok(JobConfig::default()),
    }
}
