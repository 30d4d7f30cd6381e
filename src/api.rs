use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::config::ClumpConfig;
use crate::coordinate::GeoTransform;
use crate::raster::image_io::save_label_image;
use crate::raster::{
    is_band_file, open_bands, BandHeader, BandReader, BandWriter, MemoryBand, RasterError, RasterResult, RawBand,
};
use crate::segment::{
    label_range, relabel, relabel_in_place, AttributeSidecar, CategoryStack, ClumpCategoryTable, ClumpOptions,
    ClumpSummary, Clumper, NoData, Overlap, OverlapResolver, RelabelSummary, Similarity,
};
use crate::utils::logger::Logger;

/// Everything needed to clump a set of input files
#[derive(Debug, Clone)]
pub struct ClumpJob {
    /// Category rasters; every band of every input takes part
    pub inputs: Vec<PathBuf>,
    /// Label band file to create
    pub output: PathBuf,
    pub options: ClumpOptions,
    pub similarity: Similarity,
    /// Where to write the per-clump category table, if anywhere
    pub attributes: Option<PathBuf>,
    /// Load all bands into memory before clumping
    pub in_memory: bool,
}

impl ClumpJob {
    /// Job with default options: exact matching, no no-data, thematic output
    pub fn new(inputs: Vec<PathBuf>, output: PathBuf) -> Self {
        ClumpJob::from_config(inputs, output, &ClumpConfig::default())
    }

    /// Job taking its settings from a `[clump]` configuration table
    pub fn from_config(inputs: Vec<PathBuf>, output: PathBuf, config: &ClumpConfig) -> Self {
        ClumpJob {
            inputs,
            output,
            options: config.clump_options(),
            similarity: config.similarity(),
            attributes: config.attributes.clone(),
            in_memory: config.in_memory,
        }
    }
}

/// Main interface to the RasterClump library
pub struct RasterClump {
    logger: Logger,
}

impl RasterClump {
    /// Create a new RasterClump instance
    ///
    /// # Arguments
    /// * `log_file` - Optional path of a file receiving job reports
    ///
    /// # Returns
    /// A RasterClump instance or an error if the log file cannot be created
    pub fn new(log_file: Option<&str>) -> RasterResult<Self> {
        let logger = match log_file {
            Some(path) => Logger::new(path)?,
            None => Logger::disabled(),
        };
        Ok(RasterClump { logger })
    }

    /// Label every clump of the job's inputs into its output file
    pub fn clump(&self, job: &ClumpJob) -> RasterResult<ClumpSummary> {
        clump_files(job, &self.logger)
    }

    /// Compact the labels of a label file
    ///
    /// # Arguments
    /// * `input` - Label raster
    /// * `output` - Where to write the result; `None` rewrites `input` in place
    pub fn relabel(&self, input: &Path, output: Option<&Path>) -> RasterResult<RelabelSummary> {
        relabel_file(input, output, false, &self.logger)
    }

    /// Human-readable description of every band in a raster
    pub fn describe(&self, input: &Path) -> RasterResult<String> {
        describe_file(input)
    }

    /// Convert between images and band files
    pub fn convert(&self, input: &Path, output: &Path, no_data: Option<u32>, transform: Option<GeoTransform>)
        -> RasterResult<Vec<PathBuf>> {
        convert_file(input, output, no_data, transform, &self.logger)
    }
}

/// Clump the inputs of a job
///
/// Bands of several georeferenced inputs are aligned on their common
/// window first. Otherwise all bands must have the same dimensions. The
/// output file is fully written before a manifest mismatch is reported.
///
/// # Arguments
/// * `job` - Inputs, output and clumping options
/// * `logger` - Receives a report of the run
///
/// # Returns
/// The clump summary, or the first error encountered
pub fn clump_files(job: &ClumpJob, logger: &Logger) -> RasterResult<ClumpSummary> {
    if job.inputs.is_empty() {
        return Err(RasterError::GenericError("At least one input raster is required".to_string()));
    }
    for input in &job.inputs {
        if same_file(input, &job.output) {
            return Err(RasterError::GenericError(format!(
                "Output {} would overwrite input {}",
                job.output.display(),
                input.display()
            )));
        }
    }

    let mut bands = Vec::new();
    for input in &job.inputs {
        bands.extend(open_bands(input)?);
    }
    if bands.is_empty() {
        return Err(RasterError::GenericError("The inputs hold no bands".to_string()));
    }
    info!("Clumping {} band(s) from {} input(s)", bands.len(), job.inputs.len());

    if job.in_memory {
        debug!("Loading category bands into memory");
        bands = bands.into_iter()
            .map(|mut band| MemoryBand::load_from(&mut *band).map(|loaded| Box::new(loaded) as Box<dyn BandReader>))
            .collect::<RasterResult<Vec<_>>>()?;
    }

    let overlap = resolve_overlap(&bands)?;
    let (width, height, transform) = match &overlap {
        Some(overlap) => (overlap.width, overlap.height, Some(overlap.transform)),
        None => (bands[0].width(), bands[0].height(), bands[0].geo_transform()),
    };

    let header = BandHeader {
        no_data: (job.options.no_data != NoData::Ignore).then_some(0),
        transform,
        ..BandHeader::new(width, height)
    };

    let mut table = job.attributes.as_ref().map(|_| ClumpCategoryTable::new(bands.len()));
    let clumper = Clumper::new(job.options.clone());

    let outcome = {
        let layers: Vec<&mut dyn BandReader> = bands.iter_mut()
            .map(|band| &mut **band as &mut dyn BandReader)
            .collect();
        let stack = match &overlap {
            Some(overlap) => CategoryStack::overlapping(layers, overlap)?,
            None => CategoryStack::bands(layers)?,
        };
        let mut stack = stack.with_similarity(job.similarity);
        clumper.resolve_no_data(&stack)?;
        let sidecar = table.as_mut().map(|table| table as &mut dyn AttributeSidecar);

        if job.in_memory {
            let mut labels = MemoryBand::new(width, height);
            let outcome = clumper.clump(&mut stack, &mut labels, sidecar);
            if keeps_output(&outcome) {
                let mut output = RawBand::create_file(&job.output, header)?;
                copy_band(&mut labels, &mut output)?;
                output.finish()?;
            }
            outcome
        } else {
            let mut output = RawBand::create_file(&job.output, header)?;
            let outcome = clumper.clump(&mut stack, &mut output, sidecar);
            if keeps_output(&outcome) {
                output.finish()?;
            }
            outcome
        }
    };

    if let (Some(path), Some(table)) = (&job.attributes, &table) {
        if keeps_output(&outcome) {
            table.write_csv(path)?;
        }
    }

    let summary = outcome?;
    logger.log_section("Clump", &[
        ("inputs", job.inputs.iter().map(|p| p.display().to_string()).collect::<Vec<_>>().join(", ")),
        ("output", job.output.display().to_string()),
        ("grid", format!("{}x{}", width, height)),
        ("clumps", summary.clump_count.to_string()),
        ("labelled pixels", summary.labelled_pixels.to_string()),
        ("skipped no-data seeds", summary.skipped_seeds.to_string()),
    ])?;
    Ok(summary)
}

/// Align several georeferenced bands; `None` when they are used as they are
fn resolve_overlap(bands: &[Box<dyn BandReader>]) -> RasterResult<Option<Overlap>> {
    if bands.len() < 2 {
        return Ok(None);
    }

    let georeferenced = bands.iter().filter(|band| band.geo_transform().is_some()).count();
    if georeferenced == 0 {
        return Ok(None);
    }
    if georeferenced < bands.len() {
        warn!("Only {} of {} bands are georeferenced; using them without alignment", georeferenced, bands.len());
        return Ok(None);
    }

    let refs: Vec<&dyn BandReader> = bands.iter().map(|band| &**band).collect();
    OverlapResolver::resolve_bands(&refs).map(Some)
}

/// Whether a clumping outcome leaves a complete labelling behind
fn keeps_output(outcome: &RasterResult<ClumpSummary>) -> bool {
    matches!(outcome, Ok(_) | Err(RasterError::ManifestMismatch { .. }))
}

/// Copy pixels and metadata of one band into another of the same size
fn copy_band<R, W>(source: &mut R, target: &mut W) -> RasterResult<()>
where
    R: BandReader + ?Sized,
    W: BandWriter + ?Sized,
{
    let (width, height) = source.dimensions();
    let mut row_values = vec![0u32; width as usize];
    for row in 0..height {
        source.read_row(row, &mut row_values)?;
        target.write_row(row, &row_values)?;
    }
    for (key, value) in source.metadata_items() {
        target.set_metadata(&key, &value)?;
    }
    Ok(())
}

/// Compact the labels of a label file
///
/// # Arguments
/// * `input` - Label raster
/// * `output` - Band file or image to write; `None` or `input` itself rewrites `input`, which must be a band file
/// * `show_progress` - Draw progress bars
/// * `logger` - Receives a report of the run
pub fn relabel_file(input: &Path, output: Option<&Path>, show_progress: bool, logger: &Logger)
    -> RasterResult<RelabelSummary> {
    // Writing to the input itself is an in-place run
    let output = output.filter(|output| !same_file(input, output));

    let summary = match output {
        None => {
            if !is_band_file(input) {
                return Err(RasterError::GenericError(format!(
                    "In-place relabelling needs a band file, not {}",
                    input.display()
                )));
            }
            let mut band = RawBand::open_file_mut(input)?;
            let summary = relabel_in_place(&mut band, show_progress)?;
            band.finish()?;
            summary
        }
        Some(output) => {
            let mut source = single_band(open_bands(input)?, input)?;

            if is_band_file(output) {
                let mut target = RawBand::create_file(output, BandHeader::like(&*source))?;
                let summary = relabel(&mut *source, &mut target, show_progress)?;
                for (key, value) in source.metadata_items() {
                    target.set_metadata(&key, &value)?;
                }
                target.finish()?;
                summary
            } else {
                let mut target = MemoryBand::new(source.width(), source.height());
                let summary = relabel(&mut *source, &mut target, show_progress)?;
                save_label_image(&mut target, output)?;
                summary
            }
        }
    };

    logger.log_section("Relabel", &[
        ("input", input.display().to_string()),
        ("output", output.unwrap_or(input).display().to_string()),
        ("largest input label", summary.max_input_label.to_string()),
        ("clumps", summary.clump_count.to_string()),
    ])?;
    Ok(summary)
}

/// Describe every band of a raster: size, no-data, georeferencing, metadata and value range
pub fn describe_file(input: &Path) -> RasterResult<String> {
    let bands = open_bands(input)?;
    let mut result = format!("{}: {} band(s)\n", input.display(), bands.len());

    for (index, mut band) in bands.into_iter().enumerate() {
        result.push_str(&format!("\nBand {}\n", index + 1));
        result.push_str(&format!("  Dimensions: {}x{}\n", band.width(), band.height()));

        match band.no_data() {
            Some(value) => result.push_str(&format!("  No-data: {}\n", value)),
            None => result.push_str("  No-data: none\n"),
        }

        if let Some(transform) = band.geo_transform() {
            let extent = transform.extent(band.width(), band.height());
            result.push_str(&format!("  Geotransform: {}\n", transform));
            result.push_str(&format!(
                "  Extent: {}, {} - {}, {}\n",
                extent.min_x, extent.min_y, extent.max_x, extent.max_y
            ));
        }

        for (key, value) in band.metadata_items() {
            result.push_str(&format!("  Metadata {}: {}\n", key, value));
        }

        match label_range(&mut *band)? {
            Some((min, max)) => result.push_str(&format!("  Values: {} to {}\n", min, max)),
            None => result.push_str("  Values: none\n"),
        }
    }

    Ok(result)
}

/// Convert an image into band files, or a band file into an image
///
/// Every channel of a multi-channel image becomes its own band file, named
/// after `output` with a `_<n>` suffix.
///
/// # Arguments
/// * `input` - Source raster
/// * `output` - Target path; the extension decides the direction
/// * `no_data` - No-data value to declare on created band files
/// * `transform` - Geotransform to declare on created band files
/// * `logger` - Receives a report of the run
///
/// # Returns
/// The paths written
pub fn convert_file(
    input: &Path,
    output: &Path,
    no_data: Option<u32>,
    transform: Option<GeoTransform>,
    logger: &Logger,
) -> RasterResult<Vec<PathBuf>> {
    let mut bands = open_bands(input)?;

    let written = if is_band_file(output) {
        let band_count = bands.len();
        let mut written = Vec::with_capacity(band_count);

        for (index, band) in bands.iter_mut().enumerate() {
            let path = if band_count == 1 { output.to_path_buf() } else { numbered_path(output, index + 1) };

            let mut header = BandHeader::like(&**band);
            if no_data.is_some() {
                header.no_data = no_data;
            }
            if transform.is_some() {
                header.transform = transform;
            }

            let mut target = RawBand::create_file(&path, header)?;
            copy_band(&mut **band, &mut target)?;
            target.finish()?;
            debug!("Wrote band {} to {}", index + 1, path.display());
            written.push(path);
        }
        written
    } else {
        if no_data.is_some() || transform.is_some() {
            warn!("Images carry no no-data value or geotransform; ignoring them for {}", output.display());
        }
        let mut band = single_band(bands, input)?;
        save_label_image(&mut *band, output)?;
        vec![output.to_path_buf()]
    };

    logger.log_section("Convert", &[
        ("input", input.display().to_string()),
        ("outputs", written.iter().map(|p| p.display().to_string()).collect::<Vec<_>>().join(", ")),
    ])?;
    Ok(written)
}

/// The only band of a label raster
fn single_band(mut bands: Vec<Box<dyn BandReader>>, path: &Path) -> RasterResult<Box<dyn BandReader>> {
    if bands.len() != 1 {
        return Err(RasterError::GenericError(format!(
            "{} holds {} bands; a label raster has exactly one",
            path.display(),
            bands.len()
        )));
    }
    bands.pop().ok_or_else(|| RasterError::GenericError(format!("{} holds no band", path.display())))
}

/// Whether two paths name the same existing file
///
/// An output that does not exist yet never matches.
fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// `dir/name.ext` becomes `dir/name_<n>.ext`
fn numbered_path(path: &Path, number: usize) -> PathBuf {
    let stem = path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{}_{}.{}", stem, number, ext.to_string_lossy()),
        None => format!("{}_{}", stem, number),
    };
    path.with_file_name(name)
}
