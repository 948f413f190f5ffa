use std::{
    fs::File,
    io::{BufReader, BufWriter},
    path::PathBuf,
};

use anyhow::{Context, Result};

use crate::{
    arff,
    map::MarkerIndex,
    ped,
    transcode::{self, TranscodeSummary},
};

/// File locations and relation name derived from a PLINK dataset base name.
#[derive(Clone, Debug)]
pub struct DatasetPaths {
    pub relation: String,
    pub map: PathBuf,
    pub ped: PathBuf,
    pub exemplars: PathBuf,
    pub arff: PathBuf,
}

impl DatasetPaths {
    /// Derive `<base>.map`, `<base>.ped`, `<base>.exemplars` and `<base>.arff`
    /// from a dataset base name, which may include a directory prefix.
    pub fn from_base(base: &str) -> Self {
        Self {
            relation: base.to_string(),
            map: PathBuf::from(format!("{base}.map")),
            ped: PathBuf::from(format!("{base}.ped")),
            exemplars: PathBuf::from(format!("{base}.exemplars")),
            arff: PathBuf::from(format!("{base}.arff")),
        }
    }
}

/// Configuration required to drive a conversion.
#[derive(Clone, Debug)]
pub struct ConversionConfig {
    pub primary: DatasetPaths,
    /// Optional second dataset transcoded through the primary schema so both
    /// ARFF outputs declare identical attributes. Its genotype columns must
    /// follow the primary map's marker order; its own `.map` file is ignored.
    pub validation: Option<DatasetPaths>,
}

/// Counters for one converted dataset.
#[derive(Clone, Debug)]
pub struct DatasetSummary {
    pub relation: String,
    pub rows_emitted: u64,
    pub missing_phenotype: u64,
}

/// End-of-run totals reported to the user.
#[derive(Clone, Debug)]
pub struct ConversionSummary {
    pub marker_count: usize,
    pub datasets: Vec<DatasetSummary>,
}

/// Convert a PLINK dataset (and, if configured, a validation dataset sharing
/// its schema) into ARFF.
///
/// Phase order is load-bearing: every transcoding pass mutates the shared
/// marker index, and the ARFF headers are only written once all passes have
/// returned, so each attribute's alphabet covers every genotype observed in
/// every dataset.
pub fn convert_dataset(config: &ConversionConfig) -> Result<ConversionSummary> {
    tracing::info!(
        map = %config.primary.map.display(),
        ped = %config.primary.ped.display(),
        validation = config.validation.as_ref().map(|v| v.relation.as_str()),
        "starting conversion",
    );

    let map_file = File::open(&config.primary.map)
        .with_context(|| format!("failed to open map file {}", config.primary.map.display()))?;
    let mut index = MarkerIndex::from_reader(BufReader::new(map_file))
        .with_context(|| format!("malformed map file {}", config.primary.map.display()))?;
    tracing::info!(markers = index.len(), "built marker index");

    let mut datasets = Vec::new();
    datasets.push(transcode_dataset(&config.primary, &mut index)?);
    if let Some(validation) = &config.validation {
        datasets.push(transcode_dataset(validation, &mut index)?);
    }

    emit_dataset(&config.primary, &index)?;
    if let Some(validation) = &config.validation {
        emit_dataset(validation, &index)?;
    }

    Ok(ConversionSummary {
        marker_count: index.len(),
        datasets,
    })
}

fn transcode_dataset(paths: &DatasetPaths, index: &mut MarkerIndex) -> Result<DatasetSummary> {
    let ped_file = File::open(&paths.ped)
        .with_context(|| format!("failed to open pedigree file {}", paths.ped.display()))?;
    let exemplars = File::create(&paths.exemplars).with_context(|| {
        format!(
            "failed to create exemplars file {}",
            paths.exemplars.display()
        )
    })?;

    let summary: TranscodeSummary = transcode::transcode(
        ped::Reader::new(BufReader::new(ped_file)),
        index,
        BufWriter::new(exemplars),
    )
    .with_context(|| format!("failed to transcode {}", paths.ped.display()))?;

    tracing::info!(
        rows = summary.rows_emitted,
        filtered = summary.missing_phenotype,
        exemplars = %paths.exemplars.display(),
        "transcoded pedigree",
    );

    Ok(DatasetSummary {
        relation: paths.relation.clone(),
        rows_emitted: summary.rows_emitted,
        missing_phenotype: summary.missing_phenotype,
    })
}

fn emit_dataset(paths: &DatasetPaths, index: &MarkerIndex) -> Result<()> {
    let exemplars = File::open(&paths.exemplars).with_context(|| {
        format!(
            "failed to open exemplars file {}",
            paths.exemplars.display()
        )
    })?;
    let out = File::create(&paths.arff)
        .with_context(|| format!("failed to create ARFF file {}", paths.arff.display()))?;

    arff::write_arff(
        BufWriter::new(out),
        &paths.relation,
        index,
        BufReader::new(exemplars),
    )
    .with_context(|| format!("failed to write ARFF file {}", paths.arff.display()))?;

    tracing::info!(arff = %paths.arff.display(), "wrote ARFF file");
    Ok(())
}
