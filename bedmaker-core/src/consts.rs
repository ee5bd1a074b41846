//! Tool names, sub-commands and file naming constants shared across bedmaker crates.

/// Name the pipeline registers itself under (flag files, logs).
pub const PIPELINE_NAME: &str = "bed_maker";

/// Default output folder for converted BED files.
pub const DEFAULT_OUTFOLDER: &str = "output";

/// Extension given to every produced target.
pub const BED_EXT: &str = ".bed";

// External executables

pub const MACS2: &str = "macs2";
pub const BIGWIG_TO_BEDGRAPH: &str = "bigWigToBedGraph";
pub const BIGBED_TO_BED: &str = "bigBedToBed";

// macs2 sub-commands

/// Narrow peak calling, used for transcription factor ChIP-Seq.
pub const BDG_PEAK_CALL: &str = "bdgpeakcall";

/// Broad region calling, used for histone modification ChIP-Seq.
pub const BDG_BROAD_CALL: &str = "bdgbroadcall";

// Streaming endpoints for piping bigWigToBedGraph into macs2

pub const DEV_STDOUT: &str = "/dev/stdout";
pub const DEV_STDIN: &str = "/dev/stdin";

// Environment variable overrides for tool locations

/// Overrides the `macs2` executable.
///
/// ```bash
/// export BEDMAKER_MACS2=/opt/macs2/bin/macs2
/// ```
pub const MACS2_ENV: &str = "BEDMAKER_MACS2";

/// Overrides the `bigWigToBedGraph` executable.
pub const BIGWIG_TO_BEDGRAPH_ENV: &str = "BEDMAKER_BIGWIGTOBEDGRAPH";

/// Overrides the `bigBedToBed` executable.
pub const BIGBED_TO_BED_ENV: &str = "BEDMAKER_BIGBEDTOBED";
