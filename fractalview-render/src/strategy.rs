use rayon::prelude::*;

use fractalview_core::Color;

use crate::error::RenderError;

/// How the rows of a pass are executed. Chosen once per session and
/// dispatched once per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComputeMode {
    /// Rows in program order on the calling thread.
    #[default]
    Sequential,
    /// Disjoint row bands forked across the rayon pool and joined before
    /// the frame completes.
    DataParallel,
    /// Reserved for accelerator dispatch. Not implemented.
    Offloaded,
}

impl ComputeMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Sequential => "cpu",
            Self::DataParallel => "cpu-concurrent",
            Self::Offloaded => "gpu",
        }
    }

    pub fn is_supported(self) -> bool {
        !matches!(self, Self::Offloaded)
    }
}

impl std::fmt::Display for ComputeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for ComputeMode {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cpu" => Ok(Self::Sequential),
            "cpu-concurrent" | "cpu-concurent" => Ok(Self::DataParallel),
            "gpu" => Ok(Self::Offloaded),
            other => Err(RenderError::UnknownComputeMode(other.to_string())),
        }
    }
}

/// Run `exec_band` over consecutive `band_len`-sized chunks of `region`.
///
/// The closure receives the band index and exclusive access to that band;
/// the last band may be shorter. Bands never overlap, so the parallel path
/// needs no synchronization beyond the final join.
pub(crate) fn for_each_band<F>(
    mode: ComputeMode,
    region: &mut [Color],
    band_len: usize,
    exec_band: F,
) -> crate::Result<()>
where
    F: Fn(usize, &mut [Color]) + Send + Sync,
{
    match mode {
        ComputeMode::Sequential => region
            .chunks_mut(band_len)
            .enumerate()
            .for_each(|(i, band)| exec_band(i, band)),
        ComputeMode::DataParallel => region
            .par_chunks_mut(band_len)
            .enumerate()
            .for_each(|(i, band)| exec_band(i, band)),
        ComputeMode::Offloaded => return Err(RenderError::UnsupportedComputeMode(mode)),
    }
    Ok(())
}
