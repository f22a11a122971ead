//! File-level plumbing around the schedulers.
//!
//! Reads the tract and zip-code GeoJSON collections for a data set, and
//! writes the per-zone totals back out as CSV.
//!
//! # Layout
//!
//! ```text
//! <root>/tests/<set>/<set>_tracts.geojson    census tracts (P1_001N)
//! <root>/tests/<set>/<set>_zipcode.geojson   zip-code areas (ZCTA5CE20)
//! <root>/output/<set>/<set>.csv              ZIPCode,P1_001N
//! ```

pub mod load;
pub mod output;

use std::path::{Path, PathBuf};

pub use load::{LoadError, load_dataset, load_tracts, load_zones};
pub use output::write_csv;

/// Input and output locations for one data set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataPaths {
    pub tracts: PathBuf,
    pub zones: PathBuf,
    pub output: PathBuf,
}

impl DataPaths {
    /// Paths for data set `set` under `root`.
    #[must_use]
    pub fn new(root: &Path, set: &str) -> Self {
        let inputs = root.join("tests").join(set);
        Self {
            tracts: inputs.join(format!("{set}_tracts.geojson")),
            zones: inputs.join(format!("{set}_zipcode.geojson")),
            output: root.join("output").join(set).join(format!("{set}.csv")),
        }
    }
}
