//! Gridded raster layers and the sparse raster series
//!
//! Layers are regular lon/lat grids read from ESRI ASCII grid files and
//! keyed by an age label in Ma. A series is described by a JSON manifest so
//! the age labels are explicit rather than scraped from filenames.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// A single gridded scalar field at one reconstruction age
///
/// Values are stored in file order: row 0 is the northernmost row. The cell
/// registration is the usual lower-left-corner convention of the ASCII grid
/// format.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterLayer {
    /// Age label of this layer, Ma
    pub age_ma: f64,
    ncols: usize,
    nrows: usize,
    xllcorner: f64,
    yllcorner: f64,
    cellsize: f64,
    nodata: f64,
    values: Vec<f64>,
}

impl RasterLayer {
    /// Parse an ESRI ASCII grid
    pub fn parse_ascii_grid(text: &str, age_ma: f64) -> Result<Self> {
        let mut lines = text.lines();
        let mut header = |name: &str| -> Result<f64> {
            let line = lines
                .next()
                .with_context(|| format!("grid header truncated before {}", name))?;
            let mut parts = line.split_whitespace();
            let key = parts.next().unwrap_or("");
            if !key.eq_ignore_ascii_case(name) {
                bail!("expected grid header '{}', found '{}'", name, key);
            }
            parts
                .next()
                .with_context(|| format!("grid header '{}' has no value", name))?
                .parse::<f64>()
                .with_context(|| format!("grid header '{}' is not numeric", name))
        };

        let ncols = header("ncols")? as usize;
        let nrows = header("nrows")? as usize;
        let xllcorner = header("xllcorner")?;
        let yllcorner = header("yllcorner")?;
        let cellsize = header("cellsize")?;
        let nodata = header("NODATA_value")?;

        if ncols == 0 || nrows == 0 || cellsize <= 0.0 {
            bail!("degenerate grid: {}x{} cells of size {}", ncols, nrows, cellsize);
        }

        let mut values = Vec::with_capacity(ncols * nrows);
        for line in lines {
            for tok in line.split_whitespace() {
                let v = tok
                    .parse::<f64>()
                    .with_context(|| format!("grid cell '{}' is not numeric", tok))?;
                values.push(v);
            }
        }
        if values.len() != ncols * nrows {
            bail!(
                "grid body has {} cells, header promises {}",
                values.len(),
                ncols * nrows
            );
        }

        Ok(Self {
            age_ma,
            ncols,
            nrows,
            xllcorner,
            yllcorner,
            cellsize,
            nodata,
            values,
        })
    }

    /// Load from an `.asc` file
    pub fn load(path: &Path, age_ma: f64) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read raster: {}", path.display()))?;
        Self::parse_ascii_grid(&text, age_ma)
            .with_context(|| format!("Failed to parse raster: {}", path.display()))
    }

    /// Nearest-cell sample at a point.
    ///
    /// Longitudes are normalized into the grid's span by whole turns, so a
    /// [-180, 180) grid accepts 0-360 coordinates and vice versa. Returns
    /// `None` for points outside the grid or on nodata cells; a legitimate
    /// zero value is `Some(0.0)`.
    pub fn sample(&self, lng: f64, lat: f64) -> Option<f64> {
        if !lng.is_finite() || !lat.is_finite() {
            return None;
        }

        let width = self.ncols as f64 * self.cellsize;
        let mut x = lng;
        while x < self.xllcorner {
            x += 360.0;
        }
        while x >= self.xllcorner + width {
            x -= 360.0;
        }
        if x < self.xllcorner {
            // Grid narrower than a full turn and the point is outside it
            return None;
        }

        let height = self.nrows as f64 * self.cellsize;
        if lat < self.yllcorner || lat >= self.yllcorner + height {
            return None;
        }

        let col = ((x - self.xllcorner) / self.cellsize) as usize;
        let row_from_south = ((lat - self.yllcorner) / self.cellsize) as usize;
        let col = col.min(self.ncols - 1);
        let row_from_south = row_from_south.min(self.nrows - 1);
        let row = self.nrows - 1 - row_from_south;

        let v = self.values[row * self.ncols + col];
        if v.is_nan() || v == self.nodata {
            None
        } else {
            Some(v)
        }
    }

    pub fn dims(&self) -> (usize, usize) {
        (self.ncols, self.nrows)
    }
}

/// Manifest entry for one layer of a raster series
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerEntry {
    pub age_ma: f64,
    /// Grid file path, relative to the manifest
    pub path: String,
}

/// Manifest describing a sparse raster series
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesManifest {
    pub variable: String,
    pub layers: Vec<LayerEntry>,
}

/// A sparse, age-ordered set of raster layers for one variable
#[derive(Debug, Clone)]
pub struct RasterSeries {
    pub variable: String,
    /// Layers ordered by ascending age label
    layers: Vec<RasterLayer>,
}

impl RasterSeries {
    /// Load a series from its JSON manifest; layer paths are resolved
    /// relative to the manifest's directory.
    pub fn load(manifest_path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(manifest_path)
            .with_context(|| format!("Failed to read raster manifest: {}", manifest_path.display()))?;
        let manifest: SeriesManifest = serde_json::from_str(&text)
            .with_context(|| format!("Malformed raster manifest: {}", manifest_path.display()))?;

        if manifest.layers.is_empty() {
            bail!(
                "raster manifest {} declares no layers",
                manifest_path.display()
            );
        }

        let base = manifest_path.parent().unwrap_or_else(|| Path::new("."));
        let mut layers = Vec::with_capacity(manifest.layers.len());
        for entry in &manifest.layers {
            layers.push(RasterLayer::load(&base.join(&entry.path), entry.age_ma)?);
        }

        debug!(
            variable = %manifest.variable,
            layers = layers.len(),
            "loaded raster series"
        );
        Ok(Self::from_layers(manifest.variable, layers))
    }

    /// Build a series from in-memory layers (sorted by ascending age)
    pub fn from_layers(variable: impl Into<String>, mut layers: Vec<RasterLayer>) -> Self {
        layers.sort_by(|a, b| a.age_ma.total_cmp(&b.age_ma));
        Self {
            variable: variable.into(),
            layers,
        }
    }

    pub fn layers(&self) -> &[RasterLayer] {
        &self.layers
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Age labels, ascending
    pub fn ages(&self) -> Vec<f64> {
        self.layers.iter().map(|l| l.age_ma).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    // 4x2 global grid, 90 degree cells, row 0 = north
    const GRID: &str = "\
ncols 4
nrows 2
xllcorner -180.0
yllcorner -90.0
cellsize 90.0
NODATA_value -9999
1 2 -9999 4
5 6 0 8
";

    fn layer() -> RasterLayer {
        RasterLayer::parse_ascii_grid(GRID, 100.0).unwrap()
    }

    #[test]
    fn test_parse_dims() {
        let l = layer();
        assert_eq!(l.dims(), (4, 2));
        assert_eq!(l.age_ma, 100.0);
    }

    #[test]
    fn test_sample_nearest_cell() {
        let l = layer();
        // Northern band is lat [0, 90), southern band [-90, 0)
        assert_eq!(l.sample(-170.0, 80.0), Some(1.0)); // north row, first col
        assert_eq!(l.sample(130.0, 100.0), None); // above the grid
        assert_eq!(l.sample(-100.0, -50.0), Some(5.0)); // south row, first col
    }

    #[test]
    fn test_sample_nodata_and_zero() {
        let l = layer();
        // North row third column is nodata
        assert_eq!(l.sample(50.0, 10.0), None);
        // A stored zero is a value, not a gap
        assert_eq!(l.sample(50.0, -50.0), Some(0.0));
    }

    #[test]
    fn test_sample_longitude_wrap() {
        let l = layer();
        // 190 east == -170
        assert_eq!(l.sample(190.0, 80.0), l.sample(-170.0, 80.0));
        assert_eq!(l.sample(-530.0, 80.0), l.sample(-170.0, 80.0));
    }

    #[test]
    fn test_parse_cell_count_mismatch() {
        let bad = "\
ncols 2
nrows 2
xllcorner 0
yllcorner 0
cellsize 1
NODATA_value -9999
1 2 3
";
        let err = RasterLayer::parse_ascii_grid(bad, 0.0).unwrap_err();
        assert!(err.to_string().contains("3 cells"));
    }

    #[test]
    fn test_series_load_and_order() {
        let dir = TempDir::new().unwrap();
        let grid = "\
ncols 1
nrows 1
xllcorner -180
yllcorner -90
cellsize 180
NODATA_value -9999
5
";
        fs::write(dir.path().join("a.asc"), grid).unwrap();
        fs::write(dir.path().join("b.asc"), grid).unwrap();
        let manifest = r#"{
  "variable": "tos",
  "layers": [
    {"age_ma": 50.0, "path": "a.asc"},
    {"age_ma": 150.0, "path": "b.asc"}
  ]
}"#;
        let mpath = dir.path().join("series.json");
        fs::write(&mpath, manifest).unwrap();

        let series = RasterSeries::load(&mpath).unwrap();
        assert_eq!(series.variable, "tos");
        // Ascending age order regardless of manifest order
        assert_eq!(series.ages(), vec![50.0, 150.0]);
    }

    #[test]
    fn test_series_empty_manifest() {
        let dir = TempDir::new().unwrap();
        let mpath = dir.path().join("series.json");
        fs::write(&mpath, r#"{"variable": "tos", "layers": []}"#).unwrap();
        let err = RasterSeries::load(&mpath).unwrap_err();
        assert!(err.to_string().contains("no layers"));
    }
}
