//! Regular (equidistant) 2D surfaces with Irap ASCII serialization.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde_json::{json, Value};

use super::{ObjectAdapter, ObjectError};

/// Undefined-node marker in Irap ASCII files.
const IRAP_UNDEF: f64 = 9999900.0;
/// Magic first field of an Irap ASCII header.
const IRAP_MAGIC: i32 = -996;

/// A regular surface: an equidistant grid of z-values.
///
/// Values are stored row-major with the column index fastest, `f64::NAN`
/// marking undefined nodes. Rotation is degrees anticlockwise around the
/// origin node.
#[derive(Debug, Clone, PartialEq)]
pub struct RegularSurface {
    /// Surface name, used as the export name when settings give none.
    pub name: String,
    /// Number of columns.
    pub ncol: usize,
    /// Number of rows.
    pub nrow: usize,
    /// X coordinate of the origin node.
    pub xori: f64,
    /// Y coordinate of the origin node.
    pub yori: f64,
    /// Column spacing.
    pub xinc: f64,
    /// Row spacing.
    pub yinc: f64,
    /// Grid rotation in degrees anticlockwise.
    pub rotation: f64,
    /// Node values, `ncol * nrow` entries, NaN for undefined.
    pub values: Vec<f64>,
}

impl RegularSurface {
    /// Build a surface, checking that the value count matches the grid.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: impl Into<String>,
        ncol: usize,
        nrow: usize,
        xori: f64,
        yori: f64,
        xinc: f64,
        yinc: f64,
        rotation: f64,
        values: Vec<f64>,
    ) -> Result<Self, ObjectError> {
        if values.len() != ncol * nrow {
            return Err(ObjectError::DimensionMismatch {
                expected: ncol * nrow,
                actual: values.len(),
            });
        }
        Ok(RegularSurface {
            name: name.into(),
            ncol,
            nrow,
            xori,
            yori,
            xinc,
            yinc,
            rotation,
            values,
        })
    }

    /// Corner coordinates of the (possibly rotated) grid.
    fn corners(&self) -> [(f64, f64); 4] {
        let angle = self.rotation.to_radians();
        let (sin, cos) = angle.sin_cos();
        let xlen = self.xinc * (self.ncol.saturating_sub(1)) as f64;
        let ylen = self.yinc * (self.nrow.saturating_sub(1)) as f64;
        let corner = |dx: f64, dy: f64| {
            (
                self.xori + dx * cos - dy * sin,
                self.yori + dx * sin + dy * cos,
            )
        };
        [
            corner(0.0, 0.0),
            corner(xlen, 0.0),
            corner(0.0, ylen),
            corner(xlen, ylen),
        ]
    }

    fn z_range(&self) -> Option<(f64, f64)> {
        let mut range: Option<(f64, f64)> = None;
        for v in self.values.iter().copied().filter(|v| v.is_finite()) {
            range = Some(match range {
                None => (v, v),
                Some((lo, hi)) => (lo.min(v), hi.max(v)),
            });
        }
        range
    }
}

impl ObjectAdapter for RegularSurface {
    fn classname(&self) -> &str {
        "surface"
    }

    fn efolder(&self) -> &str {
        "maps"
    }

    fn extension(&self) -> &str {
        ".gri"
    }

    fn format(&self) -> &str {
        "irap_ascii"
    }

    fn layout(&self) -> Option<&str> {
        Some("regular")
    }

    fn name_hint(&self) -> Option<&str> {
        (!self.name.is_empty()).then_some(self.name.as_str())
    }

    /// Bounding box over the grid corners; zmin/zmax are left out when
    /// the surface has no finite values.
    fn bbox(&self) -> Option<Value> {
        let corners = self.corners();
        let xmin = corners.iter().map(|c| c.0).fold(f64::INFINITY, f64::min);
        let xmax = corners.iter().map(|c| c.0).fold(f64::NEG_INFINITY, f64::max);
        let ymin = corners.iter().map(|c| c.1).fold(f64::INFINITY, f64::min);
        let ymax = corners.iter().map(|c| c.1).fold(f64::NEG_INFINITY, f64::max);

        let mut bbox = json!({
            "xmin": xmin,
            "xmax": xmax,
            "ymin": ymin,
            "ymax": ymax,
        });
        if let Some((zmin, zmax)) = self.z_range() {
            bbox["zmin"] = json!(zmin);
            bbox["zmax"] = json!(zmax);
        }
        Some(bbox)
    }

    fn spec(&self) -> Option<Value> {
        Some(json!({
            "ncol": self.ncol,
            "nrow": self.nrow,
            "xori": self.xori,
            "yori": self.yori,
            "xinc": self.xinc,
            "yinc": self.yinc,
            "rotation": self.rotation,
            "undef": IRAP_UNDEF,
        }))
    }

    fn write_to(&self, path: &Path) -> Result<(), ObjectError> {
        let file = File::create(path)?;
        let mut out = BufWriter::new(file);

        let xmax = self.xori + self.xinc * (self.ncol.saturating_sub(1)) as f64;
        let ymax = self.yori + self.yinc * (self.nrow.saturating_sub(1)) as f64;

        writeln!(out, "{} {} {:.6} {:.6}", IRAP_MAGIC, self.nrow, self.xinc, self.yinc)?;
        writeln!(out, "{:.6} {:.6} {:.6} {:.6}", self.xori, xmax, self.yori, ymax)?;
        writeln!(out, "{} {:.6} {:.6} {:.6}", self.ncol, self.rotation, self.xori, self.yori)?;
        writeln!(out, "0 0 0 0 0 0 0")?;

        for (i, value) in self.values.iter().enumerate() {
            let v = if value.is_finite() { *value } else { IRAP_UNDEF };
            write!(out, "{v:.6}")?;
            if (i + 1) % 6 == 0 || i + 1 == self.values.len() {
                writeln!(out)?;
            } else {
                write!(out, " ")?;
            }
        }
        out.flush()?;
        Ok(())
    }
}
