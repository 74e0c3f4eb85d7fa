//! Point and polygon payloads with CSV serialization.

use std::path::Path;

use serde_json::{json, Value};

use super::{ObjectAdapter, ObjectError};

/// Column headers for point and polygon CSV files.
const XYZ_HEADER: [&str; 3] = ["X_UTME", "Y_UTMN", "Z_TVDSS"];
/// Extra polygon column identifying which polygon a vertex belongs to.
const POLY_ID_COLUMN: &str = "POLY_ID";

/// A single point in UTM easting/northing plus TVD.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    /// Easting.
    pub x: f64,
    /// Northing.
    pub y: f64,
    /// Vertical depth.
    pub z: f64,
}

impl Point {
    /// Shorthand constructor.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Point { x, y, z }
    }
}

fn xyz_bbox<'a>(points: impl Iterator<Item = &'a Point>) -> Option<Value> {
    let mut any = false;
    let mut min = [f64::INFINITY; 3];
    let mut max = [f64::NEG_INFINITY; 3];
    for p in points {
        any = true;
        for (i, v) in [p.x, p.y, p.z].into_iter().enumerate() {
            min[i] = min[i].min(v);
            max[i] = max[i].max(v);
        }
    }
    any.then(|| {
        json!({
            "xmin": min[0], "xmax": max[0],
            "ymin": min[1], "ymax": max[1],
            "zmin": min[2], "zmax": max[2],
        })
    })
}

/// An unordered set of points.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PointSet {
    /// Point set name, used as the export name when settings give none.
    pub name: String,
    /// The points.
    pub points: Vec<Point>,
}

impl PointSet {
    /// Build a point set.
    pub fn new(name: impl Into<String>, points: Vec<Point>) -> Self {
        PointSet {
            name: name.into(),
            points,
        }
    }
}

impl ObjectAdapter for PointSet {
    fn classname(&self) -> &str {
        "points"
    }

    fn efolder(&self) -> &str {
        "points"
    }

    fn extension(&self) -> &str {
        ".csv"
    }

    fn format(&self) -> &str {
        "csv"
    }

    fn name_hint(&self) -> Option<&str> {
        (!self.name.is_empty()).then_some(self.name.as_str())
    }

    fn bbox(&self) -> Option<Value> {
        xyz_bbox(self.points.iter())
    }

    fn spec(&self) -> Option<Value> {
        Some(json!({"size": self.points.len()}))
    }

    fn write_to(&self, path: &Path) -> Result<(), ObjectError> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(XYZ_HEADER)?;
        for p in &self.points {
            writer.write_record([
                p.x.to_string(),
                p.y.to_string(),
                p.z.to_string(),
            ])?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// A set of named polygons, each an ordered vertex list.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polygons {
    /// Polygons name, used as the export name when settings give none.
    pub name: String,
    /// The polygons, outer index is the polygon id.
    pub polygons: Vec<Vec<Point>>,
}

impl Polygons {
    /// Build a polygon set.
    pub fn new(name: impl Into<String>, polygons: Vec<Vec<Point>>) -> Self {
        Polygons {
            name: name.into(),
            polygons,
        }
    }

    fn vertex_count(&self) -> usize {
        self.polygons.iter().map(Vec::len).sum()
    }
}

impl ObjectAdapter for Polygons {
    fn classname(&self) -> &str {
        "polygons"
    }

    fn efolder(&self) -> &str {
        "polygons"
    }

    fn extension(&self) -> &str {
        ".csv"
    }

    fn format(&self) -> &str {
        "csv"
    }

    fn name_hint(&self) -> Option<&str> {
        (!self.name.is_empty()).then_some(self.name.as_str())
    }

    fn bbox(&self) -> Option<Value> {
        xyz_bbox(self.polygons.iter().flatten())
    }

    fn spec(&self) -> Option<Value> {
        Some(json!({
            "npolys": self.polygons.len(),
            "size": self.vertex_count(),
        }))
    }

    fn write_to(&self, path: &Path) -> Result<(), ObjectError> {
        let mut writer = csv::Writer::from_path(path)?;
        let mut header: Vec<&str> = XYZ_HEADER.to_vec();
        header.push(POLY_ID_COLUMN);
        writer.write_record(header)?;
        for (id, polygon) in self.polygons.iter().enumerate() {
            for p in polygon {
                writer.write_record([
                    p.x.to_string(),
                    p.y.to_string(),
                    p.z.to_string(),
                    id.to_string(),
                ])?;
            }
        }
        writer.flush()?;
        Ok(())
    }
}
