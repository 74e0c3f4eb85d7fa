//! Typed detail payloads for content kinds that need qualification.

use serde::{Deserialize, Serialize};

/// Detail for seismic content: what attribute, from which processing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeismicDetail {
    /// Seismic attribute, e.g. `amplitude`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
    /// Calculation applied over the window, e.g. `mean`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calculation: Option<String>,
    /// Vertical extraction window size.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zrange: Option<f64>,
    /// Lateral filter size applied during processing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_size: Option<f64>,
    /// Scaling factor applied to the cube.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scaling_factor: Option<f64>,
    /// Offset stack description, e.g. `0-15`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stacking_offset: Option<String>,
}

/// Detail for generic property content.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PropertyDetail {
    /// Property attribute name, e.g. `porosity`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
    /// Whether the property is discrete (facies, regions) rather than
    /// continuous.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_discrete: Option<bool>,
}

/// Detail for fluid contact content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FluidContactDetail {
    /// Contact kind, e.g. `owc`, `goc`, `fwl`.
    pub contact: String,
    /// Whether the contact surface is truncated against other surfaces.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub truncated: Option<bool>,
}

/// Detail for field outline content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldOutlineDetail {
    /// The contact the outline is drawn against, e.g. `goc`.
    pub contact: String,
}

/// Detail for field region content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldRegionDetail {
    /// Region identifier.
    pub id: i64,
}
