//! # Content Classification Module
//!
//! Every exported object declares *what its data represents*: a depth
//! surface, a fluid contact, a seismic attribute and so on. The content
//! ends up in the metadata `data` block and drives downstream indexing.
//!
//! [`Content`] is a closed enum. Kinds that need extra qualification
//! (seismic, fluid contact, field outline, field region, property) carry a
//! typed detail struct in their variant, so a payload can never end up
//! attached to the wrong kind and unknown detail fields are rejected at
//! the boundary. Dynamic input (CLI flags, YAML) goes through
//! [`Content::parse`], which reports unknown kinds against the full list
//! of valid ones and enforces that payload-requiring kinds get one.

mod detail;

#[cfg(test)]
mod tests;

pub use detail::{
    FieldOutlineDetail, FieldRegionDetail, FluidContactDetail, PropertyDetail, SeismicDetail,
};

use log::warn;
use serde_json::Value;
use thiserror::Error;

/// All recognized content kind names, in the order reported to users.
pub const VALID_CONTENTS: &[&str] = &[
    "depth",
    "facies_thickness",
    "fault_lines",
    "field_outline",
    "field_region",
    "fluid_contact",
    "inplace_volumes",
    "khproduct",
    "lift_curves",
    "parameters",
    "pinchout",
    "property",
    "pvt",
    "relperm",
    "rft",
    "seismic",
    "subcrop",
    "thickness",
    "time",
    "timeseries",
    "transmissibilities",
    "velocity",
    "volumes",
    "wellpicks",
];

/// Errors from content classification.
#[derive(Error, Debug)]
pub enum ContentError {
    /// The kind is not in the recognized taxonomy.
    #[error("Invalid content: <{given}>! Valid content: {valid}")]
    InvalidKind {
        /// The rejected kind name.
        given: String,
        /// Comma-separated list of valid kind names.
        valid: String,
    },

    /// A kind that needs qualifying detail was given bare.
    #[error("content {0} requires additional input")]
    RequiresInput(String),

    /// The detail payload is not a mapping.
    #[error("Incorrectly formatted content: the payload of <{0}> must be a mapping")]
    IncorrectlyFormatted(String),

    /// The kind takes no detail, but one was given.
    #[error("Content <{0}> takes no additional input")]
    UnexpectedDetail(String),

    /// The detail payload failed type or field validation.
    #[error(
        "The field {kind} has one or more errors that makes it impossible to create \
         valid content. The data will still be exported but no metadata will be made. \
         You are strongly encouraged to correct your input. Detailed information: {source}"
    )]
    InvalidDetail {
        /// The kind whose detail failed.
        kind: String,
        /// The underlying deserialization failure.
        #[source]
        source: serde_json::Error,
    },

    /// Both the deprecated `offset` and its replacement were given.
    #[error("Seismic content has both 'offset' and 'stacking_offset'; use only 'stacking_offset'")]
    OffsetConflict,
}

/// What the exported data represents.
///
/// `Unset` is legal but discouraged; the metadata assembler warns when it
/// sees it. Variants carrying a detail struct serialize that detail into
/// the metadata `data` block under the kind's own key.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Content {
    /// No content was declared.
    #[default]
    Unset,
    /// Depth surface or depth-converted data.
    Depth,
    /// Facies thickness.
    FaciesThickness,
    /// Fault line geometry.
    FaultLines,
    /// Field outline polygon, qualified by the bounding contact.
    FieldOutline(FieldOutlineDetail),
    /// Field region polygon, qualified by a region id.
    FieldRegion(FieldRegionDetail),
    /// Fluid contact surface, qualified by the contact kind.
    FluidContact(FluidContactDetail),
    /// In-place volume table.
    InplaceVolumes,
    /// Permeability-thickness product.
    Khproduct,
    /// Lift curve table.
    LiftCurves,
    /// Parameter listing.
    Parameters,
    /// Pinchout geometry.
    Pinchout,
    /// Generic grid or surface property, optionally qualified.
    Property(Option<PropertyDetail>),
    /// PVT table.
    Pvt,
    /// Relative permeability table.
    Relperm,
    /// RFT data.
    Rft,
    /// Seismic attribute, qualified by acquisition and processing detail.
    Seismic(SeismicDetail),
    /// Subcrop geometry.
    Subcrop,
    /// Isochore or other thickness data.
    Thickness,
    /// Time surface or time-domain data.
    Time,
    /// Time series data.
    Timeseries,
    /// Transmissibility data.
    Transmissibilities,
    /// Velocity data.
    Velocity,
    /// Volumetric table.
    Volumes,
    /// Well pick data.
    Wellpicks,
}

impl Content {
    /// The kind name as stored in `data.content`.
    pub fn kind_str(&self) -> &'static str {
        match self {
            Content::Unset => "unset",
            Content::Depth => "depth",
            Content::FaciesThickness => "facies_thickness",
            Content::FaultLines => "fault_lines",
            Content::FieldOutline(_) => "field_outline",
            Content::FieldRegion(_) => "field_region",
            Content::FluidContact(_) => "fluid_contact",
            Content::InplaceVolumes => "inplace_volumes",
            Content::Khproduct => "khproduct",
            Content::LiftCurves => "lift_curves",
            Content::Parameters => "parameters",
            Content::Pinchout => "pinchout",
            Content::Property(_) => "property",
            Content::Pvt => "pvt",
            Content::Relperm => "relperm",
            Content::Rft => "rft",
            Content::Seismic(_) => "seismic",
            Content::Subcrop => "subcrop",
            Content::Thickness => "thickness",
            Content::Time => "time",
            Content::Timeseries => "timeseries",
            Content::Transmissibilities => "transmissibilities",
            Content::Velocity => "velocity",
            Content::Volumes => "volumes",
            Content::Wellpicks => "wellpicks",
        }
    }

    /// True when no content was declared.
    pub fn is_unset(&self) -> bool {
        matches!(self, Content::Unset)
    }

    /// The qualifying detail as a JSON value, when present and non-empty.
    ///
    /// The metadata assembler stores this under `data.<kind>`.
    pub fn detail_value(&self) -> Option<Value> {
        let value = match self {
            Content::FieldOutline(d) => serde_json::to_value(d).ok()?,
            Content::FieldRegion(d) => serde_json::to_value(d).ok()?,
            Content::FluidContact(d) => serde_json::to_value(d).ok()?,
            Content::Property(Some(d)) => serde_json::to_value(d).ok()?,
            Content::Seismic(d) => serde_json::to_value(d).ok()?,
            _ => return None,
        };
        match &value {
            Value::Object(map) if map.is_empty() => None,
            _ => Some(value),
        }
    }

    /// Classify dynamic input: a kind name plus an optional JSON detail.
    ///
    /// This is the boundary used by the CLI and by YAML-borne settings.
    /// Typed callers construct [`Content`] variants directly instead.
    pub fn parse(kind: &str, detail: Option<&Value>) -> Result<Self, ContentError> {
        if !VALID_CONTENTS.contains(&kind) {
            return Err(ContentError::InvalidKind {
                given: kind.to_string(),
                valid: VALID_CONTENTS.join(", "),
            });
        }

        let detail = match detail {
            Some(Value::Object(map)) if map.is_empty() => None,
            Some(value) if !value.is_object() => {
                return Err(ContentError::IncorrectlyFormatted(kind.to_string()));
            }
            other => other,
        };

        match kind {
            "seismic" => {
                let value = detail
                    .ok_or_else(|| ContentError::RequiresInput(kind.to_string()))?
                    .clone();
                Ok(Content::Seismic(parse_seismic(value)?))
            }
            "fluid_contact" => {
                let value = detail.ok_or_else(|| ContentError::RequiresInput(kind.to_string()))?;
                Ok(Content::FluidContact(parse_detail(kind, value)?))
            }
            "field_outline" => {
                let value = detail.ok_or_else(|| ContentError::RequiresInput(kind.to_string()))?;
                Ok(Content::FieldOutline(parse_detail(kind, value)?))
            }
            "field_region" => {
                let value = detail.ok_or_else(|| ContentError::RequiresInput(kind.to_string()))?;
                Ok(Content::FieldRegion(parse_detail(kind, value)?))
            }
            "property" => match detail {
                Some(value) => Ok(Content::Property(Some(parse_detail(kind, value)?))),
                None => {
                    warn!(
                        "Content 'property' is given without further detail. This will be \
                         disallowed in the future, add e.g. {{is_discrete: false}}"
                    );
                    Ok(Content::Property(None))
                }
            },
            plain => {
                if detail.is_some() {
                    return Err(ContentError::UnexpectedDetail(plain.to_string()));
                }
                Ok(plain_content(plain))
            }
        }
    }
}

fn parse_detail<T: serde::de::DeserializeOwned>(
    kind: &str,
    value: &Value,
) -> Result<T, ContentError> {
    serde_json::from_value(value.clone()).map_err(|source| ContentError::InvalidDetail {
        kind: kind.to_string(),
        source,
    })
}

/// Seismic detail with the deprecated `offset` key mapped to
/// `stacking_offset`, with a deprecation warning.
fn parse_seismic(mut value: Value) -> Result<SeismicDetail, ContentError> {
    if let Value::Object(map) = &mut value {
        if let Some(offset) = map.remove("offset") {
            warn!("seismic.offset is deprecated, use seismic.stacking_offset");
            if map.contains_key("stacking_offset") {
                return Err(ContentError::OffsetConflict);
            }
            map.insert("stacking_offset".to_string(), offset);
        }
    }
    parse_detail("seismic", &value)
}

fn plain_content(kind: &str) -> Content {
    match kind {
        "depth" => Content::Depth,
        "facies_thickness" => Content::FaciesThickness,
        "fault_lines" => Content::FaultLines,
        "inplace_volumes" => Content::InplaceVolumes,
        "khproduct" => Content::Khproduct,
        "lift_curves" => Content::LiftCurves,
        "parameters" => Content::Parameters,
        "pinchout" => Content::Pinchout,
        "pvt" => Content::Pvt,
        "relperm" => Content::Relperm,
        "rft" => Content::Rft,
        "subcrop" => Content::Subcrop,
        "thickness" => Content::Thickness,
        "time" => Content::Time,
        "timeseries" => Content::Timeseries,
        "transmissibilities" => Content::Transmissibilities,
        "velocity" => Content::Velocity,
        "volumes" => Content::Volumes,
        "wellpicks" => Content::Wellpicks,
        // Callers check VALID_CONTENTS membership first.
        _ => Content::Unset,
    }
}
