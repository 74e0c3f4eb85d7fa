//! Assembly of the metadata document for one export.
//!
//! All validation happens before this step: content and context are
//! resolved, the destination exists, and the configuration is known to
//! be valid. Assembly itself only composes blocks.

use std::collections::BTreeMap;

use log::warn;

use crate::config::{Classification, GlobalConfig};
use crate::context::FmuContext;
use crate::metadata::{
    AccessBlock, ContextBlock, DataBlock, DisplayBlock, ExportDocument, FileBlock, FmuBlock,
    IterationBlock, PreprocessedInfo, RealizationBlock, SsdlBlock, TimeBlock, TimeStamp,
    WorkflowBlock,
};
use crate::objects::ObjectAdapter;
use crate::paths::Destination;

use super::facts::FmuFacts;
use super::settings::{ExportSettings, TimePoint};

/// Everything the document is composed from.
pub(crate) struct DocumentParts<'a> {
    /// The object being exported.
    pub obj: &'a dyn ObjectAdapter,
    /// Merged settings snapshot for this call.
    pub settings: &'a ExportSettings,
    /// Resolved run context.
    pub context: FmuContext,
    /// Validated global configuration.
    pub config: &'a GlobalConfig,
    /// FMU provenance, when the run has a case root.
    pub facts: Option<&'a FmuFacts>,
    /// Primary destination.
    pub destination: &'a Destination,
    /// Secondary symlink destination, when the context produces one.
    pub symlink: Option<&'a Destination>,
    /// User id recorded in the tracklog.
    pub user: &'a str,
    /// Checksum of the exported bytes, when computed.
    pub checksum: Option<String>,
    /// Prior document when re-exporting a preprocessed file.
    pub prior: Option<&'a ExportDocument>,
}

/// Compose the complete metadata document.
pub(crate) fn assemble_document(parts: DocumentParts<'_>) -> ExportDocument {
    let settings = parts.settings;

    let raw_name = if settings.name.is_empty() {
        parts.obj.name_hint().unwrap_or_default().to_string()
    } else {
        settings.name.clone()
    };
    let (name, stratigraphic, alias) = resolve_stratigraphy(&raw_name, parts.config);

    let file = FileBlock {
        relative_path: parts.destination.relative_path.clone(),
        absolute_path: parts.destination.absolute_path.clone(),
        checksum_md5: parts.checksum.clone(),
        relative_path_symlink: parts.symlink.map(|d| d.relative_path.clone()),
        absolute_path_symlink: parts.symlink.map(|d| d.absolute_path.clone()),
    };

    let data = match parts.prior {
        Some(prior) => {
            // The data description survives from the preprocessed export;
            // only naming may be overridden at re-export time.
            let mut data = prior.data.clone();
            data.name = name.clone();
            data.stratigraphic = stratigraphic;
            data.alias = alias;
            if !settings.tagname.is_empty() {
                data.tagname = Some(settings.tagname.clone());
            }
            data
        }
        None => fresh_data_block(&parts, name.clone(), stratigraphic, alias),
    };

    let access = resolve_access(settings, parts.config);

    let display = settings
        .display_name
        .as_ref()
        .map(|n| DisplayBlock { name: n.clone() })
        .or_else(|| parts.prior.and_then(|p| p.display.clone()))
        .unwrap_or_else(|| DisplayBlock { name: name.clone() });

    let fmu = parts.facts.map(|facts| FmuBlock {
        model: parts.config.model.clone(),
        context: Some(ContextBlock {
            stage: parts.context.as_str().to_string(),
        }),
        case: facts.case.clone(),
        iteration: (!facts.itername.is_empty()).then(|| IterationBlock {
            id: facts.iteration_id,
            name: facts.itername.clone(),
        }),
        realization: (!facts.realname.is_empty()).then(|| RealizationBlock {
            id: facts.realization_id,
            name: facts.realname.clone(),
        }),
        workflow: settings
            .workflow
            .as_ref()
            .map(|w| WorkflowBlock {
                reference: w.clone(),
            }),
    });

    // The marker lets a later case run re-export the file under the
    // naming chosen here.
    let preprocessed = (parts.context == FmuContext::Preprocessed).then(|| PreprocessedInfo {
        name: raw_name,
        tagname: none_when_empty(&settings.tagname),
        subfolder: none_when_empty(&settings.subfolder),
    });

    let mut doc = ExportDocument::new(parts.obj.classname(), parts.user, file, data, access);
    doc.fmu = fmu;
    doc.display = Some(display);
    doc.masterdata = Some(parts.config.masterdata.clone());
    doc.preprocessed = preprocessed;

    // A re-export continues the history of the preprocessed document.
    if let Some(prior) = parts.prior {
        let mut tracklog = prior.tracklog.clone();
        tracklog.append(&mut doc.tracklog);
        doc.tracklog = tracklog;
    }

    doc
}

/// Build the data block for a first-time export.
fn fresh_data_block(
    parts: &DocumentParts<'_>,
    name: String,
    stratigraphic: bool,
    alias: Vec<String>,
) -> DataBlock {
    let settings = parts.settings;
    let content = &settings.content;

    if content.is_unset() {
        warn!(
            "The <content> is not provided which defaults to 'unset'. It is strongly \
             recommended that content is given explicitly!"
        );
    }
    let mut content_detail = BTreeMap::new();
    if let Some(value) = content.detail_value() {
        content_detail.insert(content.kind_str().to_string(), value);
    }

    let vertical_domain = match &settings.vertical_domain {
        Some((domain, reference)) => BTreeMap::from([(domain.clone(), reference.clone())]),
        None => BTreeMap::from([("depth".to_string(), "msl".to_string())]),
    };

    let time = settings.timedata.as_ref().map(|timedata| {
        let (t0, t1) = timedata.ordered();
        TimeBlock {
            t0: timestamp(t0),
            t1: t1.map(timestamp),
        }
    });

    DataBlock {
        name,
        stratigraphic,
        alias,
        content: content.kind_str().to_string(),
        content_detail,
        tagname: none_when_empty(&settings.tagname),
        format: parts.obj.format().to_string(),
        layout: parts.obj.layout().map(str::to_string),
        unit: settings.unit.clone(),
        vertical_domain,
        spec: parts.obj.spec(),
        bbox: parts.obj.bbox(),
        time,
        is_prediction: settings.is_prediction,
        is_observation: settings.is_observation,
        description: settings.description.clone(),
    }
}

/// Swap an export name for its official stratigraphic identity.
fn resolve_stratigraphy(raw_name: &str, config: &GlobalConfig) -> (String, bool, Vec<String>) {
    match config.stratigraphy_entry(raw_name) {
        Some(entry) => {
            let official = entry.name.clone().unwrap_or_else(|| raw_name.to_string());
            let mut alias = entry.alias.clone();
            if official != raw_name && !alias.iter().any(|a| a == raw_name) {
                alias.push(raw_name.to_string());
            }
            (official, entry.stratigraphic, alias)
        }
        None => (raw_name.to_string(), false, Vec::new()),
    }
}

/// Classification and REP visibility: per-call settings win over the
/// configuration, which falls back to the legacy ssdl sub-block.
fn resolve_access(settings: &ExportSettings, config: &GlobalConfig) -> AccessBlock {
    let ssdl = config.access.ssdl.as_ref();
    let classification = settings
        .classification
        .or(config.access.classification)
        .or_else(|| ssdl.and_then(|s| s.access_level))
        .unwrap_or(Classification::Internal);
    let rep_include = settings
        .rep_include
        .or_else(|| ssdl.and_then(|s| s.rep_include))
        .unwrap_or(false);

    AccessBlock {
        asset: config.access.asset.clone(),
        classification,
        ssdl: SsdlBlock {
            access_level: classification,
            rep_include,
        },
    }
}

fn timestamp(point: &TimePoint) -> TimeStamp {
    TimeStamp {
        value: format!("{}T00:00:00", point.value.format("%Y-%m-%d")),
        label: point.label.clone(),
    }
}

fn none_when_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
