use anyhow::{Context, Result};
use std::path::PathBuf;

use fmuio::export::read_metadata;

/// Display the metadata recorded for an exported file
pub fn run(file: PathBuf) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {}", file.display());
    }

    let document = read_metadata(&file).context("Failed to read the metadata file")?;

    println!("FMU Export Metadata");
    println!("===================");
    println!("File: {}", file.display());
    println!();

    println!("Document:");
    println!("  Version: {}", document.version);
    println!("  Source: {}", document.source);
    println!("  Class: {}", document.class);
    if document.is_preprocessed() {
        println!("  Preprocessed: awaiting re-export into a case");
    }
    println!();

    println!("Data:");
    println!("  Name: {}", document.data.name);
    if let Some(tagname) = &document.data.tagname {
        println!("  Tagname: {}", tagname);
    }
    println!("  Content: {}", document.data.content);
    if !document.data.unit.is_empty() {
        println!("  Unit: {}", document.data.unit);
    }
    println!("  Format: {}", document.data.format);
    if document.data.stratigraphic {
        println!("  Stratigraphic: yes");
    }
    if let Some(time) = &document.data.time {
        match &time.t1 {
            Some(t1) => println!("  Time: {} .. {}", time.t0.value, t1.value),
            None => println!("  Time: {}", time.t0.value),
        }
    }
    println!();

    println!("Placement:");
    println!("  Relative path: {}", document.file.relative_path.display());
    println!("  Absolute path: {}", document.file.absolute_path.display());
    if let Some(checksum) = &document.file.checksum_md5 {
        println!("  Checksum (md5): {}", checksum);
    }
    println!();

    println!("Access:");
    println!("  Asset: {}", document.access.asset.name);
    println!(
        "  Classification: {}",
        document.access.classification.as_str()
    );
    println!("  REP include: {}", document.access.ssdl.rep_include);
    println!();

    if let Some(fmu) = &document.fmu {
        println!("FMU:");
        println!("  Model: {} ({})", fmu.model.name, fmu.model.revision);
        if let Some(context) = &fmu.context {
            println!("  Stage: {}", context.stage);
        }
        if let Some(case) = &fmu.case {
            match case.uuid {
                Some(uuid) => println!("  Case: {} ({})", case.name, uuid),
                None => println!("  Case: {}", case.name),
            }
        }
        if let Some(realization) = &fmu.realization {
            println!("  Realization: {}", realization.name);
        }
        if let Some(iteration) = &fmu.iteration {
            println!("  Iteration: {}", iteration.name);
        }
        println!();
    }

    println!("Tracklog:");
    for event in &document.tracklog {
        println!("  {} {} by {}", event.datetime, event.event, event.user.id);
    }

    Ok(())
}
