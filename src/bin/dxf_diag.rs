//! Diagnostic: read a DXF file, print what was loaded and optionally write
//! it back and read the copy again.
//!
//! Usage: dxf_diag <input.dxf> [output.dxf] [--failsafe] [--model-only]

use anyhow::{bail, Context, Result};
use dxf_graph::io::dxf::{save, DxfReader, DxfReaderConfiguration};
use dxf_graph::{CadDocument, Vector2};
use std::collections::BTreeMap;
use std::path::Path;

fn summarize(label: &str, doc: &CadDocument) {
    let mut kinds: BTreeMap<&str, usize> = BTreeMap::new();
    for entity in doc.entities() {
        *kinds.entry(entity.type_name()).or_insert(0) += 1;
    }

    println!("--- {label} ---");
    println!(
        "layers={} line_types={} text_styles={} dim_styles={} blocks={} layouts={}",
        doc.layers.len(),
        doc.line_types.len(),
        doc.text_styles.len(),
        doc.dim_styles.len(),
        doc.blocks.len(),
        doc.layouts.len()
    );
    println!("entities={} next_handle={}", doc.entity_count(), doc.next_handle());
    for (kind, count) in &kinds {
        println!("  {kind:<14} {count}");
    }
    for (name, layout) in &doc.layouts {
        println!("  layout {name:<20} entities={}", layout.entities.len());
    }
    for notification in doc.notifications.iter() {
        println!("  [{:?}] {}", notification.notification_type, notification.message);
    }
}

fn read(path: &Path, config: DxfReaderConfiguration) -> Result<CadDocument> {
    DxfReader::from_file(path)
        .with_context(|| format!("cannot open {}", path.display()))?
        .with_configuration(config)
        .read()
        .with_context(|| format!("cannot read {}", path.display()))
}

fn main() -> Result<()> {
    let mut config = DxfReaderConfiguration::default();
    let mut paths = Vec::new();
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--failsafe" => config.failsafe = true,
            "--model-only" => config.model_space_only = true,
            flag if flag.starts_with("--") => bail!("unknown option {flag}"),
            _ => paths.push(arg),
        }
    }
    let Some(input) = paths.first() else {
        bail!("usage: dxf_diag <input.dxf> [output.dxf] [--failsafe] [--model-only]");
    };

    let mut doc = read(Path::new(input), config.clone())?;
    summarize(input, &doc);

    if let Some(output) = paths.get(1) {
        let notifications = save(&mut doc, output, None, None, Vector2::ZERO, 297.0)
            .with_context(|| format!("cannot write {output}"))?;
        for notification in notifications.iter() {
            println!("  [write {:?}] {}", notification.notification_type, notification.message);
        }
        let copy = read(Path::new(output), config)?;
        summarize(output, &copy);
        if copy.entity_count() != doc.entity_count() {
            bail!("entity count changed: {} -> {}", doc.entity_count(), copy.entity_count());
        }
    }
    Ok(())
}
