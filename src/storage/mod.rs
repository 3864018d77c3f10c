//! Results persistence module

use crate::pipeline::AnalysisReport;
use anyhow::Result;
use serde::Serialize;
use serde_json::{json, to_string_pretty};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// Save analysis results as JSON files under `output_dir`
pub fn save_results(report: &AnalysisReport, focus: Option<&str>, output_dir: &str) -> Result<()> {
    log::info!("Saving {} clusters to {}", report.clusters.len(), output_dir);

    // Ensure output directory exists
    fs::create_dir_all(output_dir)?;

    save_summary(report, output_dir)?;

    write_json(output_dir, "entities.json", &report.entities)?;
    write_json(output_dir, "edges.json", &report.graph.edges)?;
    write_json(output_dir, "clusters.json", &report.clusters)?;
    write_json(output_dir, "pmi_pairs.json", &report.pmi_pairs)?;
    write_json(output_dir, "bridges.json", &report.bridges)?;
    write_json(output_dir, "bridge_clusters.json", &report.bridge_clusters)?;

    if let (Some(focus), Some(similar)) = (focus, &report.similar) {
        write_json(output_dir, &format!("similar_{}.json", sanitize(focus)), similar)?;
    }

    log::info!("Results saved successfully");

    Ok(())
}

/// Save summary information
fn save_summary(report: &AnalysisReport, output_dir: &str) -> Result<()> {
    log::info!("Saving summary information");

    let summary = &report.summary;
    let clusters = &report.clusters;
    let cluster_divisor = if clusters.is_empty() { 1.0 } else { clusters.len() as f64 };
    let entity_divisor = if summary.entity_count == 0 { 1.0 } else { summary.entity_count as f64 };

    let document = json!({
        "graph_stats": {
            "entity_count": summary.entity_count,
            "chooser_count": summary.chooser_count,
            "relation_count": summary.relation_count,
            "edge_count": summary.edge_count,
            "mutual_edge_count": summary.mutual_edge_count,
            "avg_selections": summary.relation_count as f64 / entity_divisor,
            "total_weight": report.graph.total_weight(),
        },
        "cluster_stats": {
            "cluster_count": summary.cluster_count,
            "total_clustered_entities": summary.clustered_entities,
            "largest_cluster_size": clusters.iter().map(|c| c.size).max().unwrap_or(0),
            "avg_cluster_size": summary.clustered_entities as f64 / cluster_divisor,
            "avg_density": clusters.iter().map(|c| c.density).sum::<f64>() / cluster_divisor,
        },
        "association_stats": {
            "pmi_pair_count": summary.pmi_pair_count,
            "cross_group_pmi_pairs": report.pmi_pairs.iter().filter(|p| p.cross_group).count(),
            "bridge_pair_count": summary.bridge_pair_count,
            "bridge_cluster_count": summary.bridge_cluster_count,
        }
    });

    let path = Path::new(output_dir).join("summary.json");
    let mut file = File::create(path)?;
    file.write_all(to_string_pretty(&document)?.as_bytes())?;

    Ok(())
}

fn write_json<T: Serialize + ?Sized>(output_dir: &str, name: &str, value: &T) -> Result<()> {
    log::debug!("Writing {}", name);
    let path = Path::new(output_dir).join(name);
    let mut file = File::create(path)?;
    file.write_all(to_string_pretty(value)?.as_bytes())?;
    Ok(())
}

/// Keep file names portable
fn sanitize(id: &str) -> String {
    id.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}
