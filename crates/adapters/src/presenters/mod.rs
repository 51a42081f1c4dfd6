use bag_config_domain::{AssetMetrics, NormalizationReport, SceneRoot, TemplateDescriptor};

use crate::assets::CacheStats;

pub fn present_catalog_row(index: usize, template: &TemplateDescriptor) -> String {
    format!("{}\t{}\t{}", index, template.name, template.url)
}

pub fn present_scene_summary(
    index: usize,
    template: &TemplateDescriptor,
    scene: &SceneRoot,
    report: &NormalizationReport,
) -> String {
    format!(
        "template {} {} (kind={}, meshes={}, triangles={}, tuned_materials={})",
        index,
        template.name,
        asset_kind_from_url(&template.url),
        scene.mesh_count(),
        scene.triangle_count(),
        report.standard_materials
    )
}

pub fn present_asset_metrics(metrics: &AssetMetrics) -> String {
    format!(
        "assets submitted={} completed={} canceled={} failed={} last={} p95={}",
        metrics.submitted_requests,
        metrics.completed_requests,
        metrics.canceled_requests,
        metrics.failed_requests,
        format_millis(metrics.last_load_time_ms),
        format_millis(metrics.p95_load_time_ms)
    )
}

pub fn present_cache_stats(stats: &CacheStats) -> String {
    format!(
        "cache hits={} misses={} entries={}",
        stats.hits, stats.misses, stats.entries
    )
}

fn format_millis(value: Option<u64>) -> String {
    value.map_or_else(|| "-".to_string(), |ms| format!("{ms}ms"))
}

fn asset_kind_from_url(url: &str) -> &'static str {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    match path
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
    {
        Some(ext) if ext == "glb" => "GLB",
        Some(ext) if ext == "gltf" => "GLTF",
        _ => "UNKNOWN",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_rows_are_tab_separated() {
        let row = present_catalog_row(1, &TemplateDescriptor::new("Duffel", "/m/b.glb"));
        assert_eq!(row, "1\tDuffel\t/m/b.glb");
    }

    #[test]
    fn scene_summary_names_the_asset_kind() {
        let summary = present_scene_summary(
            0,
            &TemplateDescriptor::new("Tote", "/models/tote.GLB?v=2"),
            &SceneRoot::default(),
            &NormalizationReport::default(),
        );
        assert_eq!(
            summary,
            "template 0 Tote (kind=GLB, meshes=0, triangles=0, tuned_materials=0)"
        );
    }

    #[test]
    fn metrics_show_missing_samples_as_dashes() {
        let line = present_asset_metrics(&AssetMetrics {
            submitted_requests: 3,
            completed_requests: 1,
            canceled_requests: 2,
            failed_requests: 0,
            last_load_time_ms: Some(12),
            p95_load_time_ms: None,
        });
        assert_eq!(
            line,
            "assets submitted=3 completed=1 canceled=2 failed=0 last=12ms p95=-"
        );
    }

    #[test]
    fn cache_stats_line() {
        let line = present_cache_stats(&CacheStats {
            hits: 4,
            misses: 2,
            entries: 2,
        });
        assert_eq!(line, "cache hits=4 misses=2 entries=2");
    }
}
