//! Integration tests for best-effort preloading

mod support;

use serde_json::json;
use support::*;

fn route_basic_catalog(fetcher: &MockFetcher) {
    fetcher.route_json(
        "http://cat.test/index.json",
        &index_json(
            "Root",
            vec![
                sub_entry("LibA", "LibA/index.json"),
                sub_entry("LibB", "LibB/index.json"),
            ],
        ),
    );
    fetcher.route_json(
        "http://cat.test/LibA/index.json",
        &index_json(
            "LibA",
            vec![
                preset_entry("X", "x.json", "sampler", &[]),
                preset_entry("Y", "y.json", "synth", &[]),
            ],
        ),
    );
    fetcher.route_json(
        "http://cat.test/LibB/index.json",
        &index_json("LibB", vec![preset_entry("Z", "z.json", "synth", &[])]),
    );
    fetcher.route_json(
        "http://cat.test/LibA/x.json",
        &sampler_preset_doc(vec![json!({
            "sample": { "data": pcm_base64(&[0.5, -0.5]), "sampleRate": 44100 }
        })]),
    );
    fetcher.route_json("http://cat.test/LibA/y.json", &synth_preset_doc());
    fetcher.route_json("http://cat.test/LibB/z.json", &synth_preset_doc());
}

#[tokio::test]
async fn test_preload_tolerates_individual_failures() {
    let (catalog, fetcher, _) = test_catalog();
    route_basic_catalog(&fetcher);

    let report = catalog
        .preload_all(&["LibA/X", "missing-preset"])
        .await
        .unwrap();

    assert_eq!(report.loaded, vec!["LibA/X"]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].name, "missing-preset");
    assert!(!report.is_complete());
}

#[tokio::test]
async fn test_preload_enables_qualified_libraries() {
    let (catalog, fetcher, _) = test_catalog();
    route_basic_catalog(&fetcher);

    let report = catalog
        .preload_all(&["LibA/X", "LibA/Y", "LibB/Z"])
        .await
        .unwrap();

    assert!(report.is_complete());
    assert_eq!(report.loaded.len(), 3);
    assert_eq!(catalog.enabled_libraries(), vec!["LibA", "LibB"]);
    // Library indexes fetched once each despite two LibA presets
    assert_eq!(fetcher.hits("http://cat.test/LibA/index.json"), 1);
}

#[tokio::test]
async fn test_preload_decodes_sampler_audio_eagerly() {
    let (catalog, fetcher, _) = test_catalog();
    route_basic_catalog(&fetcher);

    catalog.preload_all(&["LibA/X"]).await.unwrap();

    // X's single inline-PCM zone is resident in the audio cache
    assert_eq!(catalog.samples().cached_len(), 1);
    assert_eq!(catalog.cached_descriptors(), 1);
}

#[tokio::test]
async fn test_preload_survives_unknown_library() {
    let (catalog, fetcher, _) = test_catalog();
    route_basic_catalog(&fetcher);

    let report = catalog
        .preload_all(&["NoSuchLib/Anything", "LibA/Y"])
        .await
        .unwrap();

    assert_eq!(report.loaded, vec!["LibA/Y"]);
    assert_eq!(report.failed[0].name, "NoSuchLib/Anything");
}

#[tokio::test]
async fn test_preload_fails_only_on_root_failure() {
    let (catalog, _, _) = test_catalog(); // nothing routed, root 404s

    let result = catalog.preload_all(&["LibA/X"]).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_preload_zone_failure_fails_that_item_only() {
    let (catalog, fetcher, _) = test_catalog();
    route_basic_catalog(&fetcher);
    // Sampler whose zone points at a missing sample
    fetcher.route_json(
        "http://cat.test/LibA/x.json",
        &sampler_preset_doc(vec![json!({ "sample": { "path": "missing.flac" } })]),
    );

    let report = catalog.preload_all(&["LibA/X", "LibA/Y"]).await.unwrap();

    assert_eq!(report.loaded, vec!["LibA/Y"]);
    assert_eq!(report.failed[0].name, "LibA/X");
}
