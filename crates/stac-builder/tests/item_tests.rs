//! End-to-end item building: parse, derive, build, validate.

use scene_metadata::{parse_metadata, prepare_record};
use stac_builder::{item_key, BucketConfig, ItemBuilder, MissionTables};
use stac_common::StacError;
use stac_protocol::{rel, validate_item, StacItem};
use test_utils::{assert_approx_eq, assert_bbox_approx_eq, fixtures, MetadataXml, SceneFixture};

fn buckets() -> BucketConfig {
    BucketConfig::new("meta", "cog", "stac")
}

fn build(scene: &SceneFixture) -> StacItem {
    let tables = MissionTables::builtin();
    let buckets = buckets();
    let record = prepare_record(&scene.xml, &scene.filename).unwrap();
    ItemBuilder::new(&tables, &buckets).build(&record).unwrap()
}

// ============================================================================
// Reference scene
// ============================================================================

#[test]
fn test_reference_scene_item() {
    let item = build(&fixtures::cbers4_mux());

    assert_eq!(item.id, "CBERS_4_MUX_20170528_090_084_L2");
    assert_eq!(item.collection, "CBERS4-MUX");
    assert_eq!(item.type_, "Feature");
    assert_eq!(item.stac_version, "1.0.0");
    assert_bbox_approx_eq!(
        item.bbox,
        [23.465111, 13.700498, 24.812825, 14.988180],
        1e-9
    );

    let p = &item.properties;
    assert_eq!(p.datetime, "2017-05-28T09:01:17Z");
    assert_eq!(p.platform, "CBERS-4");
    assert_eq!(p.instruments, vec!["MUX".to_string()]);
    assert_eq!(p.gsd, 20.0);
    assert_eq!(p.epsg, 32635);
    assert_eq!(p.international_designator, "2014-079A");
    assert_eq!(p.orbit_state, "descending");
    assert_approx_eq!(p.off_nadir, 0.0022, 1e-12);
    assert_approx_eq!(p.sun_azimuth, 70.4378, 1e-12);
    assert_eq!(p.extra["cbers:data_type"], "L2");
    assert_eq!(p.extra["cbers:path"], 90);
    assert_eq!(p.extra["cbers:row"], 84);
}

#[test]
fn test_reference_scene_geometry() {
    let item = build(&fixtures::cbers4_mux());
    let ring = item.geometry.exterior();

    assert_eq!(ring.len(), 5);
    assert_eq!(ring[0], ring[4]);
    // LL, LR, UR, UL in lon/lat order
    assert_eq!(ring[0], [23.465111, 13.977157]);
    assert_eq!(ring[1], [24.542178, 13.700498]);
    assert_eq!(ring[2], [24.812825, 14.711362]);
    assert_eq!(ring[3], [23.734685, 14.988180]);
}

#[test]
fn test_reference_scene_assets() {
    let item = build(&fixtures::cbers4_mux());
    let prefix = "CBERS4/MUX/090/084/CBERS_4_MUX_20170528_090_084_L2";

    let keys: Vec<_> = item.assets.keys().cloned().collect();
    assert_eq!(keys, vec!["B5", "B6", "B7", "B8", "metadata", "thumbnail"]);

    assert_eq!(
        item.assets["thumbnail"].href,
        format!("https://s3.amazonaws.com/cog/{}/CBERS_4_MUX_20170528_090_084_L2.jpg", prefix)
    );
    assert_eq!(item.assets["thumbnail"].type_.as_deref(), Some("image/jpeg"));
    assert_eq!(
        item.assets["metadata"].href,
        format!(
            "https://s3.amazonaws.com/meta/{}/CBERS_4_MUX_20170528_090_084_L2_BAND6.xml",
            prefix
        )
    );
    assert_eq!(item.assets["metadata"].type_.as_deref(), Some("text/xml"));

    let b7 = &item.assets["B7"];
    assert_eq!(
        b7.href,
        format!("https://s3.amazonaws.com/cog/{}/CBERS_4_MUX_20170528_090_084_L2_BAND7.tif", prefix)
    );
    let eo = b7.eo_bands.as_ref().unwrap();
    assert_eq!(eo[0].name, "B7");
    assert_eq!(eo[0].common_name.as_deref(), Some("red"));
    assert_eq!(b7.gsd, None);
}

#[test]
fn test_reference_scene_links() {
    let item = build(&fixtures::cbers4_mux());

    let rels: Vec<_> = item.links.iter().map(|l| l.rel.as_str()).collect();
    assert_eq!(rels, vec![rel::SELF, rel::PARENT, rel::COLLECTION]);
    assert_eq!(
        item.link(rel::SELF).unwrap().href,
        "https://stac.s3.amazonaws.com/CBERS4/MUX/090/084/CBERS_4_MUX_20170528_090_084_L2.json"
    );
    assert_eq!(
        item.link(rel::PARENT).unwrap().href,
        "https://stac.s3.amazonaws.com/CBERS4/MUX/090/084/catalog.json"
    );
    assert_eq!(
        item.link(rel::COLLECTION).unwrap().href,
        "https://stac.s3.amazonaws.com/CBERS4/MUX/collection.json"
    );
}

#[test]
fn test_reference_scene_key() {
    let scene = fixtures::cbers4_mux();
    let record = prepare_record(&scene.xml, &scene.filename).unwrap();
    assert_eq!(
        item_key(&record),
        "CBERS4/MUX/090/084/CBERS_4_MUX_20170528_090_084_L2.json"
    );
}

// ============================================================================
// Every mission/camera
// ============================================================================

#[test]
fn test_all_scenes_build_and_validate() {
    for scene in fixtures::all_scenes() {
        let item = build(&scene);
        if let Err(e) = validate_item(&item) {
            panic!("{}: {}", scene.filename, e);
        }
    }
}

#[test]
fn test_build_is_deterministic() {
    for scene in fixtures::all_scenes() {
        let first = build(&scene).to_json().unwrap();
        let second = build(&scene).to_json().unwrap();
        assert_eq!(first, second, "{}", scene.filename);
    }
}

#[test]
fn test_pan5m_has_three_assets() {
    let item = build(&fixtures::cbers4_pan5m());
    assert_eq!(item.assets.len(), 3);
    assert!(item.assets.contains_key("B1"));
    assert_eq!(item.properties.gsd, 5.0);
}

#[test]
fn test_wpm_band_gsd_override() {
    let item = build(&fixtures::cbers4a_wpm());

    assert_eq!(item.properties.gsd, 2.0);
    assert_eq!(item.assets["B0"].gsd, None);
    for band in ["B1", "B2", "B3", "B4"] {
        assert_eq!(item.assets[band].gsd, Some(8.0), "{}", band);
    }
    assert_eq!(item.assets["thumbnail"].type_.as_deref(), Some("image/png"));
    assert_eq!(item.properties.platform, "CBERS-4A");
    assert_eq!(item.properties.international_designator, "2019-093E");
}

#[test]
fn test_amazonia_dual_optics_item() {
    let item = build(&fixtures::amazonia1_wfi_dual());

    assert_eq!(item.id, "AMAZONIA_1_WFI_20220810_033_018_L4");
    assert_eq!(item.collection, "AMAZONIA1-WFI");
    assert_bbox_approx_eq!(item.bbox, [-63.0, -13.5, -57.0, -8.0], 1e-12);
    // fused center (-11, -60) lies in zone 21 south
    assert_eq!(item.properties.epsg, 32721);
    assert_approx_eq!(item.properties.sun_azimuth, 41.0, 1e-12);
    assert_eq!(item.properties.extra["amazonia:path"], 33);
    assert_eq!(item.properties.extra["amazonia:row"], 18);
    assert!(item.assets["B2"]
        .href
        .ends_with("AMAZONIA_1_WFI_20220810_033_018_L4_BAND2.tif"));
}

#[test]
fn test_unfused_record_is_fused_on_copy() {
    let tables = MissionTables::builtin();
    let buckets = buckets();
    let scene = fixtures::amazonia1_wfi_dual();

    let raw = parse_metadata(&scene.xml, &scene.filename).unwrap();
    let fused = prepare_record(&scene.xml, &scene.filename).unwrap();

    let builder = ItemBuilder::new(&tables, &buckets);
    let from_raw = builder.build(&raw).unwrap();
    let from_fused = builder.build(&fused).unwrap();

    assert_eq!(from_raw, from_fused);
    assert!(raw.needs_fusion());
}

#[test]
fn test_amazonia_single_optic_filenames() {
    let item = build(&fixtures::amazonia1_wfi_left());

    assert_eq!(item.id, "AMAZONIA_1_WFI_20220810_033_018_L4");
    assert!(item.assets["B2"]
        .href
        .ends_with("/AMAZONIA_1_WFI_20220810_033_018_L4_LEFT_BAND2.tif"));
    assert!(item.assets["thumbnail"]
        .href
        .ends_with("/AMAZONIA_1_WFI_20220810_033_018_L4_LEFT.png"));
    assert!(item.assets["metadata"]
        .href
        .ends_with("/AMAZONIA_1_WFI_20220810_033_018_L4_LEFT_BAND2.xml"));
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn test_non_utm_projection_fails() {
    let tables = MissionTables::builtin();
    let buckets = buckets();
    let xml = MetadataXml::new("CBERS", "4", "MUX", "2")
        .with_bands(&["5", "6", "7", "8"])
        .with_projection("Polyconic")
        .document();
    let record = prepare_record(&xml, "CBERS_4_MUX_20170528_090_084_L2_BAND6.xml").unwrap();

    assert!(matches!(
        ItemBuilder::new(&tables, &buckets).build(&record),
        Err(StacError::UnsupportedProjection(_))
    ));
}

#[test]
fn test_band_missing_from_table_fails() {
    let tables = MissionTables::builtin();
    let buckets = buckets();
    // MUX has no band 1
    let xml = MetadataXml::new("CBERS", "4", "MUX", "2").document();
    let record = prepare_record(&xml, "CBERS_4_MUX_20170528_090_084_L2_BAND6.xml").unwrap();

    assert!(matches!(
        ItemBuilder::new(&tables, &buckets).build(&record),
        Err(StacError::UnknownBand { .. })
    ));
}
