//! Parser and derivation tests against generated INPE documents.

use scene_metadata::{
    derive_epsg, fuse_optics, orbit_state, parse_metadata, prepare_record, Mission, OpticSide,
    Optics, OrbitState,
};
use stac_common::{LatLon, StacError};
use test_utils::{assert_approx_eq, fixtures, MetadataXml};

// ============================================================================
// Single-camera documents
// ============================================================================

#[test]
fn test_parse_cbers4_mux() {
    let scene = fixtures::cbers4_mux();
    let record = parse_metadata(&scene.xml, &scene.filename).unwrap();

    assert_eq!(record.mission, Mission::Cbers);
    assert_eq!(record.number, "4");
    assert_eq!(record.sensor, "MUX");
    assert_eq!(record.path, 90);
    assert_eq!(record.row, 84);
    assert_eq!(record.processing_level, "2");
    assert_eq!(record.acquisition_day, "20170528");
    assert_eq!(record.acquisition_time, "2017-05-28T09:01:17.123456");
    assert_eq!(record.projection_name, "UTM");
    assert_eq!(record.optics, Optics::Single { side: None });
    assert_eq!(record.metadata_filename, scene.filename);

    assert_eq!(record.ids.item_id, "CBERS_4_MUX_20170528_090_084_L2");
    assert_eq!(record.ids.no_level_id, "CBERS_4_MUX_20170528_090_084");
    assert_eq!(record.ids.sat_sensor, "CBERS4/MUX");
    assert_eq!(record.collection_id(), "CBERS4-MUX");
    assert_eq!(record.data_type(), "L2");
    assert_eq!(record.platform(), "CBERS-4");

    assert_approx_eq!(record.bbox_ll.lon, 23.465111, 1e-9);
    assert_approx_eq!(record.bbox_ll.lat, 13.700498, 1e-9);
    assert_approx_eq!(record.bbox_ur.lon, 24.812825, 1e-9);
    assert_approx_eq!(record.bbox_ur.lat, 14.988180, 1e-9);
    assert_approx_eq!(record.sun.azimuth, 70.4378, 1e-9);
    assert_approx_eq!(record.sun.elevation, 66.9154, 1e-9);
}

#[test]
fn test_band_gain_is_optional() {
    let scene = fixtures::cbers4_mux();
    let record = parse_metadata(&scene.xml, &scene.filename).unwrap();

    let ids: Vec<_> = record.bands.iter().map(|b| b.id.as_str()).collect();
    assert_eq!(ids, vec!["5", "6", "7", "8"]);
    assert_eq!(record.bands[0].gain, Some(1.38));
    assert_eq!(record.bands[3].gain, None);
}

#[test]
fn test_item_id_is_stable() {
    for scene in fixtures::all_scenes() {
        let first = parse_metadata(&scene.xml, &scene.filename).unwrap();
        let second = parse_metadata(&scene.xml, &scene.filename).unwrap();
        assert_eq!(first.ids.item_id, second.ids.item_id);
        assert_eq!(first, second);
    }
}

#[test]
fn test_every_fixture_parses() {
    for scene in fixtures::all_scenes() {
        let record = prepare_record(&scene.xml, &scene.filename)
            .unwrap_or_else(|e| panic!("{} failed: {}", scene.filename, e));
        assert!(!record.needs_fusion());
    }
}

// ============================================================================
// Derivation
// ============================================================================

#[test]
fn test_derive_epsg_for_reference_scene() {
    let scene = fixtures::cbers4_mux();
    let record = parse_metadata(&scene.xml, &scene.filename).unwrap();
    assert_eq!(derive_epsg(&record).unwrap(), 32635);
    assert_eq!(orbit_state(record.velocity_z), OrbitState::Descending);
}

#[test]
fn test_derive_epsg_southern_hemisphere() {
    let scene = fixtures::cbers4_awfi();
    let record = parse_metadata(&scene.xml, &scene.filename).unwrap();
    // center (-20.5, -44.0) is zone 23 south
    assert_eq!(derive_epsg(&record).unwrap(), 32723);
}

#[test]
fn test_derive_epsg_ignores_projection_origin() {
    let filename = "CBERS_4_MUX_20170528_090_084_L2_BAND6.xml";
    let equator = MetadataXml::new("CBERS", "4", "MUX", "2");
    let mut northern = equator.clone();
    northern.origin = (60.0, 10.0);

    let expected = derive_epsg(&parse_metadata(&equator.document(), filename).unwrap()).unwrap();
    let shifted = derive_epsg(&parse_metadata(&northern.document(), filename).unwrap()).unwrap();
    assert_eq!(shifted, expected);
    assert!((32701..=32760).contains(&shifted));
}

#[test]
fn test_unsupported_projection() {
    let xml = MetadataXml::new("CBERS", "4", "MUX", "2")
        .with_projection("Polyconic")
        .document();
    let record = parse_metadata(&xml, "CBERS_4_MUX_20170528_090_084_L2_BAND6.xml").unwrap();
    assert!(matches!(
        derive_epsg(&record),
        Err(StacError::UnsupportedProjection(p)) if p == "Polyconic"
    ));
}

// ============================================================================
// Split optics
// ============================================================================

#[test]
fn test_dual_optics_side_channel() {
    let scene = fixtures::amazonia1_wfi_dual();
    let record = parse_metadata(&scene.xml, &scene.filename).unwrap();

    // Primary fields come from the left head until fused
    assert_eq!(record.corners.center, LatLon::new(-10.0, -61.0));
    match record.optics {
        Optics::Dual { right } => {
            assert_eq!(right.center, LatLon::new(-12.0, -59.0));
            assert_eq!(right.lr, LatLon::new(-13.5, -58.0));
            assert_eq!(right.bbox_ur, LatLon::new(-8.3, -57.0));
        }
        other => panic!("expected dual optics, got {:?}", other),
    }
    assert!(record.needs_fusion());
}

#[test]
fn test_dual_optics_fusion() {
    let scene = fixtures::amazonia1_wfi_dual();
    let mut record = parse_metadata(&scene.xml, &scene.filename).unwrap();
    fuse_optics(&mut record);

    assert_eq!(record.optics, Optics::Fused);
    assert_approx_eq!(record.corners.center.lat, -11.0, 1e-9);
    assert_approx_eq!(record.corners.center.lon, -60.0, 1e-9);
    assert_approx_eq!(record.sun.azimuth, 41.0, 1e-9);
    assert_approx_eq!(record.sun.elevation, 51.0, 1e-9);

    // UR: independent max of (-8.4, -59.5) and (-8.6, -57.0)
    assert_eq!(record.corners.ur, LatLon::new(-8.4, -57.0));
    // LR from the right head, UL/LL from the left head
    assert_eq!(record.corners.lr, LatLon::new(-13.5, -58.0));
    assert_eq!(record.corners.ul, LatLon::new(-8.0, -62.0));
    assert_eq!(record.corners.ll, LatLon::new(-12.8, -63.0));

    assert_eq!(record.bbox_ll, LatLon::new(-13.5, -63.0));
    assert_eq!(record.bbox_ur, LatLon::new(-8.0, -57.0));
    assert_eq!(record.optics_suffix(), "");
}

#[test]
fn test_fusion_reference_values() {
    let mut left = fixtures::amazonia1_left_values();
    let mut right = fixtures::amazonia1_right_values();
    left.ct = (10.0, 20.0);
    right.ct = (12.0, 22.0);
    left.ur = (5.0, 5.0);
    right.ur = (7.0, 3.0);

    let xml = MetadataXml::dual_document(&left, &right);
    let mut record = parse_metadata(&xml, "AMAZONIA_1_WFI_20220810_033_018_L4_BAND2.xml").unwrap();
    fuse_optics(&mut record);

    assert_eq!(record.corners.center, LatLon::new(11.0, 21.0));
    assert_eq!(record.corners.ur, LatLon::new(7.0, 5.0));
}

#[test]
fn test_fusion_is_idempotent() {
    let scene = fixtures::amazonia1_wfi_dual();
    let mut once = parse_metadata(&scene.xml, &scene.filename).unwrap();
    fuse_optics(&mut once);
    let mut twice = once.clone();
    fuse_optics(&mut twice);
    assert_eq!(once, twice);
}

#[test]
fn test_single_left_optic() {
    let scene = fixtures::amazonia1_wfi_left();
    let record = parse_metadata(&scene.xml, &scene.filename).unwrap();

    assert_eq!(
        record.optics,
        Optics::Single {
            side: Some(OpticSide::Left)
        }
    );
    assert_eq!(record.optics_suffix(), "_LEFT");
    assert_eq!(record.ids.item_id, "AMAZONIA_1_WFI_20220810_033_018_L4");
    assert_eq!(
        record.band_filename("2"),
        "AMAZONIA_1_WFI_20220810_033_018_L4_LEFT_BAND2.tif"
    );
    assert_eq!(record.corners.center, LatLon::new(-10.0, -61.0));
}

#[test]
fn test_single_optic_side_mismatch() {
    let xml = fixtures::amazonia1_left_values().wrapped_document("leftCamera");
    let result = parse_metadata(&xml, "AMAZONIA_1_WFI_20220810_033_018_L4_RIGHT_BAND2.xml");
    assert!(matches!(result, Err(StacError::MalformedMetadata(_))));
}

#[test]
fn test_dual_document_under_side_filename() {
    let scene = fixtures::amazonia1_wfi_dual();
    for filename in [
        "AMAZONIA_1_WFI_20220810_033_018_L4_LEFT_BAND2.xml",
        "AMAZONIA_1_WFI_20220810_033_018_L4_RIGHT_BAND2.xml",
    ] {
        assert!(
            matches!(
                parse_metadata(&scene.xml, filename),
                Err(StacError::MalformedMetadata(_))
            ),
            "{} should be rejected",
            filename
        );
    }
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn test_missing_required_nodes() {
    for section in [
        "satellite",
        "timeStamp",
        "imageData",
        "boundingBox",
        "sunPosition",
        "projection",
        "availableBands",
        "ephemerides",
    ] {
        let xml = MetadataXml::new("CBERS", "4", "MUX", "2")
            .without(section)
            .document();
        let result = parse_metadata(&xml, "CBERS_4_MUX_20170528_090_084_L2_BAND6.xml");
        assert!(
            matches!(result, Err(StacError::MalformedMetadata(_))),
            "missing {} should be malformed",
            section
        );
    }
}

#[test]
fn test_non_numeric_coordinate() {
    let xml = MetadataXml::new("CBERS", "4", "MUX", "2")
        .document()
        .replacen("<latitude>-10</latitude>", "<latitude>north</latitude>", 1);
    let result = parse_metadata(&xml, "CBERS_4_MUX_20170528_090_084_L2_BAND6.xml");
    assert!(matches!(result, Err(StacError::MalformedMetadata(_))));
}

#[test]
fn test_malformed_numbers_are_rejected() {
    let document = MetadataXml::new("CBERS", "4", "MUX", "2").document();
    let filename = "CBERS_4_MUX_20170528_090_084_L2_BAND6.xml";

    for bad in ["abc", "", "NaN", "inf", "-infinity"] {
        let cases = [
            (
                "latitude",
                document.replacen(
                    "<latitude>-10</latitude>",
                    &format!("<latitude>{}</latitude>", bad),
                    1,
                ),
            ),
            (
                "longitude",
                document.replacen(
                    "<longitude>-49.6</longitude>",
                    &format!("<longitude>{}</longitude>", bad),
                    1,
                ),
            ),
            (
                "gain",
                document.replacen("gain=\"1\"", &format!("gain=\"{}\"", bad), 1),
            ),
        ];

        for (field, xml) in cases {
            assert_ne!(xml, document, "{} was not substituted", field);
            assert!(
                matches!(
                    parse_metadata(&xml, filename),
                    Err(StacError::MalformedMetadata(_))
                ),
                "{} = '{}' should be rejected",
                field,
                bad
            );
        }
    }
}

#[test]
fn test_non_finite_center_is_rejected() {
    let mut scene = fixtures::cbers4_mux_values();
    scene.ct = (13.0, f64::NAN);
    let xml = scene.document();

    let err = prepare_record(&xml, "CBERS_4_MUX_20170528_090_084_L2_BAND6.xml").unwrap_err();
    match err {
        StacError::MalformedMetadata(msg) => assert!(msg.contains("CT/longitude"), "{}", msg),
        other => panic!("expected malformed metadata, got {:?}", other),
    }
}

#[test]
fn test_filename_pattern_error() {
    let scene = fixtures::cbers4_mux();
    let result = parse_metadata(&scene.xml, "scene.xml");
    assert!(matches!(result, Err(StacError::FilenamePattern(_))));
}

#[test]
fn test_document_filename_disagreement() {
    let scene = fixtures::cbers4_mux();
    let result = parse_metadata(&scene.xml, "CBERS_4_AWFI_20170528_090_084_L2_BAND6.xml");
    assert!(matches!(result, Err(StacError::MalformedMetadata(_))));
}

#[test]
fn test_record_serializes_optics_tag() {
    let scene = fixtures::amazonia1_wfi_left();
    let record = parse_metadata(&scene.xml, &scene.filename).unwrap();
    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json["optics"]["layout"], "single");
    assert_eq!(json["optics"]["side"], "LEFT");
    assert_eq!(json["mission"], "AMAZONIA");
}
