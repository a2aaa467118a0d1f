//! Canned scene documents for every supported mission/camera.
//!
//! Values are representative of real INPE deliveries; the CBERS-4 MUX scene
//! reproduces `CBERS_4_MUX_20170528_090_084_L2`.

use crate::generators::MetadataXml;

/// A metadata document together with the filename it is delivered under.
#[derive(Debug, Clone)]
pub struct SceneFixture {
    pub filename: String,
    pub xml: String,
}

impl SceneFixture {
    pub fn new(filename: &str, xml: String) -> Self {
        Self {
            filename: filename.to_string(),
            xml,
        }
    }
}

/// Scene values for `CBERS_4_MUX_20170528_090_084_L2`, Central Africa.
pub fn cbers4_mux_values() -> MetadataXml {
    let mut scene = MetadataXml::new("CBERS", "4", "MUX", "2");
    scene.center_time = "2017-05-28T09:01:17.123456".to_string();
    scene.ul = (14.988180, 23.734685);
    scene.ur = (14.711362, 24.812825);
    scene.lr = (13.700498, 24.542178);
    scene.ll = (13.977157, 23.465111);
    scene.ct = (14.344547, 24.138814);
    scene.bbox_ll = (13.700498, 23.465111);
    scene.bbox_ur = (14.988180, 24.812825);
    scene.sun_azimuth = 70.4378;
    scene.sun_elevation = 66.9154;
    scene.off_nadir = -0.00220;
    scene.velocity_z = -7093.2;
    scene.origin = (0.0, 27.0);
    scene.bands = vec![
        ("5".to_string(), Some(1.38)),
        ("6".to_string(), Some(1.29)),
        ("7".to_string(), Some(1.56)),
        ("8".to_string(), None),
    ];
    scene
}

pub fn cbers4_mux() -> SceneFixture {
    SceneFixture::new(
        "CBERS_4_MUX_20170528_090_084_L2_BAND6.xml",
        cbers4_mux_values().document(),
    )
}

pub fn cbers4_awfi() -> SceneFixture {
    let scene = MetadataXml::new("CBERS", "4", "AWFI", "4")
        .with_bands(&["13", "14", "15", "16"])
        .with_center(-20.5, -44.0);
    SceneFixture::new(
        "CBERS_4_AWFI_20170528_155_123_L4_BAND14.xml",
        scene.document(),
    )
}

pub fn cbers4_pan5m() -> SceneFixture {
    let scene = MetadataXml::new("CBERS", "4", "PAN5M", "2").with_bands(&["1"]);
    SceneFixture::new(
        "CBERS_4_PAN5M_20161009_219_050_L2_BAND1.xml",
        scene.document(),
    )
}

pub fn cbers4_pan10m() -> SceneFixture {
    let scene = MetadataXml::new("CBERS", "4", "PAN10M", "2").with_bands(&["2", "3", "4"]);
    SceneFixture::new(
        "CBERS_4_PAN10M_20161009_219_050_L2_BAND3.xml",
        scene.document(),
    )
}

pub fn cbers4a_mux() -> SceneFixture {
    let scene = MetadataXml::new("CBERS", "4A", "MUX", "4").with_bands(&["5", "6", "7", "8"]);
    SceneFixture::new(
        "CBERS_4A_MUX_20200808_201_112_L4_BAND6.xml",
        scene.document(),
    )
}

pub fn cbers4a_wfi() -> SceneFixture {
    let scene =
        MetadataXml::new("CBERS", "4A", "WFI", "4").with_bands(&["13", "14", "15", "16"]);
    SceneFixture::new(
        "CBERS_4A_WFI_20200808_201_112_L4_BAND13.xml",
        scene.document(),
    )
}

pub fn cbers4a_wpm() -> SceneFixture {
    let scene =
        MetadataXml::new("CBERS", "4A", "WPM", "4").with_bands(&["0", "1", "2", "3", "4"]);
    SceneFixture::new(
        "CBERS_4A_WPM_20200612_201_112_L4_BAND0.xml",
        scene.document(),
    )
}

/// Left head of an AMAZONIA-1 WFI acquisition.
pub fn amazonia1_left_values() -> MetadataXml {
    let mut left = MetadataXml::new("AMAZONIA", "1", "WFI", "4");
    left.center_time = "2022-08-10T13:45:10.500000".to_string();
    left.ul = (-8.0, -62.0);
    left.ur = (-8.4, -59.5);
    left.lr = (-13.2, -60.5);
    left.ll = (-12.8, -63.0);
    left.ct = (-10.0, -61.0);
    left.bbox_ll = (-13.2, -63.0);
    left.bbox_ur = (-8.0, -59.5);
    left.sun_azimuth = 40.0;
    left.sun_elevation = 50.0;
    left
}

/// Right head of the same acquisition, east of the left head.
pub fn amazonia1_right_values() -> MetadataXml {
    let mut right = MetadataXml::new("AMAZONIA", "1", "WFI", "4");
    right.center_time = "2022-08-10T13:45:10.500000".to_string();
    right.ul = (-8.3, -59.8);
    right.ur = (-8.6, -57.0);
    right.lr = (-13.5, -58.0);
    right.ll = (-13.1, -60.8);
    right.ct = (-12.0, -59.0);
    right.bbox_ll = (-13.5, -60.8);
    right.bbox_ur = (-8.3, -57.0);
    right.sun_azimuth = 42.0;
    right.sun_elevation = 52.0;
    right
}

/// Dual-optics document carrying both heads.
pub fn amazonia1_wfi_dual() -> SceneFixture {
    SceneFixture::new(
        "AMAZONIA_1_WFI_20220810_033_018_L4_BAND2.xml",
        MetadataXml::dual_document(&amazonia1_left_values(), &amazonia1_right_values()),
    )
}

/// Single-head delivery: only the left camera.
pub fn amazonia1_wfi_left() -> SceneFixture {
    SceneFixture::new(
        "AMAZONIA_1_WFI_20220810_033_018_L4_LEFT_BAND2.xml",
        amazonia1_left_values().wrapped_document("leftCamera"),
    )
}

/// Every supported mission/camera combination.
pub fn all_scenes() -> Vec<SceneFixture> {
    vec![
        cbers4_mux(),
        cbers4_awfi(),
        cbers4_pan5m(),
        cbers4_pan10m(),
        cbers4a_mux(),
        cbers4a_wfi(),
        cbers4a_wpm(),
        amazonia1_wfi_dual(),
        amazonia1_wfi_left(),
    ]
}
