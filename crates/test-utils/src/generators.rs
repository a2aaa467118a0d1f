//! Generator for INPE-style metadata XML documents.
//!
//! Produces the `prdf` layout the parser reads, with every value settable,
//! so tests can drop or corrupt single nodes.

use std::fmt::Write;

/// A latitude/longitude pair, in that order.
pub type Corner = (f64, f64);

/// Namespace carried by INPE metadata documents.
pub const PRDF_NAMESPACE: &str = "http://www.gisplan.com.br/xmlsat";

/// Values for one camera section of a metadata document.
#[derive(Debug, Clone)]
pub struct MetadataXml {
    pub mission: String,
    pub number: String,
    pub instrument: String,
    pub level: String,
    pub center_time: String,
    pub ul: Corner,
    pub ur: Corner,
    pub lr: Corner,
    pub ll: Corner,
    pub ct: Corner,
    pub bbox_ll: Corner,
    pub bbox_ur: Corner,
    pub sun_azimuth: f64,
    pub sun_elevation: f64,
    pub off_nadir: f64,
    pub velocity_z: f64,
    pub projection: String,
    pub origin: Corner,
    /// Band id and optional gain attribute
    pub bands: Vec<(String, Option<f64>)>,
    /// Section names to leave out, e.g. `"sunPosition"`
    pub omit: Vec<String>,
}

impl MetadataXml {
    /// A plausible scene with four bands; callers override what they test.
    pub fn new(mission: &str, number: &str, instrument: &str, level: &str) -> Self {
        Self {
            mission: mission.to_string(),
            number: number.to_string(),
            instrument: instrument.to_string(),
            level: level.to_string(),
            center_time: "2020-01-01T13:00:00.000000".to_string(),
            ul: (-10.0, -50.0),
            ur: (-10.2, -49.0),
            lr: (-11.2, -49.2),
            ll: (-11.0, -50.2),
            ct: (-10.6, -49.6),
            bbox_ll: (-11.2, -50.2),
            bbox_ur: (-10.0, -49.0),
            sun_azimuth: 60.0,
            sun_elevation: 55.0,
            off_nadir: 0.0,
            velocity_z: -7000.0,
            projection: "UTM".to_string(),
            origin: (0.0, -51.0),
            bands: vec![
                ("1".to_string(), Some(1.0)),
                ("2".to_string(), Some(1.0)),
                ("3".to_string(), Some(1.0)),
                ("4".to_string(), Some(1.0)),
            ],
            omit: Vec::new(),
        }
    }

    pub fn with_bands(mut self, bands: &[&str]) -> Self {
        self.bands = bands.iter().map(|b| (b.to_string(), None)).collect();
        self
    }

    pub fn with_center(mut self, lat: f64, lon: f64) -> Self {
        self.ct = (lat, lon);
        self
    }

    pub fn with_projection(mut self, projection: &str) -> Self {
        self.projection = projection.to_string();
        self
    }

    pub fn without(mut self, section: &str) -> Self {
        self.omit.push(section.to_string());
        self
    }

    /// Full single-camera document.
    pub fn document(&self) -> String {
        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<prdf xmlns=\"{}\">\n{}</prdf>\n",
            PRDF_NAMESPACE,
            self.sections()
        )
    }

    /// Document carrying one camera wrapped in `leftCamera` or `rightCamera`.
    pub fn wrapped_document(&self, wrapper: &str) -> String {
        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<prdf xmlns=\"{}\">\n<{}>\n{}</{}>\n</prdf>\n",
            PRDF_NAMESPACE,
            wrapper,
            self.sections(),
            wrapper
        )
    }

    /// Split-optics document with both camera heads.
    pub fn dual_document(left: &MetadataXml, right: &MetadataXml) -> String {
        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<prdf xmlns=\"{}\">\n<leftCamera>\n{}</leftCamera>\n<rightCamera>\n{}</rightCamera>\n</prdf>\n",
            PRDF_NAMESPACE,
            left.sections(),
            right.sections()
        )
    }

    fn keep(&self, section: &str) -> bool {
        !self.omit.iter().any(|s| s == section)
    }

    fn sections(&self) -> String {
        let mut out = String::new();

        if self.keep("satellite") {
            let _ = write!(
                out,
                "  <satellite>\n    <name>{}</name>\n    <number>{}</number>\n    <instrument type=\"\">{}</instrument>\n  </satellite>\n",
                self.mission, self.number, self.instrument
            );
        }

        out.push_str("  <image>\n");
        let _ = writeln!(out, "    <level>{}</level>", self.level);
        if self.keep("timeStamp") {
            let _ = writeln!(
                out,
                "    <timeStamp><begin>{0}</begin><center>{0}</center><end>{0}</end></timeStamp>",
                self.center_time
            );
        }
        if self.keep("imageData") {
            out.push_str("    <imageData>\n");
            for (tag, corner) in [
                ("UL", self.ul),
                ("UR", self.ur),
                ("LR", self.lr),
                ("LL", self.ll),
                ("CT", self.ct),
            ] {
                out.push_str(&position(tag, corner));
            }
            out.push_str("    </imageData>\n");
        }
        if self.keep("boundingBox") {
            out.push_str("    <boundingBox>\n");
            out.push_str(&position("UL", (self.bbox_ur.0, self.bbox_ll.1)));
            out.push_str(&position("UR", self.bbox_ur));
            out.push_str(&position("LR", (self.bbox_ll.0, self.bbox_ur.1)));
            out.push_str(&position("LL", self.bbox_ll));
            out.push_str("    </boundingBox>\n");
        }
        if self.keep("sunPosition") {
            let _ = writeln!(
                out,
                "    <sunPosition><elevation>{}</elevation><sunAzimuth>{}</sunAzimuth></sunPosition>",
                self.sun_elevation, self.sun_azimuth
            );
        }
        let _ = writeln!(out, "    <offNadirAngle>{}</offNadirAngle>", self.off_nadir);
        if self.keep("projection") {
            let _ = writeln!(out, "    <projectionName>{}</projectionName>", self.projection);
            let _ = writeln!(out, "    <originLatitude>{}</originLatitude>", self.origin.0);
            let _ = writeln!(out, "    <originLongitude>{}</originLongitude>", self.origin.1);
        }
        if self.keep("availableBands") {
            out.push_str("    <availableBands>\n");
            for (band, gain) in &self.bands {
                match gain {
                    Some(gain) => {
                        let _ = writeln!(out, "      <band gain=\"{}\">{}</band>", gain, band);
                    }
                    None => {
                        let _ = writeln!(out, "      <band>{}</band>", band);
                    }
                }
            }
            out.push_str("    </availableBands>\n");
        }
        out.push_str("  </image>\n");

        if self.keep("ephemerides") {
            let _ = write!(
                out,
                "  <ephemerides>\n    <ephemeris><vx>1.0</vx><vy>2.0</vy><vz>{}</vz></ephemeris>\n    <ephemeris><vx>1.0</vx><vy>2.0</vy><vz>{}</vz></ephemeris>\n  </ephemerides>\n",
                self.velocity_z, -self.velocity_z
            );
        }

        out
    }
}

fn position(tag: &str, (lat, lon): Corner) -> String {
    format!(
        "      <{0}><latitude>{1}</latitude><longitude>{2}</longitude></{0}>\n",
        tag, lat, lon
    )
}
