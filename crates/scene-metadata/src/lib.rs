//! Scene metadata parsing for CBERS-4, CBERS-4A and AMAZONIA-1.
//!
//! Turns an INPE ground-segment XML document plus its filename into a
//! [`NormalizedMetadataRecord`], and derives the geometric values the STAC
//! item needs from it.
//!
//! # Pipeline
//!
//! - [`parse_filename`] validates the scene naming convention
//! - [`parse_metadata`] reads the XML (single or split left/right optics)
//! - [`fuse_optics`] merges dual-optics footprints in place
//! - [`derive_epsg`] and [`orbit_state`] compute projection and orbit values
//!
//! Everything here is pure: no I/O, no shared state.

pub mod derive;
pub mod filename;
pub mod parser;
pub mod record;
pub mod xml;

pub use derive::{derive_epsg, fuse_optics, orbit_state, OrbitState};
pub use filename::{metadata_candidates, parse_filename, FileExtension, FilenameKeys};
pub use parser::parse_metadata;
pub use record::{
    BandInfo, Mission, NormalizedMetadataRecord, OpticSide, Optics, RightOptic, SceneCorners,
    SceneIds, SunPosition,
};

use stac_common::StacResult;

/// Parse a metadata document and apply dual-optics fusion.
///
/// This is the record the item builder expects.
pub fn prepare_record(xml: &str, filename: &str) -> StacResult<NormalizedMetadataRecord> {
    let mut record = parse_metadata(xml, filename)?;
    fuse_optics(&mut record);
    Ok(record)
}
