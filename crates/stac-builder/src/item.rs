//! STAC Item builder.

use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

use scene_metadata::{derive_epsg, fuse_optics, orbit_state, NormalizedMetadataRecord};
use stac_common::{normalize_datetime, StacError, StacResult};
use stac_protocol::{
    media_types, rel, Asset, EoBand, Geometry, ItemProperties, Link, StacItem,
};

use crate::config::{asset_href, stac_href, BucketConfig};
use crate::tables::{MissionTables, ThumbnailFormat};

/// Object key of an item document:
/// `{MISSION}{NUMBER}/{SENSOR}/{PPP}/{RRR}/{item_id}.json`.
pub fn item_key(record: &NormalizedMetadataRecord) -> String {
    format!(
        "{}/{:03}/{:03}/{}.json",
        record.ids.sat_sensor, record.path, record.row, record.ids.item_id
    )
}

/// Builds STAC items from normalized records.
///
/// ```ignore
/// let item = ItemBuilder::new(&tables, &buckets).build(&record)?;
/// ```
#[derive(Debug, Clone)]
pub struct ItemBuilder<'a> {
    tables: &'a MissionTables,
    buckets: &'a BucketConfig,
    thumbnail: Option<ThumbnailFormat>,
}

impl<'a> ItemBuilder<'a> {
    pub fn new(tables: &'a MissionTables, buckets: &'a BucketConfig) -> Self {
        Self {
            tables,
            buckets,
            thumbnail: None,
        }
    }

    /// Override the mission's default thumbnail format.
    pub fn with_thumbnail(mut self, format: ThumbnailFormat) -> Self {
        self.thumbnail = Some(format);
        self
    }

    /// Build the item for one scene.
    ///
    /// Records still carrying unfused dual optics are fused on a copy.
    pub fn build(&self, record: &NormalizedMetadataRecord) -> StacResult<StacItem> {
        let fused;
        let record = if record.needs_fusion() {
            let mut copy = record.clone();
            fuse_optics(&mut copy);
            fused = copy;
            &fused
        } else {
            record
        };

        let (mission, camera) =
            self.tables
                .camera(record.mission, &record.number, &record.sensor)?;
        let collection_id = record.collection_id();
        let collection_gsd = camera.gsd();

        let corners = &record.corners;
        let geometry = Geometry::polygon(vec![
            corners.ll.to_lon_lat(),
            corners.lr.to_lon_lat(),
            corners.ur.to_lon_lat(),
            corners.ul.to_lon_lat(),
        ]);

        let prefix = record.mission.property_prefix();
        let mut extra = BTreeMap::new();
        extra.insert(format!("{}:data_type", prefix), Value::from(record.data_type()));
        extra.insert(format!("{}:path", prefix), Value::from(record.path));
        extra.insert(format!("{}:row", prefix), Value::from(record.row));

        let properties = ItemProperties {
            datetime: normalize_datetime(&record.acquisition_time)?,
            platform: mission.platform(),
            instruments: vec![record.sensor.clone()],
            gsd: collection_gsd,
            sun_azimuth: record.sun.azimuth,
            sun_elevation: record.sun.elevation,
            off_nadir: record.roll.abs(),
            epsg: derive_epsg(record)?,
            international_designator: mission.international_designator.clone(),
            orbit_state: orbit_state(record.velocity_z).as_str().to_string(),
            extra,
        };

        let mut item = StacItem::new(
            record.ids.item_id.clone(),
            collection_id.clone(),
            geometry,
            record.bounding_box().to_array(),
            properties,
        );

        // Assets
        let download_url = &record.ids.download_url;
        let thumbnail = self.thumbnail.as_ref().unwrap_or(&mission.thumbnail);
        item.assets.insert(
            "thumbnail".to_string(),
            Asset::new(asset_href(
                &self.buckets.cog,
                &format!("{}/{}", download_url, record.thumbnail_filename(&thumbnail.extension)),
            ))
            .with_type(thumbnail.media_type.clone())
            .with_title("Thumbnail")
            .with_roles(&["thumbnail"]),
        );
        item.assets.insert(
            "metadata".to_string(),
            Asset::new(asset_href(
                &self.buckets.metadata,
                &format!("{}/{}", download_url, record.metadata_filename),
            ))
            .with_type(media_types::XML)
            .with_title("INPE original metadata")
            .with_roles(&["metadata"]),
        );

        for band in &record.bands {
            let spec = camera.band(&band.id).ok_or_else(|| StacError::UnknownBand {
                collection: collection_id.clone(),
                band: band.id.clone(),
            })?;

            let mut eo_band = EoBand::new(spec.name());
            if let Some(common_name) = &spec.common_name {
                eo_band = eo_band.with_common_name(common_name.clone());
            }

            let mut asset = Asset::new(asset_href(
                &self.buckets.cog,
                &format!("{}/{}", download_url, record.band_filename(&band.id)),
            ))
            .with_type(media_types::COG)
            .with_title(format!("Band {}", band.id))
            .with_roles(&["data"])
            .with_eo_bands(vec![eo_band]);

            // Only coarser bands carry their own gsd
            if spec.gsd > collection_gsd {
                asset = asset.with_gsd(spec.gsd);
            }

            item.assets.insert(spec.name(), asset);
        }

        // Links
        let scene_prefix = format!(
            "{}/{:03}/{:03}",
            record.ids.sat_sensor, record.path, record.row
        );
        item.links = vec![
            Link::new(
                stac_href(&self.buckets.stac, &format!("{}/{}.json", scene_prefix, item.id)),
                rel::SELF,
            )
            .with_type(media_types::GEO_JSON),
            Link::new(
                stac_href(&self.buckets.stac, &format!("{}/catalog.json", scene_prefix)),
                rel::PARENT,
            )
            .with_type(media_types::JSON),
            Link::new(
                stac_href(
                    &self.buckets.stac,
                    &format!("{}/{}/collection.json", record.ids.sat_number, record.sensor),
                ),
                rel::COLLECTION,
            )
            .with_type(media_types::JSON),
        ];

        debug!(
            item_id = %item.id,
            collection = %item.collection,
            assets = item.assets.len(),
            "Built STAC item"
        );

        Ok(item)
    }
}
