//! Request bodies and JSON response views.
//!
//! Field names are camelCase on the wire (`bagId`, `payloadVolume`).

use crate::error::ApiError;
use cuboid_core::{Bag, BagWithCuboids, Cuboid, CuboidId, CuboidWithBag, NewBag, NewCuboid};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Body of `POST /cuboids` and `PUT /cuboids/:id`.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CuboidPayload {
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    pub bag_id: Uuid,
}

impl From<CuboidPayload> for NewCuboid {
    fn from(value: CuboidPayload) -> Self {
        NewCuboid::new(value.width, value.height, value.depth, value.bag_id)
    }
}

/// Body of `POST /bags`.
#[derive(Debug, Clone, Deserialize)]
pub struct BagPayload {
    pub volume: u64,
    #[serde(default)]
    pub title: Option<String>,
}

impl From<BagPayload> for NewBag {
    fn from(value: BagPayload) -> Self {
        NewBag {
            title: value.title,
            volume: value.volume,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CuboidView {
    #[serde(flatten)]
    pub cuboid: Cuboid,
    pub volume: u128,
}

impl From<Cuboid> for CuboidView {
    fn from(cuboid: Cuboid) -> Self {
        let volume = cuboid.volume();
        Self { cuboid, volume }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CuboidWithBagView {
    #[serde(flatten)]
    pub cuboid: CuboidView,
    pub bag: Bag,
}

impl From<CuboidWithBag> for CuboidWithBagView {
    fn from(value: CuboidWithBag) -> Self {
        Self {
            cuboid: value.cuboid.into(),
            bag: value.bag,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BagView {
    #[serde(flatten)]
    pub bag: Bag,
    pub payload_volume: u128,
    pub available_volume: u128,
    pub cuboids: Vec<CuboidView>,
}

impl From<BagWithCuboids> for BagView {
    fn from(value: BagWithCuboids) -> Self {
        let payload_volume = value.payload_volume();
        let available_volume = value.available_volume();
        Self {
            bag: value.bag,
            payload_volume,
            available_volume,
            cuboids: value.cuboids.into_iter().map(CuboidView::from).collect(),
        }
    }
}

/// Parses one path/query identifier.
pub fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw.trim()).map_err(|_| ApiError::BadRequest(format!("invalid id `{raw}`")))
}

/// Collects cuboid ids from `ids=a&ids=b`, `ids[]=a` or `ids=a,b` query pairs.
pub fn parse_id_list(pairs: &[(String, String)]) -> Result<Vec<CuboidId>, ApiError> {
    pairs
        .iter()
        .filter(|(key, _)| key == "ids" || key.starts_with("ids["))
        .flat_map(|(_, value)| value.split(','))
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(parse_id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{parse_id_list, BagView, CuboidView};
    use cuboid_core::{Bag, BagWithCuboids, Cuboid, NewCuboid};
    use uuid::Uuid;

    fn pair(key: &str, value: &str) -> (String, String) {
        (key.to_string(), value.to_string())
    }

    #[test]
    fn id_list_accepts_repeated_bracketed_and_comma_forms() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let c = Uuid::new_v4();
        let pairs = vec![
            pair("ids", &a.to_string()),
            pair("ids[]", &b.to_string()),
            pair("other", "ignored"),
            pair("ids", &format!("{c}, ")),
        ];

        assert_eq!(parse_id_list(&pairs).unwrap(), vec![a, b, c]);
    }

    #[test]
    fn id_list_rejects_malformed_id() {
        assert!(parse_id_list(&[pair("ids", "42")]).is_err());
    }

    #[test]
    fn views_carry_derived_volumes() {
        let bag = Bag::new(100, Some("box".to_string()));
        let cuboid = Cuboid::new(&NewCuboid::new(2, 5, 3, bag.id));

        let cuboid_json = serde_json::to_value(CuboidView::from(cuboid.clone())).unwrap();
        assert_eq!(cuboid_json["volume"], 30);
        assert_eq!(cuboid_json["bagId"], bag.id.to_string());

        let bag_json = serde_json::to_value(BagView::from(BagWithCuboids {
            bag,
            cuboids: vec![cuboid],
        }))
        .unwrap();
        assert_eq!(bag_json["payloadVolume"], 30);
        assert_eq!(bag_json["availableVolume"], 70);
        assert_eq!(bag_json["title"], "box");
        assert_eq!(bag_json["cuboids"].as_array().unwrap().len(), 1);
    }
}
