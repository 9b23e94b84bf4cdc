//! Wire records for the public listing API. Field names stay camelCase on the
//! wire for compatibility with existing theme clients.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Gallery {
    pub gallery_id: i64,
    pub gallery_name: String,
    pub gallery_desc: String,
    pub gallery_date: String,
    pub gallery_location: String,
    pub gallery_thumbnail_url: String,
    pub gallery_url: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Menu {
    pub menu_id: i64,
    pub menu_name: String,
    pub menu_url: String,
    pub menu_sort: i32,
    pub menu_icon: String,
    pub menu_target: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Context, Result};

    #[test]
    fn gallery_serializes_camel_case() -> Result<()> {
        let gallery = Gallery {
            gallery_id: 1,
            gallery_name: "Sunset".to_string(),
            gallery_desc: String::new(),
            gallery_date: "2018-06-06".to_string(),
            gallery_location: String::new(),
            gallery_thumbnail_url: "/upload/thumb.jpg".to_string(),
            gallery_url: "/upload/full.jpg".to_string(),
        };
        let value = serde_json::to_value(&gallery)?;
        assert_eq!(
            value.get("galleryId").and_then(serde_json::Value::as_i64),
            Some(1)
        );
        assert!(value.get("galleryThumbnailUrl").is_some());
        assert!(value.get("gallery_id").is_none());
        Ok(())
    }

    #[test]
    fn menu_round_trips() -> Result<()> {
        let menu = Menu {
            menu_id: 7,
            menu_name: "Home".to_string(),
            menu_url: "/".to_string(),
            menu_sort: 0,
            menu_icon: String::new(),
            menu_target: "_self".to_string(),
        };
        let value = serde_json::to_value(&menu)?;
        let name = value
            .get("menuName")
            .and_then(serde_json::Value::as_str)
            .context("missing menuName")?;
        assert_eq!(name, "Home");
        let decoded: Menu = serde_json::from_value(value)?;
        assert_eq!(decoded, menu);
        Ok(())
    }
}
