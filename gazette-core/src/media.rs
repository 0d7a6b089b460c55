//! Media buckets and the files filed under them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named group of related media files (building photos, generic art, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaBucket {
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub description: String,
}

/// Why the paper is allowed to use a file. Serialized as the one-letter
/// code used by the editing tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LicenseType {
    #[serde(rename = "g")]
    Gazette,
    #[serde(rename = "c")]
    CreativeCommons,
    #[serde(rename = "f")]
    PublicUse,
    #[serde(rename = "p")]
    Permission,
    #[serde(rename = "o")]
    Other,
}

impl LicenseType {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Gazette => "Created by the Gazette",
            Self::CreativeCommons => "Creative Commons",
            Self::PublicUse => "Free for Public Use",
            Self::Permission => "Specific permission from the creator",
            Self::Other => "Other (note in description)",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contributor {
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    #[default]
    File,
    Image,
}

/// Explicit crops/renditions an image may carry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImageRenditions {
    #[serde(default)]
    pub front: Option<String>,
    #[serde(default)]
    pub thumb: Option<String>,
    #[serde(default)]
    pub front_is_tall: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaFile {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    pub bucket: String,
    #[serde(default)]
    pub kind: MediaKind,
    /// Public URL of the stored original.
    pub url: String,
    #[serde(default)]
    pub author_name: Option<String>,
    #[serde(default)]
    pub contributors: Vec<Contributor>,
    pub license_type: LicenseType,
    #[serde(default)]
    pub source_url: Option<String>,
    #[serde(default)]
    pub description: String,
    pub pub_date: DateTime<Utc>,
    #[serde(default)]
    pub renditions: ImageRenditions,
}

/// Which front-page slot an image is being placed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontSlot {
    Top,
    Mid,
}

impl MediaFile {
    /// Who to credit: an explicit author name wins, otherwise the
    /// contributors' full names ordered by last name.
    pub fn credit(&self) -> String {
        if let Some(name) = self.author_name.as_deref().filter(|n| !n.trim().is_empty()) {
            return name.to_string();
        }
        let mut people: Vec<&Contributor> = self.contributors.iter().collect();
        people.sort_by(|a, b| a.last_name.cmp(&b.last_name));
        people
            .iter()
            .map(|c| format!("{} {}", c.first_name, c.last_name))
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn path(&self) -> String {
        format!("/media/{}/{}", self.bucket, self.slug)
    }

    pub fn tall_or_wide(&self) -> &'static str {
        if self.renditions.front_is_tall {
            "tall"
        } else {
            "wide"
        }
    }

    /// URL for the front-page rendition: an explicit front crop if there is
    /// one, otherwise the generated tall or wide variant for the slot.
    pub fn front_image(&self, slot: FrontSlot) -> String {
        if let Some(front) = &self.renditions.front {
            return front.clone();
        }
        let slot = match slot {
            FrontSlot::Top => "top",
            FrontSlot::Mid => "mid",
        };
        format!("{}?variant={}{}front", self.url, slot, self.tall_or_wide())
    }

    pub fn thumbnail(&self) -> String {
        self.renditions
            .thumb
            .clone()
            .unwrap_or_else(|| format!("{}?variant=thumbnail", self.url))
    }

    /// Fill in a missing slug from the file's name.
    pub fn with_default_slug(mut self) -> Self {
        if self.slug.is_empty() {
            self.slug = slugify(&self.name);
        }
        self
    }
}

impl MediaBucket {
    pub fn with_default_slug(mut self) -> Self {
        if self.slug.is_empty() {
            self.slug = slugify(&self.name);
        }
        self
    }
}

/// Lowercase ASCII alphanumerics joined by single dashes.
pub fn slugify(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<&str>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file() -> MediaFile {
        MediaFile {
            id: Uuid::new_v4(),
            name: "Parrish Hall at Dusk".to_string(),
            slug: String::new(),
            bucket: "buildings".to_string(),
            kind: MediaKind::Image,
            url: "/uploads/2009/03/04/parrish.jpg".to_string(),
            author_name: None,
            contributors: vec![
                Contributor { first_name: "Sam".into(), last_name: "Young".into() },
                Contributor { first_name: "Ana".into(), last_name: "Baker".into() },
            ],
            license_type: LicenseType::Gazette,
            source_url: None,
            description: String::new(),
            pub_date: Utc::now(),
            renditions: ImageRenditions::default(),
        }
    }

    #[test]
    fn test_credit_orders_contributors_by_last_name() {
        assert_eq!(file().credit(), "Ana Baker, Sam Young");
    }

    #[test]
    fn test_author_name_overrides_contributors() {
        let mut f = file();
        f.author_name = Some("College Archives".to_string());
        assert_eq!(f.credit(), "College Archives");
    }

    #[test]
    fn test_default_slug_and_path() {
        let f = file().with_default_slug();
        assert_eq!(f.slug, "parrish-hall-at-dusk");
        assert_eq!(f.path(), "/media/buildings/parrish-hall-at-dusk");
        assert_eq!(slugify("  Arts & Features!! "), "arts-features");
    }

    #[test]
    fn test_front_image_prefers_explicit_crop() {
        let mut f = file();
        assert_eq!(f.front_image(FrontSlot::Top), "/uploads/2009/03/04/parrish.jpg?variant=topwidefront");
        f.renditions.front_is_tall = true;
        assert_eq!(f.front_image(FrontSlot::Mid), "/uploads/2009/03/04/parrish.jpg?variant=midtallfront");
        f.renditions.front = Some("/uploads/front.jpg".to_string());
        assert_eq!(f.front_image(FrontSlot::Mid), "/uploads/front.jpg");
    }

    #[test]
    fn test_license_codes() {
        assert!(serde_json::from_str::<LicenseType>("\"x\"").is_err());
        let parsed: LicenseType = serde_json::from_str("\"p\"").unwrap();
        assert_eq!(parsed.label(), "Specific permission from the creator");
    }
}
