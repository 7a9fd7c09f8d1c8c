//! Pictogram lookup and resolution.
//!
//! Resolution never fails outward: an unmapped label, a refused signing
//! request or an undecodable body all produce a [`ResolvedImage`] without an
//! image, and the grid cell falls back to its text label.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, warn};

use crate::embed::{decode_image, EmbeddedImage};
use crate::error::StorageError;
use crate::storage::{ImageFetcher, RemoteImageBucket};

/// Signed URLs are requested for one hour.
pub const SIGNED_URL_TTL_SECS: u64 = 3600;
/// Icons per grid row.
pub const GRID_COLUMNS: usize = 4;

/// Fixed mapping from a display label to a storage filename.
#[derive(Debug)]
pub struct IconCatalog {
    pub name: &'static str,
    entries: &'static [(&'static str, &'static str)],
}

impl IconCatalog {
    pub fn filename(&self, label: &str) -> Option<&'static str> {
        let label = label.trim();
        self.entries
            .iter()
            .find(|(l, _)| l.eq_ignore_ascii_case(label))
            .map(|(_, f)| *f)
    }

    pub fn labels(&self) -> impl Iterator<Item = &'static str> {
        self.entries.iter().map(|(l, _)| *l)
    }
}

pub static PPE_ICONS: IconCatalog = IconCatalog {
    name: "ppe",
    entries: &[
        ("Hard Hat", "hard-hat.png"),
        ("Safety Gloves", "safety-gloves.png"),
        ("Safety Goggles", "safety-goggles.png"),
        ("Face Shield", "face-shield.png"),
        ("Ear Protection", "ear-protection.png"),
        ("Dust Mask", "dust-mask.png"),
        ("Respirator", "respirator.png"),
        ("Safety Boots", "safety-boots.png"),
        ("High Visibility Vest", "hi-vis-vest.png"),
        ("Protective Overalls", "protective-overalls.png"),
        ("Safety Harness", "safety-harness.png"),
        ("Apron", "apron.png"),
    ],
};

pub static HAZARD_ICONS: IconCatalog = IconCatalog {
    name: "hazard",
    entries: &[
        ("Explosive", "explosive.png"),
        ("Flammable", "flammable.png"),
        ("Oxidising", "oxidising.png"),
        ("Gas Under Pressure", "gas-under-pressure.png"),
        ("Corrosive", "corrosive.png"),
        ("Acute Toxicity", "acute-toxicity.png"),
        ("Harmful", "harmful.png"),
        ("Health Hazard", "health-hazard.png"),
        ("Environmental Hazard", "environmental-hazard.png"),
    ],
};

/// A label and, when resolution worked, its pixels plus the end of the
/// signed-URL lease they were fetched under.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedImage {
    pub label: String,
    pub image: Option<EmbeddedImage>,
    pub valid_until: Option<DateTime<Utc>>,
}

impl ResolvedImage {
    pub fn text_only(label: &str) -> Self {
        Self { label: label.to_string(), image: None, valid_until: None }
    }

    pub fn is_resolved(&self) -> bool {
        self.image.is_some()
    }
}

/// Looks up, signs, fetches and decodes one icon.
pub async fn resolve_icon(
    label: &str,
    catalog: &IconCatalog,
    bucket: &dyn RemoteImageBucket,
    fetcher: &dyn ImageFetcher,
) -> ResolvedImage {
    let Some(filename) = catalog.filename(label) else {
        debug!("No {} icon mapped for '{}'", catalog.name, label);
        return ResolvedImage::text_only(label);
    };

    let leased_at = Utc::now();
    match fetch_icon(filename, bucket, fetcher).await {
        Ok(image) => ResolvedImage {
            label: label.to_string(),
            image: Some(image),
            valid_until: Some(leased_at + Duration::seconds(SIGNED_URL_TTL_SECS as i64)),
        },
        Err(e) => {
            warn!("⚠️ Icon '{}' from bucket '{}' unavailable: {}", label, bucket.bucket_name(), e);
            ResolvedImage::text_only(label)
        }
    }
}

async fn fetch_icon(
    filename: &str,
    bucket: &dyn RemoteImageBucket,
    fetcher: &dyn ImageFetcher,
) -> Result<EmbeddedImage, StorageError> {
    let url = bucket.sign(filename, SIGNED_URL_TTL_SECS).await?;
    let bytes = fetcher.fetch(&url).await?;
    decode_image(&bytes)
}

/// Resolves icons for one catalog/bucket pair.
#[derive(Clone)]
pub struct IconResolver {
    pub catalog: &'static IconCatalog,
    pub bucket: Arc<dyn RemoteImageBucket>,
    pub fetcher: Arc<dyn ImageFetcher>,
}

impl IconResolver {
    pub fn new(
        catalog: &'static IconCatalog,
        bucket: Arc<dyn RemoteImageBucket>,
        fetcher: Arc<dyn ImageFetcher>,
    ) -> Self {
        Self { catalog, bucket, fetcher }
    }

    pub async fn resolve(&self, label: &str) -> ResolvedImage {
        resolve_icon(label, self.catalog, self.bucket.as_ref(), self.fetcher.as_ref()).await
    }

    /// Resolves up to [`GRID_COLUMNS`] labels concurrently and waits for all of them.
    pub async fn resolve_row(&self, labels: &[String]) -> Vec<ResolvedImage> {
        debug_assert!(labels.len() <= GRID_COLUMNS);
        let slot = |i: usize| {
            let label = labels.get(i);
            async move {
                match label {
                    Some(l) => Some(self.resolve(l).await),
                    None => None,
                }
            }
        };
        let (a, b, c, d) = tokio::join!(slot(0), slot(1), slot(2), slot(3));
        [a, b, c, d].into_iter().flatten().collect()
    }

    /// Rows are resolved one after another, icons within a row together.
    /// The result is in label order.
    pub async fn resolve_grid(&self, labels: &[String]) -> Vec<ResolvedImage> {
        let mut resolved = Vec::with_capacity(labels.len());
        for row in labels.chunks(GRID_COLUMNS) {
            resolved.extend(self.resolve_row(row).await);
        }
        resolved
    }
}
