//! Built-in trusted sources.

use tracing::{debug, info};

use crate::error::Result;
use crate::traits::store::SourceRegistry;
use crate::types::source::Source;

/// Community, editorial and local GTA food coverage.
pub const DEFAULT_SOURCES: &[(&str, &str)] = &[
    ("reddit.com", "Community discussions"),
    ("chowhound.com", "Serious foodies"),
    ("blogto.com", "Local Toronto coverage"),
    ("torontolife.com", "Magazine reviews"),
    ("eater.com", "High quality journalism"),
    ("yelp.ca", "User reviews (careful with these)"),
    ("youtube.com", "Vlog titles and descriptions"),
    ("theinfatuation.com", "Highly trusted, specific reviews"),
    ("guide.michelin.com", "High-end and Bib Gourmand findings"),
    ("bonappetit.com", "Culinary journalism"),
    ("cntraveler.com", "Travel food guides"),
    ("narcity.com", "Trendy, viral spots in Toronto"),
    ("curiocity.com", "Local happenings and food news"),
    ("streetsoftoronto.com", "Dedicated local coverage"),
    ("tastetoronto.com", "Visual-heavy local features"),
    ("cbc.ca/news/canada/toronto", "Occasional food reporting"),
];

/// Register every default source. Returns how many were new.
pub async fn seed_sources(registry: &dyn SourceRegistry) -> Result<usize> {
    let mut added = 0;
    for (domain, notes) in DEFAULT_SOURCES {
        if registry.add_source(&Source::new(*domain, *notes)).await?.is_inserted() {
            debug!(domain, "Added source");
            added += 1;
        }
    }
    info!(added, total = DEFAULT_SOURCES.len(), "Seeded sources");
    Ok(added)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::MemoryStore;

    #[tokio::test]
    async fn seeding_is_idempotent() {
        let store = MemoryStore::new();

        assert_eq!(seed_sources(&store).await.unwrap(), DEFAULT_SOURCES.len());
        assert_eq!(seed_sources(&store).await.unwrap(), 0);
        assert_eq!(store.list_sources().await.unwrap().len(), DEFAULT_SOURCES.len());
    }
}
