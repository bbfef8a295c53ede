use crate::store::{MetadataStore, StoredEpisode};
use crate::types::{ChannelInfo, EpisodeRecord, Result};
use chrono::{DateTime, Utc};
use rss::extension::itunes::ITunesChannelExtension;
use rss::{Channel, Enclosure, Guid, Item};
use tracing::info;

const AUDIO_MIME: &str = "audio/mpeg";

/// Rebuilds the public feed from whatever is in the metadata store.
/// Nothing produced by the current run is trusted unless it is on disk.
pub struct FeedStateManager {
    channel: ChannelInfo,
    retention_cap: usize,
}

impl FeedStateManager {
    pub fn new(channel: ChannelInfo, retention_cap: usize) -> Self {
        Self {
            channel,
            retention_cap,
        }
    }

    /// The `retention_cap` most recent records, most recent first.
    /// Ties are broken by slug so the order is total.
    pub fn window(&self, mut episodes: Vec<StoredEpisode>) -> Vec<EpisodeRecord> {
        episodes.sort_by(|a, b| {
            b.recency()
                .cmp(&a.recency())
                .then_with(|| b.record.slug.cmp(&a.record.slug))
        });
        episodes
            .into_iter()
            .take(self.retention_cap)
            .map(|e| e.record)
            .collect()
    }

    /// Serialize a window into an RSS 2.0 document. Every item is stamped
    /// with `rebuilt_at`, not with its own generation time.
    pub fn render(&self, window: &[EpisodeRecord], rebuilt_at: DateTime<Utc>) -> Result<String> {
        let pub_date = rebuilt_at.format("%a, %d %b %Y %H:%M:%S +0000").to_string();
        let items: Vec<Item> = window.iter().map(|r| feed_item(r, &pub_date)).collect();

        let mut itunes = ITunesChannelExtension::default();
        itunes.set_author(Some(self.channel.author.clone()));
        itunes.set_summary(Some(self.channel.description.clone()));
        itunes.set_explicit(Some(self.channel.explicit.to_string()));

        let mut channel = Channel::default();
        channel.set_title(self.channel.title.clone());
        channel.set_link(self.channel.link.clone());
        channel.set_description(self.channel.description.clone());
        channel.set_language(Some(self.channel.language.clone()));
        channel.set_itunes_ext(Some(itunes));
        channel.set_items(items);

        let buffer = channel.pretty_write_to(Vec::new(), b' ', 2)?;
        let mut document = String::from_utf8_lossy(&buffer).into_owned();
        document.push('\n');
        Ok(document)
    }

    /// Load every record, apply retention, and serialize.
    pub fn rebuild(&self, store: &MetadataStore, rebuilt_at: DateTime<Utc>) -> Result<String> {
        let episodes = store.load_all()?;
        let total = episodes.len();
        let window = self.window(episodes);
        info!(
            "Rebuilding feed with {} of {} records (retention {})",
            window.len(),
            total,
            self.retention_cap
        );
        self.render(&window, rebuilt_at)
    }

    /// Rebuild and write the feed document into the site root.
    pub fn publish(&self, store: &MetadataStore, rebuilt_at: DateTime<Utc>) -> Result<String> {
        let document = self.rebuild(store, rebuilt_at)?;
        let path = store.paths().feed_document();
        std::fs::write(&path, &document)?;
        info!("Wrote feed {}", path.display());
        Ok(document)
    }
}

fn feed_item(record: &EpisodeRecord, pub_date: &str) -> Item {
    let mut enclosure = Enclosure::default();
    enclosure.set_url(record.audio_url.clone());
    enclosure.set_length(record.filesize.to_string());
    enclosure.set_mime_type(AUDIO_MIME.to_string());

    let mut guid = Guid::default();
    guid.set_value(record.slug.clone());
    guid.set_permalink(false);

    let mut item = Item::default();
    item.set_title(Some(record.title.clone()));
    item.set_description(Some(format!(
        "Generated at {} (build {}).",
        record.generated_at_utc, record.build_id
    )));
    item.set_pub_date(Some(pub_date.to_string()));
    item.set_enclosure(Some(enclosure));
    item.set_guid(Some(guid));
    item
}
