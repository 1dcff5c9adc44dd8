use crate::constants::{LISTING_GROUP, LISTING_OWNER, LISTING_PERMISSIONS, LISTING_TIMESTAMP};
use log::trace;
use std::path::Path;
use tokio::fs;

/// Formats one `LIST` line. Only the size and the name are real.
pub fn format_entry(name: &str, size: u64) -> String {
    format!(
        "{} 1 {} {} {} {} {}\r\n",
        LISTING_PERMISSIONS, LISTING_OWNER, LISTING_GROUP, size, LISTING_TIMESTAMP, name
    )
}

/// Builds the listing of `dir`: one line per regular file, in enumeration order.
///
/// Subdirectories, other non-regular entries and entries whose metadata cannot
/// be read are skipped. Symlinks are followed. Names that are not valid UTF-8
/// are left out, since clients could never request them by name.
pub async fn build_listing(dir: &Path) -> std::io::Result<String> {
    let mut listing = String::new();
    let mut entries = fs::read_dir(dir).await?;

    while let Some(entry) = entries.next_entry().await? {
        let metadata = match fs::metadata(entry.path()).await {
            Ok(metadata) => metadata,
            Err(e) => {
                trace!("Skipping {:?} in listing: {}", entry.path(), e);
                continue;
            }
        };
        if !metadata.is_file() {
            continue;
        }

        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            trace!("Skipping non UTF-8 name {:?} in listing", name);
            continue;
        };
        listing.push_str(&format_entry(name, metadata.len()));
    }

    Ok(listing)
}
