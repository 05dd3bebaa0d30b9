//! Media reference rewriting.

use html5ever::tendril::StrTendril;
use markup5ever_rcdom::{Handle, NodeData};

/// Elements whose `src` names a media file.
const MEDIA_TAGS: &[&str] = &["img"];

/// Rewrite every local media reference under `handle` to its file name,
/// recording the original references in document order.
pub fn rewrite_media(handle: &Handle, media_paths: &mut Vec<String>) {
    if let NodeData::Element { name, attrs, .. } = &handle.data {
        if MEDIA_TAGS.contains(&&*name.local) {
            for attr in attrs.borrow_mut().iter_mut() {
                if &*attr.name.local != "src" {
                    continue;
                }
                let original = attr.value.to_string();
                if original.is_empty() || is_remote(&original) {
                    continue;
                }
                let base = file_name(&original);
                if base != original {
                    tracing::debug!("Rewrote media reference {} to {}", original, base);
                    attr.value = StrTendril::from(base);
                }
                media_paths.push(original);
            }
        }
    }

    for child in handle.children.borrow().iter() {
        rewrite_media(child, media_paths);
    }
}

/// Final path component of a reference.
pub fn file_name(reference: &str) -> &str {
    reference.rsplit('/').next().unwrap_or(reference)
}

fn is_remote(reference: &str) -> bool {
    reference.contains("://") || reference.starts_with("data:")
}
