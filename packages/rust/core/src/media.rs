//! Media resolution: replace `media-tag` placeholders with inline images.
//!
//! Every media reference with attached media is resolved by its own task.
//! All tasks start together and [`resolve_media`] returns only after the
//! last one has completed. Results are written into a clone of the input,
//! in completion order, matched by the reference's `src`.

use std::future::Future;
use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{debug, instrument, warn};

use padexport_shared::{DRAG_HANDLE_CLASS, Element, MediaObject, Node, Result};

/// Turns attached media into something an `<img src>` can display.
pub trait MediaResolver: Send + Sync + 'static {
    /// Resolve `media` to an inline representation (typically a data URI).
    fn resolve(&self, media: Arc<MediaObject>) -> impl Future<Output = Result<String>> + Send;
}

/// Encodes attached bytes as a `data:` URI.
#[derive(Debug, Clone, Copy, Default)]
pub struct DataUriResolver;

impl MediaResolver for DataUriResolver {
    async fn resolve(&self, media: Arc<MediaObject>) -> Result<String> {
        Ok(media.to_data_uri())
    }
}

/// Resolve every media reference of `root` into a clone of it.
///
/// `root` itself is never modified. References without attached media are
/// left as they are. A failed resolution is logged and leaves its placeholder
/// untouched; it still counts as completed.
#[instrument(skip_all)]
pub async fn resolve_media<R: MediaResolver>(root: &Element, resolver: Arc<R>) -> Element {
    let mut clone = root.clone();
    let mut tasks = JoinSet::new();

    for media_ref in root.media_refs() {
        let Some(media) = media_ref.media.clone() else {
            debug!(src = ?media_ref.attr("src"), "media reference has nothing attached, skipping");
            continue;
        };
        let src = media_ref.attr("src").unwrap_or_default().to_string();
        let resolver = Arc::clone(&resolver);

        tasks.spawn(async move {
            let resolved = resolver.resolve(media).await;
            (src, resolved)
        });
    }

    let launched = tasks.len();
    debug!(launched, "media resolution started");

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((src, Ok(inline))) => {
                let replaced = apply_resolved(&mut clone, &src, &inline);
                debug!(%src, replaced, "media resolved");
            }
            Ok((src, Err(e))) => warn!(%src, error = %e, "media resolution failed"),
            Err(e) => warn!(error = %e, "media resolution task did not complete"),
        }
    }

    debug!(launched, "media resolution complete");
    clone
}

/// Point the images of every reference matching `src` at `inline`, then drop
/// the editor's drag handles around media references. Returns how many
/// images were rewritten.
fn apply_resolved(root: &mut Element, src: &str, inline: &str) -> usize {
    let mut replaced = 0;
    root.for_each_descendant_mut(&mut |el: &mut Element| {
        if el.is_media_ref() && el.attr("src") == Some(src) {
            el.for_each_descendant_mut(&mut |img: &mut Element| {
                if img.name == "img" {
                    img.set_attr("src", inline);
                    replaced += 1;
                }
            });
        }
    });

    strip_drag_handles(root);
    replaced
}

/// Remove drag-handle decorations anywhere under a media reference's parent.
fn strip_drag_handles(el: &mut Element) {
    let wraps_media = el
        .children
        .iter()
        .any(|child| matches!(child, Node::Element(c) if c.is_media_ref()));
    if wraps_media {
        el.remove_descendants_with_class(DRAG_HANDLE_CLASS);
    }

    for child in &mut el.children {
        if let Node::Element(c) = child {
            strip_drag_handles(c);
        }
    }
}
