// Content module: rewrites image references inside a note so they point at
// the served upload location, and pulls tags and wikilinks out of the text.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use regex::{Captures, Regex};
use std::collections::BTreeSet;
use std::sync::LazyLock;

/// Public path prefix the server exposes vault assets under.
pub const UPLOADS_PREFIX: &str = "/uploads/vault";

/// A note never carries more tags than this.
pub const MAX_TAGS: usize = 10;

/// Characters left untouched when encoding a file name into a URL path.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'_')
    .remove(b'.')
    .remove(b'-')
    .remove(b'~')
    .remove(b'/');

/// `![[file.png]]` embeds for the supported image extensions.
static EMBED_IMAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)!\[\[([^\]]+\.(?:png|jpg|jpeg|gif|webp|svg))\]\]").unwrap()
});

static IMAGE_FILE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\.(?:png|jpg|jpeg|gif|webp|svg)$").unwrap());

/// `![alt](image/file.png)` links into the vault's local image folder.
static LOCAL_IMAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[([^\]]*)\]\(image/([^)]+)\)").unwrap());

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\s)#([a-zA-Z0-9_가-힣]+)").unwrap());

/// Optional leading `!` is captured so embeds can be told apart from links.
static WIKILINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(!?)\[\[([^\]]+)\]\]").unwrap());

/// Asset folder key for a top-level vault directory, e.g. `Backend` ->
/// `backend-image`. Every image below that directory is served from it.
pub fn asset_folder_key(top_level_dir: &str) -> String {
    format!("{}-image", top_level_dir.to_lowercase())
}

/// Build the served URL for an image file inside an asset folder.
pub fn asset_url(asset_key: &str, file_name: &str) -> String {
    format!(
        "{UPLOADS_PREFIX}/{asset_key}/{}",
        utf8_percent_encode(file_name, PATH_SEGMENT)
    )
}

/// Rewrite both image reference styles so they point at
/// `/uploads/vault/<asset_key>/<file>`.
///
/// Embeds (`![[diagram.png]]`) become standard image links whose alt text is
/// the file name. Standard links into `image/` keep their alt text. The
/// filesystem is never consulted.
pub fn rewrite_image_paths(content: &str, asset_key: &str) -> String {
    let embeds_rewritten = EMBED_IMAGE_RE.replace_all(content, |caps: &Captures| {
        let file = &caps[1];
        format!("![{file}]({})", asset_url(asset_key, file))
    });

    LOCAL_IMAGE_RE
        .replace_all(&embeds_rewritten, |caps: &Captures| {
            format!("![{}]({})", &caps[1], asset_url(asset_key, &caps[2]))
        })
        .into_owned()
}

/// Collect `#tag` tokens that start the text or follow whitespace.
///
/// Duplicates collapse and at most [`MAX_TAGS`] are returned.
pub fn extract_tags(content: &str) -> Vec<String> {
    TAG_RE
        .captures_iter(content)
        .map(|caps| caps[1].to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .take(MAX_TAGS)
        .collect()
}

/// Titles referenced through `[[title]]`, `[[title#anchor]]` or
/// `[[title|alias]]`. Note transclusions (`![[Other Note]]`) count as links,
/// image embeds do not.
pub fn extract_wikilinks(content: &str) -> BTreeSet<String> {
    WIKILINK_RE
        .captures_iter(content)
        .filter(|caps| caps[1].is_empty() || !IMAGE_FILE_RE.is_match(caps[2].trim()))
        .filter_map(|caps| {
            let target = caps[2].split(['#', '|']).next().unwrap_or_default().trim();
            (!target.is_empty()).then(|| target.to_string())
        })
        .collect()
}
