// Tree walker: mirrors the vault's folder hierarchy upstream, depth-first.
//
// A folder is created before anything inside it. Subdirectories are visited
// before the notes of the same directory, and both in lexicographic order, so
// slug collisions always resolve the same way for the same vault.

use crate::api::{ApiError, NewFolder, NewNote, VaultApi};
use crate::config::SyncConfig;
use crate::report::RunReport;
use crate::rewrite::{asset_folder_key, extract_tags, extract_wikilinks, rewrite_image_paths};
use crate::slug::{slugify, SlugRegistry};
use log::{debug, warn};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Suffix of the files uploaded as notes.
pub const NOTE_EXTENSION: &str = ".md";

/// Conditions that stop the whole run. Per-folder and per-note failures are
/// logged and counted instead.
#[derive(Error, Debug)]
pub enum WalkError {
    #[error("cannot read vault root {}: {source}", .path.display())]
    ReadRoot {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("lost connection to the vault API")]
    Transport(#[source] ApiError),
}

/// Position in the tree handed down the recursion.
#[derive(Debug, Clone, Copy)]
struct VisitContext<'a> {
    parent_id: Option<&'a str>,
    depth: usize,
    asset_key: &'a str,
}

/// Directory entries split into what gets walked and what gets uploaded.
#[derive(Debug, Default)]
struct DirListing {
    subdirs: Vec<(String, PathBuf)>,
    notes: Vec<(String, PathBuf)>,
}

pub struct TreeWalker<'a, A: VaultApi> {
    api: &'a A,
    config: &'a SyncConfig,
    slugs: SlugRegistry,
    report: RunReport,
}

impl<'a, A: VaultApi> TreeWalker<'a, A> {
    pub fn new(api: &'a A, config: &'a SyncConfig, report: RunReport) -> Self {
        TreeWalker {
            api,
            config,
            slugs: SlugRegistry::new(),
            report,
        }
    }

    pub fn into_report(self) -> RunReport {
        self.report
    }

    /// Upload every top-level directory under the configured root.
    ///
    /// Files sitting directly in the root are not uploaded. Each top-level
    /// directory fixes the image asset folder for its whole subtree.
    pub fn run(&mut self) -> Result<(), WalkError> {
        let config = self.config;
        let root = &config.root_path;
        let listing = self.list_dir(root).map_err(|source| WalkError::ReadRoot {
            path: root.clone(),
            source,
        })?;

        let names: Vec<&str> = listing.subdirs.iter().map(|(n, _)| n.as_str()).collect();
        debug!("Top-level folders: {names:?}");

        for (name, path) in &listing.subdirs {
            let asset_key = asset_folder_key(name);
            let ctx = VisitContext {
                parent_id: None,
                depth: 0,
                asset_key: &asset_key,
            };
            self.visit_directory(name, path, ctx)?;
        }
        Ok(())
    }

    fn visit_directory(
        &mut self,
        name: &str,
        path: &Path,
        ctx: VisitContext<'_>,
    ) -> Result<(), WalkError> {
        let slug = self.slugs.make_unique(&slugify(name));
        let folder = NewFolder {
            name,
            slug: &slug,
            parent: ctx.parent_id,
        };

        let folder_id = match self.api.create_folder(&folder) {
            Ok(id) => id,
            Err(e) if e.is_transport() => return Err(WalkError::Transport(e)),
            Err(e) => {
                warn!("Folder creation failed, skipping subtree: {} - {e}", path.display());
                return Ok(());
            }
        };
        self.report.folder_created();
        self.report
            .println(&format!("{}[folder] {name}", indent(ctx.depth)));

        let listing = match self.list_dir(path) {
            Ok(listing) => listing,
            Err(e) => {
                warn!("Cannot read directory {}: {e}", path.display());
                return Ok(());
            }
        };

        let child_ctx = VisitContext {
            parent_id: Some(&folder_id),
            depth: ctx.depth + 1,
            asset_key: ctx.asset_key,
        };
        for (child_name, child_path) in &listing.subdirs {
            self.visit_directory(child_name, child_path, child_ctx)?;
        }
        for (file_name, file_path) in &listing.notes {
            self.visit_note(file_name, file_path, &folder_id, child_ctx)?;
        }
        Ok(())
    }

    fn visit_note(
        &mut self,
        file_name: &str,
        path: &Path,
        folder_id: &str,
        ctx: VisitContext<'_>,
    ) -> Result<(), WalkError> {
        self.report.note_seen();
        let title = file_name.strip_suffix(NOTE_EXTENSION).unwrap_or(file_name);
        let slug = self.slugs.make_unique(&slugify(title));

        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("{}Read failed: {file_name} - {e}", indent(ctx.depth));
                return Ok(());
            }
        };

        let content = rewrite_image_paths(&raw, ctx.asset_key);
        let tags = extract_tags(&content);
        let note = NewNote {
            title,
            slug: &slug,
            content: &content,
            folder_id,
            tags: &tags,
        };

        match self.api.create_note(&note) {
            Ok(id) => {
                debug!("Created note {title} ({slug}) as {id}");
                self.report.note_uploaded(title, extract_wikilinks(&raw));
            }
            Err(e) if e.is_transport() => return Err(WalkError::Transport(e)),
            Err(e) => warn!("Note upload failed: {title} - {e}"),
        }
        Ok(())
    }

    /// Sorted subdirectories (minus skipped ones) and sorted `.md` files.
    fn list_dir(&self, dir: &Path) -> io::Result<DirListing> {
        let mut listing = DirListing::default();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            let path = entry.path();
            if path.is_dir() {
                if !self.config.is_skipped(&name) {
                    listing.subdirs.push((name, path));
                }
            } else if path.is_file() && name.ends_with(NOTE_EXTENSION) {
                listing.notes.push((name, path));
            }
        }
        listing.subdirs.sort();
        listing.notes.sort();
        Ok(listing)
    }
}

fn indent(depth: usize) -> String {
    "  ".repeat(depth)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_is_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        for sub in ["b", "a", ".obsidian", "image", "c"] {
            fs::create_dir(root.join(sub)).unwrap();
        }
        for file in ["z.md", "m.md", "pic.png", "notes.txt"] {
            fs::write(root.join(file), "x").unwrap();
        }

        let config = SyncConfig {
            root_path: root.to_path_buf(),
            ..SyncConfig::default()
        };
        let api = NoApi;
        let walker = TreeWalker::new(&api, &config, RunReport::new());
        let listing = walker.list_dir(root).unwrap();

        let subdirs: Vec<&str> = listing.subdirs.iter().map(|(n, _)| n.as_str()).collect();
        let notes: Vec<&str> = listing.notes.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(subdirs, vec!["a", "b", "c"]);
        assert_eq!(notes, vec!["m.md", "z.md"]);
    }

    #[test]
    fn indent_grows_by_two_spaces() {
        assert_eq!(indent(0), "");
        assert_eq!(indent(2), "    ");
    }

    struct NoApi;

    impl VaultApi for NoApi {
        fn create_folder(&self, _folder: &NewFolder<'_>) -> Result<String, ApiError> {
            Err(ApiError::MissingField("id"))
        }

        fn create_note(&self, _note: &NewNote<'_>) -> Result<String, ApiError> {
            Err(ApiError::MissingField("id"))
        }
    }
}
