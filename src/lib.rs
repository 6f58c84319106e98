// Library root
// -----------
// This crate uploads a local Markdown vault (nested folders of notes with
// embedded images) into the blog backend's vault API. The binary (`main.rs`)
// wires these modules together for a single run.
//
// Module responsibilities:
// - `api`: blocking HTTP client for login, folder and note creation, plus the
//   `VaultApi` trait the walker is written against.
// - `config`: run settings read from the environment.
// - `slug`: slug generation and run-wide uniqueness.
// - `rewrite`: image path rewriting, tag and wikilink extraction.
// - `walker`: depth-first traversal creating folders and notes in order.
// - `report`: counters and the final summary.
// - `ui`: credential prompts and the progress spinner.
pub mod api;
pub mod config;
pub mod report;
pub mod rewrite;
pub mod slug;
pub mod ui;
pub mod walker;
