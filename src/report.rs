// Run report: counters gathered while walking the vault, plus the console
// summary printed at the end. Nothing here influences control flow.

use indicatif::ProgressBar;
use log::info;
use std::collections::{BTreeSet, HashSet};

/// An info line is logged every time this many notes have been uploaded.
const PROGRESS_LOG_EVERY: usize = 100;

/// How many `[[wikilinks]]` in uploaded notes point at another uploaded note.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LinkSummary {
    pub resolved: usize,
    pub unresolved: usize,
}

pub struct RunReport {
    notes_seen: usize,
    notes_uploaded: usize,
    folders_created: usize,
    uploaded_titles: HashSet<String>,
    outgoing_links: Vec<BTreeSet<String>>,
    progress: ProgressBar,
}

impl Default for RunReport {
    fn default() -> Self {
        Self::with_progress(ProgressBar::hidden())
    }
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report that also drives a terminal progress indicator.
    pub fn with_progress(progress: ProgressBar) -> Self {
        RunReport {
            notes_seen: 0,
            notes_uploaded: 0,
            folders_created: 0,
            uploaded_titles: HashSet::new(),
            outgoing_links: Vec::new(),
            progress,
        }
    }

    pub fn folder_created(&mut self) {
        self.folders_created += 1;
    }

    pub fn note_seen(&mut self) {
        self.notes_seen += 1;
        self.progress.tick();
    }

    /// Record a created note together with the wikilink targets in its body.
    pub fn note_uploaded(&mut self, title: &str, links: BTreeSet<String>) {
        self.notes_uploaded += 1;
        self.uploaded_titles.insert(title.to_string());
        if !links.is_empty() {
            self.outgoing_links.push(links);
        }

        self.progress
            .set_message(format!("{} notes uploaded", self.notes_uploaded));
        if self.notes_uploaded % PROGRESS_LOG_EVERY == 0 {
            info!("... {} notes uploaded", self.notes_uploaded);
        }
    }

    pub fn notes_seen(&self) -> usize {
        self.notes_seen
    }

    pub fn notes_uploaded(&self) -> usize {
        self.notes_uploaded
    }

    pub fn notes_failed(&self) -> usize {
        self.notes_seen.saturating_sub(self.notes_uploaded)
    }

    pub fn folders_created(&self) -> usize {
        self.folders_created
    }

    /// Print a console line without tearing the spinner.
    pub fn println(&self, line: &str) {
        self.progress.suspend(|| println!("{line}"));
    }

    /// Resolve collected wikilinks against the titles that made it upstream.
    pub fn link_summary(&self) -> LinkSummary {
        let mut summary = LinkSummary::default();
        for target in self.outgoing_links.iter().flatten() {
            if self.uploaded_titles.contains(target) {
                summary.resolved += 1;
            } else {
                summary.unresolved += 1;
            }
        }
        summary
    }

    /// Stop the progress indicator and print the totals.
    pub fn print_summary(&self) {
        self.progress.finish_and_clear();
        let links = self.link_summary();

        println!();
        println!("=== Upload finished ===");
        println!("Notes:   {}", self.notes_seen);
        println!("Success: {}", self.notes_uploaded);
        println!("Failed:  {}", self.notes_failed());
        println!("Folders: {}", self.folders_created);
        println!("Links:   {} resolved / {} unresolved", links.resolved, links.unresolved);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn links(titles: &[&str]) -> BTreeSet<String> {
        titles.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn failures_are_seen_minus_uploaded() {
        let mut report = RunReport::new();
        report.folder_created();
        for _ in 0..3 {
            report.note_seen();
        }
        report.note_uploaded("a", BTreeSet::new());

        assert_eq!(report.notes_seen(), 3);
        assert_eq!(report.notes_uploaded(), 1);
        assert_eq!(report.notes_failed(), 2);
        assert_eq!(report.folders_created(), 1);
    }

    #[test]
    fn failures_never_underflow() {
        let mut report = RunReport::new();
        report.note_uploaded("orphan", BTreeSet::new());
        assert_eq!(report.notes_failed(), 0);
    }

    #[test]
    fn links_resolve_against_uploaded_titles() {
        let mut report = RunReport::new();
        report.note_seen();
        report.note_uploaded("Alpha", links(&["Beta", "Missing"]));
        report.note_seen();
        report.note_uploaded("Beta", links(&["Alpha"]));
        report.note_seen();

        assert_eq!(
            report.link_summary(),
            LinkSummary { resolved: 2, unresolved: 1 }
        );
    }
}
