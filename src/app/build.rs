//! Build orchestration: fetch → parse → render → attach → align.
//!
//! Every build takes a [`BuildTicket`] from the pipeline's generation
//! counter.  Only the most recent ticket may touch the surface; a fetch that
//! completes after a newer build started is dropped, so the latest request
//! always wins.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::BuildConfig;
use crate::core::{
    render::render_forest,
    source::{FetchError, Fetcher, SourceLocator},
    tree,
};
use crate::ui::{
    normalize::normalize_widths,
    surface::{AttachError, Surface},
};

#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Attach(#[from] AttachError),
}

/// What a finished build did to the surface.
#[derive(Debug)]
pub enum BuildOutcome {
    /// A tree is attached and aligned.
    Attached {
        elements: usize,
        max_depth: Option<usize>,
    },
    /// The fallback message replaced the surface contents.
    Failed(BuildError),
    /// A newer build started first; the surface was left alone.
    Superseded,
}

/// Claim on one build cycle.
#[derive(Debug, Clone)]
pub struct BuildTicket {
    generation: u64,
    latest: Arc<AtomicU64>,
}

impl BuildTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_current(&self) -> bool {
        self.latest.load(Ordering::Acquire) == self.generation
    }
}

pub struct BuildPipeline {
    config: BuildConfig,
    locator: SourceLocator,
    latest: Arc<AtomicU64>,
}

impl BuildPipeline {
    pub fn new(config: BuildConfig) -> Self {
        info!(
            source = %config.source,
            mount = %config.mount,
            "initializing tree build"
        );
        let locator = config.locator();
        Self {
            config,
            locator,
            latest: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    pub fn locator(&self) -> &SourceLocator {
        &self.locator
    }

    /// Start a new build cycle, invalidating every earlier ticket.
    pub fn begin(&self) -> BuildTicket {
        let generation = self.latest.fetch_add(1, Ordering::AcqRel) + 1;
        BuildTicket {
            generation,
            latest: Arc::clone(&self.latest),
        }
    }

    /// The message shown in place of the tree when a build fails.
    pub fn fallback_message(&self) -> String {
        format!("Unable to create tree for file list at {}", self.config.source)
    }

    /// Fetch and build in one go.
    pub async fn run(&self, fetcher: &Fetcher, surface: &mut Surface) -> BuildOutcome {
        let ticket = self.begin();
        let fetched = fetcher.fetch(&self.locator).await;
        self.complete(&ticket, fetched, surface)
    }

    /// Everything after the fetch.  Synchronous: once the text is here the
    /// build either lands on the surface in full or not at all.
    pub fn complete(
        &self,
        ticket: &BuildTicket,
        fetched: Result<String, FetchError>,
        surface: &mut Surface,
    ) -> BuildOutcome {
        if !ticket.is_current() {
            debug!(generation = ticket.generation(), "dropping superseded build");
            return BuildOutcome::Superseded;
        }

        let text = match fetched {
            Ok(text) => text,
            Err(e) => return self.fail(surface, e.into()),
        };

        let forest = tree::parse(&text);
        let rendered = render_forest(&forest);

        info!(mount = %self.config.mount, "attaching tree");
        if let Err(e) = surface.attach(&self.config.mount, &rendered) {
            return self.fail(surface, e.into());
        }
        normalize_widths(surface, rendered.max_depth);

        let elements = surface
            .mount(&self.config.mount)
            .map_or(0, |m| m.elements.len());
        info!(
            depth = rendered.max_depth.unwrap_or(0),
            elements,
            generation = ticket.generation(),
            "created tree"
        );
        BuildOutcome::Attached {
            elements,
            max_depth: rendered.max_depth,
        }
    }

    fn fail(&self, surface: &mut Surface, error: BuildError) -> BuildOutcome {
        match &error {
            BuildError::Fetch(e) => {
                warn!(locator = %e.locator(), error = %e, "encountered error while building tree")
            }
            BuildError::Attach(e) => warn!(error = %e, "encountered error while building tree"),
        }
        surface.show_fallback(self.fallback_message());
        BuildOutcome::Failed(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::surface::DEFAULT_MOUNT;
    use std::io::Write;

    fn pipeline(source: &str) -> BuildPipeline {
        BuildPipeline::new(BuildConfig::new(source, DEFAULT_MOUNT))
    }

    fn io_failure(source: &str) -> FetchError {
        FetchError::Io {
            locator: SourceLocator::parse(source),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        }
    }

    #[test]
    fn builds_and_aligns_the_tree() {
        let p = pipeline("files.txt");
        let mut surface = Surface::new([DEFAULT_MOUNT]);
        let ticket = p.begin();
        let outcome = p.complete(&ticket, Ok("a/b/c\na/d".into()), &mut surface);

        assert!(matches!(
            outcome,
            BuildOutcome::Attached { elements: 4, max_depth: Some(2) }
        ));
        let level: Vec<u16> = surface
            .select_depth(1)
            .into_iter()
            .map(|at| surface.element(at).rendered_width())
            .collect();
        assert_eq!(level[0], level[1]);
    }

    #[test]
    fn fetch_failure_replaces_tree_with_message() {
        let p = pipeline("https://example.com/files.txt");
        let mut surface = Surface::new([DEFAULT_MOUNT]);
        p.complete(&p.begin(), Ok("a/b".into()), &mut surface);

        let outcome = p.complete(
            &p.begin(),
            Err(io_failure("https://example.com/files.txt")),
            &mut surface,
        );

        assert!(matches!(outcome, BuildOutcome::Failed(BuildError::Fetch(_))));
        assert!(surface.mount(DEFAULT_MOUNT).unwrap().roots.is_empty());
        assert_eq!(
            surface.fallback(),
            Some("Unable to create tree for file list at https://example.com/files.txt")
        );
    }

    #[test]
    fn unknown_mount_falls_back() {
        let p = BuildPipeline::new(BuildConfig::new("files.txt", ".nowhere"));
        let mut surface = Surface::new([DEFAULT_MOUNT]);
        let outcome = p.complete(&p.begin(), Ok("a".into()), &mut surface);

        assert!(matches!(outcome, BuildOutcome::Failed(BuildError::Attach(_))));
        assert!(surface.fallback().is_some());
    }

    #[test]
    fn latest_request_wins() {
        let p = pipeline("files.txt");
        let mut surface = Surface::new([DEFAULT_MOUNT]);
        let stale = p.begin();
        let fresh = p.begin();
        assert!(!stale.is_current());
        assert!(fresh.is_current());

        let outcome = p.complete(&fresh, Ok("new".into()), &mut surface);
        assert!(matches!(outcome, BuildOutcome::Attached { .. }));

        // The slow, older fetch finally lands.
        let outcome = p.complete(&stale, Ok("old/one\nold/two".into()), &mut surface);
        assert!(matches!(outcome, BuildOutcome::Superseded));
        let mount = surface.mount(DEFAULT_MOUNT).unwrap();
        assert_eq!(mount.elements.len(), 1);
        assert_eq!(mount.get(mount.roots[0]).label, "new");
    }

    #[test]
    fn stale_failure_does_not_show_fallback() {
        let p = pipeline("files.txt");
        let mut surface = Surface::new([DEFAULT_MOUNT]);
        let stale = p.begin();
        let fresh = p.begin();
        p.complete(&fresh, Ok("a".into()), &mut surface);

        let outcome = p.complete(&stale, Err(io_failure("files.txt")), &mut surface);
        assert!(matches!(outcome, BuildOutcome::Superseded));
        assert_eq!(surface.fallback(), None);
    }

    #[test]
    fn generations_increase() {
        let p = pipeline("files.txt");
        let first = p.begin().generation();
        let second = p.begin().generation();
        assert!(second > first);
    }

    #[tokio::test]
    async fn run_reads_a_local_list() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "/home/alice/notes.txt\n/home/bob/todo.spell\n").unwrap();
        let p = pipeline(file.path().to_str().unwrap());
        let mut surface = Surface::new([DEFAULT_MOUNT]);

        let outcome = p.run(&Fetcher::new().unwrap(), &mut surface).await;

        assert!(matches!(
            outcome,
            BuildOutcome::Attached { elements: 5, max_depth: Some(2) }
        ));
        let mount = surface.mount(DEFAULT_MOUNT).unwrap();
        let home = mount.get(mount.roots[0]);
        let kids: Vec<&str> = home
            .children
            .iter()
            .map(|&c| mount.get(c).label.as_str())
            .collect();
        assert_eq!(kids, ["alice/", "bob/"]);
    }

    #[tokio::test]
    async fn run_with_missing_file_shows_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.txt");
        let source = missing.to_str().unwrap();
        let p = pipeline(source);
        let mut surface = Surface::new([DEFAULT_MOUNT]);

        let outcome = p.run(&Fetcher::new().unwrap(), &mut surface).await;

        assert!(matches!(outcome, BuildOutcome::Failed(_)));
        assert_eq!(
            surface.fallback(),
            Some(format!("Unable to create tree for file list at {source}").as_str())
        );
    }
}
