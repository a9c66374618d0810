//! The published region tree.
//!
//! [Regions] is the single writer. It owns the live tree and replaces it
//! wholesale: [Regions::reload] builds a complete new tree off to the side and
//! only swaps it in once the build succeeded. The swap is one atomic pointer
//! store, so a [RegionReader] always observes either the old or the new tree,
//! never a tree under construction.
//!
//! Readers are cheap to clone and can be sent to other threads. Lookups never
//! block and never write to shared state.

use std::fmt;
use std::io::Read;
use std::sync::Arc;

use anybytes::Bytes;
use arc_swap::ArcSwap;

use crate::load::{LoadError, LoadStats};
use crate::region::{FindError, Region, RegionTree};

pub struct Regions {
    live: Arc<ArcSwap<RegionTree>>,
}

impl fmt::Debug for Regions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Regions")
    }
}

impl Regions {
    /// Publishes `tree` as the initial live tree.
    pub fn new(tree: RegionTree) -> Self {
        Self {
            live: Arc::new(ArcSwap::from_pointee(tree)),
        }
    }

    pub fn reader(&self) -> RegionReader {
        RegionReader {
            live: self.live.clone(),
        }
    }

    /// The currently published tree.
    pub fn snapshot(&self) -> Arc<RegionTree> {
        self.live.load_full()
    }

    /// Rebuilds the tree from `reader` and publishes it.
    ///
    /// The new tree shares the live tree's segmentation and root payload but
    /// none of its regions, so codes only present in the old data stop
    /// resolving. If reading fails the live tree stays untouched and the
    /// error is returned.
    pub fn reload<R: Read>(&mut self, reader: R) -> Result<LoadStats, LoadError> {
        let mut tree = self.live.load().fresh();
        let stats = match tree.load(reader) {
            Ok(stats) => stats,
            Err(err) => {
                tracing::warn!(error = %err, "reload failed, keeping the live region tree");
                return Err(err);
            }
        };

        let nodes = tree.node_count();
        self.live.store(Arc::new(tree));
        tracing::info!(records = stats.records, nodes, "published reloaded region tree");
        Ok(stats)
    }

    /// Publishes a tree built elsewhere and returns the one it replaced.
    pub fn replace(&mut self, tree: RegionTree) -> Arc<RegionTree> {
        self.live.swap(Arc::new(tree))
    }
}

/// A read handle on the tree published by [Regions].
#[derive(Clone)]
pub struct RegionReader {
    live: Arc<ArcSwap<RegionTree>>,
}

impl fmt::Debug for RegionReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RegionReader")
    }
}

impl RegionReader {
    /// The currently published tree.
    ///
    /// The snapshot stays valid and unchanged while it is held, even if a
    /// reload publishes a newer tree in the meantime.
    pub fn snapshot(&self) -> Arc<RegionTree> {
        self.live.load_full()
    }

    /// Resolves `code` and returns the payload of its region.
    pub fn find(&self, code: &str) -> Result<Bytes, FindError> {
        self.find_with(code, |region| region.data().clone())
    }

    /// Resolves `code` and hands its region to `f`.
    ///
    /// The whole call runs against one published tree, so `f` may walk
    /// parents and children consistently.
    pub fn find_with<T>(&self, code: &str, f: impl FnOnce(Region<'_>) -> T) -> Result<T, FindError> {
        let tree = self.live.load();
        let region = tree.find(code)?;
        Ok(f(region))
    }
}
