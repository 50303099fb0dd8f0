// SPDX-License-Identifier: MIT OR Apache-2.0

//! Depth-first directory walk with subtree pruning

use std::path::Path;

use walkdir::{DirEntry, WalkDir};

/// Item produced by [`SourceWalk`]
#[derive(Debug)]
pub enum WalkEvent {
    /// A regular file
    File(DirEntry),
    /// A directory whose subtree was skipped
    Pruned(DirEntry),
}

/// Lazy walk over regular files under a root
///
/// Entries are visited in file-name order. Directories for which `prune`
/// returns true are reported once and not descended into. Symlinks are not
/// followed and, like other special files, are not yielded.
pub struct SourceWalk<P> {
    inner: walkdir::IntoIter,
    prune: P,
}

impl<P> SourceWalk<P>
where
    P: FnMut(&DirEntry) -> bool,
{
    pub fn new(root: impl AsRef<Path>, prune: P) -> Self {
        Self {
            inner: WalkDir::new(root).sort_by_file_name().into_iter(),
            prune,
        }
    }
}

impl<P> Iterator for SourceWalk<P>
where
    P: FnMut(&DirEntry) -> bool,
{
    type Item = Result<WalkEvent, walkdir::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.inner.next()? {
                Ok(entry) => entry,
                Err(e) => return Some(Err(e)),
            };
            let file_type = entry.file_type();

            if file_type.is_dir() {
                if (self.prune)(&entry) {
                    self.inner.skip_current_dir();
                    return Some(Ok(WalkEvent::Pruned(entry)));
                }
                continue;
            }

            if file_type.is_file() {
                return Some(Ok(WalkEvent::File(entry)));
            }
        }
    }
}
