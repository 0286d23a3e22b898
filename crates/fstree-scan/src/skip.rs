//! Skip predicates deciding which children are excluded from a tree.

use globset::GlobSet;

use fstree_core::{BuildConfig, ChildHandle, TreeError};

/// Decides whether a child (and its whole subtree) is left out of the tree.
///
/// `parent_path` is the path of the directory being enumerated, `""` for the
/// root.
pub trait SkipPredicate: Send + Sync {
    fn should_skip(&self, child: &ChildHandle, parent_path: &str) -> bool;
}

impl<F> SkipPredicate for F
where
    F: Fn(&ChildHandle, &str) -> bool + Send + Sync,
{
    fn should_skip(&self, child: &ChildHandle, parent_path: &str) -> bool {
        self(child, parent_path)
    }
}

/// Predicate that never skips anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverSkip;

impl SkipPredicate for NeverSkip {
    fn should_skip(&self, _child: &ChildHandle, _parent_path: &str) -> bool {
        false
    }
}

/// Predicate derived from the ignore patterns and hidden-file setting of a
/// [`BuildConfig`].
#[derive(Debug, Clone)]
pub struct PatternSkip {
    patterns: GlobSet,
    include_hidden: bool,
}

impl PatternSkip {
    /// Compile a predicate from configuration.
    pub fn from_config(config: &BuildConfig) -> Result<Self, TreeError> {
        Ok(Self {
            patterns: config.ignore_set()?,
            include_hidden: config.include_hidden,
        })
    }
}

impl SkipPredicate for PatternSkip {
    fn should_skip(&self, child: &ChildHandle, parent_path: &str) -> bool {
        let name = child.name();
        if !self.include_hidden && name.starts_with('.') {
            return true;
        }
        if self.patterns.is_empty() {
            return false;
        }
        if self.patterns.is_match(name) {
            return true;
        }
        !parent_path.is_empty() && self.patterns.is_match(format!("{parent_path}/{name}"))
    }
}
