use super::tree::{NodeId, Tree};

pub const SEPARATOR: char = '/';

impl Tree {
    /// Slugs from the root down to `node`, joined with `/`.
    pub fn get_path(&self, node: NodeId) -> String {
        let mut slugs = self
            .inclusive_ancestors(node)
            .into_iter()
            .map(|ancestor| self.slug(ancestor))
            .collect::<Vec<_>>();
        slugs.reverse();
        slugs.join("/")
    }

    /// Resolves `path` relative to `from`.
    ///
    /// The first segment names `from` itself and is not compared. Each later
    /// segment picks the first child with that slug.
    pub fn at_path(&self, from: NodeId, path: &str) -> Option<NodeId> {
        path.split(SEPARATOR)
            .skip(1)
            .try_fold(from, |current, slug| self.child_by_slug(current, slug))
    }
}
