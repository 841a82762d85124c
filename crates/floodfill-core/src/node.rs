//! The lazily loaded graph node capability.

use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;

/// A node in a directed graph whose content and neighbors are only known
/// once it has been visited.
///
/// Implementors are usually cheap handles (an `Arc` into a shared store, a
/// URL, a row key) so that moving them between tasks costs little. Two
/// discoveries of the same logical node must return equal [`Node::id`]
/// values; that identity is the only thing the engine deduplicates on.
///
/// ```rust
/// use floodfill_core::Node;
///
/// #[derive(Debug)]
/// struct Page {
///     url: String,
/// }
///
/// impl Node for Page {
///     type Id = String;
///     type Error = std::io::Error;
///
///     fn id(&self) -> String {
///         self.url.clone()
///     }
///
///     async fn visit(&self) -> Result<(), std::io::Error> {
///         Ok(())
///     }
///
///     async fn neighbors(&self) -> Result<Vec<Self>, std::io::Error> {
///         Ok(Vec::new())
///     }
/// }
/// ```
pub trait Node: Debug + Send + Sync + Sized + 'static {
    /// Stable identity used to decide whether the node was already claimed.
    type Id: Eq + Hash + Clone + Debug + Send + Sync + 'static;

    /// Error raised while visiting the node or listing its neighbors.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Returns the identity of this node.
    fn id(&self) -> Self::Id;

    /// Materializes the node. Called at most once per identity per run.
    fn visit(&self) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Lists the nodes directly reachable from this one.
    ///
    /// Only called after a successful [`Node::visit`].
    fn neighbors(&self) -> impl Future<Output = Result<Vec<Self>, Self::Error>> + Send;
}
