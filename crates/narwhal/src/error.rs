pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Hierarchical layout requires either no predefined levels or a level on every node.
    #[error(
        "inconsistent level definitions: node `{node_id}` has no explicit level while other nodes do"
    )]
    InconsistentLevels { node_id: String },

    #[error("unknown node id: {node_id}")]
    UnknownNode { node_id: String },
}
