use relmap_ingest::SchemaError;

/// Cross-sheet rule violations, reported first-failure-only.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntegrityError {
    #[error("node {node_id} has SubType `{subtype}`, which is not a Component in the Nodes style sheet")]
    UnknownSubtype { node_id: i64, subtype: String },

    #[error("duplicate Node Id {id} in the Node sheet")]
    DuplicateNodeId { id: i64 },

    #[error("connection {connection} references node {id}, which is not in the Node sheet")]
    DanglingConnection { connection: String, id: i64 },

    #[error("connection {connection} has Level `{level}`, which is not an L2 value in the Edge style sheet")]
    UnknownLevel { connection: String, level: String },

    #[error("{count} nodes have SubType `{category}`; at most one is allowed")]
    MultipleTargetEntities { category: String, count: usize },

    #[error("connection {connection} from node {from} has no `to` value")]
    MissingConnectionTarget { connection: String, from: i64 },
}

impl IntegrityError {
    pub fn code(&self) -> &'static str {
        match self {
            IntegrityError::UnknownSubtype { .. } => "unknown_subtype",
            IntegrityError::DuplicateNodeId { .. } => "duplicate_node_id",
            IntegrityError::DanglingConnection { .. } => "dangling_connection",
            IntegrityError::UnknownLevel { .. } => "unknown_level",
            IntegrityError::MultipleTargetEntities { .. } => "multiple_target_entities",
            IntegrityError::MissingConnectionTarget { .. } => "missing_connection_target",
        }
    }
}

/// Anything that stops a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RunError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Integrity(#[from] IntegrityError),

    #[error("no icon selected for SubType `{subtype}`")]
    MissingIconChoice { subtype: String },
}

impl RunError {
    pub fn code(&self) -> &'static str {
        match self {
            RunError::Schema(e) => e.code(),
            RunError::Integrity(e) => e.code(),
            RunError::MissingIconChoice { .. } => "missing_icon_choice",
        }
    }
}
