use std::path::PathBuf;

/// Everything that can stop a game from starting. Nothing past load time
/// produces one of these.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("invalid setting `{name}`: {reason}")]
    Setting { name: &'static str, reason: String },

    #[error("maze has no rows")]
    EmptyMaze,

    #[error("maze row {row} has {found} columns, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("maze has no player spawn `P`")]
    MissingPlayer,

    #[error("maze has a second player spawn at row {row}, col {col}")]
    DuplicatePlayer { row: usize, col: usize },

    #[error("maze has no ghost spawn `G`")]
    NoGhosts,
}

pub type LoadResult<T> = Result<T, LoadError>;
