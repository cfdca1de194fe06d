use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("source directory {path} does not exist")]
    SourceDirMissing { path: String },

    #[error("source path {path} is not a directory")]
    NotADirectory { path: String },

    #[error("source directory {path} is unreadable: {source}")]
    SourceDirUnreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read log file {path}: {source}")]
    FileRead {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("log file {path} is missing required columns: {columns}")]
    MissingColumns { path: String, columns: String },
}
