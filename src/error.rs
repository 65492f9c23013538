use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, BlueprintError>;

#[derive(Error, Debug, Diagnostic)]
pub enum BlueprintError {
    #[error(
        "merge conflicts found: {}. Use prefix_blueprint() to avoid name conflicts before merging",
        .conflicts.join(", ")
    )]
    #[diagnostic(
        code(blueprint::merge_conflict),
        help("Rename one side with prefix_blueprint() so every service, database and group name is unique, then merge again.")
    )]
    ConflictsFound { conflicts: Vec<String> },

    #[error("blueprint validation failed: {}", .defects.join("; "))]
    #[diagnostic(
        code(blueprint::invalid),
        help("Fix the listed defects; validate_blueprint() reports the same findings without failing.")
    )]
    Invalid { defects: Vec<String> },

    #[error(transparent)]
    #[diagnostic(code(blueprint::yaml))]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    #[diagnostic(code(blueprint::json))]
    Json(#[from] serde_json::Error),

    #[error("failed to read file {}", .path.display())]
    #[diagnostic(code(blueprint::io::read))]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write file {}", .path.display())]
    #[diagnostic(code(blueprint::io::write))]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to create directory {}", .path.display())]
    #[diagnostic(code(blueprint::io::create_dir))]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to create backup {}", .path.display())]
    #[diagnostic(
        code(blueprint::io::backup),
        help("The original file was left untouched.")
    )]
    Backup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl BlueprintError {
    /// The findings carried by a conflict or validation failure.
    pub fn findings(&self) -> &[String] {
        match self {
            BlueprintError::ConflictsFound { conflicts } => conflicts,
            BlueprintError::Invalid { defects } => defects,
            _ => &[],
        }
    }
}
