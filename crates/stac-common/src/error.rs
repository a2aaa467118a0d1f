//! Error types for the STAC conversion crates.

use thiserror::Error;

/// Result type alias using StacError.
pub type StacResult<T> = Result<T, StacError>;

/// Primary error type for metadata parsing, item building and catalog composition.
///
/// Every variant except [`StacError::Storage`] is derived from the input alone:
/// feeding the same document again produces the same error.
#[derive(Debug, Error)]
pub enum StacError {
    // === Input Errors ===
    #[error("Malformed metadata: {0}")]
    MalformedMetadata(String),

    #[error("Filename does not match the scene naming pattern: {0}")]
    FilenamePattern(String),

    #[error("Unsupported projection: {0}")]
    UnsupportedProjection(String),

    // === Static Table Errors ===
    #[error("Band {band} is not defined for {collection}")]
    UnknownBand { collection: String, band: String },

    #[error("Mission/camera not defined in mission tables: {0}")]
    UnknownMission(String),

    #[error("Invalid mission tables: {0}")]
    InvalidTables(String),

    // === Catalog Tree Errors ===
    #[error("Listing for {0} is truncated; resolve pagination before composing")]
    TruncatedListing(String),

    #[error("Invalid catalog prefix: {0}")]
    InvalidPrefix(String),

    #[error("Node {0} derives its children from mission tables, not from a listing")]
    ListingNotApplicable(String),

    // === Infrastructure Errors ===
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StacError {
    /// Whether the surrounding queue consumer may retry the operation.
    ///
    /// Only storage failures are transient; everything else must be dead-lettered.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StacError::Storage(_))
    }

    /// Short machine-readable kind, used as a structured logging field.
    pub fn kind(&self) -> &'static str {
        match self {
            StacError::MalformedMetadata(_) => "malformed_metadata",
            StacError::FilenamePattern(_) => "filename_pattern",
            StacError::UnsupportedProjection(_) => "unsupported_projection",
            StacError::UnknownBand { .. } => "unknown_band",
            StacError::UnknownMission(_) => "unknown_mission",
            StacError::InvalidTables(_) => "invalid_tables",
            StacError::TruncatedListing(_) => "truncated_listing",
            StacError::InvalidPrefix(_) => "invalid_prefix",
            StacError::ListingNotApplicable(_) => "listing_not_applicable",
            StacError::Storage(_) => "storage",
            StacError::Json(_) => "json",
        }
    }
}

impl From<std::io::Error> for StacError {
    fn from(err: std::io::Error) -> Self {
        StacError::Storage(err.to_string())
    }
}
