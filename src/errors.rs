use schema::SpeciesId;
use std::fmt;

/// Errors raised while building the immutable data snapshot. Any of
/// these is fatal: the process must refuse to serve queries rather than
/// run on an incomplete index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// A reference table is missing a required column
    MissingColumn { table: String, column: &'static str },
    /// A reference table row failed to parse
    MalformedRow {
        table: String,
        line: u64,
        detail: String,
    },
    /// Two lineage-override entries name the same species
    DuplicateLineageOverride(SpeciesId),
    /// The lineage-override table failed to parse
    BadLineageTable(String),
    /// Underlying file I/O failure
    Io(String),
}

/// Errors raised by individual queries against a loaded snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// The species ID is absent from the reference table
    SpeciesNotFound(SpeciesId),
    /// The name resolved to no known species, even with fuzzy fallback
    NameNotFound(String),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::MissingColumn { table, column } => {
                write!(f, "table {} is missing required column '{}'", table, column)
            }
            LoadError::MalformedRow {
                table,
                line,
                detail,
            } => write!(f, "table {} line {}: {}", table, line, detail),
            LoadError::DuplicateLineageOverride(species) => write!(
                f,
                "lineage override table names species {} more than once",
                species
            ),
            LoadError::BadLineageTable(detail) => {
                write!(f, "malformed lineage override table: {}", detail)
            }
            LoadError::Io(detail) => write!(f, "I/O error: {}", detail),
        }
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryError::SpeciesNotFound(species) => write!(f, "species {} not found", species),
            QueryError::NameNotFound(name) => write!(f, "no species matches '{}'", name),
        }
    }
}

impl std::error::Error for LoadError {}
impl std::error::Error for QueryError {}

/// Type alias for Results using LoadError
pub type LoadResult<T> = Result<T, LoadError>;

/// Type alias for Results using QueryError
pub type QueryResult<T> = Result<T, QueryError>;
