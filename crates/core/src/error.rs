#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("failed to read {path}: {source}", path = path.display())]
    FileRead {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{document} schema mismatch at {path}: {reason}")]
    Schema {
        document: &'static str,
        path: String,
        reason: String,
    },

    #[error("duplicate procedure id: {0}")]
    DuplicateId(String),
    #[error("duplicate procedure slug: {0}")]
    DuplicateSlug(String),
    #[error("duplicate category: {0}")]
    DuplicateCategory(String),
    #[error("procedure {procedure} references undeclared category {category:?}")]
    UndeclaredCategory { procedure: String, category: String },
    #[error("duplicate subcategory slug: {0}")]
    DuplicateSubcategorySlug(String),
    #[error("duplicate subcategory label: {0}")]
    DuplicateSubcategoryLabel(String),

    #[error("invalid text: {0}")]
    Text(#[from] clinic_types::TextError),
}

pub type CatalogResult<T> = std::result::Result<T, CatalogError>;

/// Rejected navigation transitions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NavigationError {
    #[error("a category must be selected before a subcategory")]
    NoCategorySelected,
}
