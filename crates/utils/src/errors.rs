use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UtilsError {
    #[error("missing data")]
    MissingInput,
}
