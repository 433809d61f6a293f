use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("'{0}' is not a duration, expected a number followed by a unit (e.g. 20s, 500ms)")]
    Syntax(String),
    #[error("Unit '{0}' not supported")]
    UnitNotSupported(String),
}
