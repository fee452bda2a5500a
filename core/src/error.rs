use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Index out of bounds")]
    IndexOutOfBounds,
}

pub type Result<T> = core::result::Result<T, EngineError>;
