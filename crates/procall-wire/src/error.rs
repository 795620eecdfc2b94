use thiserror::Error;

#[derive(Debug, Error)]
pub enum WireError {
    #[error("unsupported property type on the wire: {0}")]
    UnsupportedType(u32),

    #[error("property {name:?} carried as {carried} but descriptor says {expected}")]
    TypeMismatch { name: String, expected: String, carried: String },
}

pub type Result<T> = std::result::Result<T, WireError>;
