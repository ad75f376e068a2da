use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SymtabError {
    /// `0` is the absent sentinel and can never be stored.
    #[error("value 0 is reserved for absent entries")]
    InvalidValue,
    /// A caller-provided key buffer lacks the spare capacity for a match.
    #[error("key buffer too small: need {needed} bytes, capacity is {capacity}")]
    BufferTooSmall { needed: usize, capacity: usize },
}

pub type Result<T, E = SymtabError> = std::result::Result<T, E>;

/// Fails unless `buf` can hold `needed` bytes without reallocating.
#[inline]
pub(crate) fn ensure_capacity(buf: &Vec<u8>, needed: usize) -> Result<()> {
    let capacity = buf.capacity();
    if needed > capacity {
        return Err(SymtabError::BufferTooSmall { needed, capacity });
    }
    Ok(())
}
