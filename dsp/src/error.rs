use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FftError {
    #[error("sequence length {0} is not a power of two")]
    InvalidSize(usize),
    #[error("output length {output} does not match input length {input}")]
    LengthMismatch { input: usize, output: usize },
}
