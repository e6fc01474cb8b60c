mod complex;
mod error;
mod signal;

pub mod fft;

pub use complex::{Complex, C32, C64};
pub use error::FftError;
pub use fft::{dft, dft_into, idft, idft_into, log2_size, Direction, Fft};
pub use signal::Signal;
