pub use num_complex::Complex;

pub type C32 = Complex<f32>;
pub type C64 = Complex<f64>;
