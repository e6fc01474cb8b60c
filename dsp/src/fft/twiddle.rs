use crate::fft::{radix4_stages, Direction};
use derive_more::Deref;
use num_complex::Complex;
use num_traits::{AsPrimitive, Float, FloatConst};

/// Rotation factors `[e^{iφ}, e^{2iφ}, e^{3iφ}]` for every twiddled radix-4
/// butterfly of a `2^log_n` point transform, in the order the stages consume
/// them.
#[derive(Clone, Debug, PartialEq, Deref)]
pub struct Twiddles<T> {
    direction: Direction,
    #[deref]
    factors: Vec<[Complex<T>; 3]>,
}

impl<T> Twiddles<T>
where
    T: Float + FloatConst + 'static,
    usize: AsPrimitive<T>,
{
    pub fn new(log_n: u32, direction: Direction) -> Self {
        let turn = direction.sign::<T>() * T::TAU();
        let (two, three): (T, T) = (2usize.as_(), 3usize.as_());
        let factors = radix4_stages(log_n)
            .flat_map(|ldm| {
                let m = 1usize << ldm;
                let size: T = m.as_();
                let step = turn / size;
                (1..m >> 2).map(move |j| {
                    let j: T = j.as_();
                    let phi = j * step;
                    [
                        Complex::cis(phi),
                        Complex::cis(phi * two),
                        Complex::cis(phi * three),
                    ]
                })
            })
            .collect();
        Self {
            direction,
            factors,
        }
    }
}

impl<T> Twiddles<T> {
    pub fn direction(&self) -> Direction {
        self.direction
    }
}
