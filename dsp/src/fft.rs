use crate::{complex::C64, error::FftError};
use core::iter::successors;
use num_complex::Complex;
use num_traits::{AsPrimitive, Float, FloatConst};
use std::sync::OnceLock;

mod butterfly;
pub mod cache;
pub mod permutation;
pub mod twiddle;

pub use butterfly::Butterfly4;
use butterfly::dit_in_place;
use cache::TableCache;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Forward,
    Inverse,
}

impl Direction {
    /// Sign of the twiddle angle, `-1` forward and `+1` inverse.
    pub fn sign<T: Float>(self) -> T {
        match self {
            Self::Forward => -T::one(),
            Self::Inverse => T::one(),
        }
    }

    /// Multiplies `d` by `-i` (forward) or `i` (inverse).
    #[inline(always)]
    pub fn rotate_quarter<T: Float>(self, d: Complex<T>) -> Complex<T> {
        match self {
            Self::Forward => Complex::new(d.im, -d.re),
            Self::Inverse => Complex::new(-d.im, d.re),
        }
    }
}

/// Returns `log_n` with `2^log_n == len`.
pub fn log2_size(len: usize) -> Result<u32, FftError> {
    if len.is_power_of_two() {
        Ok(len.ilog2())
    } else {
        Err(FftError::InvalidSize(len))
    }
}

// Sizes of the radix-4 stages, innermost first, after the radix-2 stage that
// odd `log_n` starts with.
pub(crate) fn radix4_stages(log_n: u32) -> impl Iterator<Item = u32> {
    successors(Some((log_n & 1) + 2), |ldm| Some(ldm + 2)).take_while(move |ldm| *ldm <= log_n)
}

/// Radix-4 decimation-in-time transform over power-of-two lengths.
///
/// Neither direction is normalized: `inverse(forward(x))` is `x` scaled by
/// its length.
#[derive(Debug)]
pub struct Fft<T> {
    cache: TableCache<T>,
}

impl<T> Default for Fft<T> {
    fn default() -> Self {
        Self {
            cache: TableCache::default(),
        }
    }
}

impl<T> Fft<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cache(&self) -> &TableCache<T> {
        &self.cache
    }
}

impl<T> Fft<T>
where
    T: Float + FloatConst + 'static,
    usize: AsPrimitive<T>,
{
    /// Builds the tables for `len` points ahead of the first transform.
    pub fn prepare(&self, len: usize, direction: Direction) -> Result<(), FftError> {
        let log_n = log2_size(len)?;
        if log_n > 0 {
            self.cache.permutation(log_n);
            self.cache.twiddles(log_n, direction);
        }
        Ok(())
    }

    pub fn process<'a>(
        &self,
        direction: Direction,
        data: &'a mut [Complex<T>],
    ) -> Result<&'a mut [Complex<T>], FftError> {
        let log_n = log2_size(data.len())?;
        if log_n == 0 {
            return Ok(data);
        }
        let twiddles = self.cache.twiddles(log_n, direction);
        self.cache.permutation(log_n).apply_in_place(data);
        dit_in_place(data, &twiddles);
        Ok(data)
    }

    pub fn process_into<'a>(
        &self,
        direction: Direction,
        input: &[Complex<T>],
        output: &'a mut [Complex<T>],
    ) -> Result<&'a mut [Complex<T>], FftError> {
        let log_n = log2_size(input.len())?;
        if output.len() != input.len() {
            return Err(FftError::LengthMismatch {
                input: input.len(),
                output: output.len(),
            });
        }
        if log_n == 0 {
            output.copy_from_slice(input);
            return Ok(output);
        }
        let twiddles = self.cache.twiddles(log_n, direction);
        self.cache.permutation(log_n).apply_copy(input, output);
        dit_in_place(output, &twiddles);
        Ok(output)
    }

    pub fn forward<'a>(
        &self,
        data: &'a mut [Complex<T>],
    ) -> Result<&'a mut [Complex<T>], FftError> {
        self.process(Direction::Forward, data)
    }

    pub fn inverse<'a>(
        &self,
        data: &'a mut [Complex<T>],
    ) -> Result<&'a mut [Complex<T>], FftError> {
        self.process(Direction::Inverse, data)
    }

    pub fn forward_into<'a>(
        &self,
        input: &[Complex<T>],
        output: &'a mut [Complex<T>],
    ) -> Result<&'a mut [Complex<T>], FftError> {
        self.process_into(Direction::Forward, input, output)
    }

    pub fn inverse_into<'a>(
        &self,
        input: &[Complex<T>],
        output: &'a mut [Complex<T>],
    ) -> Result<&'a mut [Complex<T>], FftError> {
        self.process_into(Direction::Inverse, input, output)
    }
}

// Engine behind the free functions, shared by the whole process.
fn shared() -> &'static Fft<f64> {
    static SHARED: OnceLock<Fft<f64>> = OnceLock::new();
    SHARED.get_or_init(Fft::new)
}

pub fn dft(data: &mut [C64]) -> Result<&mut [C64], FftError> {
    shared().forward(data)
}

/// Unnormalized inverse of [`dft`].
pub fn idft(data: &mut [C64]) -> Result<&mut [C64], FftError> {
    shared().inverse(data)
}

pub fn dft_into<'a>(input: &[C64], output: &'a mut [C64]) -> Result<&'a mut [C64], FftError> {
    shared().forward_into(input, output)
}

pub fn idft_into<'a>(input: &[C64], output: &'a mut [C64]) -> Result<&'a mut [C64], FftError> {
    shared().inverse_into(input, output)
}

#[cfg(test)]
pub(crate) mod test {
    use crate::{
        complex::{C32, C64},
        error::FftError,
        fft::{dft, dft_into, idft, idft_into, log2_size, radix4_stages, Direction, Fft},
    };
    use core::f64::consts::TAU;
    use itertools::{izip, Itertools};
    use num_complex::ComplexDistribution;
    use rand::{distributions::Uniform, thread_rng, Rng};
    use std::thread;

    pub(crate) fn naive_dft(x: &[C64], direction: Direction) -> Vec<C64> {
        let n = x.len();
        let sign = direction.sign::<f64>();
        (0..n)
            .map(|k| {
                izip!(0.., x)
                    .map(|(j, x)| x * C64::cis(sign * TAU * ((j * k) % n) as f64 / n as f64))
                    .sum::<C64>()
            })
            .collect()
    }

    fn sample(n: usize) -> Vec<C64> {
        let uniform = Uniform::new(-1., 1.);
        let dist = ComplexDistribution::new(uniform, uniform);
        thread_rng().sample_iter(&dist).take(n).collect()
    }

    fn assert_close(a: &[C64], b: &[C64], tol: f64) {
        assert_eq!(a.len(), b.len());
        izip!(a, b).for_each(|(a, b)| assert!((a - b).norm() < tol, "{a} != {b}"));
    }

    #[test]
    fn size() {
        assert_eq!(log2_size(1), Ok(0));
        assert_eq!(log2_size(2), Ok(1));
        assert_eq!(log2_size(8192), Ok(13));
        assert_eq!(log2_size(1 << 40), Ok(40));
        for len in [0, 3, 5, 6, 12, 100, 8191] {
            assert_eq!(log2_size(len), Err(FftError::InvalidSize(len)));
        }
    }

    #[test]
    fn stages() {
        assert_eq!(radix4_stages(1).next(), None);
        assert_eq!(radix4_stages(2).collect_vec(), [2]);
        assert_eq!(radix4_stages(7).collect_vec(), [3, 5, 7]);
        assert_eq!(radix4_stages(8).collect_vec(), [2, 4, 6, 8]);
    }

    #[test]
    fn rotate_quarter() {
        let d = C64::new(3., 5.);
        let i = C64::i();
        assert_eq!(Direction::Forward.rotate_quarter(d), d * -i);
        assert_eq!(Direction::Inverse.rotate_quarter(d), d * i);
    }

    #[test]
    fn impulse() {
        let mut x = [C64::new(1., 0.), C64::new(0., 0.), C64::new(0., 0.), C64::new(0., 0.)];
        assert_eq!(dft(&mut x).unwrap(), [C64::new(1., 0.); 4]);
        for log_n in 0..12 {
            let mut x = vec![C64::default(); 1 << log_n];
            x[0] = C64::new(1., 0.);
            assert!(dft(&mut x).unwrap().iter().all(|v| *v == C64::new(1., 0.)));
        }
    }

    #[test]
    fn constant() {
        let mut x = [C64::new(0.5, 0.5); 8];
        let y = dft(&mut x).unwrap();
        assert_eq!(y[0], C64::new(4., 4.));
        assert!(y[1..].iter().all(|v| v.norm() < 1e-12));
    }

    #[test]
    fn naive() {
        let fft = Fft::<f64>::new();
        for log_n in 0..11 {
            let n = 1 << log_n;
            let x = sample(n);
            for direction in [Direction::Forward, Direction::Inverse] {
                let mut y = x.clone();
                fft.process(direction, &mut y).unwrap();
                assert_close(&y, &naive_dft(&x, direction), 1e-9 * n as f64);
            }
        }
    }

    #[test]
    fn round_trip() {
        for log_n in 0..14 {
            let n = 1 << log_n;
            let x = sample(n);
            let mut y = x.clone();
            idft(dft(&mut y).unwrap()).unwrap();
            let scaled = x.iter().map(|x| x * n as f64).collect_vec();
            assert_close(&y, &scaled, 1e-9 * n as f64);
        }
    }

    #[test]
    fn out_of_place() {
        for log_n in 0..12 {
            let n = 1 << log_n;
            let x = sample(n);
            let mut out = vec![C64::default(); n];
            let mut inv = vec![C64::default(); n];
            dft_into(&x, &mut out).unwrap();
            let mut y = x.clone();
            dft(&mut y).unwrap();
            assert_eq!(out, y);
            idft_into(&out, &mut inv).unwrap();
            idft(&mut y).unwrap();
            assert_eq!(inv, y);
        }
    }

    #[test]
    fn source_untouched() {
        let x = sample(64);
        let copy = x.clone();
        let mut out = vec![C64::default(); 64];
        dft_into(&x, &mut out).unwrap();
        assert_eq!(x, copy);
    }

    #[test]
    fn length_one() {
        let mut x = [C64::new(2., -3.)];
        assert_eq!(dft(&mut x).unwrap(), [C64::new(2., -3.)]);
        assert_eq!(idft(&mut x).unwrap(), [C64::new(2., -3.)]);
        let mut out = [C64::default()];
        assert_eq!(dft_into(&x, &mut out).unwrap(), [C64::new(2., -3.)]);
        let fft = Fft::<f64>::new();
        fft.forward(&mut x).unwrap();
        assert_eq!(fft.cache().permutation_count(), 0);
    }

    #[test]
    fn invalid_size() {
        for n in [0, 3, 5, 6, 100] {
            let x = sample(n);
            let mut y = x.clone();
            assert_eq!(dft(&mut y), Err(FftError::InvalidSize(n)));
            assert_eq!(idft(&mut y), Err(FftError::InvalidSize(n)));
            assert_eq!(y, x);
            let mut out = vec![C64::default(); n];
            assert_eq!(dft_into(&x, &mut out), Err(FftError::InvalidSize(n)));
            assert!(out.iter().all(|v| *v == C64::default()));
        }
    }

    #[test]
    fn length_mismatch() {
        let x = sample(16);
        let mut out = vec![C64::default(); 8];
        assert_eq!(
            dft_into(&x, &mut out),
            Err(FftError::LengthMismatch {
                input: 16,
                output: 8
            })
        );
        assert!(out.iter().all(|v| *v == C64::default()));
    }

    #[test]
    fn cached_tables_reproduce() {
        for log_n in 1..12 {
            let x = sample(1 << log_n);
            let cached = Fft::<f64>::new();
            let mut first = x.clone();
            cached.forward(&mut first).unwrap();
            let mut second = x.clone();
            cached.forward(&mut second).unwrap();
            let mut fresh = x.clone();
            Fft::<f64>::new().forward(&mut fresh).unwrap();
            assert_eq!(first, second);
            assert_eq!(first, fresh);
            assert_eq!(cached.cache().permutation_count(), 1);
            assert_eq!(cached.cache().twiddle_count(), 1);
        }
    }

    #[test]
    fn prepare() {
        let fft = Fft::<f64>::new();
        fft.prepare(1024, Direction::Inverse).unwrap();
        assert!(fft.cache().contains_permutation(10));
        assert!(fft.cache().contains_twiddles(10, Direction::Inverse));
        assert!(!fft.cache().contains_twiddles(10, Direction::Forward));
        assert_eq!(fft.prepare(1000, Direction::Forward), Err(FftError::InvalidSize(1000)));
    }

    #[test]
    fn concurrent() {
        let fft = Fft::<f64>::new();
        let x = sample(1 << 11);
        let results = thread::scope(|s| {
            let handles = (0..8)
                .map(|_| {
                    s.spawn(|| {
                        let mut y = x.clone();
                        fft.forward(&mut y).unwrap();
                        y
                    })
                })
                .collect_vec();
            handles
                .into_iter()
                .map(|handle| handle.join().unwrap())
                .collect_vec()
        });
        assert!(results.iter().all(|y| *y == results[0]));
        assert_eq!(fft.cache().twiddle_count(), 1);
    }

    #[test]
    fn single_precision() {
        let fft = Fft::<f32>::new();
        for log_n in 1..9 {
            let n = 1 << log_n;
            let x = sample(n);
            let mut y = x.iter().map(|x| C32::new(x.re as f32, x.im as f32)).collect_vec();
            fft.forward(&mut y).unwrap();
            let y = y.iter().map(|y| C64::new(y.re as f64, y.im as f64)).collect_vec();
            assert_close(&y, &naive_dft(&x, Direction::Forward), 1e-4 * n as f64);
        }
    }
}
