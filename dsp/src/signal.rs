use crate::{
    error::FftError,
    fft::{dft, idft},
};
use core::{
    fmt::{self, Display, Formatter},
    iter::repeat_with,
    slice,
};
use derive_more::{Deref, DerefMut, From, Into};
use itertools::Itertools;
use num_complex::Complex;
use num_traits::{Num, Zero};
use rand::{distributions::Distribution, RngCore};
use std::vec;

/// Owned sequence of complex samples.
#[derive(Clone, Debug, PartialEq, Deref, DerefMut, From, Into)]
pub struct Signal<T>(Vec<Complex<T>>);

impl<T> Signal<T> {
    pub fn sample(n: usize, dist: impl Distribution<Complex<T>>, rng: &mut impl RngCore) -> Self {
        repeat_with(|| dist.sample(rng)).take(n).collect()
    }
}

impl<T: Clone + Num> Signal<T> {
    pub fn zero(n: usize) -> Self {
        Self(vec![Complex::zero(); n])
    }

    pub fn constant(n: usize, value: Complex<T>) -> Self {
        Self(vec![value; n])
    }

    /// Unit impulse at index 0.
    pub fn impulse(n: usize) -> Self {
        let mut signal = Self::zero(n);
        if let Some(first) = signal.first_mut() {
            *first = Complex::new(T::one(), T::zero());
        }
        signal
    }
}

impl Signal<f64> {
    pub fn dft(&self) -> Result<Self, FftError> {
        let mut out = self.clone();
        dft(&mut out)?;
        Ok(out)
    }

    pub fn idft(&self) -> Result<Self, FftError> {
        let mut out = self.clone();
        idft(&mut out)?;
        Ok(out)
    }

    /// Largest elementwise distance to `rhs`.
    ///
    /// Panics if the lengths differ.
    pub fn max_distance(&self, rhs: &Self) -> f64 {
        self.iter()
            .zip_eq(rhs.iter())
            .map(|(a, b)| (a - b).norm())
            .fold(0., f64::max)
    }
}

impl<T> Default for Signal<T> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<T> Display for Signal<T>
where
    T: Clone + Display + Num + PartialOrd,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        if let Some((first, rest)) = self.split_first() {
            write!(f, "{first}")?;
            rest.iter().try_for_each(|value| write!(f, ", {}", value))?;
        }
        write!(f, "]")
    }
}

impl<T> FromIterator<Complex<T>> for Signal<T> {
    fn from_iter<I: IntoIterator<Item = Complex<T>>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<T> IntoIterator for Signal<T> {
    type Item = Complex<T>;
    type IntoIter = vec::IntoIter<Complex<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Signal<T> {
    type Item = &'a Complex<T>;
    type IntoIter = slice::Iter<'a, Complex<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

macro_rules! impl_element_wise_op {
    ($($trait:ident),* $(,)?) => {
        $(
            paste::paste! {
                impl<T: Clone + Num> core::ops::$trait<&Signal<T>> for &Signal<T> {
                    type Output = Signal<T>;

                    fn [<$trait:lower>](self, rhs: &Signal<T>) -> Signal<T> {
                        self.iter()
                            .zip_eq(rhs.iter())
                            .map(|(lhs, rhs)| core::ops::$trait::[<$trait:lower>](lhs, rhs))
                            .collect()
                    }
                }

                impl<T: Clone + Num> core::ops::$trait<Signal<T>> for Signal<T> {
                    type Output = Signal<T>;

                    fn [<$trait:lower>](self, rhs: Signal<T>) -> Signal<T> {
                        core::ops::$trait::[<$trait:lower>](&self, &rhs)
                    }
                }

                impl<T: Clone + Num> core::ops::[<$trait Assign>]<&Signal<T>> for Signal<T> {
                    fn [<$trait:lower _assign>](&mut self, rhs: &Signal<T>) {
                        self.iter_mut()
                            .zip_eq(rhs.iter())
                            .for_each(|(lhs, rhs)| {
                                *lhs = core::ops::$trait::[<$trait:lower>](&*lhs, rhs)
                            });
                    }
                }
            }
        )*
    };
}

macro_rules! impl_scalar_op {
    ($($trait:ident),* $(,)?) => {
        $(
            paste::paste! {
                impl<T: Clone + Num> core::ops::$trait<T> for &Signal<T> {
                    type Output = Signal<T>;

                    fn [<$trait:lower>](self, rhs: T) -> Signal<T> {
                        self.iter()
                            .map(|lhs| {
                                core::ops::$trait::[<$trait:lower>](lhs.clone(), rhs.clone())
                            })
                            .collect()
                    }
                }

                impl<T: Clone + Num> core::ops::$trait<T> for Signal<T> {
                    type Output = Signal<T>;

                    fn [<$trait:lower>](mut self, rhs: T) -> Signal<T> {
                        core::ops::[<$trait Assign>]::[<$trait:lower _assign>](&mut self, rhs);
                        self
                    }
                }

                impl<T: Clone + Num> core::ops::[<$trait Assign>]<T> for Signal<T> {
                    fn [<$trait:lower _assign>](&mut self, rhs: T) {
                        self.iter_mut().for_each(|lhs| {
                            *lhs = core::ops::$trait::[<$trait:lower>](lhs.clone(), rhs.clone())
                        });
                    }
                }
            }
        )*
    };
}

impl_element_wise_op!(Add, Sub);
impl_scalar_op!(Mul);
