use crate::fft::{radix4_stages, twiddle::Twiddles, Direction};
use core::iter::once;
use itertools::izip;
use num_complex::Complex;
use num_traits::Float;

// Given digit-reversed input and the twiddle table built for the same length,
// compute normal order output in place, in the table's direction.
pub(crate) fn dit_in_place<T: Float>(a: &mut [Complex<T>], twiddles: &Twiddles<T>) {
    assert!(a.len().is_power_of_two());
    let direction = twiddles.direction();
    let log_n = a.len().ilog2();
    if log_n & 1 == 1 {
        a.chunks_exact_mut(2).for_each(|pair| {
            let (a0, a1) = (pair[0], pair[1]);
            pair[0] = a0 + a1;
            pair[1] = a0 - a1;
        });
    }
    let mut twiddles = twiddles.as_slice();
    for ldm in radix4_stages(log_n) {
        let m = 1 << ldm;
        let m4 = m >> 2;
        let (stage, rest) = twiddles.split_at(m4 - 1);
        twiddles = rest;
        a.chunks_exact_mut(m).for_each(|block| {
            let (q0, block) = block.split_at_mut(m4);
            let (q1, block) = block.split_at_mut(m4);
            let (q2, q3) = block.split_at_mut(m4);
            let e = once(None).chain(stage.iter().map(Some));
            izip!(q0, q1, q2, q3, e).for_each(|(a0, a1, a2, a3, e)| {
                Butterfly4::dit(a0, a1, a2, a3, e, direction)
            });
        });
    }
    debug_assert!(twiddles.is_empty());
}

pub trait Butterfly4: Sized {
    type Twiddle;

    fn dit(
        a0: &mut Self,
        a1: &mut Self,
        a2: &mut Self,
        a3: &mut Self,
        e: Option<&[Self::Twiddle; 3]>,
        direction: Direction,
    );
}

impl<T: Float> Butterfly4 for Complex<T> {
    type Twiddle = Complex<T>;

    // The second quarter is rotated by `e2` and the third by `e1`, which is
    // what lets a bit-reversed input come out in natural order.
    #[inline(always)]
    fn dit(
        a0: &mut Self,
        a1: &mut Self,
        a2: &mut Self,
        a3: &mut Self,
        e: Option<&[Self; 3]>,
        direction: Direction,
    ) {
        let (x0, x2, x1, x3) = match e {
            Some([e1, e2, e3]) => (*a0, *a1 * e2, *a2 * e1, *a3 * e3),
            None => (*a0, *a1, *a2, *a3),
        };
        let (s02, d02) = (x0 + x2, x0 - x2);
        let (s13, d13) = (x1 + x3, direction.rotate_quarter(x1 - x3));
        *a0 = s02 + s13;
        *a1 = d02 + d13;
        *a2 = s02 - s13;
        *a3 = d02 - d13;
    }
}
