use derive_more::Deref;
use itertools::Itertools;

// Swap partners across the quadrants (even `log_n`) or halves (odd `log_n`),
// in units of the table length.
const QUADRANTS: [(usize, usize); 4] = [(0, 0), (1, 2), (2, 1), (3, 3)];
const HALVES: [(usize, usize); 2] = [(0, 0), (1, 1)];

/// Offset table driving the digit-reversal permutation of `2^log_n` points.
///
/// The table holds `2^⌊(log_n - 1) / 2⌋` offsets. Every index of the full
/// sequence is reached by combining two offsets with a quadrant (or half)
/// shift, so the table stays square-root sized while the permutation covers
/// all `2^log_n` points.
#[derive(Clone, Debug, PartialEq, Eq, Deref)]
pub struct DigitReversal {
    log_n: u32,
    #[deref]
    offsets: Vec<usize>,
}

impl DigitReversal {
    pub fn new(log_n: u32) -> Self {
        assert!(log_n < usize::BITS);
        let mut offsets = vec![0];
        let mut len = 1usize << log_n;
        while offsets.len() << 2 < len {
            len >>= 1;
            let next = offsets.iter().map(|offset| offset + len).collect_vec();
            offsets.extend(next);
        }
        Self { log_n, offsets }
    }

    /// Length of the sequences this table permutes.
    pub fn n(&self) -> usize {
        1 << self.log_n
    }

    /// Calls `f(a, b)` once for every pair of indices exchanged by the
    /// permutation, and `f(i, i)` once for every fixed point, so each index in
    /// `[0, n)` is produced exactly once.
    pub fn visit(&self, mut f: impl FnMut(usize, usize)) {
        if self.log_n == 0 {
            return f(0, 0);
        }
        let rev = &self.offsets;
        let m = rev.len();
        let even = self.log_n & 1 == 0;
        let shifts: &[(usize, usize)] = if even { &QUADRANTS } else { &HALVES };
        for k in 0..m {
            for j in 0..k {
                let (j1, k1) = (j + rev[k], k + rev[j]);
                shifts
                    .iter()
                    .for_each(|(sj, sk)| f(j1 + sj * m, k1 + sk * m));
            }
            let k1 = k + rev[k];
            if even {
                f(k1, k1);
                f(k1 + m, k1 + 2 * m);
                f(k1 + 3 * m, k1 + 3 * m);
            } else {
                f(k1, k1);
                f(k1 + m, k1 + m);
            }
        }
    }

    pub fn apply_in_place<T>(&self, data: &mut [T]) {
        assert_eq!(data.len(), self.n());
        self.visit(|a, b| data.swap(a, b));
    }

    /// Writes the permutation of `src` into `dst`, leaving `src` untouched.
    pub fn apply_copy<T: Copy>(&self, src: &[T], dst: &mut [T]) {
        assert_eq!(src.len(), self.n());
        assert_eq!(dst.len(), src.len());
        self.visit(|a, b| {
            dst[a] = src[b];
            dst[b] = src[a];
        });
    }
}
