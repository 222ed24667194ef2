//! Seeded simplex noise in two and three dimensions.
//!
//! Output is roughly in `[-1, 1]` and continuous in every input. The only
//! state is the permutation table, which is shuffled from the seed, so two
//! generators built from the same seed agree everywhere.

use crate::rng::Rng;

const GRAD3: [[f64; 3]; 12] = [
    [1.0, 1.0, 0.0], [-1.0, 1.0, 0.0], [1.0, -1.0, 0.0], [-1.0, -1.0, 0.0],
    [1.0, 0.0, 1.0], [-1.0, 0.0, 1.0], [1.0, 0.0, -1.0], [-1.0, 0.0, -1.0],
    [0.0, 1.0, 1.0], [0.0, -1.0, 1.0], [0.0, 1.0, -1.0], [0.0, -1.0, -1.0],
];

const F3: f64 = 1.0 / 3.0;
const G3: f64 = 1.0 / 6.0;

#[derive(Clone)]
pub struct SimplexNoise {
    perm: [u8; 512],
    perm_mod12: [u8; 512],
}

impl SimplexNoise {
    pub fn new(seed: u64) -> Self {
        Self::from_rng(&mut Rng::new(seed))
    }

    pub fn from_rng(rng: &mut Rng) -> Self {
        let mut table: [u8; 256] = std::array::from_fn(|i| i as u8);
        for i in (1..256).rev() {
            let j = rng.index(i + 1);
            table.swap(i, j);
        }
        let mut perm = [0u8; 512];
        let mut perm_mod12 = [0u8; 512];
        for i in 0..512 {
            perm[i] = table[i & 255];
            perm_mod12[i] = perm[i] % 12;
        }
        SimplexNoise { perm, perm_mod12 }
    }

    fn p(&self, i: usize) -> usize {
        self.perm[i] as usize
    }

    fn gradient(&self, i: usize) -> &[f64; 3] {
        &GRAD3[self.perm_mod12[i] as usize]
    }

    pub fn noise2d(&self, x: f64, y: f64) -> f64 {
        let f2 = 0.5 * (3f64.sqrt() - 1.0);
        let g2 = (3.0 - 3f64.sqrt()) / 6.0;

        let s = (x + y) * f2;
        let i = (x + s).floor();
        let j = (y + s).floor();
        let t = (i + j) * g2;
        let x0 = x - (i - t);
        let y0 = y - (j - t);

        let (i1, j1) = if x0 > y0 { (1, 0) } else { (0, 1) };
        let x1 = x0 - i1 as f64 + g2;
        let y1 = y0 - j1 as f64 + g2;
        let x2 = x0 - 1.0 + 2.0 * g2;
        let y2 = y0 - 1.0 + 2.0 * g2;

        let ii = (i as i64 & 255) as usize;
        let jj = (j as i64 & 255) as usize;
        let gi0 = ii + self.p(jj);
        let gi1 = ii + i1 + self.p(jj + j1);
        let gi2 = ii + 1 + self.p(jj + 1);

        let corner = |gi: usize, dx: f64, dy: f64| {
            let t = 0.5 - dx * dx - dy * dy;
            if t < 0.0 {
                0.0
            } else {
                let g = self.gradient(gi);
                let t = t * t;
                t * t * (g[0] * dx + g[1] * dy)
            }
        };

        70.0 * (corner(gi0, x0, y0) + corner(gi1, x1, y1) + corner(gi2, x2, y2))
    }

    pub fn noise3d(&self, x: f64, y: f64, z: f64) -> f64 {
        let s = (x + y + z) * F3;
        let i = (x + s).floor();
        let j = (y + s).floor();
        let k = (z + s).floor();
        let t = (i + j + k) * G3;
        let x0 = x - (i - t);
        let y0 = y - (j - t);
        let z0 = z - (k - t);

        // Which of the six tetrahedra the point falls in.
        let (i1, j1, k1, i2, j2, k2) = if x0 >= y0 {
            if y0 >= z0 {
                (1, 0, 0, 1, 1, 0)
            } else if x0 >= z0 {
                (1, 0, 0, 1, 0, 1)
            } else {
                (0, 0, 1, 1, 0, 1)
            }
        } else if y0 < z0 {
            (0, 0, 1, 0, 1, 1)
        } else if x0 < z0 {
            (0, 1, 0, 0, 1, 1)
        } else {
            (0, 1, 0, 1, 1, 0)
        };

        let x1 = x0 - i1 as f64 + G3;
        let y1 = y0 - j1 as f64 + G3;
        let z1 = z0 - k1 as f64 + G3;
        let x2 = x0 - i2 as f64 + 2.0 * G3;
        let y2 = y0 - j2 as f64 + 2.0 * G3;
        let z2 = z0 - k2 as f64 + 2.0 * G3;
        let x3 = x0 - 1.0 + 3.0 * G3;
        let y3 = y0 - 1.0 + 3.0 * G3;
        let z3 = z0 - 1.0 + 3.0 * G3;

        let ii = (i as i64 & 255) as usize;
        let jj = (j as i64 & 255) as usize;
        let kk = (k as i64 & 255) as usize;
        let gi0 = ii + self.p(jj + self.p(kk));
        let gi1 = ii + i1 + self.p(jj + j1 + self.p(kk + k1));
        let gi2 = ii + i2 + self.p(jj + j2 + self.p(kk + k2));
        let gi3 = ii + 1 + self.p(jj + 1 + self.p(kk + 1));

        let corner = |gi: usize, dx: f64, dy: f64, dz: f64| {
            let t = 0.6 - dx * dx - dy * dy - dz * dz;
            if t < 0.0 {
                0.0
            } else {
                let g = self.gradient(gi);
                let t = t * t;
                t * t * (g[0] * dx + g[1] * dy + g[2] * dz)
            }
        };

        32.0 * (corner(gi0, x0, y0, z0)
            + corner(gi1, x1, y1, z1)
            + corner(gi2, x2, y2, z2)
            + corner(gi3, x3, y3, z3))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_agrees_everywhere() {
        let a = SimplexNoise::new(42);
        let b = SimplexNoise::new(42);
        for step in 0..50 {
            let x = step as f64 * 0.37 - 9.0;
            assert_eq!(a.noise3d(x, x * 0.5, -x), b.noise3d(x, x * 0.5, -x));
            assert_eq!(a.noise2d(x, -x * 0.25), b.noise2d(x, -x * 0.25));
        }
    }

    #[test]
    fn different_seeds_differ() {
        let a = SimplexNoise::new(1);
        let b = SimplexNoise::new(2);
        let differs = (0..100).any(|i| {
            let x = i as f64 * 0.173;
            a.noise3d(x, 0.3, 0.7) != b.noise3d(x, 0.3, 0.7)
        });
        assert!(differs);
    }

    #[test]
    fn output_is_bounded() {
        let noise = SimplexNoise::new(9);
        for i in -40..40 {
            for j in -40..40 {
                let (x, y) = (i as f64 * 0.131, j as f64 * 0.097);
                let n3 = noise.noise3d(x, y, x - y);
                let n2 = noise.noise2d(x, y);
                assert!((-1.0..=1.0).contains(&n3), "noise3d({x}, {y}) = {n3}");
                assert!((-1.0..=1.0).contains(&n2), "noise2d({x}, {y}) = {n2}");
            }
        }
    }

    #[test]
    fn nearby_inputs_give_nearby_outputs() {
        let noise = SimplexNoise::new(5);
        for i in 0..200 {
            let x = i as f64 * 0.05;
            let a = noise.noise3d(x, 1.5, 0.25);
            let b = noise.noise3d(x + 1e-4, 1.5, 0.25);
            assert!((a - b).abs() < 0.01);
        }
    }

    #[test]
    fn permutation_is_a_shuffle() {
        let noise = SimplexNoise::new(77);
        let mut seen = [false; 256];
        for &v in &noise.perm[..256] {
            seen[v as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
        assert_eq!(noise.perm[..256], noise.perm[256..]);
    }
}
