//! Deterministic 2D/3D simplex noise and an fBm helper.
//!
//! This is a from-scratch simplex implementation (Gustavson's formulation)
//! rather than a wrapper over a third-party noise crate: the permutation
//! table is built from a seeded integer PRNG so that identical seeds always
//! reshuffle to identical tables, independent of whatever noise library
//! happens to be vendored at build time.

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

const F2: f64 = 0.366_025_403_784_438_6; // 0.5 * (sqrt(3) - 1)
const G2: f64 = 0.211_324_865_405_187; // (3 - sqrt(3)) / 6
const F3: f64 = 1.0 / 3.0;
const G3: f64 = 1.0 / 6.0;

/// The 12 edge vectors of a cube, used as the simplex gradient set for both
/// the 2D and 3D noise functions (the 2D case simply ignores the z component).
const GRAD3: [[f64; 3]; 12] = [
    [1.0, 1.0, 0.0],
    [-1.0, 1.0, 0.0],
    [1.0, -1.0, 0.0],
    [-1.0, -1.0, 0.0],
    [1.0, 0.0, 1.0],
    [-1.0, 0.0, 1.0],
    [1.0, 0.0, -1.0],
    [-1.0, 0.0, -1.0],
    [0.0, 1.0, 1.0],
    [0.0, -1.0, 1.0],
    [0.0, 1.0, -1.0],
    [0.0, -1.0, -1.0],
];

/// A pure value-noise generator seeded at construction. Has no mutable state
/// after `new`: two instances built from the same seed always agree on every
/// subsequent query.
#[derive(Debug, Clone)]
pub struct Noise {
    perm: [u8; 512],
}

impl Noise {
    /// Build a generator whose permutation table is a deterministic shuffle
    /// of `0..256` driven by `seed`.
    pub fn new(seed: u64) -> Self {
        let mut table: Vec<u8> = (0..=255u8).collect();
        let mut rng = StdRng::seed_from_u64(seed);
        table.shuffle(&mut rng);

        let mut perm = [0u8; 512];
        for i in 0..512 {
            perm[i] = table[i % 256];
        }
        Self { perm }
    }

    fn grad_index(&self, i: i32, j: i32) -> usize {
        let ii = (i & 255) as usize;
        let jj = (j & 255) as usize;
        (self.perm[ii] as usize + self.perm[jj] as usize) % 12
    }

    fn grad_index3(&self, i: i32, j: i32, k: i32) -> usize {
        let ii = (i & 255) as usize;
        let jj = (self.perm[(j & 255) as usize] as usize + ii) & 255;
        let kk = (self.perm[jj] as usize + (k & 255) as usize) & 511;
        (self.perm[kk] as usize) % 12
    }

    /// 2D simplex noise, in `[-1, 1]`.
    pub fn noise2d(&self, x: f64, y: f64) -> f64 {
        let s = (x + y) * F2;
        let i = (x + s).floor();
        let j = (y + s).floor();
        let t = (i + j) * G2;
        let x0 = x - (i - t);
        let y0 = y - (j - t);

        let (i1, j1) = if x0 > y0 { (1.0, 0.0) } else { (0.0, 1.0) };

        let x1 = x0 - i1 + G2;
        let y1 = y0 - j1 + G2;
        let x2 = x0 - 1.0 + 2.0 * G2;
        let y2 = y0 - 1.0 + 2.0 * G2;

        let ii = i as i32;
        let jj = j as i32;

        let n0 = corner2(0.5 - x0 * x0 - y0 * y0, x0, y0, self.grad_index(ii, jj));
        let n1 = corner2(
            0.5 - x1 * x1 - y1 * y1,
            x1,
            y1,
            self.grad_index(ii + i1 as i32, jj + j1 as i32),
        );
        let n2 = corner2(
            0.5 - x2 * x2 - y2 * y2,
            x2,
            y2,
            self.grad_index(ii + 1, jj + 1),
        );

        (70.0 * (n0 + n1 + n2)).clamp(-1.0, 1.0)
    }

    /// 3D simplex noise, in `[-1, 1]`.
    pub fn noise3d(&self, x: f64, y: f64, z: f64) -> f64 {
        let s = (x + y + z) * F3;
        let i = (x + s).floor();
        let j = (y + s).floor();
        let k = (z + s).floor();
        let t = (i + j + k) * G3;
        let x0 = x - (i - t);
        let y0 = y - (j - t);
        let z0 = z - (k - t);

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

        let ii = i as i32;
        let jj = j as i32;
        let kk = k as i32;

        let n0 = corner3(
            0.6 - x0 * x0 - y0 * y0 - z0 * z0,
            x0,
            y0,
            z0,
            self.grad_index3(ii, jj, kk),
        );
        let n1 = corner3(
            0.6 - x1 * x1 - y1 * y1 - z1 * z1,
            x1,
            y1,
            z1,
            self.grad_index3(ii + i1, jj + j1, kk + k1),
        );
        let n2 = corner3(
            0.6 - x2 * x2 - y2 * y2 - z2 * z2,
            x2,
            y2,
            z2,
            self.grad_index3(ii + i2, jj + j2, kk + k2),
        );
        let n3 = corner3(
            0.6 - x3 * x3 - y3 * y3 - z3 * z3,
            x3,
            y3,
            z3,
            self.grad_index3(ii + 1, jj + 1, kk + 1),
        );

        (32.0 * (n0 + n1 + n2 + n3)).clamp(-1.0, 1.0)
    }

    /// Fractal Brownian motion over [`noise2d`]: sums `persistence^i *
    /// noise2d(x * lacunarity^i, y * lacunarity^i)` across `octaves`,
    /// normalized by the total amplitude so the result stays in `[-1, 1]`.
    pub fn fbm2d(&self, x: f64, y: f64, octaves: u32, lacunarity: f64, persistence: f64) -> f64 {
        let mut amplitude = 1.0;
        let mut frequency = 1.0;
        let mut sum = 0.0;
        let mut amplitude_sum = 0.0;
        for _ in 0..octaves {
            sum += amplitude * self.noise2d(x * frequency, y * frequency);
            amplitude_sum += amplitude;
            amplitude *= persistence;
            frequency *= lacunarity;
        }
        if amplitude_sum > 0.0 {
            sum / amplitude_sum
        } else {
            0.0
        }
    }
}

fn corner2(t: f64, x: f64, y: f64, grad_index: usize) -> f64 {
    if t < 0.0 {
        0.0
    } else {
        let t2 = t * t;
        let g = GRAD3[grad_index];
        t2 * t2 * (g[0] * x + g[1] * y)
    }
}

fn corner3(t: f64, x: f64, y: f64, z: f64, grad_index: usize) -> f64 {
    if t < 0.0 {
        0.0
    } else {
        let t2 = t * t;
        let g = GRAD3[grad_index];
        t2 * t2 * (g[0] * x + g[1] * y + g[2] * z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_output() {
        let a = Noise::new(1234);
        let b = Noise::new(1234);
        for i in 0..50 {
            let x = i as f64 * 0.37;
            let y = i as f64 * 0.91;
            assert_eq!(a.noise2d(x, y), b.noise2d(x, y));
            assert_eq!(a.noise3d(x, y, x - y), b.noise3d(x, y, x - y));
        }
    }

    #[test]
    fn different_seed_diverges() {
        let a = Noise::new(1);
        let b = Noise::new(2);
        let diff = (0..20)
            .filter(|&i| a.noise2d(i as f64 * 1.3, 0.0) != b.noise2d(i as f64 * 1.3, 0.0))
            .count();
        assert!(diff > 0);
    }

    #[test]
    fn outputs_stay_in_range() {
        let n = Noise::new(99);
        for i in 0..200 {
            let x = i as f64 * 0.13 - 10.0;
            let y = i as f64 * 0.07 + 4.0;
            let v2 = n.noise2d(x, y);
            assert!((-1.0..=1.0).contains(&v2), "noise2d out of range: {v2}");
            let v3 = n.noise3d(x, y, x * 0.5);
            assert!((-1.0..=1.0).contains(&v3), "noise3d out of range: {v3}");
        }
    }

    #[test]
    fn fbm_is_deterministic_and_normalized() {
        let n = Noise::new(7);
        let a = n.fbm2d(12.5, -3.25, 4, 2.0, 0.5);
        let b = n.fbm2d(12.5, -3.25, 4, 2.0, 0.5);
        assert_eq!(a, b);
        assert!((-1.5..=1.5).contains(&a));
    }
}
