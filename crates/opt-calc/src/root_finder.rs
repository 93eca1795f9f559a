//! Brent 求根法

use opt_core::{OptError, Result};

/// 求根結果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootSolution {
    /// 根的估計值
    pub root: f64,

    /// 殘差 |f(root)|
    pub residual: f64,

    /// 實際迭代次數
    pub iterations: u32,

    /// 是否在迭代上限內收斂（false 表示退化為最佳估計）
    pub converged: bool,
}

/// 區間求根器（Brent's method）
///
/// 結合反二次插值、割線與二分法。要求 f(a)·f(b) ≤ 0；
/// 迭代用盡時不報錯，而是回傳 {b, c} 中 |f| 較小者，呼叫端需自行檢查殘差。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootFinder {
    pub tolerance: f64,
    pub max_iterations: u32,
}

impl Default for RootFinder {
    fn default() -> Self {
        Self {
            tolerance: 1e-9,
            max_iterations: 100,
        }
    }
}

impl RootFinder {
    pub fn new(tolerance: f64, max_iterations: u32) -> Self {
        Self {
            tolerance,
            max_iterations,
        }
    }

    /// 求解 f(x) = 0，x ∈ [a, b]
    pub fn solve<F>(&self, f: F, a: f64, b: f64) -> Result<f64>
    where
        F: Fn(f64) -> f64,
    {
        self.solve_detailed(f, a, b).map(|solution| solution.root)
    }

    /// 求解並回傳收斂資訊
    pub fn solve_detailed<F>(&self, f: F, a: f64, b: f64) -> Result<RootSolution>
    where
        F: Fn(f64) -> f64,
    {
        let mut a = a;
        let mut b = b;
        let mut fa = f(a);
        let mut fb = f(b);

        if fa == 0.0 {
            return Ok(Self::exact(a));
        }
        if fb == 0.0 {
            return Ok(Self::exact(b));
        }
        if fa.is_nan() || fb.is_nan() || fa.signum() == fb.signum() {
            return Err(OptError::InvalidBracket { a, b, fa, fb });
        }

        // c 為前一個最佳估計，d/e 為最近兩步的步長
        let mut c = a;
        let mut fc = fa;
        let mut d = b - a;
        let mut e = d;

        for iteration in 1..=self.max_iterations {
            if fb.signum() == fc.signum() {
                c = a;
                fc = fa;
                d = b - a;
                e = d;
            }
            if fc.abs() < fb.abs() {
                a = b;
                b = c;
                c = a;
                fa = fb;
                fb = fc;
                fc = fa;
            }

            let tol1 = 2.0 * f64::EPSILON * b.abs() + 0.5 * self.tolerance;
            let half_width = 0.5 * (c - b);

            if fb.abs() < self.tolerance {
                return Ok(RootSolution {
                    root: b,
                    residual: fb.abs(),
                    iterations: iteration,
                    converged: true,
                });
            }
            if half_width.abs() <= tol1 {
                let midpoint = b + half_width;
                return Ok(RootSolution {
                    root: midpoint,
                    residual: f(midpoint).abs(),
                    iterations: iteration,
                    converged: true,
                });
            }

            if e.abs() >= tol1 && fa.abs() > fb.abs() {
                let s = fb / fa;
                let (mut p, mut q) = if a == c {
                    // 割線
                    (2.0 * half_width * s, 1.0 - s)
                } else {
                    // 反二次插值
                    let q = fa / fc;
                    let r = fb / fc;
                    (
                        s * (2.0 * half_width * q * (q - r) - (b - a) * (r - 1.0)),
                        (q - 1.0) * (r - 1.0) * (s - 1.0),
                    )
                };
                if p > 0.0 {
                    q = -q;
                }
                p = p.abs();

                let min1 = 3.0 * half_width * q - (tol1 * q).abs();
                let min2 = (e * q).abs();
                if 2.0 * p < min1.min(min2) {
                    e = d;
                    d = p / q;
                } else {
                    d = half_width;
                    e = d;
                }
            } else {
                d = half_width;
                e = d;
            }

            a = b;
            fa = fb;
            b += if d.abs() > tol1 {
                d
            } else {
                tol1.copysign(half_width)
            };
            fb = f(b);
        }

        let (root, residual) = if fb.abs() <= fc.abs() {
            (b, fb.abs())
        } else {
            (c, fc.abs())
        };
        tracing::warn!(
            "Brent 求根未在 {} 次迭代內收斂，回傳最佳估計 x={}（殘差 {}）",
            self.max_iterations,
            root,
            residual
        );

        Ok(RootSolution {
            root,
            residual,
            iterations: self.max_iterations,
            converged: false,
        })
    }

    fn exact(root: f64) -> RootSolution {
        RootSolution {
            root,
            residual: 0.0,
            iterations: 0,
            converged: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[test]
    fn test_sqrt_two() {
        let finder = RootFinder::default();
        let root = finder.solve(|x| x * x - 2.0, 0.0, 2.0).unwrap();

        assert!((root - 1.41421356).abs() < 1e-6);
    }

    #[test]
    fn test_invalid_bracket() {
        let finder = RootFinder::default();
        let result = finder.solve(|x| x + 5.0, 1.0, 2.0);

        match result {
            Err(OptError::InvalidBracket { fa, fb, .. }) => {
                assert_eq!(fa, 6.0);
                assert_eq!(fb, 7.0);
            }
            other => panic!("預期 InvalidBracket，得到 {:?}", other),
        }
    }

    #[test]
    fn test_endpoint_is_root() {
        let finder = RootFinder::default();
        let solution = finder.solve_detailed(|x| x - 3.0, 3.0, 10.0).unwrap();

        assert_eq!(solution.root, 3.0);
        assert!(solution.converged);
        assert_eq!(solution.iterations, 0);
    }

    #[rstest]
    #[case(-1.0, 1.0)]
    #[case(1.0, -1.0)]
    fn test_reversed_bracket(#[case] a: f64, #[case] b: f64) {
        let finder = RootFinder::default();
        let root = finder.solve(|x| x.powi(3) - 0.125, a, b).unwrap();

        assert!((root - 0.5).abs() < 1e-8);
    }

    #[test]
    fn test_transcendental() {
        let finder = RootFinder::default();
        let root = finder.solve(|x| x.cos() - x, 0.0, 1.0).unwrap();

        assert!((root - 0.7390851332).abs() < 1e-8);
    }

    #[test]
    fn test_discontinuous_sign_change() {
        // 不連續的符號變化仍會收斂到跳躍點
        let finder = RootFinder::default();
        let solution = finder
            .solve_detailed(|x| if x < 2.5 { 1.0 } else { -1.0 }, 0.0, 10.0)
            .unwrap();

        assert!(solution.converged);
        assert!((solution.root - 2.5).abs() < 1e-6);
    }

    #[test]
    fn test_lenient_degrade_on_iteration_limit() {
        let finder = RootFinder::new(1e-15, 3);
        let solution = finder.solve_detailed(|x| x * x - 2.0, 0.0, 2.0).unwrap();

        assert!(!solution.converged);
        assert_eq!(solution.iterations, 3);
        assert!((0.0..=2.0).contains(&solution.root));
        assert!(solution.residual < 2.0);
    }

    proptest! {
        #[test]
        fn test_root_stays_in_bracket(root in -50.0f64..50.0, width in 0.5f64..20.0) {
            let finder = RootFinder::default();
            let a = root - width;
            let b = root + width * 0.7;
            let found = finder.solve(|x| (x - root) * (1.0 + x * x), a, b).unwrap();

            prop_assert!(found >= a && found <= b);
            prop_assert!((found - root).abs() < 1e-6);
        }
    }
}
