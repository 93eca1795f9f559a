//! 標準常態分佈工具

use opt_core::Result;

use crate::RootFinder;

const INV_SQRT_2PI: f64 = 0.398_942_280_401_432_7;

/// 標準常態機率密度 φ(x)
pub fn normal_pdf(x: f64) -> f64 {
    INV_SQRT_2PI * (-0.5 * x * x).exp()
}

/// 標準常態累積分佈 Φ(x)
///
/// 以 Abramowitz & Stegun 7.1.26 近似 erf，絕對誤差小於 1.5e-7。
pub fn normal_cdf(x: f64) -> f64 {
    let z = x.abs() / std::f64::consts::SQRT_2;
    let t = 1.0 / (1.0 + 0.327_591_1 * z);
    let poly = t
        * (0.254_829_592
            + t * (-0.284_496_736
                + t * (1.421_413_741 + t * (-1.453_152_027 + t * 1.061_405_429))));
    let erf = 1.0 - poly * (-z * z).exp();

    if x >= 0.0 {
        0.5 * (1.0 + erf)
    } else {
        0.5 * (1.0 - erf)
    }
}

/// 標準常態損失函數 ψ(k) = φ(k) - k·(1 - Φ(k))
pub fn normal_loss(k: f64) -> f64 {
    normal_pdf(k) - k * (1.0 - normal_cdf(k))
}

/// 求 k ≥ 0 使 1 - Φ(k) = tail
///
/// tail ≥ 0.5 時回傳 0；tail ≤ 0 時回傳搜尋上限。
pub fn upper_quantile(tail: f64, finder: &RootFinder) -> Result<f64> {
    const K_MAX: f64 = 8.0;

    if tail >= 0.5 {
        return Ok(0.0);
    }
    if tail <= 0.0 {
        return Ok(K_MAX);
    }

    let target = 1.0 - tail;
    let upper_value = normal_cdf(K_MAX) - target;
    if upper_value <= 0.0 {
        // 尾端機率小於近似精度
        return Ok(K_MAX);
    }

    finder.solve(|k| normal_cdf(k) - target, 0.0, K_MAX)
}
