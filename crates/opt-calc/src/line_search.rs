//! 一維線搜尋（黃金分割法）

const INV_PHI: f64 = 0.618_033_988_749_894_9;

/// 在 [lo, hi] 上最小化單峰函數，回傳 (x, f(x))
///
/// 區間端點也納入比較，單調函數會停在邊界。
pub fn golden_section_minimize<F>(
    f: F,
    lo: f64,
    hi: f64,
    tolerance: f64,
    max_iterations: u32,
) -> (f64, f64)
where
    F: Fn(f64) -> f64,
{
    let (mut a, mut b) = if lo <= hi { (lo, hi) } else { (hi, lo) };
    if b - a <= tolerance {
        let x = 0.5 * (a + b);
        return (x, f(x));
    }

    let f_lo = f(a);
    let f_hi = f(b);

    let mut x1 = b - INV_PHI * (b - a);
    let mut x2 = a + INV_PHI * (b - a);
    let mut f1 = f(x1);
    let mut f2 = f(x2);

    for _ in 0..max_iterations {
        if (b - a).abs() <= tolerance * (1.0 + x1.abs() + x2.abs()) {
            break;
        }
        if f1 <= f2 {
            b = x2;
            x2 = x1;
            f2 = f1;
            x1 = b - INV_PHI * (b - a);
            f1 = f(x1);
        } else {
            a = x1;
            x1 = x2;
            f1 = f2;
            x2 = a + INV_PHI * (b - a);
            f2 = f(x2);
        }
    }

    let (mut best_x, mut best_f) = if f1 <= f2 { (x1, f1) } else { (x2, f2) };
    let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
    for (x, fx) in [(lo, f_lo), (hi, f_hi)] {
        if fx < best_f {
            best_x = x;
            best_f = fx;
        }
    }

    (best_x, best_f)
}
