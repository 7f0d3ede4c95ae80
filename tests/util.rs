/// Check whether two floats differ by at most 1e-9, relative to the larger magnitude or absolute below 1.0.
#[macro_export]
macro_rules! assert_floats_near_equal {
    ($val1:expr, $val2:expr, $msg:expr) => {{
        let a: f64 = $val1;
        let b: f64 = $val2;
        let scale = a.abs().max(b.abs()).max(1.0);
        assert!((a - b).abs() <= 1e-9 * scale, "{}: {} != {}", $msg, a, b);
    }};
}
