use wasm_bindgen::prelude::*;

const DEFAULT_DECIMALS: u32 = 1;

/// Formats a pseudo-random value from `[min, max)` with `decimals` digits
/// after the point. One digit when `decimals` is not given.
#[wasm_bindgen]
pub fn get_random(min: f64, max: f64, decimals: Option<u32>) -> String {
    let value = scale_to_range(js_sys::Math::random(), min, max);
    format_fixed(value, decimals.unwrap_or(DEFAULT_DECIMALS))
}

/// Samples a uniform 24-bit color and renders it as `#rrggbb`.
#[wasm_bindgen]
pub fn random_hex_color() -> String {
    let bits = (js_sys::Math::random() * f64::from(1 << 24)) as u32;
    format_hex_color(bits)
}

fn scale_to_range(unit: f64, min: f64, max: f64) -> f64 {
    unit * (max - min) + min
}

fn format_fixed(value: f64, decimals: u32) -> String {
    format!("{value:.prec$}", prec = decimals as usize)
}

fn format_hex_color(bits: u32) -> String {
    format!("#{bits:06x}")
}
