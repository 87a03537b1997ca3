use wasm_bindgen::prelude::*;

mod debounce;
mod random;
mod scroll;

pub use debounce::{debounce, Debounce};
pub use random::{get_random, random_hex_color};
pub use scroll::{ScrollLock, StyleSnapshot, LOCK_ATTRIBUTE};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
}
