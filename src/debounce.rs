use std::cell::RefCell;
use std::rc::{Rc, Weak};

use js_sys::{Array, Function};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Window;

struct Pending {
    context: JsValue,
    args: Array,
}

struct Inner {
    window: Window,
    callback: Function,
    wait: i32,
    immediate: bool,
    timer: Option<i32>,
    pending: Option<Pending>,
}

/// Collapses bursts of calls into a single invocation of the wrapped
/// callback. With `immediate` the first call of a burst fires and the rest
/// of the burst is ignored; otherwise the last call fires once the burst
/// has been quiet for `wait` milliseconds.
#[wasm_bindgen]
pub struct Debounce {
    inner: Rc<RefCell<Inner>>,
}

#[wasm_bindgen]
pub fn debounce(callback: Function, wait: i32, immediate: bool) -> Result<Debounce, JsValue> {
    Debounce::new(callback, wait, immediate)
}

#[wasm_bindgen]
impl Debounce {
    #[wasm_bindgen(constructor)]
    pub fn new(callback: Function, wait: i32, immediate: bool) -> Result<Debounce, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("Missing window"))?;
        Ok(Debounce {
            inner: Rc::new(RefCell::new(Inner {
                window,
                callback,
                wait,
                immediate,
                timer: None,
                pending: None,
            })),
        })
    }

    /// Invokes the wrapper with the callback's `this` context and argument
    /// array.
    pub fn call(&self, context: &JsValue, args: &Array) -> Result<(), JsValue> {
        if self.inner.borrow().immediate {
            if self.inner.borrow().timer.is_some() {
                return Ok(());
            }
            let callback = self.inner.borrow().callback.clone();
            callback.apply(context, args)?;
            let id = schedule(&self.inner)?;
            self.inner.borrow_mut().timer = Some(id);
            return Ok(());
        }

        {
            let mut inner = self.inner.borrow_mut();
            if let Some(id) = inner.timer.take() {
                inner.window.clear_timeout_with_handle(id);
            }
            inner.pending = Some(Pending {
                context: context.clone(),
                args: args.clone(),
            });
        }
        let id = schedule(&self.inner)?;
        self.inner.borrow_mut().timer = Some(id);
        Ok(())
    }

    /// Drops the pending invocation, if any. In immediate mode this ends the
    /// suppression window early.
    pub fn cancel(&self) {
        let mut inner = self.inner.borrow_mut();
        if let Some(id) = inner.timer.take() {
            inner.window.clear_timeout_with_handle(id);
        }
        inner.pending = None;
    }

    /// Fires a pending trailing call now instead of waiting out the timer.
    pub fn flush(&self) -> Result<(), JsValue> {
        let pending = {
            let mut inner = self.inner.borrow_mut();
            if let Some(id) = inner.timer.take() {
                inner.window.clear_timeout_with_handle(id);
            }
            inner.pending.take()
        };
        let Some(pending) = pending else {
            return Ok(());
        };
        let callback = self.inner.borrow().callback.clone();
        callback.apply(&pending.context, &pending.args)?;
        Ok(())
    }
}

impl Drop for Debounce {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn schedule(inner: &Rc<RefCell<Inner>>) -> Result<i32, JsValue> {
    // The timeout only holds a weak reference; a dropped wrapper is not kept
    // alive by a timer that has yet to fire.
    let weak = Rc::downgrade(inner);
    let on_timeout = Closure::once_into_js(move || fire(&weak));
    let inner = inner.borrow();
    inner
        .window
        .set_timeout_with_callback_and_timeout_and_arguments_0(
            on_timeout.unchecked_ref(),
            inner.wait,
        )
}

fn fire(weak: &Weak<RefCell<Inner>>) {
    let Some(inner) = weak.upgrade() else {
        return;
    };
    let (callback, pending) = {
        let mut inner = inner.borrow_mut();
        inner.timer = None;
        (inner.callback.clone(), inner.pending.take())
    };
    // Immediate mode leaves nothing pending; the elapsed timer just ends the
    // suppression window.
    let Some(pending) = pending else {
        return;
    };
    if let Err(err) = callback.apply(&pending.context, &pending.args) {
        web_sys::console::error_1(&err);
    }
}
