use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlElement, Window};

/// Attribute set on `<body>` while scrolling is locked. Its value is the
/// scroll offset that was active when the lock was taken.
pub const LOCK_ATTRIBUTE: &str = "scroll-lock";

const SNAPSHOT_ATTRIBUTE: &str = "data-scroll-lock";

// Lets the restored scroll position settle before the markers disappear.
const UNLOCK_SETTLE_MS: i32 = 30;

/// Inline style state captured when a lock is taken. Serialized into the
/// snapshot attribute with the short key names `pos` and `scrollY`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct StyleSnapshot {
    pub height: String,
    #[serde(rename = "pos")]
    pub position: String,
    pub top: String,
    pub left: String,
    pub right: String,
    #[serde(rename = "scrollY")]
    pub scroll_y: f64,
}

/// Prevents page scrolling by fixing the body in place, and restores the
/// prior inline styles and scroll offset on unlock.
#[wasm_bindgen]
pub struct ScrollLock {
    window: Window,
    root: HtmlElement,
    body: HtmlElement,
    snapshot: Option<StyleSnapshot>,
}

#[wasm_bindgen]
impl ScrollLock {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<ScrollLock, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("Missing window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("Missing document"))?;
        let body = document
            .body()
            .ok_or_else(|| JsValue::from_str("Missing body"))?;
        let root = document
            .document_element()
            .ok_or_else(|| JsValue::from_str("Missing root element"))?
            .dyn_into::<HtmlElement>()
            .map_err(|_| JsValue::from_str("Root element is not an HtmlElement"))?;
        // Adopt a snapshot written by an earlier page context so unlock can
        // still restore it.
        let snapshot = body
            .get_attribute(SNAPSHOT_ATTRIBUTE)
            .and_then(|raw| serde_json::from_str(&raw).ok());
        Ok(ScrollLock {
            window,
            root,
            body,
            snapshot,
        })
    }

    pub fn is_locked(&self) -> bool {
        self.snapshot.is_some() || self.body.has_attribute(LOCK_ATTRIBUTE)
    }

    /// Fixes the body in place and records the styles it replaces. Calling
    /// while already locked is a no-op and keeps the stored snapshot.
    pub fn lock(&mut self) -> Result<(), JsValue> {
        if self.is_locked() {
            return Ok(());
        }
        let scroll_y = self.window.scroll_y()?;
        let root_style = self.root.style();
        let body_style = self.body.style();
        let snapshot = StyleSnapshot {
            height: root_style.get_property_value("height")?,
            position: body_style.get_property_value("position")?,
            top: body_style.get_property_value("top")?,
            left: body_style.get_property_value("left")?,
            right: body_style.get_property_value("right")?,
            scroll_y,
        };

        body_style.set_property("position", "fixed")?;
        body_style.set_property("top", &format!("-{scroll_y}px"))?;
        body_style.set_property("left", "0")?;
        body_style.set_property("right", "0")?;
        root_style.set_property("height", "100%")?;

        let json =
            serde_json::to_string(&snapshot).map_err(|err| JsValue::from_str(&err.to_string()))?;
        self.body
            .set_attribute(LOCK_ATTRIBUTE, &scroll_y.to_string())?;
        self.body.set_attribute(SNAPSHOT_ATTRIBUTE, &json)?;
        self.snapshot = Some(snapshot);
        Ok(())
    }

    /// Restores the styles and scroll offset captured by `lock`, then clears
    /// both body attributes once the restore has settled. A no-op when
    /// nothing is locked.
    pub fn unlock(&mut self) -> Result<(), JsValue> {
        let stored = self.body.get_attribute(SNAPSHOT_ATTRIBUTE);
        let snapshot = match self.snapshot.take() {
            Some(snapshot) => snapshot,
            None => match stored.as_deref().map(serde_json::from_str::<StyleSnapshot>) {
                Some(Ok(snapshot)) => snapshot,
                Some(Err(err)) => {
                    // Nothing can be restored from an unreadable snapshot;
                    // drop the markers so the page does not stay locked.
                    web_sys::console::warn_1(
                        &format!("discarding unreadable scroll snapshot: {err}").into(),
                    );
                    self.body.remove_attribute(LOCK_ATTRIBUTE)?;
                    self.body.remove_attribute(SNAPSHOT_ATTRIBUTE)?;
                    return Ok(());
                }
                None => return Ok(()),
            },
        };

        let root_style = self.root.style();
        let body_style = self.body.style();
        // Setting an empty captured value clears the inline property.
        root_style.set_property("height", &snapshot.height)?;
        body_style.set_property("position", &snapshot.position)?;
        body_style.set_property("top", &snapshot.top)?;
        body_style.set_property("left", &snapshot.left)?;
        body_style.set_property("right", &snapshot.right)?;
        self.window.scroll_to_with_x_and_y(0.0, snapshot.scroll_y);

        let body = self.body.clone();
        let cleanup = Closure::once_into_js(move || {
            let _ = body.remove_attribute(LOCK_ATTRIBUTE);
            let _ = body.remove_attribute(SNAPSHOT_ATTRIBUTE);
        });
        self.window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                cleanup.unchecked_ref(),
                UNLOCK_SETTLE_MS,
            )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::StyleSnapshot;

    #[test]
    fn snapshot_reads_the_stored_attribute_format() {
        let parsed: StyleSnapshot = serde_json::from_str(
            r#"{"height":"","pos":"relative","top":"10px","left":"","right":"","scrollY":420.5}"#,
        )
        .unwrap();
        assert_eq!(parsed.position, "relative");
        assert_eq!(parsed.top, "10px");
        assert_eq!(parsed.scroll_y, 420.5);
    }

    #[test]
    fn snapshot_writes_the_short_key_names() {
        let json = serde_json::to_string(&StyleSnapshot {
            height: "100%".into(),
            position: "fixed".into(),
            top: "-12px".into(),
            left: "0".into(),
            right: "0".into(),
            scroll_y: 12.0,
        })
        .unwrap();
        assert!(json.contains(r#""pos":"fixed""#));
        assert!(json.contains(r#""scrollY":12.0"#));
        assert!(!json.contains("position"));
    }

    #[test]
    fn garbage_snapshots_do_not_parse() {
        assert!(serde_json::from_str::<StyleSnapshot>("not json").is_err());
        assert!(serde_json::from_str::<StyleSnapshot>(r#"{"pos":"fixed"}"#).is_err());
    }
}
