//! Expose edit records and streaming reconciliation to WebAssembly.
use wasm_bindgen::prelude::*;

use crate::{EditCategory, EditKind, EditRecord, ReconcileError, Reconciler, SessionHandle};

#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc<'_> = wee_alloc::WeeAlloc::INIT;

/// WASM wrapper around `crate::compute_edit_records`.
///
/// The arguments come straight from JavaScript, so anything but a string is
/// rejected with an error instead of being coerced.
#[wasm_bindgen(js_name = computeEditRecords)]
pub fn compute_edit_records(
    old_text: &JsValue,
    new_text: &JsValue,
) -> Result<Vec<JsEditRecord>, JsError> {
    set_panic_hook();

    let old_text = string_argument(old_text, "oldText")?;
    let new_text = string_argument(new_text, "newText")?;

    Ok(crate::compute_edit_records(&old_text, &new_text)
        .into_iter()
        .map(JsEditRecord::from)
        .collect())
}

fn string_argument(value: &JsValue, name: &str) -> Result<String, ReconcileError> {
    value
        .as_string()
        .ok_or_else(|| ReconcileError::InvalidInput(format!("{name} must be a string")))
}

fn set_panic_hook() {
    // https://github.com/rustwasm/console_error_panic_hook#readme
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Wrapper type to expose `EditRecord` to JS.
#[wasm_bindgen]
#[derive(Debug, Clone, PartialEq)]
pub struct JsEditRecord {
    id: usize,
    kind: EditKind,
    text: String,
    category: EditCategory,
    replacement_text: Option<String>,
    context_before: String,
    context_after: String,
}

#[wasm_bindgen]
impl JsEditRecord {
    #[wasm_bindgen(getter)]
    #[must_use]
    pub fn id(&self) -> usize { self.id }

    #[wasm_bindgen(getter)]
    #[must_use]
    pub fn kind(&self) -> EditKind { self.kind }

    #[wasm_bindgen(getter)]
    #[must_use]
    pub fn text(&self) -> String { self.text.clone() }

    #[wasm_bindgen(getter)]
    #[must_use]
    pub fn category(&self) -> EditCategory { self.category }

    #[wasm_bindgen(getter, js_name = replacementText)]
    #[must_use]
    pub fn replacement_text(&self) -> Option<String> { self.replacement_text.clone() }

    #[wasm_bindgen(getter, js_name = contextBefore)]
    #[must_use]
    pub fn context_before(&self) -> String { self.context_before.clone() }

    #[wasm_bindgen(getter, js_name = contextAfter)]
    #[must_use]
    pub fn context_after(&self) -> String { self.context_after.clone() }
}

impl From<EditRecord> for JsEditRecord {
    fn from(record: EditRecord) -> Self {
        JsEditRecord {
            id: record.id(),
            kind: record.kind(),
            text: record.text().to_owned(),
            category: record.category(),
            replacement_text: record.replacement_text().map(str::to_owned),
            context_before: record.context_before().to_owned(),
            context_after: record.context_after().to_owned(),
        }
    }
}

/// WASM wrapper around `crate::Reconciler` owning one document.
#[wasm_bindgen(js_name = Reconciler)]
#[derive(Debug)]
pub struct JsReconciler {
    reconciler: Reconciler,
}

#[wasm_bindgen(js_class = Reconciler)]
impl JsReconciler {
    #[wasm_bindgen(constructor)]
    #[must_use]
    pub fn new(text: &str) -> Self {
        set_panic_hook();

        Self {
            reconciler: Reconciler::new(text),
        }
    }

    /// Starts a session over the characters `start..end`.
    #[wasm_bindgen(js_name = startReconciliation)]
    pub fn start_reconciliation(&mut self, start: usize, end: usize) -> Result<SessionHandle, JsError> {
        Ok(self.reconciler.start_reconciliation(start..end)?)
    }

    #[wasm_bindgen(js_name = feedIncrement)]
    pub fn feed_increment(
        &mut self,
        handle: &SessionHandle,
        completion_so_far: &str,
    ) -> Result<(), JsError> {
        Ok(self.reconciler.feed_increment(*handle, completion_so_far)?)
    }

    pub fn finish(&mut self, handle: &SessionHandle) -> Result<(), JsError> {
        Ok(self.reconciler.finish_session(*handle)?)
    }

    pub fn accept(&mut self, handle: &SessionHandle) -> Result<(), JsError> {
        Ok(self.reconciler.accept_session(*handle)?)
    }

    pub fn reject(&mut self, handle: &SessionHandle) -> Result<(), JsError> {
        Ok(self.reconciler.reject_session(*handle)?)
    }

    /// Rejects every open session and returns how many there were.
    #[wasm_bindgen(js_name = cancelAll)]
    pub fn cancel_all(&mut self) -> Result<usize, JsError> { Ok(self.reconciler.cancel_all()?) }

    #[wasm_bindgen(js_name = renderedText)]
    pub fn rendered_text(&self, handle: &SessionHandle) -> Result<String, JsError> {
        Ok(self.reconciler.rendered_text(*handle)?)
    }

    #[must_use]
    pub fn text(&self) -> String { self.reconciler.text() }
}
