//! 文件下载
//!
//! 把字节包装成 Blob，通过临时 `<a download>` 触发保存。

use js_sys::{Array, Uint8Array};
use wasm_bindgen::JsCast;
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

use super::http::HttpError;

pub fn save_bytes(bytes: &[u8], filename: &str, mime: &str) -> Result<(), HttpError> {
    let fail = |what: &str, e: wasm_bindgen::JsValue| {
        HttpError::ResponseParseFailed(format!("{what}: {:?}", e))
    };

    let parts = Array::new();
    parts.push(&Uint8Array::from(bytes));
    let props = BlobPropertyBag::new();
    props.set_type(mime);
    let blob =
        Blob::new_with_u8_array_sequence_and_options(&parts, &props).map_err(|e| fail("Blob", e))?;

    let url = Url::create_object_url_with_blob(&blob).map_err(|e| fail("Url", e))?;

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| HttpError::ResponseParseFailed("document".to_string()))?;
    let anchor: HtmlAnchorElement = document
        .create_element("a")
        .map_err(|e| fail("a", e))?
        .dyn_into()
        .map_err(|e| fail("a", e.into()))?;

    anchor.set_href(&url);
    anchor.set_download(filename);
    if let Some(body) = document.body() {
        let _ = body.append_child(&anchor);
        anchor.click();
        let _ = body.remove_child(&anchor);
    }

    let _ = Url::revoke_object_url(&url);
    Ok(())
}
