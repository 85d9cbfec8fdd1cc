/// Offers `content` to the browser as a file download.
#[cfg(target_arch = "wasm32")]
pub fn download_text(filename: &str, mime: &str, content: &str) -> Result<(), String> {
    use wasm_bindgen::JsCast;
    use web_sys::{window, Blob, BlobPropertyBag, HtmlElement, Url};

    let window = window().ok_or_else(|| "no window".to_string())?;
    let document = window.document().ok_or_else(|| "no document".to_string())?;

    let props = BlobPropertyBag::new();
    props.set_type(mime);
    let parts = js_sys::Array::new();
    parts.push(&wasm_bindgen::JsValue::from_str(content));
    let blob =
        Blob::new_with_str_sequence_and_options(&parts, &props).map_err(|_| "blob".to_string())?;

    let url = Url::create_object_url_with_blob(&blob).map_err(|_| "url".to_string())?;

    let a = document
        .create_element("a")
        .map_err(|_| "a".to_string())?
        .dyn_into::<web_sys::HtmlAnchorElement>()
        .map_err(|_| "anchor".to_string())?;
    a.set_href(&url);
    a.set_download(filename);
    a.set_hidden(true);

    let body = document.body().ok_or_else(|| "body".to_string())?;
    body.append_child(&a).map_err(|_| "append".to_string())?;

    let a_el: &HtmlElement = a.as_ref();
    a_el.click();

    body.remove_child(&a).ok();
    Url::revoke_object_url(&url).ok();
    Ok(())
}

/// Asks where to write `content` and writes it. `Ok(None)` when the dialog was cancelled.
#[cfg(not(target_arch = "wasm32"))]
pub fn save_text_dialog(
    filename: &str,
    filter: (&str, &[&str]),
    content: &str,
) -> std::io::Result<Option<std::path::PathBuf>> {
    let Some(path) = rfd::FileDialog::new()
        .add_filter(filter.0, filter.1)
        .set_file_name(filename)
        .save_file()
    else {
        return Ok(None);
    };
    std::fs::write(&path, content)?;
    Ok(Some(path))
}

#[cfg(not(target_arch = "wasm32"))]
pub fn clock_stamp() -> String {
    chrono::Local::now().format("%H:%M:%S").to_string()
}

#[cfg(target_arch = "wasm32")]
pub fn clock_stamp() -> String {
    let d = js_sys::Date::new_0();
    format!(
        "{:02}:{:02}:{:02}",
        d.get_hours(),
        d.get_minutes(),
        d.get_seconds()
    )
}

/// Version string baked in at build time, if git was available.
pub fn build_version() -> &'static str {
    option_env!("MINDMAP_GIT_DESCRIBE").unwrap_or(env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_stamp_is_hms() {
        let s = clock_stamp();
        assert_eq!(s.len(), 8);
        assert_eq!(s.matches(':').count(), 2);
    }

    #[test]
    fn version_is_never_empty() {
        assert!(!build_version().is_empty());
    }
}
