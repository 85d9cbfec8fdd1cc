//! Pictures turned into image nodes: file picker, clipboard, dropped files and browser paste.

use egui::{Context, Pos2};
use egui_mindmap::{image_data, node_size, node_types, Action, Node};

use crate::MindMapApp;

#[cfg(target_arch = "wasm32")]
use std::{cell::RefCell, rc::Rc};

/// Encoded picture waiting to become an image node.
#[derive(Clone, Debug)]
pub struct ImageUpload {
    /// File name, empty for clipboard contents.
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// Image node for `upload` centred on `center`, named after the file when there is one.
fn image_node(upload: &ImageUpload, center: Pos2) -> Node {
    let data_url = image_data::encode_data_url(&upload.mime, &upload.bytes);
    let mut node = node_types::create_image_node(data_url, Pos2::ZERO);
    let size = node_size(&node, false);
    node.x = center.x - size.x / 2.;
    node.y = center.y - size.y / 2.;

    let stem = upload
        .name
        .rsplit_once('.')
        .map_or(upload.name.as_str(), |(stem, _)| stem)
        .trim();
    if !stem.is_empty() {
        node.name = stem.to_owned();
    }
    node
}

impl MindMapApp {
    /// Adds `upload` as an image node in the middle of the visible canvas and selects it.
    pub fn add_image_node(&mut self, upload: &ImageUpload) {
        if self.read_only {
            self.status.push_info("Read-only mode: image ignored");
            return;
        }
        let node = image_node(upload, self.canvas.visible_center());
        log::debug!(
            "adding image node {} ({}, {} bytes)",
            node.id,
            upload.mime,
            upload.bytes.len()
        );
        self.canvas.select(Some(&node.id));
        self.status.push_success(format!("Added image \"{}\"", node.name));
        self.dispatcher.dispatch(Action::AddNode(node));
    }

    /// Reads a bitmap from the system clipboard; egui only forwards pasted text.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn paste_clipboard_image(&mut self) {
        if self.read_only {
            return;
        }
        let image = arboard::Clipboard::new().and_then(|mut c| c.get_image());
        match image {
            Ok(img) => match encode_png(img.width, img.height, &img.bytes) {
                Ok(bytes) => self.add_image_node(&ImageUpload {
                    name: String::new(),
                    mime: "image/png".to_owned(),
                    bytes,
                }),
                Err(e) => self
                    .status
                    .push_error(format!("Pasting the image failed: {e}")),
            },
            Err(arboard::Error::ContentNotAvailable) => {
                self.status.push_info("No image on the clipboard");
            }
            Err(e) => self.status.push_error(format!("Clipboard unavailable: {e}")),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn insert_image_dialog(&mut self, _ctx: &Context) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Images", &image_data::IMAGE_EXTENSIONS)
            .pick_file()
        else {
            return;
        };
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("image")
            .to_owned();
        let Some(mime) = image_data::mime_for_file_name(&name) else {
            self.status
                .push_error(format!("{name} is not a supported picture"));
            return;
        };
        match std::fs::read(&path) {
            Ok(bytes) => self.add_image_node(&ImageUpload {
                name,
                mime: mime.to_owned(),
                bytes,
            }),
            Err(e) => self.status.push_error(format!("Reading {name} failed: {e}")),
        }
    }

    /// Picks a picture asynchronously; it is added by [`Self::poll_web_images`].
    #[cfg(target_arch = "wasm32")]
    pub fn insert_image_dialog(&mut self, ctx: &Context) {
        let buf = self.web_image_buf.clone();
        let ctx = ctx.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let Some(file) = rfd::AsyncFileDialog::new()
                .add_filter("Images", &image_data::IMAGE_EXTENSIONS)
                .pick_file()
                .await
            else {
                return;
            };
            let name = file.file_name();
            let Some(mime) = image_data::mime_for_file_name(&name) else {
                log::warn!("{name} is not a supported picture");
                return;
            };
            let bytes = file.read().await;
            buf.borrow_mut().push(ImageUpload {
                name,
                mime: mime.to_owned(),
                bytes,
            });
            ctx.request_repaint();
        });
    }

    #[cfg(target_arch = "wasm32")]
    pub fn poll_web_images(&mut self) {
        let uploads: Vec<ImageUpload> = self.web_image_buf.borrow_mut().drain(..).collect();
        for up in &uploads {
            self.add_image_node(up);
        }
    }
}

/// Forwards pictures pasted into the page to `buf`.
#[cfg(target_arch = "wasm32")]
pub fn install_paste_listener(
    ctx: &Context,
    buf: Rc<RefCell<Vec<ImageUpload>>>,
) -> Result<(), String> {
    use wasm_bindgen::closure::Closure;
    use wasm_bindgen::JsCast;

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or("no document")?;
    let ctx = ctx.clone();
    let on_paste = Closure::<dyn FnMut(web_sys::ClipboardEvent)>::new(
        move |event: web_sys::ClipboardEvent| {
            let Some(files) = event.clipboard_data().and_then(|d| d.files()) else {
                return;
            };
            for i in 0..files.length() {
                let Some(file) = files.get(i) else {
                    continue;
                };
                let mime = file.type_();
                if !mime.starts_with("image/") {
                    continue;
                }
                let buf = buf.clone();
                let ctx = ctx.clone();
                wasm_bindgen_futures::spawn_local(async move {
                    match wasm_bindgen_futures::JsFuture::from(file.array_buffer()).await {
                        Ok(data) => {
                            buf.borrow_mut().push(ImageUpload {
                                name: file.name(),
                                mime,
                                bytes: js_sys::Uint8Array::new(&data).to_vec(),
                            });
                            ctx.request_repaint();
                        }
                        Err(e) => log::warn!("reading pasted image failed: {e:?}"),
                    }
                });
            }
        },
    );
    document
        .add_event_listener_with_callback("paste", on_paste.as_ref().unchecked_ref())
        .map_err(|e| format!("{e:?}"))?;
    // the listener lives as long as the page
    on_paste.forget();
    Ok(())
}

/// PNG encoding of a tightly packed RGBA bitmap.
#[cfg(not(target_arch = "wasm32"))]
fn encode_png(width: usize, height: usize, rgba: &[u8]) -> Result<Vec<u8>, image::ImageError> {
    use image::error::{ParameterError, ParameterErrorKind};

    let buffer = u32::try_from(width)
        .ok()
        .zip(u32::try_from(height).ok())
        .and_then(|(w, h)| image::RgbaImage::from_raw(w, h, rgba.to_vec()))
        .ok_or_else(|| {
            image::ImageError::Parameter(ParameterError::from_kind(
                ParameterErrorKind::DimensionMismatch,
            ))
        })?;
    let mut out = std::io::Cursor::new(Vec::new());
    buffer.write_to(&mut out, image::ImageFormat::Png)?;
    Ok(out.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(name: &str) -> ImageUpload {
        ImageUpload {
            name: name.to_owned(),
            mime: "image/png".to_owned(),
            bytes: vec![0x89, b'P', b'N', b'G'],
        }
    }

    #[test]
    fn image_node_is_centred_and_named_after_file() {
        let node = image_node(&upload("holiday.photo.png"), Pos2::new(400., 300.));
        assert!(node.is_image());
        assert_eq!(node.name, "holiday.photo");
        let size = node_size(&node, false);
        assert_eq!(
            Pos2::new(node.x, node.y) + size / 2.,
            Pos2::new(400., 300.)
        );

        let data_url = node.properties.image_data.unwrap();
        let decoded = image_data::decode_data_url(&data_url).unwrap();
        assert_eq!(decoded.mime, "image/png");
        assert_eq!(decoded.bytes, upload("").bytes);
    }

    #[test]
    fn clipboard_pictures_keep_default_name() {
        assert_eq!(image_node(&upload(""), Pos2::ZERO).name, "Image");
        assert_eq!(image_node(&upload(" .png"), Pos2::ZERO).name, "Image");
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn clipboard_bitmap_becomes_png() {
        let rgba = [255, 0, 0, 255, 0, 0, 255, 128];
        let png = encode_png(2, 1, &rgba).unwrap();
        assert!(png.starts_with(b"\x89PNG\r\n\x1a\n"));

        let back = image::load_from_memory(&png).unwrap().to_rgba8();
        assert_eq!(back.dimensions(), (2, 1));
        assert_eq!(back.into_raw(), rgba);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn short_bitmap_is_refused() {
        assert!(encode_png(4, 4, &[0; 8]).is_err());
    }
}
