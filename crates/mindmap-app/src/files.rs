use egui::Context;
use egui_mindmap::{export, image_data, Action};

use crate::images::ImageUpload;
use crate::MindMapApp;

#[cfg(target_arch = "wasm32")]
const JSON_MIME: &str = "application/json;charset=utf-8";
#[cfg(target_arch = "wasm32")]
const MARKDOWN_MIME: &str = "text/markdown;charset=utf-8";

/// A file handed to the app by a picker or a drop.
#[derive(Clone, Debug)]
pub struct Upload {
    pub name: String,
    pub data: String,
}

/// What a dropped file turned out to be.
#[derive(Debug)]
enum Dropped {
    Map(Upload),
    Image(ImageUpload),
}

impl MindMapApp {
    /// Replaces the current map with the one in `data`.
    pub fn load_map_from_str(&mut self, name: &str, data: &str) {
        if self.read_only {
            self.status.push_info("Read-only mode: import ignored");
            return;
        }
        match export::import_json(data) {
            Ok(map) => {
                let count = map.nodes.len();
                self.dispatcher.dispatch(Action::SetMindMap(map));
                self.canvas.select(None);
                self.canvas.escape();
                self.status
                    .push_success(format!("Imported {name}: {count} nodes"));
            }
            Err(e) => self.status.push_error(format!("Import of {name} failed: {e}")),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn import_dialog(&mut self, _ctx: &Context) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Mind map", &["json"])
            .pick_file()
        else {
            return;
        };
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("file")
            .to_owned();
        match std::fs::read_to_string(&path) {
            Ok(data) => self.load_map_from_str(&name, &data),
            Err(e) => self.status.push_error(format!("Reading {name} failed: {e}")),
        }
    }

    /// Picks a file asynchronously; the result is picked up by [`Self::poll_web_uploads`].
    #[cfg(target_arch = "wasm32")]
    pub fn import_dialog(&mut self, ctx: &Context) {
        let buf = self.web_upload_buf.clone();
        let ctx = ctx.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let Some(file) = rfd::AsyncFileDialog::new()
                .add_filter("Mind map", &["json"])
                .pick_file()
                .await
            else {
                return;
            };
            let bytes = file.read().await;
            buf.borrow_mut().push(Upload {
                name: file.file_name(),
                data: String::from_utf8_lossy(&bytes).into_owned(),
            });
            ctx.request_repaint();
        });
    }

    #[cfg(target_arch = "wasm32")]
    pub fn poll_web_uploads(&mut self) {
        let uploads: Vec<Upload> = self.web_upload_buf.borrow_mut().drain(..).collect();
        for up in uploads {
            self.load_map_from_str(&up.name, &up.data);
        }
    }

    pub fn export_json_file(&mut self) {
        let content = match export::export_json(&self.map) {
            Ok(c) => c,
            Err(e) => {
                self.status.push_error(format!("Export failed: {e}"));
                return;
            }
        };
        let filename = export::json_file_name();

        #[cfg(not(target_arch = "wasm32"))]
        match crate::util::save_text_dialog(&filename, ("JSON", &["json"]), &content) {
            Ok(Some(path)) => self
                .status
                .push_success(format!("Exported to {}", path.display())),
            Ok(None) => {}
            Err(e) => self.status.push_error(format!("Export failed: {e}")),
        }

        #[cfg(target_arch = "wasm32")]
        match crate::util::download_text(&filename, JSON_MIME, &content) {
            Ok(()) => self.status.push_success(format!("Downloaded {filename}")),
            Err(e) => self.status.push_error(format!("Download failed: {e}")),
        }
    }

    pub fn export_markdown_file(&mut self) {
        let content = export::generate_markdown(&self.map);
        let filename = export::markdown_file_name();

        #[cfg(not(target_arch = "wasm32"))]
        match crate::util::save_text_dialog(&filename, ("Markdown", &["md"]), &content) {
            Ok(Some(path)) => self
                .status
                .push_success(format!("Exported to {}", path.display())),
            Ok(None) => {}
            Err(e) => self.status.push_error(format!("Export failed: {e}")),
        }

        #[cfg(target_arch = "wasm32")]
        match crate::util::download_text(&filename, MARKDOWN_MIME, &content) {
            Ok(()) => self.status.push_success(format!("Downloaded {filename}")),
            Err(e) => self.status.push_error(format!("Download failed: {e}")),
        }
    }

    /// Handles the first readable file dropped on the window: pictures become image
    /// nodes, anything else is imported as a map.
    pub fn handle_dropped_files(&mut self, ctx: &Context) {
        self.drag_hover = ctx.input(|i| !i.raw.hovered_files.is_empty());

        let dropped = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .find_map(read_dropped)
        });
        match dropped {
            Some(Dropped::Map(up)) => self.load_map_from_str(&up.name, &up.data),
            Some(Dropped::Image(up)) => self.add_image_node(&up),
            None => {}
        }
    }
}

fn read_dropped(f: &egui::DroppedFile) -> Option<Dropped> {
    let name = dropped_name(f);
    let image_mime = if f.mime.starts_with("image/") {
        Some(f.mime.clone())
    } else {
        image_data::mime_for_file_name(&name).map(str::to_owned)
    };
    if let Some(mime) = image_mime {
        return dropped_bytes(f).map(|bytes| Dropped::Image(ImageUpload { name, mime, bytes }));
    }
    read_dropped_text(f).map(Dropped::Map)
}

fn dropped_bytes(f: &egui::DroppedFile) -> Option<Vec<u8>> {
    if let Some(bytes) = &f.bytes {
        return Some(bytes.to_vec());
    }
    #[cfg(not(target_arch = "wasm32"))]
    if let Some(path) = &f.path {
        return std::fs::read(path).ok();
    }
    None
}

fn read_dropped_text(f: &egui::DroppedFile) -> Option<Upload> {
    // web and some native backends hand over the bytes directly
    if let Some(bytes) = &f.bytes {
        if let Ok(s) = std::str::from_utf8(bytes) {
            return Some(Upload {
                name: dropped_name(f),
                data: s.to_owned(),
            });
        }
    }
    #[cfg(not(target_arch = "wasm32"))]
    if let Some(path) = &f.path {
        if let Ok(data) = std::fs::read_to_string(path) {
            return Some(Upload {
                name: dropped_name(f),
                data,
            });
        }
    }
    None
}

fn dropped_name(f: &egui::DroppedFile) -> String {
    if !f.name.is_empty() {
        return f.name.clone();
    }
    f.path
        .as_ref()
        .and_then(|p| p.file_name())
        .and_then(|n| n.to_str())
        .map_or_else(|| "dropped file".to_owned(), str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn as_map(dropped: Option<Dropped>) -> Upload {
        match dropped {
            Some(Dropped::Map(up)) => up,
            other => panic!("expected a map file, got {other:?}"),
        }
    }

    #[test]
    fn dropped_bytes_are_read_with_display_name() {
        let f = egui::DroppedFile {
            name: "map.json".into(),
            bytes: Some(br#"{"nodes":[]}"#.to_vec().into()),
            ..Default::default()
        };
        let up = as_map(read_dropped(&f));
        assert_eq!(up.name, "map.json");
        assert_eq!(up.data, r#"{"nodes":[]}"#);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn dropped_path_is_read_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("saved.json");
        std::fs::write(&path, "{}").unwrap();
        let f = egui::DroppedFile {
            path: Some(path),
            ..Default::default()
        };
        let up = as_map(read_dropped(&f));
        assert_eq!(up.name, "saved.json");
        assert_eq!(up.data, "{}");
    }

    #[test]
    fn binary_drop_without_path_is_skipped() {
        let f = egui::DroppedFile {
            bytes: Some(vec![0xff, 0xfe, 0x00].into()),
            ..Default::default()
        };
        assert!(read_dropped(&f).is_none());
    }

    #[test]
    fn dropped_pictures_become_images() {
        let by_name = egui::DroppedFile {
            name: "Sketch.PNG".into(),
            bytes: Some(vec![0x89, b'P', b'N', b'G'].into()),
            ..Default::default()
        };
        match read_dropped(&by_name) {
            Some(Dropped::Image(img)) => {
                assert_eq!(img.name, "Sketch.PNG");
                assert_eq!(img.mime, "image/png");
                assert_eq!(img.bytes, vec![0x89, b'P', b'N', b'G']);
            }
            other => panic!("expected an image, got {other:?}"),
        }

        let by_mime = egui::DroppedFile {
            name: "clip".into(),
            mime: "image/webp".into(),
            bytes: Some(vec![1, 2].into()),
            ..Default::default()
        };
        assert!(matches!(
            read_dropped(&by_mime),
            Some(Dropped::Image(ref img)) if img.mime == "image/webp"
        ));
    }
}
