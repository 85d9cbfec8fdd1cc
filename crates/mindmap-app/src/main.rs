#[cfg(not(target_arch = "wasm32"))]
fn main() -> eframe::Result<()> {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Mind Map")
            .with_inner_size([1280.0, 800.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Mind Map",
        options,
        Box::new(|cc| Ok(Box::new(mindmap_app::MindMapApp::new(cc)))),
    )
}

// the web build starts from the mindmap-web crate
#[cfg(target_arch = "wasm32")]
fn main() {}
