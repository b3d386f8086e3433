use eframe::egui;
use glyphmatch::{
    ConversionMessage, ConversionParams, ConversionSession, FontLibrary, ImageSource,
    DEFAULT_PALETTE,
};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::time::Duration;

/// Main application state for the glyphmatch GUI
pub struct GlyphmatchApp {
    /// Background conversion driver; created once a font is loaded
    session: Option<ConversionSession>,
    /// Settlement channel shared with the session's worker threads
    sender: Sender<ConversionMessage>,
    receiver: Receiver<ConversionMessage>,

    /// Selected input image
    image_path: Option<PathBuf>,
    /// Family name of the loaded font (file stem of the picked TTF)
    font_family: Option<String>,

    /// Conversion parameters driven by the sliders
    line_count: u32,
    font_size: f32,
    leading: f32,
    palette: String,

    /// Latest ASCII output
    ascii: String,
    /// Error message to display (if any)
    error_message: Option<String>,

    /// Whether to automatically reconvert when parameters change
    auto_convert: bool,
    /// Flag indicating parameters have changed and reconversion is needed
    needs_reconvert: bool,
}

impl GlyphmatchApp {
    /// Create a new glyphmatch application
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let (sender, receiver) = channel();
        Self {
            session: None,
            sender,
            receiver,
            image_path: None,
            font_family: None,
            line_count: glyphmatch::config::DEFAULT_LINE_COUNT,
            font_size: glyphmatch::config::DEFAULT_FONT_SIZE,
            leading: glyphmatch::config::DEFAULT_LEADING,
            palette: DEFAULT_PALETTE.to_string(),
            ascii: String::new(),
            error_message: None,
            auto_convert: true,
            needs_reconvert: false,
        }
    }

    /// Load a font file and rebuild the session around it
    fn load_font(&mut self, path: &Path) {
        let family = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "font".to_string());

        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                self.error_message = Some(format!("Failed to read font: {e}"));
                return;
            }
        };

        let mut fonts = FontLibrary::new();
        if let Err(e) = fonts.register_font_bytes(family.clone(), &bytes) {
            self.error_message = Some(format!("Failed to load font: {e}"));
            return;
        }

        log::info!("loaded font family {family:?} from {}", path.display());
        self.session = Some(ConversionSession::new(
            Arc::new(fonts),
            self.sender.clone(),
        ));
        self.font_family = Some(family);
        self.error_message = None;
        self.needs_reconvert = true;
    }

    /// Submit the current parameters, superseding any in-flight request
    fn submit(&mut self) {
        self.needs_reconvert = false;

        let (Some(session), Some(path), Some(family)) = (
            self.session.as_mut(),
            self.image_path.as_ref(),
            self.font_family.as_ref(),
        ) else {
            return;
        };

        session.submit(ConversionParams {
            source: ImageSource::Path(path.clone()),
            line_count: self.line_count,
            font_size: self.font_size,
            palette: self.palette.clone(),
            font_family: family.clone(),
            leading: self.leading,
        });
    }

    /// Drain settled conversions from the worker channel
    fn poll_results(&mut self) {
        while let Ok(message) = self.receiver.try_recv() {
            match message {
                ConversionMessage::Result { text } => {
                    self.ascii = text;
                    self.error_message = None;
                }
                ConversionMessage::Error { message } => {
                    self.error_message = Some(message);
                }
            }
        }
    }

    /// Render the control panel UI
    fn render_controls(&mut self, ui: &mut egui::Ui) -> bool {
        let mut changed = false;

        ui.heading("Controls");
        ui.separator();

        ui.label(match &self.image_path {
            Some(path) => format!("Image: {}", path.display()),
            None => "No image selected".to_string(),
        });
        ui.label(match &self.font_family {
            Some(family) => format!("Font: {family}"),
            None => "No font loaded".to_string(),
        });

        ui.add_space(8.0);

        changed |= ui
            .add(egui::Slider::new(&mut self.line_count, 1..=120).text("Lines"))
            .on_hover_text("Number of output text lines")
            .changed();

        changed |= ui
            .add(egui::Slider::new(&mut self.font_size, 6.0..=48.0).text("Font Size"))
            .on_hover_text("Glyph size in pixels used for block matching")
            .changed();

        changed |= ui
            .add(egui::Slider::new(&mut self.leading, 1.0..=3.0).text("Leading"))
            .on_hover_text("Line-height multiplier; sets the block height")
            .changed();

        ui.add_space(8.0);

        ui.label("Palette");
        changed |= ui
            .text_edit_singleline(&mut self.palette)
            .on_hover_text("Candidate characters, scanned in order")
            .changed();

        ui.add_space(16.0);
        ui.separator();

        ui.checkbox(&mut self.auto_convert, "Auto-convert")
            .on_hover_text("Reconvert automatically when parameters change");

        if ui.button("Convert").clicked() {
            self.needs_reconvert = true;
        }

        if self
            .session
            .as_ref()
            .is_some_and(|session| session.is_busy())
        {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Converting...");
            });
        }

        changed
    }
}

impl eframe::App for GlyphmatchApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_results();

        // Top menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open Image...").clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("Images", &["png", "jpg", "jpeg", "bmp", "webp"])
                            .pick_file()
                        {
                            self.image_path = Some(path);
                            self.needs_reconvert = true;
                        }
                        ui.close_menu();
                    }

                    if ui.button("Load Font...").clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("Fonts", &["ttf", "otf"])
                            .pick_file()
                        {
                            self.load_font(&path);
                        }
                        ui.close_menu();
                    }

                    if ui.button("Save Text...").clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("Text", &["txt"])
                            .save_file()
                        {
                            if let Err(e) = std::fs::write(&path, &self.ascii) {
                                self.error_message = Some(format!("Failed to save: {e}"));
                            }
                        }
                        ui.close_menu();
                    }

                    ui.separator();

                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
            });
        });

        // Left panel: controls
        egui::SidePanel::left("control_panel")
            .resizable(true)
            .default_width(260.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let changed = self.render_controls(ui);
                    if changed && self.auto_convert {
                        self.needs_reconvert = true;
                    }
                });
            });

        // Central panel: ASCII output
        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(ref msg) = self.error_message {
                ui.colored_label(egui::Color32::RED, msg);
                ui.separator();
            }

            if self.ascii.is_empty() {
                ui.label("Open an image and load a font to convert.");
            } else {
                egui::ScrollArea::both().show(ui, |ui| {
                    ui.style_mut().wrap_mode = Some(egui::TextWrapMode::Extend);
                    ui.monospace(&self.ascii);
                });
            }
        });

        if self.needs_reconvert {
            self.submit();
        }

        // Keep polling while a conversion is running
        if self
            .session
            .as_ref()
            .is_some_and(|session| session.is_busy())
        {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}
