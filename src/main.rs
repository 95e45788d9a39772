use gifforge::cli::Args;
use gifforge::export;
use gifforge::paths;
use gifforge::preview::Preview;
use gifforge::sequence::Sequence;
use gifforge::settings::{ExportSettings, ResolutionChoice};
use gifforge::template::Template;
use gifforge::thumbs::{ThumbCache, THUMB_EDGE};

use clap::Parser;
use eframe::egui;
use egui_dnd::dnd;
use log::{debug, info, warn};
use std::path::PathBuf;

/// User-facing notice rendered as a centered modal window.
#[derive(Clone, Debug, PartialEq, Eq)]
enum Notice {
    Error(String),
    Info(String),
}

/// Main application state
#[derive(serde::Deserialize, serde::Serialize)]
#[serde(default)]
struct GifForgeApp {
    #[serde(skip)]
    sequence: Sequence,
    #[serde(skip)]
    selected: Option<usize>,
    #[serde(skip)]
    thumbs: ThumbCache,
    #[serde(skip)]
    preview: Option<Preview>,
    #[serde(skip)]
    notice: Option<Notice>,

    /// Entry fields are kept as text and parsed on use, so a half-typed
    /// value never blocks the UI. Persisted across runs.
    delay_text: String,
    loop_text: String,
    resolution: ResolutionChoice,
    custom_width_text: String,
    custom_height_text: String,
}

impl Default for GifForgeApp {
    fn default() -> Self {
        Self {
            sequence: Sequence::new(),
            selected: None,
            thumbs: ThumbCache::new(),
            preview: None,
            notice: None,
            delay_text: "200".to_string(),
            loop_text: "0".to_string(),
            resolution: ResolutionChoice::Original,
            custom_width_text: String::new(),
            custom_height_text: String::new(),
        }
    }
}

impl GifForgeApp {
    fn error(&mut self, msg: impl Into<String>) {
        let msg = msg.into();
        warn!("{}", msg);
        self.notice = Some(Notice::Error(msg));
    }

    fn success(&mut self, msg: impl Into<String>) {
        self.notice = Some(Notice::Info(msg.into()));
    }

    /// Parse the delay entry: positive integer milliseconds.
    fn parse_delay(&self) -> Result<u32, String> {
        match self.delay_text.trim().parse::<u32>() {
            Ok(ms) if ms > 0 => Ok(ms),
            _ => Err("Duration must be a positive integer (milliseconds)".to_string()),
        }
    }

    /// Parse the loop entry: non-negative integer, 0 = infinite.
    fn parse_loop(&self) -> Result<u32, String> {
        self.loop_text
            .trim()
            .parse::<u32>()
            .map_err(|_| "Loop count must be a non-negative integer".to_string())
    }

    /// Resolve the selected resolution to a concrete size, parsing the
    /// custom entries when "Custom" is selected.
    fn parse_size(&self) -> Result<Option<(u32, u32)>, String> {
        if self.resolution == ResolutionChoice::Custom {
            let w = self.custom_width_text.trim().parse::<u32>();
            let h = self.custom_height_text.trim().parse::<u32>();
            match (w, h) {
                (Ok(w), Ok(h)) if w > 0 && h > 0 => Ok(Some((w, h))),
                _ => Err("Please enter valid custom width and height".to_string()),
            }
        } else {
            Ok(self.resolution.target_size(None))
        }
    }

    fn parse_settings(&self) -> Result<ExportSettings, String> {
        Ok(ExportSettings {
            delay_ms: self.parse_delay()?,
            loop_count: self.parse_loop()?,
            size: self.parse_size()?,
        })
    }

    fn add_images_dialog(&mut self) {
        if let Some(paths) = rfd::FileDialog::new()
            .add_filter("PNG Images", &["png"])
            .set_title("Add PNG Images")
            .pick_files()
        {
            info!("Adding {} image(s)", paths.len());
            self.sequence.add_all(&paths);
        }
    }

    fn add_dropped_files(&mut self, paths: Vec<PathBuf>) {
        info!("Files dropped: {:?}", paths);
        self.sequence.add_all(&paths);
    }

    fn remove_selected(&mut self) {
        let Some(index) = self.selected else {
            self.error("No image selected to remove");
            return;
        };
        if self.sequence.remove(index).is_some() {
            self.selected = None;
            self.thumbs.retain(&self.sequence);
        } else {
            self.error("No image selected to remove");
        }
    }

    fn move_selected_up(&mut self) {
        match self.selected {
            Some(index) => self.selected = Some(self.sequence.move_up(index)),
            None => self.error("No image selected to move"),
        }
    }

    fn move_selected_down(&mut self) {
        match self.selected {
            Some(index) => self.selected = Some(self.sequence.move_down(index)),
            None => self.error("No image selected to move"),
        }
    }

    fn create_gif(&mut self) {
        if self.sequence.is_empty() {
            self.error("You need to add at least one PNG image");
            return;
        }

        let settings = match self.parse_settings() {
            Ok(s) => s,
            Err(e) => {
                self.error(e);
                return;
            }
        };

        let Some(dest) = rfd::FileDialog::new()
            .add_filter("GIF files", &["gif"])
            .set_file_name("output.gif")
            .save_file()
        else {
            return;
        };

        match export::export_gif(&self.sequence.paths(), &settings, &dest) {
            Ok(()) => self.success(format!("GIF successfully created at {}", dest.display())),
            Err(e) => self.error(e.to_string()),
        }
    }

    fn preview_animation(&mut self) {
        if self.sequence.is_empty() {
            self.error("You need to add at least one PNG image");
            return;
        }

        let delay_ms = match self.parse_delay() {
            Ok(d) => d,
            Err(e) => {
                self.error(e);
                return;
            }
        };
        let size = match self.parse_size() {
            Ok(s) => s,
            Err(e) => {
                self.error(e);
                return;
            }
        };

        // A new preview replaces any running one
        self.preview = None;
        match Preview::build(&self.sequence.paths(), delay_ms, size) {
            Ok(p) => self.preview = Some(p),
            Err(e) => self.error(e.to_string()),
        }
    }

    fn save_template(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Template files", &["json"])
            .set_file_name("template.json")
            .save_file()
        else {
            return;
        };

        let template = Template::from_state(
            &self.sequence,
            &self.delay_text,
            &self.loop_text,
            self.resolution,
            &self.custom_width_text,
            &self.custom_height_text,
        );
        match template.save(&path) {
            Ok(saved) => {
                info!("Saved template to {}", saved.display());
                self.success(format!("Template saved successfully at {}", saved.display()));
            }
            Err(e) => self.error(e),
        }
    }

    fn load_template_dialog(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Template files", &["json"])
            .pick_file()
        else {
            return;
        };

        match Template::load(&path) {
            Ok(template) => {
                info!("Loaded template from {}", path.display());
                self.apply_template(template);
                self.success("Template loaded successfully");
            }
            Err(e) => self.error(e),
        }
    }

    /// Restore UI state from a template record.
    fn apply_template(&mut self, template: Template) {
        self.sequence = template.sequence();
        self.delay_text = template.duration.clone();
        self.loop_text = template.loop_count.clone();
        self.resolution = template.resolution_choice();
        self.custom_width_text = template.custom_width.clone();
        self.custom_height_text = template.custom_height.clone();
        self.selected = None;
        self.thumbs.clear();
    }

    fn render_controls(&mut self, ui: &mut egui::Ui) {
        if ui.button("Add PNG Images").clicked() {
            self.add_images_dialog();
        }

        ui.add_space(6.0);
        self.render_frame_list(ui);
        ui.add_space(6.0);

        ui.horizontal(|ui| {
            if ui.button("Remove Selected").clicked() {
                self.remove_selected();
            }
            if ui.button("Move Up").clicked() {
                self.move_selected_up();
            }
            if ui.button("Move Down").clicked() {
                self.move_selected_down();
            }
        });

        ui.separator();

        ui.label("Duration between frames (ms):");
        ui.text_edit_singleline(&mut self.delay_text);

        ui.label("Loop count (0 for infinite):");
        ui.text_edit_singleline(&mut self.loop_text);

        ui.label("Resolution:");
        egui::ComboBox::from_id_salt("resolution_combo")
            .selected_text(self.resolution.label())
            .show_ui(ui, |ui| {
                for choice in ResolutionChoice::all() {
                    ui.selectable_value(&mut self.resolution, *choice, choice.label());
                }
            });

        if self.resolution == ResolutionChoice::Custom {
            ui.label("Custom width:");
            ui.text_edit_singleline(&mut self.custom_width_text);
            ui.label("Custom height:");
            ui.text_edit_singleline(&mut self.custom_height_text);
        }

        ui.separator();

        if ui.button("Create GIF").clicked() {
            self.create_gif();
        }
        if ui.button("Preview Animation").clicked() {
            self.preview_animation();
        }

        ui.separator();

        ui.horizontal(|ui| {
            if ui.button("Save Template").clicked() {
                self.save_template();
            }
            if ui.button("Load Template").clicked() {
                self.load_template_dialog();
            }
        });
    }

    /// Frame list with drag handles; rows are selectable for the
    /// button-driven operations.
    fn render_frame_list(&mut self, ui: &mut egui::Ui) {
        let mut clicked: Option<usize> = None;
        let mut order: Vec<usize> = (0..self.sequence.len()).collect();

        let dnd_response = egui::ScrollArea::vertical()
            .id_salt("frame_list_scroll")
            .max_height(220.0)
            .auto_shrink([false, false])
            .show(ui, |ui| {
                dnd(ui, "frame_list_dnd").show_vec(&mut order, |ui, idx, handle, _state| {
                    let index = *idx;
                    let Some(frame) = self.sequence.get(index) else {
                        return;
                    };
                    ui.horizontal(|ui| {
                        handle.ui(ui, |ui| {
                            ui.label("≡");
                        });
                        let selected = self.selected == Some(index);
                        let label = format!("{:>3}  {}", index + 1, frame.display_name());
                        if ui.selectable_label(selected, label).clicked() {
                            clicked = Some(index);
                        }
                    });
                })
            })
            .inner;

        if let Some(index) = clicked {
            self.selected = Some(index);
        }

        if let Some(update) = dnd_response.final_update() {
            debug!("Reorder frame {} -> {}", update.from, update.to);
            self.sequence.reorder(update.from, update.to);
            // Selection tracks indices, not identities; simplest is to drop it
            self.selected = None;
        }
    }

    fn render_thumbnails(&mut self, ui: &mut egui::Ui) {
        let ctx = ui.ctx().clone();
        egui::ScrollArea::vertical()
            .id_salt("thumbnail_scroll")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                let frames: Vec<_> = self.sequence.iter().cloned().collect();
                for frame in &frames {
                    match self.thumbs.texture(&ctx, frame) {
                        Some(texture) => {
                            let size = texture.size_vec2();
                            ui.image((texture.id(), size));
                        }
                        None => {
                            ui.add_sized(
                                [THUMB_EDGE as f32, 24.0],
                                egui::Label::new("(unreadable)"),
                            );
                        }
                    }
                    ui.small(frame.display_name());
                    ui.add_space(8.0);
                }
            });
    }

    /// Centered notice window with a single OK button.
    fn render_notice(&mut self, ctx: &egui::Context) {
        let Some(notice) = self.notice.clone() else {
            return;
        };

        let (title, text) = match &notice {
            Notice::Error(msg) => ("Error", msg.clone()),
            Notice::Info(msg) => ("Success", msg.clone()),
        };

        let mut dismiss = false;
        egui::Window::new(title)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                ui.label(text);
                ui.add_space(8.0);
                ui.vertical_centered(|ui| {
                    if ui.button("OK").clicked() {
                        dismiss = true;
                    }
                });
            });

        if dismiss {
            self.notice = None;
        }
    }
}

impl eframe::App for GifForgeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Drag-and-drop of image files appends them to the sequence
        let dropped: Vec<PathBuf> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|f| f.path.clone())
                .collect()
        });
        if !dropped.is_empty() {
            self.add_dropped_files(dropped);
        }

        egui::SidePanel::left("controls_panel")
            .resizable(true)
            .default_width(360.0)
            .show(ctx, |ui| {
                self.render_controls(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Thumbnails");
            ui.separator();
            self.render_thumbnails(ui);
        });

        // Preview window; dropping the state stops the animation
        let close_preview = self
            .preview
            .as_mut()
            .is_some_and(|preview| !preview.show(ctx));
        if close_preview {
            debug!("Preview window closed");
            self.preview = None;
        }

        self.render_notice(ctx);
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        if let Ok(json) = serde_json::to_string(self) {
            storage.set_string(eframe::APP_KEY, json);
            debug!(
                "App state saved: delay={}, loop={}, resolution={}",
                self.delay_text, self.loop_text, self.resolution
            );
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Create path configuration from CLI args and environment
    let path_config = paths::PathConfig::from_env_and_cli(args.config_dir.clone());
    if let Err(e) = paths::ensure_dirs(&path_config) {
        eprintln!("Warning: Failed to create application directories: {}", e);
    }

    // 0 (default) = warn, 1 (-v) = info, 2 (-vv) = debug, 3+ (-vvv) = trace
    let log_level = match args.verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    if let Some(log_path_opt) = &args.log_file {
        let log_path = log_path_opt
            .as_ref()
            .cloned()
            .unwrap_or_else(|| paths::data_file("gifforge.log", &path_config));

        let file = std::fs::File::create(&log_path)?;

        env_logger::Builder::new()
            .filter_level(log_level)
            .filter_module("egui", log::LevelFilter::Info) // Suppress egui DEBUG spam
            .format_timestamp_millis()
            .target(env_logger::Target::Pipe(Box::new(file)))
            .init();

        info!("Logging to file: {} (level: {:?})", log_path.display(), log_level);
    } else {
        let default_level = match args.verbosity {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };

        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
            .filter_module("egui", log::LevelFilter::Info)
            .format_timestamp_millis()
            .init();
    }

    info!("GIF Forge starting...");
    debug!("Command-line args: {:?}", args);
    info!(
        "Config path: {}",
        paths::config_file("gifforge.json", &path_config).display()
    );

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(format!("GIF Forge v{}", env!("CARGO_PKG_VERSION")))
            .with_inner_size(egui::vec2(900.0, 600.0))
            .with_resizable(true)
            .with_drag_and_drop(true),
        persist_window: true,
        #[cfg(not(target_arch = "wasm32"))]
        persistence_path: Some(paths::config_file("gifforge.json", &path_config)),
        ..Default::default()
    };

    eframe::run_native(
        "GIF Forge",
        native_options,
        Box::new(move |cc| {
            // Load persisted settings if available, otherwise start fresh
            let mut app: GifForgeApp = cc
                .storage
                .and_then(|storage| storage.get_string(eframe::APP_KEY))
                .and_then(|json| serde_json::from_str(&json).ok())
                .unwrap_or_else(|| {
                    info!("No persisted state found, creating default app");
                    GifForgeApp::default()
                });

            // CLI template loads first, then positional images append
            if let Some(ref template_path) = args.template {
                info!("Loading template: {}", template_path.display());
                match Template::load(template_path) {
                    Ok(template) => app.apply_template(template),
                    Err(e) => warn!(
                        "Failed to load template {}: {}",
                        template_path.display(),
                        e
                    ),
                }
            }

            if !args.images.is_empty() {
                info!("Adding {} image(s) from command line", args.images.len());
                app.sequence.add_all(&args.images);
            }

            Ok(Box::new(app))
        }),
    )?;

    info!("Application exiting");
    Ok(())
}
