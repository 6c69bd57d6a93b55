use iced::widget::image::Handle;
use iced::widget::{
    button, column, container, horizontal_space, image, mouse_area, opaque, row, slider, stack,
    text,
};
use iced::{Alignment, ContentFit, Element, Length, Task, Theme};
use log::info;
use std::path::PathBuf;

mod error;
mod filter;
mod photo;
mod state;
mod ui;

use filter::ImageFilterLibrary;
use photo::picker::{self, PickOutcome};
use photo::writer::PhotoLibraryWriter;
use state::data::{ProcessedImage, SourceImage};
use state::pipeline::{ApplyOutcome, FilterPipeline};
use state::settings::Settings;
use ui::{Alert, PendingIntensity, PreviewChoice};

/// Main application state
struct InstaFilter {
    /// Selected filter, intensity and images
    pipeline: FilterPipeline<ImageFilterLibrary>,
    /// Where saved photos go
    writer: PhotoLibraryWriter,
    /// Display handle for the current picture
    preview: Option<Handle>,
    /// Slider value not rendered yet
    pending_intensity: PendingIntensity,
    /// Whether the filter menu is open
    show_filter_menu: bool,
    /// A save is in flight
    saving: bool,
    /// Alert on top of everything, if any
    alert: Option<Alert>,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    /// User tapped the picture area
    PickImage,
    /// The picker finished
    ImagePicked(PickOutcome),
    /// User moved the intensity slider
    IntensityChanged(f32),
    /// Render the latest slider value
    CommitIntensity,
    /// User pressed "Change Filter"
    ToggleFilterMenu,
    /// User chose a filter from the menu
    FilterSelected(filter::FilterKind),
    /// User pressed "Save"
    Save,
    /// The writer finished
    SaveComplete(Result<PathBuf, String>),
    /// User pressed "OK" on the alert
    DismissAlert,
}

impl InstaFilter {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        let settings = Settings::load_or_default();
        let pipeline = FilterPipeline::with_defaults(
            ImageFilterLibrary::new(),
            settings.default_filter,
            settings.default_intensity,
        );
        let writer = PhotoLibraryWriter::new(settings.resolved_output_dir());

        info!(
            "🎨 InstaFilter ready: {} at {:.2}, saving to {}",
            pipeline.display_name(),
            pipeline.intensity(),
            writer.output_dir().display()
        );

        (
            InstaFilter {
                pipeline,
                writer,
                preview: None,
                pending_intensity: PendingIntensity::default(),
                show_filter_menu: false,
                saving: false,
                alert: None,
            },
            Task::none(),
        )
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::PickImage => {
                return Task::perform(picker::pick_image(), Message::ImagePicked);
            }
            Message::ImagePicked(outcome) => match outcome {
                PickOutcome::Picked(image) => {
                    let outcome = self.pipeline.load_source(image);
                    self.refresh_preview(outcome);
                }
                PickOutcome::Cancelled => {}
                PickOutcome::Failed(reason) => {
                    self.alert = Some(Alert::failure(reason));
                }
            },
            Message::IntensityChanged(value) => {
                // Moves arriving in one batch render once, with the last value
                if self.pending_intensity.push(value.clamp(0.0, 1.0)) {
                    return Task::done(Message::CommitIntensity);
                }
            }
            Message::CommitIntensity => {
                if let Some(value) = self.pending_intensity.take() {
                    let outcome = self.pipeline.set_intensity(value);
                    self.refresh_preview(outcome);
                }
            }
            Message::ToggleFilterMenu => {
                self.show_filter_menu = !self.show_filter_menu;
            }
            Message::FilterSelected(kind) => {
                self.show_filter_menu = false;
                let outcome = self.pipeline.select_filter(kind);
                self.refresh_preview(outcome);
            }
            Message::Save => match self.pipeline.save(&self.writer) {
                Ok(pending) => {
                    self.saving = true;
                    return Task::perform(
                        async move { pending.await.map_err(|e| e.to_string()) },
                        Message::SaveComplete,
                    );
                }
                Err(e) => {
                    self.alert = Some(Alert::failure(e.to_string()));
                }
            },
            Message::SaveComplete(result) => {
                self.saving = false;
                if let Err(reason) = &result {
                    log::error!("❌ Save failed: {}", reason);
                }
                self.alert = Some(Alert::from_save_result(&result));
            }
            Message::DismissAlert => {
                self.alert = None;
            }
        }

        Task::none()
    }

    /// Rebuild the display handle after the pipeline changed
    fn refresh_preview(&mut self, outcome: ApplyOutcome) {
        match ui::preview::choose(outcome, self.pipeline.processed().is_some()) {
            PreviewChoice::Processed => {
                self.preview = self.pipeline.processed().map(processed_handle);
            }
            PreviewChoice::Source => {
                self.preview = self.pipeline.working().map(source_handle);
            }
            PreviewChoice::Keep => {}
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<'_, Message> {
        let picture: Element<'_, Message> = match &self.preview {
            Some(handle) => image(handle.clone())
                .content_fit(ContentFit::Contain)
                .width(Length::Fill)
                .height(Length::Fill)
                .into(),
            None => text("Tap to select a picture").size(18).into(),
        };

        let picture_area = mouse_area(
            container(picture)
                .width(Length::Fill)
                .height(Length::Fill)
                .center_x(Length::Fill)
                .center_y(Length::Fill)
                .style(container::dark),
        )
        .on_press(Message::PickImage);

        let intensity = row![
            text("Intensity"),
            slider(
                0.0..=1.0,
                self.pending_intensity
                    .value()
                    .unwrap_or(self.pipeline.intensity()),
                Message::IntensityChanged
            )
            .step(0.01)
            .on_release(Message::CommitIntensity),
        ]
        .spacing(12)
        .align_y(Alignment::Center);

        let actions = row![
            button("Change Filter").on_press(Message::ToggleFilterMenu),
            horizontal_space(),
            text(self.pipeline.display_name()).size(14),
            horizontal_space(),
            button("Save").on_press_maybe((!self.saving).then_some(Message::Save)),
        ]
        .align_y(Alignment::Center);

        let content = column![
            text("InstaFilter").size(32),
            picture_area,
            intensity,
            actions,
        ]
        .spacing(16)
        .padding(20);

        let mut layers = stack![container(content)
            .width(Length::Fill)
            .height(Length::Fill)];

        if self.show_filter_menu {
            layers = layers.push(overlay(ui::filter_menu::view(
                self.pipeline.filter(),
                Message::FilterSelected,
                Message::ToggleFilterMenu,
            )));
        }

        if let Some(alert) = &self.alert {
            layers = layers.push(overlay(alert.view(Message::DismissAlert)));
        }

        layers.into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

/// Center `content` over the screen and swallow clicks behind it
fn overlay<'a>(content: Element<'a, Message>) -> Element<'a, Message> {
    opaque(
        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .center_y(Length::Fill),
    )
}

fn processed_handle(image: &ProcessedImage) -> Handle {
    Handle::from_rgba(image.width(), image.height(), image.to_rgba_bytes())
}

fn source_handle(image: &SourceImage) -> Handle {
    Handle::from_rgba(image.width(), image.height(), image.pixels().as_raw().clone())
}

/// Set up `env_logger` with timestamps; `RUST_LOG` overrides the level
fn init_logger() {
    use std::io::Write;

    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .filter_module("wgpu_core", log::LevelFilter::Warn)
        .filter_module("wgpu_hal", log::LevelFilter::Warn)
        .filter_module("naga", log::LevelFilter::Warn)
        .parse_default_env()
        .format(|buf, record| {
            let style = buf.default_level_style(record.level());
            let ts = chrono::Local::now().format("%H:%M:%S");

            writeln!(
                buf,
                "[{} {style}{}{style:#} {}:{}] {}",
                ts,
                record.level(),
                record
                    .file()
                    .unwrap_or("None")
                    .split('/')
                    .next_back()
                    .unwrap_or("None"),
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .init();
}

fn main() -> iced::Result {
    init_logger();

    iced::application("InstaFilter", InstaFilter::update, InstaFilter::view)
        .theme(InstaFilter::theme)
        .window_size((480.0, 760.0))
        .centered()
        .run_with(InstaFilter::new)
}
