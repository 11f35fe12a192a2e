mod logger;
mod screen;
mod style;
mod widget;

use screen::viewer::{self, Viewer};

use data::{ApiKey, KeySource, WindowSpec};
use iced::{Element, Size, Subscription, Task, window};

fn main() -> iced::Result {
    if let Err(e) = logger::setup(cfg!(debug_assertions)) {
        eprintln!("Failed to set up logger: {e}");
    }

    let saved_state = data::load_saved_state();
    let api_key = ApiKey::resolve();

    match api_key.source() {
        KeySource::Missing => log::warn!("No API key found, fetching is disabled"),
        source => log::info!("Using API key from {source}"),
    }

    let window_spec = saved_state.window();

    iced::application(
        move || TickerView::new(saved_state.clone(), api_key.clone()),
        TickerView::update,
        TickerView::view,
    )
    .title(TickerView::title)
    .theme(TickerView::theme)
    .subscription(TickerView::subscription)
    .window(window::Settings {
        size: Size::new(window_spec.width, window_spec.height),
        min_size: Some(Size::new(480.0, 320.0)),
        exit_on_close_request: false,
        ..Default::default()
    })
    .run()
}

struct TickerView {
    viewer: Viewer,
    saved: data::State,
}

#[derive(Debug, Clone)]
enum Message {
    Viewer(viewer::Message),
    WindowResized(Size),
    CloseRequested(window::Id),
}

impl TickerView {
    fn new(saved: data::State, api_key: ApiKey) -> (Self, Task<Message>) {
        (
            Self {
                viewer: Viewer::new(&saved, api_key),
                saved,
            },
            Task::none(),
        )
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Viewer(message) => match self.viewer.update(message) {
                Some(viewer::Action::Fetch(request)) => {
                    return Task::perform(exchange::adapter::fetch_series(request), |fetched| {
                        Message::Viewer(viewer::Message::Fetched(fetched))
                    });
                }
                Some(viewer::Action::Plotted(symbol)) => {
                    self.saved.last_symbol = Some(symbol);
                    self.save_state();
                }
                Some(viewer::Action::ToggleTheme) => {
                    self.saved.selected_theme = self.saved.selected_theme.toggled();
                }
                None => {}
            },
            Message::WindowResized(size) => {
                self.saved.main_window = Some(WindowSpec {
                    width: size.width,
                    height: size.height,
                });
            }
            Message::CloseRequested(id) => {
                self.save_state();
                return window::close(id);
            }
        }

        Task::none()
    }

    fn save_state(&mut self) {
        self.saved.function = self.viewer.function();
        self.saved.parser = self.viewer.parser();

        match data::save_state(&self.saved) {
            Ok(()) => log::debug!("Saved state to {}", data::SAVED_STATE_PATH),
            Err(e) => log::error!("Failed to save state: {e}"),
        }
    }

    fn view(&self) -> Element<'_, Message> {
        self.viewer.view().map(Message::Viewer)
    }

    fn title(&self) -> String {
        "Stock Ticker Viewer".to_string()
    }

    fn theme(&self) -> iced::Theme {
        self.saved.selected_theme.0.clone()
    }

    fn subscription(&self) -> Subscription<Message> {
        Subscription::batch([
            window::close_requests().map(Message::CloseRequested),
            window::resize_events().map(|(_, size)| Message::WindowResized(size)),
            self.viewer.subscription().map(Message::Viewer),
        ])
    }
}
