use super::ViewerError;
use crate::style;
use crate::widget::chart::{PriceChart, PriceChartEvent};
use crate::widget::toast::{self, Toast};

use data::chart::{ChartData, Margins, PointInfo};
use data::{ApiKey, State};
use exchange::adapter::FetchRequest;
use exchange::{Fetched, Function, parse};

use iced::time::{self, Duration, Instant};
use iced::widget::{
    button, canvas, column, container, pick_list, row, scrollable, space, text, text_input,
};
use iced::{Center, Element, Fill, Subscription, padding};

/// Characters of the raw response quoted in a parse-failure toast.
const EXCERPT_LEN: usize = 160;
const RAW_PANEL_HEIGHT: f32 = 160.0;

#[derive(Debug, Clone)]
pub enum Message {
    InputChanged(String),
    Submit,
    FunctionSelected(Function),
    ParserSelected(parse::Strategy),
    ToggleTheme,
    Fetched(Fetched),
    Chart(PriceChartEvent),
    CloseToast(usize),
    Tick(Instant),
}

impl From<PriceChartEvent> for Message {
    fn from(event: PriceChartEvent) -> Self {
        Message::Chart(event)
    }
}

pub enum Action {
    Fetch(FetchRequest),
    /// A new series is on screen, worth persisting the symbol.
    Plotted(String),
    ToggleTheme,
}

pub struct Viewer {
    input: String,
    function: Function,
    parser: parse::Strategy,
    max_points: usize,
    margins: Margins,
    api_key: ApiKey,
    chart: ChartData,
    selected: Option<PointInfo>,
    fetching: Option<String>,
    raw_fallback: Option<String>,
    notifications: Vec<Toast>,
}

impl Viewer {
    pub fn new(state: &State, api_key: ApiKey) -> Self {
        let mut notifications = vec![];
        if api_key.is_missing() {
            notifications.push(Toast::warn(ViewerError::MissingApiKey.to_string()));
        }

        Self {
            input: state.last_symbol.clone().unwrap_or_default(),
            function: state.function,
            parser: state.parser,
            max_points: state.max_points(),
            margins: state.margins,
            api_key,
            chart: ChartData::default(),
            selected: None,
            fetching: None,
            raw_fallback: None,
            notifications,
        }
    }

    pub fn update(&mut self, message: Message) -> Option<Action> {
        match message {
            Message::InputChanged(input) => {
                self.input = input;
            }
            Message::Submit => match self.request() {
                Ok(request) => {
                    log::info!("Fetching {} ({})", request.symbol, request.function);

                    self.fetching = Some(request.symbol.clone());
                    return Some(Action::Fetch(request));
                }
                Err(e) => {
                    log::warn!("Fetch not started: {e}");
                    self.notifications.push(Toast::warn(e.to_string()));
                }
            },
            Message::FunctionSelected(function) => {
                self.function = function;
            }
            Message::ParserSelected(parser) => {
                self.parser = parser;
            }
            Message::ToggleTheme => {
                return Some(Action::ToggleTheme);
            }
            Message::Fetched(fetched) => {
                self.fetching = None;
                return self.on_fetched(fetched);
            }
            Message::Chart(event) => match event {
                PriceChartEvent::PointSelected(info) => {
                    self.selected = Some(info);
                }
                PriceChartEvent::SelectionCleared => {
                    self.selected = None;
                }
            },
            Message::CloseToast(index) => {
                if index < self.notifications.len() {
                    self.notifications.remove(index);
                }
            }
            Message::Tick(now) => {
                self.notifications.retain(|toast| !toast.is_expired(now));
            }
        }

        None
    }

    fn request(&self) -> Result<FetchRequest, ViewerError> {
        let symbol = self.input.trim();

        if symbol.is_empty() {
            return Err(ViewerError::EmptySymbol);
        }
        if self.api_key.is_missing() {
            return Err(ViewerError::MissingApiKey);
        }

        Ok(FetchRequest {
            symbol: symbol.to_uppercase(),
            api_key: self.api_key.as_str().to_string(),
            function: self.function,
            strategy: self.parser,
            max_points: self.max_points,
        })
    }

    fn on_fetched(&mut self, fetched: Fetched) -> Option<Action> {
        let transport_error = fetched.is_transport_error();
        let Fetched {
            symbol,
            function,
            raw,
            series,
        } = fetched;

        // A failed lookup leaves the chart on screen untouched.
        if series.is_empty() {
            let error = if transport_error {
                ViewerError::Fetch(raw.clone())
            } else {
                ViewerError::Parse {
                    symbol: symbol.clone(),
                    excerpt: excerpt(&raw),
                }
            };

            log::error!("No data parsed for {symbol}: {error}");
            log::debug!("Raw response for {symbol}:\n{raw}");

            self.notifications.push(Toast::error(error.to_string()));
            self.raw_fallback = Some(raw);

            return None;
        }

        let count = series.len();
        log::info!("Plotted {count} data points for {symbol} ({function})");

        self.selected = None;
        self.raw_fallback = None;
        self.chart.set_series(symbol.clone(), series);
        self.notifications.push(Toast::info(format!(
            "Plotted {count} data points for {symbol} ({function})"
        )));

        Some(Action::Plotted(symbol))
    }

    pub fn function(&self) -> Function {
        self.function
    }

    pub fn parser(&self) -> parse::Strategy {
        self.parser
    }

    pub fn view(&self) -> Element<'_, Message> {
        let is_fetching = self.fetching.is_some();

        let input = text_input("e.g. IBM", &self.input)
            .on_input_maybe((!is_fetching).then_some(Message::InputChanged))
            .on_submit_maybe((!is_fetching).then_some(Message::Submit))
            .width(160);

        let toolbar = container(
            row![
                text("Enter Stock Symbol: "),
                input,
                pick_list(Function::ALL, Some(self.function), Message::FunctionSelected),
                pick_list(
                    parse::Strategy::ALL,
                    Some(self.parser),
                    Message::ParserSelected
                ),
                space::horizontal(),
                text(self.status_line()).size(13),
                button(text("Theme").size(13))
                    .on_press(Message::ToggleTheme)
                    .style(|theme, status| style::button::transparent(theme, status, false)),
            ]
            .spacing(8)
            .align_y(Center),
        )
        .style(style::toolbar)
        .padding(padding::all(8))
        .width(Fill);

        let chart = canvas(PriceChart::new(&self.chart).with_margins(self.margins))
            .width(Fill)
            .height(Fill);

        let mut content = column![toolbar, chart];

        if let Some(raw) = &self.raw_fallback {
            let raw = text(raw.as_str()).size(12).font(iced::Font::MONOSPACE);

            content = content.push(
                container(scrollable(raw).width(Fill))
                    .style(style::raw_response)
                    .padding(6)
                    .width(Fill)
                    .max_height(RAW_PANEL_HEIGHT),
            );
        }

        toast::view(content, &self.notifications, Message::CloseToast)
    }

    fn status_line(&self) -> String {
        if let Some(symbol) = &self.fetching {
            return format!("Fetching {symbol}...");
        }

        match (&self.selected, self.chart.symbol()) {
            (Some(info), _) => info.to_string(),
            (None, Some(symbol)) if !self.chart.has_no_points() => symbol.to_string(),
            _ => String::new(),
        }
    }

    pub fn subscription(&self) -> Subscription<Message> {
        if self.notifications.is_empty() {
            Subscription::none()
        } else {
            time::every(Duration::from_secs(1)).map(Message::Tick)
        }
    }
}

fn excerpt(raw: &str) -> String {
    let trimmed = raw.trim();

    if trimmed.chars().count() > EXCERPT_LEN {
        let head: String = trimmed.chars().take(EXCERPT_LEN).collect();
        format!("{head}...")
    } else {
        trimmed.to_string()
    }
}
