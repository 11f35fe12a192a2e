use iced::time::{Duration, Instant};
use iced::widget::{button, column, container, row, space, stack, text};
use iced::{Border, Center, Element, Fill, Theme, padding, theme};

use crate::style;

pub const DEFAULT_TIMEOUT: u64 = 8;
pub const MAX_TOAST_BODY_HEIGHT: f32 = 120.0;

const TOAST_WIDTH: f32 = 260.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Primary,
    Danger,
    Warning,
}

impl Status {
    pub fn style(&self, theme: &Theme) -> container::Style {
        let palette = theme.extended_palette();

        match self {
            Status::Primary => styled(palette.primary.weak),
            Status::Danger => styled(palette.danger.weak),
            Status::Warning => styled(palette.warning.weak),
        }
    }
}

fn styled(pair: theme::palette::Pair) -> container::Style {
    container::Style {
        background: Some(pair.color.into()),
        text_color: pair.text.into(),
        border: Border {
            width: 1.0,
            color: pair.color,
            radius: 2.0.into(),
        },
        ..Default::default()
    }
}

#[derive(Debug, Clone)]
pub struct Toast {
    title: String,
    body: String,
    status: Status,
    created: Instant,
}

impl Toast {
    fn new(title: &str, body: impl Into<String>, status: Status) -> Self {
        Self {
            title: title.to_string(),
            body: body.into(),
            status,
            created: Instant::now(),
        }
    }

    pub fn error(body: impl Into<String>) -> Self {
        Self::new("Error", body, Status::Danger)
    }

    pub fn warn(body: impl Into<String>) -> Self {
        Self::new("Warning", body, Status::Warning)
    }

    pub fn info(body: impl Into<String>) -> Self {
        Self::new("Info", body, Status::Primary)
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.created) >= Duration::from_secs(DEFAULT_TIMEOUT)
    }
}

/// Layers `toasts` over the bottom-right corner of `content`.
pub fn view<'a, Message>(
    content: impl Into<Element<'a, Message>>,
    toasts: &'a [Toast],
    on_close: impl Fn(usize) -> Message + 'a,
) -> Element<'a, Message>
where
    Message: Clone + 'a,
{
    let content = content.into();

    if toasts.is_empty() {
        return content;
    }

    let cards = toasts.iter().enumerate().map(|(index, toast)| -> Element<'a, Message> {
        let header = container(
            row![
                text(toast.title.as_str()),
                space::horizontal(),
                button("X")
                    .on_press(on_close(index))
                    .style(move |theme, status| style::button::transparent(theme, status, true))
                    .padding(padding::right(6).left(6).top(2).bottom(2))
            ]
            .align_y(Center),
        )
        .style(move |theme| toast.status.style(theme))
        .width(Fill)
        .padding(4);

        let body = container(
            text(toast.body())
                .wrapping(iced::widget::text::Wrapping::Word)
                .width(Fill),
        )
        .width(Fill)
        .max_height(MAX_TOAST_BODY_HEIGHT)
        .clip(true)
        .padding(4);

        container(column![header, body])
            .style(style::chart_modal)
            .padding(4)
            .width(TOAST_WIDTH)
            .into()
    });

    stack![
        content,
        container(column(cards).spacing(8))
            .width(Fill)
            .height(Fill)
            .align_right(Fill)
            .align_bottom(Fill)
            .padding(12),
    ]
    .into()
}
