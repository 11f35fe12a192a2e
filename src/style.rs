use iced::widget::container;
use iced::{Border, Color, Theme};

pub mod button {
    use iced::widget::button::{Status, Style};
    use iced::{Border, Theme};

    pub fn transparent(theme: &Theme, status: Status, is_active: bool) -> Style {
        let palette = theme.extended_palette();

        let background = match status {
            Status::Hovered | Status::Pressed => {
                Some(palette.background.strong.color.scale_alpha(0.4).into())
            }
            Status::Active if is_active => Some(palette.background.weak.color.into()),
            _ => None,
        };

        Style {
            background,
            text_color: palette.background.base.text,
            border: Border {
                radius: 3.0.into(),
                ..Border::default()
            },
            ..Default::default()
        }
    }
}

pub fn chart_modal(theme: &Theme) -> container::Style {
    let palette = theme.extended_palette();

    container::Style {
        text_color: Some(palette.background.base.text),
        background: Some(palette.background.base.color.into()),
        border: Border {
            width: 1.0,
            color: palette.background.strong.color,
            radius: 4.0.into(),
        },
        shadow: iced::Shadow {
            color: Color::BLACK.scale_alpha(if palette.is_dark { 0.8 } else { 0.2 }),
            offset: iced::Vector { x: 0.0, y: 2.0 },
            blur_radius: 8.0,
        },
        ..Default::default()
    }
}

pub fn toolbar(theme: &Theme) -> container::Style {
    let palette = theme.extended_palette();

    container::Style {
        background: Some(palette.background.weak.color.into()),
        border: Border {
            width: 1.0,
            color: palette.background.strong.color.scale_alpha(0.5),
            radius: 0.0.into(),
        },
        ..Default::default()
    }
}

pub fn raw_response(theme: &Theme) -> container::Style {
    let palette = theme.extended_palette();

    container::Style {
        text_color: Some(palette.danger.base.color),
        background: Some(palette.background.weakest.color.into()),
        border: Border {
            width: 1.0,
            color: palette.danger.weak.color,
            radius: 2.0.into(),
        },
        ..Default::default()
    }
}
