use iced_core::{
    Color,
    theme::{Custom, Palette},
};
use serde::{Deserialize, Serialize};

const LIGHT_NAME: &str = "Ticker Light";
const DARK_NAME: &str = "Ticker Dark";

#[derive(Debug, Clone)]
pub struct Theme(pub iced_core::Theme);

#[derive(Serialize, Deserialize)]
struct SerTheme {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    palette: Option<Palette>,
}

impl Default for Theme {
    fn default() -> Self {
        Self(iced_core::Theme::Custom(ticker_light().into()))
    }
}

impl From<Theme> for iced_core::Theme {
    fn from(val: Theme) -> Self {
        val.0
    }
}

impl Theme {
    pub fn dark() -> Self {
        Self(iced_core::Theme::Custom(ticker_dark().into()))
    }

    pub fn is_dark(&self) -> bool {
        is_dark(self.0.palette().background)
    }

    /// Flips between the bundled light and dark themes.
    pub fn toggled(&self) -> Self {
        if self.is_dark() {
            Self::default()
        } else {
            Self::dark()
        }
    }

    fn name(&self) -> &'static str {
        match &self.0 {
            iced_core::Theme::Custom(custom) if custom.to_string() == LIGHT_NAME => "ticker-light",
            iced_core::Theme::Custom(custom) if custom.to_string() == DARK_NAME => "ticker-dark",
            iced_core::Theme::Light => "light",
            iced_core::Theme::Dark => "dark",
            _ => "custom",
        }
    }
}

/// White chart area with the blue line the viewer has always had.
pub fn ticker_light() -> Custom {
    Custom::new(
        LIGHT_NAME.to_string(),
        Palette {
            background: Color::WHITE,
            text: Color::from_rgb8(33, 33, 33),
            primary: Color::from_rgb8(33, 150, 243),
            success: Color::from_rgb8(46, 125, 50),
            danger: Color::from_rgb8(198, 40, 40),
            warning: Color::from_rgb8(239, 108, 0),
        },
    )
}

pub fn ticker_dark() -> Custom {
    Custom::new(
        DARK_NAME.to_string(),
        Palette {
            background: Color::from_rgb8(24, 24, 28),
            text: Color::from_rgb8(224, 224, 224),
            primary: Color::from_rgb8(100, 181, 246),
            success: Color::from_rgb8(102, 187, 106),
            danger: Color::from_rgb8(239, 83, 80),
            warning: Color::from_rgb8(255, 183, 77),
        },
    )
}

impl Serialize for Theme {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let name = self.name();

        if name == "custom" {
            SerTheme {
                name: name.to_string(),
                palette: Some(self.0.palette()),
            }
            .serialize(serializer)
        } else {
            name.serialize(serializer)
        }
    }
}

impl<'de> Deserialize<'de> for Theme {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value =
            serde_json::Value::deserialize(deserializer).map_err(serde::de::Error::custom)?;

        if let Some(s) = value.as_str() {
            return match s {
                "ticker-light" => Ok(Theme::default()),
                "ticker-dark" => Ok(Theme::dark()),
                "light" => Ok(Theme(iced_core::Theme::Light)),
                "dark" => Ok(Theme(iced_core::Theme::Dark)),
                _ => Err(serde::de::Error::custom(format!("Invalid theme: {}", s))),
            };
        }

        let serialized = SerTheme::deserialize(value).map_err(serde::de::Error::custom)?;

        match (serialized.name.as_str(), serialized.palette) {
            ("custom", Some(palette)) => Ok(Theme(iced_core::Theme::Custom(
                Custom::new("Custom".to_string(), palette).into(),
            ))),
            ("custom", None) => Err(serde::de::Error::custom(
                "Custom theme missing palette data",
            )),
            _ => Err(serde::de::Error::custom("Invalid theme")),
        }
    }
}

pub fn is_dark(color: Color) -> bool {
    let brightness = (color.r * 299.0 + color.g * 587.0 + color.b * 114.0) / 1000.0;
    brightness < 0.5
}
