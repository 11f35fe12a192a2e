use super::theme::Theme;
use crate::chart::Margins;

use exchange::{DEFAULT_MAX_POINTS, Function, parse};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowSpec {
    pub width: f32,
    pub height: f32,
}

impl Default for WindowSpec {
    fn default() -> Self {
        Self {
            width: 1080.0,
            height: 720.0,
        }
    }
}

/// Everything that survives a restart.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct State {
    pub last_symbol: Option<String>,
    pub function: Function,
    pub parser: parse::Strategy,
    pub max_points: usize,
    pub margins: Margins,
    pub selected_theme: Theme,
    pub main_window: Option<WindowSpec>,
}

impl Default for State {
    fn default() -> Self {
        Self {
            last_symbol: None,
            function: Function::default(),
            parser: parse::Strategy::default(),
            max_points: DEFAULT_MAX_POINTS,
            margins: Margins::default(),
            selected_theme: Theme::default(),
            main_window: None,
        }
    }
}

impl State {
    pub fn window(&self) -> WindowSpec {
        self.main_window.unwrap_or_default()
    }

    /// Zero would make every fetch come back empty.
    pub fn max_points(&self) -> usize {
        if self.max_points == 0 {
            DEFAULT_MAX_POINTS
        } else {
            self.max_points
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let state: State = serde_json::from_str(r#"{ "last_symbol": "IBM" }"#).unwrap();

        assert_eq!(state.last_symbol.as_deref(), Some("IBM"));
        assert_eq!(state.function, Function::Daily);
        assert_eq!(state.parser, parse::Strategy::Lines);
        assert_eq!(state.max_points(), 200);
        assert_eq!(state.margins, Margins::default());
        assert_eq!(state.window(), WindowSpec::default());
    }

    #[test]
    fn saved_choices_survive_serialization() {
        let state = State {
            last_symbol: Some("MSFT".to_string()),
            function: Function::Hourly,
            parser: parse::Strategy::Structural,
            max_points: 50,
            main_window: Some(WindowSpec {
                width: 900.0,
                height: 600.0,
            }),
            ..State::default()
        };

        let json = serde_json::to_string(&state).unwrap();
        let back: State = serde_json::from_str(&json).unwrap();

        assert_eq!(back.function, Function::Hourly);
        assert_eq!(back.parser, parse::Strategy::Structural);
        assert_eq!(back.max_points(), 50);
        assert_eq!(back.window().width, 900.0);
    }

    #[test]
    fn zero_max_points_uses_default() {
        let state: State = serde_json::from_str(r#"{ "max_points": 0 }"#).unwrap();

        assert_eq!(state.max_points(), DEFAULT_MAX_POINTS);
    }
}
