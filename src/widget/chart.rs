use data::chart::{ChartData, Geometry, Margins, PointInfo, axis};
use exchange::Series;

use iced::theme::palette::Extended;
use iced::widget::canvas::{self, Cache, Event, Frame, Path, Stroke};
use iced::{Point, Rectangle, Renderer, Size, Theme, Vector, mouse};

use std::cell::Cell;

const TEXT_SIZE: f32 = 11.0;
const CHAR_W: f32 = TEXT_SIZE * 0.6;

const LINE_WIDTH: f32 = 2.0;
const POINT_RADIUS: f32 = 3.0;

/// Value axis gets min, max and the three quartiles in between.
const VALUE_DIVISIONS: usize = 4;

const POPUP_OFFSET: Vector = Vector::new(10.0, -10.0);
const POPUP_PADDING: f32 = 6.0;

const EMPTY_MESSAGE: &str = "No data to display";

#[derive(Debug, Clone)]
pub enum PriceChartEvent {
    PointSelected(PointInfo),
    SelectionCleared,
}

struct Popup {
    info: PointInfo,
    anchor: Point,
    revision: u64,
}

pub struct State {
    cache: Cache,
    last_rev: Cell<u64>,
    /// Layout of the latest paint pass; clicks resolve against this only.
    last_geometry: Cell<Option<Geometry>>,
    popup: Option<Popup>,
}

impl Default for State {
    fn default() -> Self {
        Self {
            cache: Cache::new(),
            last_rev: Cell::new(0),
            last_geometry: Cell::new(None),
            popup: None,
        }
    }
}

pub struct PriceChart<'a> {
    data: &'a ChartData,
    margins: Margins,
}

impl<'a> PriceChart<'a> {
    pub fn new(data: &'a ChartData) -> Self {
        Self {
            data,
            margins: Margins::default(),
        }
    }

    pub fn with_margins(mut self, margins: Margins) -> Self {
        self.margins = margins;
        self
    }

    fn resolve_click(&self, state: &State, position: Point) -> Option<PointInfo> {
        let geometry = state.last_geometry.get()?;
        let series = self.data.series()?;

        let index = geometry.hit_test(series.closes(), position.x, position.y)?;
        series.get(index).map(|point| PointInfo::new(index, point))
    }

    fn fill_empty(&self, frame: &mut Frame, palette: &Extended) {
        frame.fill_text(canvas::Text {
            content: EMPTY_MESSAGE.to_string(),
            position: Point::new(self.margins.padding, frame.height() / 2.0),
            color: palette.background.base.text,
            size: (TEXT_SIZE + 1.0).into(),
            align_x: iced::Alignment::Start.into(),
            align_y: iced::Alignment::Center.into(),
            ..Default::default()
        });
    }

    fn fill_series(&self, frame: &mut Frame, series: &Series, g: &Geometry, palette: &Extended) {
        let axis_color = palette.background.strong.color;
        let axis_stroke = Stroke::default().with_color(axis_color).with_width(1.0);

        let corner = Point::new(g.origin_x, g.bottom());
        frame.stroke(
            &Path::line(corner, Point::new(g.origin_x, g.origin_y)),
            axis_stroke,
        );
        frame.stroke(
            &Path::line(corner, Point::new(g.right(), g.bottom())),
            axis_stroke,
        );

        let closes = series.closes();

        let line = Path::new(|builder| {
            let mut pen_down = false;
            for (i, v) in closes.iter().enumerate() {
                if !v.is_finite() {
                    pen_down = false;
                    continue;
                }
                let p = Point::new(g.x(i), g.y(*v));
                if pen_down {
                    builder.line_to(p);
                } else {
                    builder.move_to(p);
                    pen_down = true;
                }
            }
        });
        frame.stroke(
            &line,
            Stroke::default()
                .with_color(palette.primary.base.color)
                .with_width(LINE_WIDTH),
        );

        let marker_color = palette.background.base.text.scale_alpha(0.75);
        for (i, v) in closes.iter().enumerate().filter(|(_, v)| v.is_finite()) {
            frame.fill(
                &Path::circle(Point::new(g.x(i), g.y(*v)), POINT_RADIUS),
                marker_color,
            );
        }

        self.fill_value_labels(frame, g, palette);
        self.fill_time_labels(frame, series, g, palette);
    }

    fn fill_value_labels(&self, frame: &mut Frame, g: &Geometry, palette: &Extended) {
        let grid = palette.background.strong.color.scale_alpha(0.3);

        for (k, value) in g.value_ticks(VALUE_DIVISIONS).into_iter().enumerate() {
            let y = g.y(value);

            // min and max rows already have the axis or the plot edge
            if k != 0 && k != VALUE_DIVISIONS {
                frame.stroke(
                    &Path::line(Point::new(g.origin_x, y), Point::new(g.right(), y)),
                    Stroke::default().with_color(grid).with_width(1.0),
                );
            }

            frame.fill_text(canvas::Text {
                content: axis::format_price(value),
                position: Point::new(5.0, y),
                color: palette.background.base.text,
                size: TEXT_SIZE.into(),
                align_x: iced::Alignment::Start.into(),
                align_y: iced::Alignment::Center.into(),
                ..Default::default()
            });
        }
    }

    fn fill_time_labels(&self, frame: &mut Frame, series: &Series, g: &Geometry, palette: &Extended) {
        let labels = series.labels();
        let right_limit = frame.width() - self.margins.padding - 40.0;

        for idx in axis::label_indices(labels.len(), axis::MAX_TIME_LABELS) {
            let display = axis::format_time_label(&labels[idx]);

            let left = (g.x(idx) - 20.0).min(right_limit).max(g.origin_x);

            frame.fill_text(canvas::Text {
                content: display,
                position: Point::new(left, g.bottom() + 6.0),
                color: palette.background.base.text,
                size: TEXT_SIZE.into(),
                align_x: iced::Alignment::Start.into(),
                align_y: iced::Alignment::Start.into(),
                ..Default::default()
            });
        }
    }

    fn fill_popup(&self, frame: &mut Frame, popup: &Popup, palette: &Extended) {
        let date = popup.info.date.as_str();
        let price = popup.info.price_text();

        let chars = date.chars().count().max(price.chars().count()) as f32;
        let size = Size::new(
            chars * CHAR_W + POPUP_PADDING * 2.0,
            TEXT_SIZE * 2.0 + POPUP_PADDING * 3.0,
        );

        let anchor = popup.anchor + POPUP_OFFSET;
        let top_left = Point::new(
            anchor.x.min(frame.width() - size.width).max(0.0),
            (anchor.y - size.height).max(0.0),
        );

        frame.fill_rectangle(top_left, size, palette.background.weakest.color);
        frame.stroke(
            &Path::rectangle(top_left, size),
            Stroke::default()
                .with_color(palette.primary.base.color)
                .with_width(1.0),
        );

        for (row, content) in [date.to_string(), price].into_iter().enumerate() {
            frame.fill_text(canvas::Text {
                content,
                position: Point::new(
                    top_left.x + POPUP_PADDING,
                    top_left.y + POPUP_PADDING + row as f32 * (TEXT_SIZE + POPUP_PADDING),
                ),
                color: palette.background.weakest.text,
                size: TEXT_SIZE.into(),
                align_x: iced::Alignment::Start.into(),
                align_y: iced::Alignment::Start.into(),
                ..Default::default()
            });
        }
    }
}

impl<M> canvas::Program<M> for PriceChart<'_>
where
    M: From<PriceChartEvent>,
{
    type State = State;

    fn update(
        &self,
        state: &mut State,
        event: &Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<canvas::Action<M>> {
        let Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) = event else {
            return None;
        };

        let position = cursor.position_in(bounds)?;

        match self.resolve_click(state, position) {
            Some(info) => {
                log::debug!("Picked {info}");
                state.popup = Some(Popup {
                    info: info.clone(),
                    anchor: position,
                    revision: self.data.revision(),
                });
                Some(canvas::Action::publish(M::from(PriceChartEvent::PointSelected(info))).and_capture())
            }
            None => state
                .popup
                .take()
                .map(|_| canvas::Action::publish(M::from(PriceChartEvent::SelectionCleared))),
        }
    }

    fn draw(
        &self,
        state: &State,
        renderer: &Renderer,
        theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<canvas::Geometry> {
        let revision = self.data.revision();
        if state.last_rev.get() != revision {
            state.cache.clear();
            state.last_rev.set(revision);
        }

        let palette = theme.extended_palette();
        let size = bounds.size();

        let series = self.data.series();
        let geometry = series
            .and_then(|s| Geometry::compute(s.closes(), size.width, size.height, self.margins));

        let chart = state.cache.draw(renderer, size, |frame| {
            frame.fill_rectangle(Point::ORIGIN, frame.size(), palette.background.base.color);

            match (series, geometry.as_ref()) {
                (Some(series), Some(g)) => self.fill_series(frame, series, g, palette),
                _ => self.fill_empty(frame, palette),
            }
        });

        state.last_geometry.set(geometry);

        let mut layers = vec![chart];

        if let Some(popup) = state.popup.as_ref().filter(|p| p.revision == revision) {
            let mut frame = Frame::new(renderer, size);
            self.fill_popup(&mut frame, popup, palette);
            layers.push(frame.into_geometry());
        }

        layers
    }

    fn mouse_interaction(
        &self,
        state: &State,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        match cursor.position_in(bounds) {
            Some(position) if self.resolve_click(state, position).is_some() => {
                mouse::Interaction::Pointer
            }
            Some(_) if !self.data.has_no_points() => mouse::Interaction::Crosshair,
            _ => mouse::Interaction::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_points() -> ChartData {
        let mut series = Series::new();
        series.push("2024-01-01", 10.0);
        series.push("2024-01-02", 20.0);
        series.push("2024-01-03", 15.0);

        let mut data = ChartData::default();
        data.set_series("IBM", series);
        data
    }

    fn painted(data: &ChartData) -> State {
        let state = State::default();
        let closes = data.series().map(Series::closes).unwrap_or_default();
        state
            .last_geometry
            .set(Geometry::compute(closes, 800.0, 400.0, Margins::default()));
        state
    }

    #[test]
    fn click_on_rendered_point_surfaces_date_and_price() {
        let data = three_points();
        let chart = PriceChart::new(&data);
        let state = painted(&data);

        let g = state.last_geometry.get().unwrap();
        let info = chart
            .resolve_click(&state, Point::new(g.x(1), g.y(20.0)))
            .expect("hit");

        assert_eq!(info.index, 1);
        assert_eq!(info.date, "2024-01-02");
        assert_eq!(info.price_text(), "$20.00");
    }

    #[test]
    fn click_away_from_points_misses() {
        let data = three_points();
        let chart = PriceChart::new(&data);
        let state = painted(&data);

        let g = state.last_geometry.get().unwrap();
        let far = Point::new(g.x(0) + 50.0, g.y(10.0) - 50.0);

        assert!(chart.resolve_click(&state, far).is_none());
    }

    #[test]
    fn nothing_resolves_before_first_paint() {
        let data = three_points();
        let chart = PriceChart::new(&data);
        let state = State::default();

        assert!(chart.resolve_click(&state, Point::new(80.0, 360.0)).is_none());
    }

    #[test]
    fn clicks_use_the_painted_layout() {
        let data = three_points();
        let state = painted(&data);
        let g = state.last_geometry.get().unwrap();

        // A wider layout would move point 1, the painted one must win.
        let chart = PriceChart::new(&data).with_margins(Margins {
            padding: 10.0,
            label_padding: 10.0,
        });

        let info = chart.resolve_click(&state, Point::new(g.x(1), g.y(20.0)));
        assert_eq!(info.map(|i| i.index), Some(1));
    }

    #[test]
    fn empty_series_never_hits() {
        let mut data = ChartData::default();
        data.set_series("IBM", Series::new());
        let chart = PriceChart::new(&data);
        let state = painted(&data);

        assert!(state.last_geometry.get().is_none());
        assert!(chart.resolve_click(&state, Point::new(80.0, 40.0)).is_none());
    }
}
