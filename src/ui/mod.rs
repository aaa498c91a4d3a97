//! Dashboard widget model.
//!
//! [`PresentationState`] holds what every widget currently shows. It is mutated only
//! through `update`, the status setters and the toggles, and drawn by [`render::draw`].
//! Unit and theme live here rather than in the snapshot, so toggling them never needs
//! a fetch.

pub mod layout;
pub mod render;
pub mod theme;

use crate::conditions::{WeatherIcon, display_for};
use crate::models::{FORECAST_DAYS, TemperatureReading, WeatherSnapshot};
use crate::units::{TempBand, TempUnit};
use embedded_graphics::prelude::Point;
use layout::Button;
use theme::{Theme, Tone};

#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    pub tone: Tone,
}

impl Label {
    fn new(text: &str, tone: Tone) -> Self {
        Self {
            text: text.to_string(),
            tone,
        }
    }
}

/// Vertical bar. `value` is always Celsius, whatever the display unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Gauge {
    pub min: f32,
    pub max: f32,
    pub value: f32,
    pub tone: Tone,
}

impl Gauge {
    fn new(min: f32, max: f32, tone: Tone) -> Self {
        Self {
            min,
            max,
            value: 0.0,
            tone,
        }
    }

    /// Filled share of the track, clamped to `0.0..=1.0`.
    pub fn fill_fraction(&self) -> f32 {
        ((self.value - self.min) / (self.max - self.min)).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GaugeScale {
    Ambient,
    Sauna,
}

impl GaugeScale {
    fn band(self, celsius: f32) -> TempBand {
        match self {
            GaugeScale::Ambient => TempBand::ambient(celsius),
            GaugeScale::Sauna => TempBand::sauna(celsius),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TemperatureCard {
    pub title: &'static str,
    pub value: Label,
    pub gauge: Gauge,
    scale: GaugeScale,
}

impl TemperatureCard {
    fn new(title: &'static str, gauge: Gauge, scale: GaugeScale) -> Self {
        Self {
            title,
            value: Label::new("--.- C", Tone::Text),
            gauge,
            scale,
        }
    }

    fn show(&mut self, reading: &TemperatureReading, unit: TempUnit) {
        let Some(celsius) = reading.get() else {
            return;
        };
        self.value.text = format!("{:.1}°{}", unit.from_celsius(celsius), unit.suffix());
        self.gauge.value = celsius;
        self.gauge.tone = self.scale.band(celsius).into();
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CurrentCard {
    pub icon: WeatherIcon,
    pub condition: Label,
    pub temperature: Label,
    pub wind: Label,
    pub humidity: Label,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastCard {
    pub day: Label,
    pub icon: WeatherIcon,
    pub condition: Label,
    pub high: Label,
    pub low: Label,
}

impl Default for ForecastCard {
    fn default() -> Self {
        Self {
            day: Label::new("---", Tone::Text),
            icon: WeatherIcon::Cloudy,
            condition: Label::new("--", Tone::Dim),
            high: Label::new("H: --", Tone::Warm),
            low: Label::new("L: --", Tone::Cold),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WifiIndicator {
    Connecting,
    Connected,
    Disconnected,
}

impl WifiIndicator {
    pub fn text(self) -> &'static str {
        match self {
            WifiIndicator::Connecting => "Connecting...",
            WifiIndicator::Connected => "Connected",
            WifiIndicator::Disconnected => "Disconnected",
        }
    }

    pub fn tone(self) -> Tone {
        match self {
            WifiIndicator::Connecting => Tone::Dim,
            WifiIndicator::Connected => Tone::Good,
            WifiIndicator::Disconnected => Tone::Bad,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusBar {
    pub wifi: WifiIndicator,
    pub updated: Label,
}

/// Input the dashboard reacts to besides the poll timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiEvent {
    Tap { x: i32, y: i32 },
    ToggleUnit,
    ToggleTheme,
}

/// Turns a stream of touch samples into taps, reported when the finger lifts.
#[derive(Debug, Default)]
pub struct TapTracker {
    last: Option<Point>,
}

impl TapTracker {
    pub fn sample(&mut self, touch: Option<Point>) -> Option<UiEvent> {
        match touch {
            Some(point) => {
                self.last = Some(point);
                None
            }
            None => self.last.take().map(|p| UiEvent::Tap { x: p.x, y: p.y }),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PresentationState {
    pub status: StatusBar,
    pub indoor: TemperatureCard,
    pub outdoor: TemperatureCard,
    pub sauna: TemperatureCard,
    pub current: CurrentCard,
    pub forecast: [ForecastCard; FORECAST_DAYS],
    pub loading_visible: bool,
    pub unit: TempUnit,
    pub theme: Theme,
    last_rendered: WeatherSnapshot,
}

impl Default for PresentationState {
    fn default() -> Self {
        Self::create()
    }
}

impl PresentationState {
    /// Every widget at its placeholder, overlay up, Celsius, dark theme.
    pub fn create() -> Self {
        Self {
            status: StatusBar {
                wifi: WifiIndicator::Connecting,
                updated: Label::new("Updated: --:--", Tone::Dim),
            },
            indoor: TemperatureCard::new(
                "INDOOR",
                Gauge::new(-10.0, 40.0, Tone::Warm),
                GaugeScale::Ambient,
            ),
            outdoor: TemperatureCard::new(
                "OUTDOOR",
                Gauge::new(-20.0, 40.0, Tone::Cold),
                GaugeScale::Ambient,
            ),
            sauna: TemperatureCard::new(
                "SAUNA",
                Gauge::new(0.0, 110.0, Tone::Hot),
                GaugeScale::Sauna,
            ),
            current: CurrentCard {
                icon: WeatherIcon::Sunny,
                condition: Label::new("Loading...", Tone::Text),
                temperature: Label::new("-- C", Tone::Text),
                wind: Label::new("Wind: -- km/h", Tone::Dim),
                humidity: Label::new("Humidity: --%", Tone::Dim),
            },
            forecast: Default::default(),
            loading_visible: true,
            unit: TempUnit::default(),
            theme: Theme::default(),
            last_rendered: WeatherSnapshot::default(),
        }
    }

    /// Pushes every valid field into its widget. Invalid fields keep whatever they
    /// showed before.
    pub fn update(&mut self, snapshot: &WeatherSnapshot) {
        self.last_rendered = snapshot.clone();
        let unit = self.unit;
        let u = unit.suffix();

        self.indoor.show(&snapshot.indoor, unit);
        self.outdoor.show(&snapshot.outdoor, unit);
        self.sauna.show(&snapshot.sauna, unit);

        let now = &snapshot.current;
        if now.valid {
            let display = display_for(&now.condition);
            self.current.icon = display.icon;
            self.current.condition.text = display.label.to_string();
            self.current.temperature = Label {
                text: format!("{:.0}°{}", unit.from_celsius(now.temperature), u),
                tone: TempBand::ambient(now.temperature).into(),
            };
            self.current.wind.text = format!("Wind: {:.0} km/h", now.wind_speed);
            self.current.humidity.text = format!("Humidity: {:.0}%", now.humidity);
        }

        for (card, day) in self.forecast.iter_mut().zip(&snapshot.forecast) {
            if !day.valid {
                continue;
            }
            let display = display_for(&day.condition);
            card.day.text = day.day_name.clone();
            card.icon = display.icon;
            card.condition.text = display.label.to_string();
            card.high.text = format!("H: {:.0}°", unit.from_celsius(day.temp_high));
            card.low.text = format!("L: {:.0}°", unit.from_celsius(day.temp_low));
        }

        if !snapshot.last_updated.is_empty() {
            self.status.updated.text = format!("Updated: {}", snapshot.last_updated);
        }
    }

    pub fn set_wifi_status(&mut self, connected: bool) {
        self.status.wifi = if connected {
            WifiIndicator::Connected
        } else {
            WifiIndicator::Disconnected
        };
    }

    pub fn show_loading(&mut self, visible: bool) {
        self.loading_visible = visible;
    }

    /// Flips °C/°F and re-renders the last snapshot, if one has arrived.
    pub fn toggle_unit(&mut self) {
        self.unit = self.unit.toggled();
        if self.last_rendered.has_data {
            let last = self.last_rendered.clone();
            self.update(&last);
        }
    }

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
    }

    /// Returns whether the screen needs a redraw.
    pub fn handle_event(&mut self, event: UiEvent) -> bool {
        match event {
            UiEvent::Tap { x, y } => match layout::hit_test(Point::new(x, y)) {
                Some(Button::Unit) => self.handle_event(UiEvent::ToggleUnit),
                Some(Button::Theme) => self.handle_event(UiEvent::ToggleTheme),
                None => false,
            },
            UiEvent::ToggleUnit => {
                self.toggle_unit();
                true
            }
            UiEvent::ToggleTheme => {
                self.toggle_theme();
                true
            }
        }
    }

    pub fn last_rendered(&self) -> &WeatherSnapshot {
        &self.last_rendered
    }

    pub fn unit_button_text(&self) -> String {
        format!("°{}", self.unit.suffix())
    }
}
