//! Draws a [`PresentationState`] onto any RGB565 target.
//!
//! Everything is repainted from scratch on each call; the panel is refreshed only
//! when the state changes, so there is no damage tracking.

use super::layout::{self, CARD_RADIUS, SCREEN_H, SCREEN_W};
use super::theme::{COLD, CYAN, GREEN, ICON_YELLOW, Palette, RED, Theme};
use super::{ForecastCard, Gauge, PresentationState, TemperatureCard, WifiIndicator};
use crate::conditions::WeatherIcon;
use embedded_graphics::geometry::Angle;
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{
    Arc, Circle, Ellipse, Line, Polyline, PrimitiveStyle, PrimitiveStyleBuilder, Rectangle,
    RoundedRectangle, Triangle,
};
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyleBuilder};
use profont::{
    PROFONT_12_POINT, PROFONT_14_POINT, PROFONT_18_POINT, PROFONT_24_POINT,
};

const TITLE: &str = "Home Weather";
const FORECAST_TITLE: &str = "3-DAY FORECAST";
const OVERLAY_TEXT: &str = "Connecting...";

pub fn draw<D>(ui: &PresentationState, target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let palette = ui.theme.palette();
    target.clear(palette.bg)?;

    draw_status_bar(target, ui, palette)?;

    let cards = [&ui.indoor, &ui.outdoor, &ui.sauna];
    for (i, card) in cards.into_iter().enumerate() {
        draw_temperature_card(target, card, layout::temperature_card(i), palette)?;
    }

    draw_current_card(target, ui, palette)?;

    text(
        target,
        FORECAST_TITLE,
        layout::forecast_title_origin(),
        &PROFONT_14_POINT,
        palette.dim,
        Alignment::Left,
    )?;
    for (i, card) in ui.forecast.iter().enumerate() {
        draw_forecast_card(target, card, layout::forecast_card(i), palette)?;
    }

    if ui.loading_visible {
        draw_loading_overlay(target, palette)?;
    }

    Ok(())
}

fn draw_status_bar<D>(target: &mut D, ui: &PresentationState, palette: &Palette) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let bar = layout::status_bar();
    bar.into_styled(fill(palette.status_bar)).draw(target)?;

    let mid = bar.center().y;
    let wifi_color = palette.resolve(ui.status.wifi.tone());
    draw_wifi_glyph(target, ui.status.wifi, Point::new(20, mid), wifi_color)?;
    text(
        target,
        ui.status.wifi.text(),
        Point::new(40, mid),
        &PROFONT_12_POINT,
        wifi_color,
        Alignment::Left,
    )?;

    text(
        target,
        TITLE,
        Point::new(SCREEN_W / 2, mid),
        &PROFONT_14_POINT,
        palette.text,
        Alignment::Center,
    )?;

    draw_button(target, &layout::UNIT_BUTTON, palette)?;
    text(
        target,
        &ui.unit_button_text(),
        layout::UNIT_BUTTON.center(),
        &PROFONT_14_POINT,
        palette.text,
        Alignment::Center,
    )?;

    draw_button(target, &layout::THEME_BUTTON, palette)?;
    draw_eye(
        target,
        layout::THEME_BUTTON.center(),
        ui.theme == Theme::Dark,
        palette.text,
    )?;

    text(
        target,
        &ui.status.updated.text,
        Point::new(SCREEN_W - 10, mid),
        &PROFONT_12_POINT,
        palette.resolve(ui.status.updated.tone),
        Alignment::Right,
    )
}

fn draw_temperature_card<D>(
    target: &mut D,
    card: &TemperatureCard,
    area: Rectangle,
    palette: &Palette,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    draw_card(target, &area, palette.card)?;

    let x = area.top_left.x;
    let y = area.top_left.y;
    text(
        target,
        card.title,
        Point::new(area.center().x, y + 18),
        &PROFONT_14_POINT,
        palette.dim,
        Alignment::Center,
    )?;

    draw_gauge(target, &card.gauge, layout::gauge_track(&area), palette)?;

    text(
        target,
        &card.value.text,
        Point::new(x + 128, area.center().y + 10),
        &PROFONT_24_POINT,
        palette.resolve(card.value.tone),
        Alignment::Center,
    )
}

/// Track plus a fill rising from the bottom.
fn draw_gauge<D>(target: &mut D, gauge: &Gauge, track: Rectangle, palette: &Palette) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let radius = Size::new(track.size.width / 2, track.size.width / 2);
    RoundedRectangle::with_equal_corners(track, radius)
        .into_styled(fill(palette.bar_track))
        .draw(target)?;

    let filled = (track.size.height as f32 * gauge.fill_fraction()).round() as u32;
    if filled == 0 {
        return Ok(());
    }

    let top = track.top_left + Point::new(0, (track.size.height - filled) as i32);
    RoundedRectangle::with_equal_corners(Rectangle::new(top, Size::new(track.size.width, filled)), radius)
        .into_styled(fill(palette.resolve(gauge.tone)))
        .draw(target)?;
    Ok(())
}

fn draw_current_card<D>(target: &mut D, ui: &PresentationState, palette: &Palette) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let area = layout::current_card();
    draw_card(target, &area, palette.card)?;

    let x = area.top_left.x;
    let y = area.top_left.y;
    let right = x + area.size.width as i32;
    let now = &ui.current;

    draw_icon(target, now.icon, Point::new(x + 70, y + 70), 96, palette, palette.card)?;

    text(
        target,
        &now.condition.text,
        Point::new(x + 140, y + 70),
        &PROFONT_18_POINT,
        palette.resolve(now.condition.tone),
        Alignment::Left,
    )?;
    text(
        target,
        &now.temperature.text,
        Point::new(right - 24, y + 70),
        &PROFONT_24_POINT,
        palette.resolve(now.temperature.tone),
        Alignment::Right,
    )?;

    let details_y = y + area.size.height as i32 - 30;
    text(
        target,
        &now.wind.text,
        Point::new(area.center().x - 20, details_y),
        &PROFONT_14_POINT,
        palette.resolve(now.wind.tone),
        Alignment::Right,
    )?;
    text(
        target,
        &now.humidity.text,
        Point::new(area.center().x + 20, details_y),
        &PROFONT_14_POINT,
        palette.resolve(now.humidity.tone),
        Alignment::Left,
    )
}

fn draw_forecast_card<D>(
    target: &mut D,
    card: &ForecastCard,
    area: Rectangle,
    palette: &Palette,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    draw_card(target, &area, palette.card)?;

    let cx = area.center().x;
    let y = area.top_left.y;

    text(target, &card.day.text, Point::new(cx, y + 24), &PROFONT_18_POINT, palette.resolve(card.day.tone), Alignment::Center)?;
    draw_icon(target, card.icon, Point::new(cx, y + 80), 56, palette, palette.card)?;
    text(target, &card.condition.text, Point::new(cx, y + 134), &PROFONT_12_POINT, palette.resolve(card.condition.tone), Alignment::Center)?;
    text(target, &card.high.text, Point::new(cx, y + 162), &PROFONT_14_POINT, palette.resolve(card.high.tone), Alignment::Center)?;
    text(target, &card.low.text, Point::new(cx, y + 184), &PROFONT_14_POINT, palette.resolve(card.low.tone), Alignment::Center)
}

fn draw_loading_overlay<D>(target: &mut D, palette: &Palette) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let screen = Rectangle::new(Point::zero(), Size::new(SCREEN_W as u32, SCREEN_H as u32));
    screen.into_styled(fill(palette.bg)).draw(target)?;

    let center = screen.center();
    Circle::with_center(center, 60)
        .into_styled(stroke(palette.dim, 6))
        .draw(target)?;
    Arc::with_center(center, 60, Angle::from_degrees(270.0), Angle::from_degrees(60.0))
        .into_styled(stroke(GREEN, 6))
        .draw(target)?;

    text(
        target,
        OVERLAY_TEXT,
        center + Point::new(0, 56),
        &PROFONT_14_POINT,
        palette.text,
        Alignment::Center,
    )
}

fn draw_card<D>(target: &mut D, area: &Rectangle, color: Rgb565) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    RoundedRectangle::with_equal_corners(*area, Size::new(CARD_RADIUS, CARD_RADIUS))
        .into_styled(fill(color))
        .draw(target)
}

fn draw_button<D>(target: &mut D, area: &Rectangle, palette: &Palette) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let style = PrimitiveStyleBuilder::new()
        .fill_color(palette.btn_bg)
        .stroke_color(palette.btn_border)
        .stroke_width(1)
        .build();
    RoundedRectangle::with_equal_corners(*area, Size::new(6, 6))
        .into_styled(style)
        .draw(target)
}

fn draw_wifi_glyph<D>(target: &mut D, state: WifiIndicator, center: Point, color: Rgb565) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    if state == WifiIndicator::Disconnected {
        let top = center + Point::new(0, -9);
        Triangle::new(top, center + Point::new(-10, 8), center + Point::new(10, 8))
            .into_styled(stroke(color, 2))
            .draw(target)?;
        Line::new(center + Point::new(0, -3), center + Point::new(0, 2))
            .into_styled(stroke(color, 2))
            .draw(target)?;
        return Circle::with_center(center + Point::new(0, 5), 2)
            .into_styled(fill(color))
            .draw(target);
    }

    let base = center + Point::new(0, 7);
    for diameter in [8u32, 18, 28] {
        Arc::with_center(base, diameter, Angle::from_degrees(225.0), Angle::from_degrees(90.0))
            .into_styled(stroke(color, 2))
            .draw(target)?;
    }
    Circle::with_center(base, 3).into_styled(fill(color)).draw(target)
}

/// Open eye in the light theme, closed in the dark one.
fn draw_eye<D>(target: &mut D, center: Point, closed: bool, color: Rgb565) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    if closed {
        return Arc::with_center(center + Point::new(0, -6), 22, Angle::from_degrees(30.0), Angle::from_degrees(120.0))
            .into_styled(stroke(color, 2))
            .draw(target);
    }

    Ellipse::with_center(center, Size::new(22, 12))
        .into_styled(stroke(color, 2))
        .draw(target)?;
    Circle::with_center(center, 6).into_styled(fill(color)).draw(target)
}

/// Weather glyphs built from primitives. `backdrop` is the colour behind the icon,
/// used to cut the crescent moon.
pub fn draw_icon<D>(
    target: &mut D,
    icon: WeatherIcon,
    center: Point,
    size: u32,
    palette: &Palette,
    backdrop: Rgb565,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let s = size as i32;
    let cloud_color = palette.dim;
    let raised = center + Point::new(0, -s / 8);
    let below = center + Point::new(0, s / 4);

    match icon {
        WeatherIcon::Sunny => sun(target, center, s)?,
        WeatherIcon::ClearNight => {
            Circle::with_center(center, (s * 3 / 5) as u32)
                .into_styled(fill(ICON_YELLOW))
                .draw(target)?;
            Circle::with_center(center + Point::new(s / 6, -s / 8), (s / 2) as u32)
                .into_styled(fill(backdrop))
                .draw(target)?;
        }
        WeatherIcon::PartlyCloudy => {
            sun(target, center + Point::new(-s / 6, -s / 6), s * 2 / 3)?;
            cloud(target, center + Point::new(s / 10, s / 8), s * 3 / 4, cloud_color)?;
        }
        WeatherIcon::Cloudy => cloud(target, center, s, cloud_color)?,
        WeatherIcon::Fog => {
            for row in -1..=1 {
                let y = center.y + row * s / 6;
                let inset = if row == 0 { 0 } else { s / 10 };
                Line::new(Point::new(center.x - s / 3 + inset, y), Point::new(center.x + s / 3 - inset, y))
                    .into_styled(stroke(cloud_color, 3))
                    .draw(target)?;
            }
        }
        WeatherIcon::Rain => {
            cloud(target, raised, s * 3 / 4, cloud_color)?;
            drops(target, below, s, 3, COLD)?;
        }
        WeatherIcon::Pouring => {
            cloud(target, raised, s * 3 / 4, cloud_color)?;
            drops(target, below, s, 5, COLD)?;
        }
        WeatherIcon::Snow => {
            cloud(target, raised, s * 3 / 4, cloud_color)?;
            pellets(target, below, s, 3, CYAN, false)?;
        }
        WeatherIcon::Sleet => {
            cloud(target, raised, s * 3 / 4, cloud_color)?;
            drops(target, below, s, 2, COLD)?;
            pellets(target, below + Point::new(0, s / 12), s, 1, CYAN, false)?;
        }
        WeatherIcon::Hail => {
            cloud(target, raised, s * 3 / 4, cloud_color)?;
            pellets(target, below, s, 3, CYAN, true)?;
        }
        WeatherIcon::Lightning => {
            cloud(target, raised, s * 3 / 4, cloud_color)?;
            bolt(target, below, s)?;
        }
        WeatherIcon::Storm => {
            cloud(target, raised, s * 3 / 4, cloud_color)?;
            drops(target, below + Point::new(-s / 8, 0), s / 2, 2, COLD)?;
            bolt(target, below + Point::new(s / 8, 0), s)?;
        }
        WeatherIcon::Wind => {
            for (row, len) in [(-1, s / 2), (0, s * 2 / 3), (1, s * 2 / 5)] {
                let y = center.y + row * s / 6;
                let start = Point::new(center.x - s / 3, y);
                let end = Point::new(start.x + len, y);
                Line::new(start, end).into_styled(stroke(cloud_color, 3)).draw(target)?;
                Arc::with_center(end + Point::new(0, -s / 16), (s / 8).max(2) as u32, Angle::from_degrees(180.0), Angle::from_degrees(270.0))
                    .into_styled(stroke(cloud_color, 3))
                    .draw(target)?;
            }
        }
        WeatherIcon::Exceptional => {
            Triangle::new(
                center + Point::new(0, -s / 3),
                center + Point::new(-s / 3, s / 4),
                center + Point::new(s / 3, s / 4),
            )
            .into_styled(stroke(RED, 3))
            .draw(target)?;
            text(target, "!", center + Point::new(0, s / 20), &PROFONT_18_POINT, RED, Alignment::Center)?;
        }
    }

    Ok(())
}

fn sun<D>(target: &mut D, center: Point, s: i32) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    Circle::with_center(center, (s / 2).max(1) as u32)
        .into_styled(fill(ICON_YELLOW))
        .draw(target)?;

    let (inner, outer) = (s as f32 * 0.32, s as f32 * 0.46);
    for k in 0..8 {
        let a = k as f32 * core::f32::consts::FRAC_PI_4;
        let (sin, cos) = a.sin_cos();
        let from = center + Point::new((cos * inner) as i32, (sin * inner) as i32);
        let to = center + Point::new((cos * outer) as i32, (sin * outer) as i32);
        Line::new(from, to).into_styled(stroke(ICON_YELLOW, 2)).draw(target)?;
    }
    Ok(())
}

fn cloud<D>(target: &mut D, center: Point, s: i32, color: Rgb565) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let r = (s / 5).max(2);
    let style = fill(color);

    Circle::with_center(center + Point::new(-r, 0), (2 * r) as u32)
        .into_styled(style)
        .draw(target)?;
    Circle::with_center(center + Point::new(r / 2, -r / 2), (5 * r / 2) as u32)
        .into_styled(style)
        .draw(target)?;
    RoundedRectangle::with_equal_corners(
        Rectangle::with_center(center + Point::new(0, r / 2), Size::new((4 * r) as u32, r as u32 + 2)),
        Size::new((r / 2) as u32, (r / 2) as u32),
    )
    .into_styled(style)
    .draw(target)?;
    Ok(())
}

fn drops<D>(target: &mut D, top: Point, s: i32, count: i32, color: Rgb565) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let spacing = s / 8;
    let first = top.x - spacing * (count - 1) / 2;
    for i in 0..count {
        let start = Point::new(first + i * spacing, top.y);
        Line::new(start, start + Point::new(-s / 16, s / 6))
            .into_styled(stroke(color, 2))
            .draw(target)?;
    }
    Ok(())
}

fn pellets<D>(target: &mut D, top: Point, s: i32, count: i32, color: Rgb565, solid: bool) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let spacing = s / 6;
    let first = top.x - spacing * (count - 1) / 2;
    let style = if solid { fill(color) } else { stroke(color, 2) };
    for i in 0..count {
        let offset = if i % 2 == 0 { s / 12 } else { 0 };
        Circle::with_center(Point::new(first + i * spacing, top.y + offset), (s / 12).max(3) as u32)
            .into_styled(style)
            .draw(target)?;
    }
    Ok(())
}

fn bolt<D>(target: &mut D, top: Point, s: i32) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let points = [
        top + Point::new(s / 12, -s / 12),
        top + Point::new(-s / 12, s / 10),
        top + Point::new(s / 16, s / 10),
        top + Point::new(-s / 16, s / 4),
    ];
    Polyline::new(&points)
        .into_styled(stroke(ICON_YELLOW, 3))
        .draw(target)
}

fn text<D>(
    target: &mut D,
    content: &str,
    at: Point,
    font: &MonoFont,
    color: Rgb565,
    alignment: Alignment,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let character_style = MonoTextStyle::new(font, color);
    let text_style = TextStyleBuilder::new()
        .alignment(alignment)
        .baseline(Baseline::Middle)
        .build();
    Text::with_text_style(content, at, character_style, text_style).draw(target)?;
    Ok(())
}

fn fill(color: Rgb565) -> PrimitiveStyle<Rgb565> {
    PrimitiveStyle::with_fill(color)
}

fn stroke(color: Rgb565, width: u32) -> PrimitiveStyle<Rgb565> {
    PrimitiveStyle::with_stroke(color, width)
}
