//! Fixed screen geometry for the 800x480 landscape panel.

use crate::config::{LEFT_PANEL_W, RIGHT_PANEL_W, SCREEN_HEIGHT, SCREEN_WIDTH, STATUS_BAR_H};
use crate::models::FORECAST_DAYS;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{ContainsPoint, Rectangle};

pub const SCREEN_W: i32 = SCREEN_WIDTH as i32;
pub const SCREEN_H: i32 = SCREEN_HEIGHT as i32;
pub const BAR_H: i32 = STATUS_BAR_H as i32;
pub const LEFT_W: i32 = LEFT_PANEL_W as i32;
pub const RIGHT_W: i32 = RIGHT_PANEL_W as i32;

pub const CARD_RADIUS: u32 = 8;
const LEFT_PAD: i32 = 6;
const LEFT_GAP: i32 = 4;
const RIGHT_PAD: i32 = 8;

pub const FORECAST_CARD_W: i32 = 160;
const FORECAST_TOP: i32 = 262;
const CURRENT_CARD_H: i32 = 180;

pub const UNIT_BUTTON: Rectangle = Rectangle::new(Point::new(560, 4), Size::new(44, 28));
pub const THEME_BUTTON: Rectangle = Rectangle::new(Point::new(612, 4), Size::new(40, 28));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Unit,
    Theme,
}

/// Which status-bar button, if any, a tap at `point` lands on.
pub fn hit_test(point: Point) -> Option<Button> {
    if UNIT_BUTTON.contains(point) {
        Some(Button::Unit)
    } else if THEME_BUTTON.contains(point) {
        Some(Button::Theme)
    } else {
        None
    }
}

/// GT911 reports both axes mirrored relative to the panel.
pub fn touch_to_screen(raw_x: u16, raw_y: u16) -> Point {
    let mirror = |raw: u16, extent: i32| {
        let raw = (raw as i32).clamp(0, extent);
        (extent - raw) * (extent - 1) / extent
    };
    Point::new(mirror(raw_x, SCREEN_W), mirror(raw_y, SCREEN_H))
}

pub fn status_bar() -> Rectangle {
    Rectangle::new(Point::zero(), Size::new(SCREEN_WIDTH, STATUS_BAR_H))
}

pub fn left_panel() -> Rectangle {
    Rectangle::new(
        Point::new(0, BAR_H),
        Size::new(LEFT_PANEL_W, SCREEN_HEIGHT - STATUS_BAR_H),
    )
}

pub fn right_panel() -> Rectangle {
    Rectangle::new(
        Point::new(LEFT_W, BAR_H),
        Size::new(RIGHT_PANEL_W, SCREEN_HEIGHT - STATUS_BAR_H),
    )
}

/// Indoor, outdoor and sauna cards stacked top to bottom in the left panel.
pub fn temperature_card(index: usize) -> Rectangle {
    let content_h = SCREEN_H - BAR_H - 2 * LEFT_PAD;
    let card_h = (content_h - 2 * LEFT_GAP) / 3;
    let y = BAR_H + LEFT_PAD + index as i32 * (card_h + LEFT_GAP);

    Rectangle::new(
        Point::new(LEFT_PAD, y),
        Size::new((LEFT_W - 2 * LEFT_PAD) as u32, card_h as u32),
    )
}

/// Vertical gauge track inside a temperature card.
pub fn gauge_track(card: &Rectangle) -> Rectangle {
    Rectangle::new(
        card.top_left + Point::new(22, 34),
        Size::new(20, card.size.height.saturating_sub(48)),
    )
}

pub fn current_card() -> Rectangle {
    Rectangle::new(
        Point::new(LEFT_W + RIGHT_PAD, BAR_H + RIGHT_PAD),
        Size::new((RIGHT_W - 2 * RIGHT_PAD) as u32, CURRENT_CARD_H as u32),
    )
}

pub fn forecast_title_origin() -> Point {
    Point::new(LEFT_W + RIGHT_PAD + 4, FORECAST_TOP - 10)
}

/// Forecast cards spread evenly across the right panel.
pub fn forecast_card(index: usize) -> Rectangle {
    let inner_w = RIGHT_W - 2 * RIGHT_PAD;
    let n = FORECAST_DAYS as i32;
    let gap = (inner_w - n * FORECAST_CARD_W) / (n + 1);
    let x = LEFT_W + RIGHT_PAD + gap + index as i32 * (FORECAST_CARD_W + gap);

    Rectangle::new(
        Point::new(x, FORECAST_TOP),
        Size::new(FORECAST_CARD_W as u32, (SCREEN_H - RIGHT_PAD - FORECAST_TOP) as u32),
    )
}
