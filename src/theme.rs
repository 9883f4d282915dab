// theme.rs - Shared colours and text sizes so every screen looks the same.

use bevy::prelude::*;

/// Light blue behind every screen.
pub const BACKGROUND: Color = Color::srgb(0.702, 0.898, 0.988); // #B3E5FC
/// Buttons, title plate and the difficulty badge.
pub const ACCENT: Color = Color::srgb(0.118, 0.565, 1.0); // #1E90FF
pub const ACCENT_HOVER: Color = Color::srgb(0.09, 0.45, 0.85);
/// Clock and score text.
pub const INFO_TEXT: Color = Color::srgb(0.098, 0.463, 0.824); // #1976D2
pub const GAME_OVER_TITLE: Color = Color::srgb(0.914, 0.118, 0.388); // #E91E63
pub const FINAL_SCORE: Color = Color::srgb(0.129, 0.588, 0.953); // #2196F3
pub const MENU_RETURN: Color = Color::srgb(0.298, 0.686, 0.314); // #4CAF50
pub const PANEL: Color = Color::WHITE;
pub const SCORE_CARD: Color = Color::srgba(1.0, 1.0, 1.0, 0.9);
pub const DECOY: Color = Color::srgba(0.5, 0.5, 0.5, 0.4);

pub const TITLE_SIZE: f32 = 48.0;
pub const BUTTON_TEXT_SIZE: f32 = 40.0;
pub const BODY_TEXT_SIZE: f32 = 24.0;

/// Plain text with the given size and colour.
pub fn text(value: impl Into<String>, size: f32, color: Color) -> impl Bundle {
    (
        Text::new(value),
        TextFont {
            font_size: size,
            ..default()
        },
        TextColor(color),
    )
}

/// A solid colour button. `marker` is the component the click handler queries for.
pub fn button(marker: impl Component, label: &str, width: f32, height: f32, color: Color) -> impl Bundle {
    (
        Button,
        Node {
            width: Val::Px(width),
            height: Val::Px(height),
            justify_content: JustifyContent::Center,
            align_items: AlignItems::Center,
            ..default()
        },
        BackgroundColor(color),
        marker,
        children![text(label.to_string(), BUTTON_TEXT_SIZE * height / 80.0, Color::WHITE)],
    )
}
