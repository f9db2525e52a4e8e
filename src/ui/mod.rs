//! UI module - handles all TUI rendering
//!
//! Structure:
//! - `draw.rs` - Main draw functions (review screen, results screen)
//! - `card.rs` - Deck card widget
//! - `theme.rs` - Color themes and presets

pub mod card;
mod draw;
pub mod theme;

pub use draw::draw;

pub use card::DeckCard;
pub use theme::Theme;
