//! Centralized icon definitions.
//!
//! Icon theme is configured in `config.rs` via `ICON_THEME`.
//! This module maps semantic icon names to the selected theme's icons.

use icondata::Icon;

use crate::config::IconTheme;

// =============================================================================
// Theme Imports
// =============================================================================

mod lucide {
    pub use icondata::{
        LuBook as Book, LuBookOpen as Read, LuChevronLeft as ChevronLeft,
        LuChevronRight as ChevronRight, LuDownload as Download, LuHeart as Heart,
        LuHeart as HeartFill, LuRotateCcw as Reset, LuSearch as Search, LuX as Close,
    };
}

mod bootstrap {
    pub use icondata::{
        BsArrowCounterclockwise as Reset, BsBook as Book, BsBookHalf as Read,
        BsChevronLeft as ChevronLeft, BsChevronRight as ChevronRight, BsDownload as Download,
        BsHeart as Heart, BsHeartFill as HeartFill, BsSearch as Search, BsXLg as Close,
    };
}

// =============================================================================
// Icon Constants (selected based on theme)
// =============================================================================

macro_rules! themed_icon {
    ($name:ident, $theme_name:ident) => {
        pub const $name: Icon = match crate::config::ICON_THEME {
            IconTheme::Lucide => lucide::$theme_name,
            IconTheme::Bootstrap => bootstrap::$theme_name,
        };
    };
}

themed_icon!(BOOK, Book);
themed_icon!(READ, Read);
themed_icon!(CHEVRON_LEFT, ChevronLeft);
themed_icon!(CHEVRON_RIGHT, ChevronRight);
themed_icon!(DOWNLOAD, Download);
themed_icon!(HEART, Heart);
themed_icon!(HEART_FILL, HeartFill);
themed_icon!(RESET, Reset);
themed_icon!(SEARCH, Search);
themed_icon!(CLOSE, Close);
