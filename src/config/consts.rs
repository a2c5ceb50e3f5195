// src/config/consts.rs

// Site
pub const BASE_URL: &str = "https://letterboxd.com";
pub const DEFAULT_USER: &str = "NicoleP";

// Markup selectors
pub const ACTIVITY_ROW_CLASS: &str = "activity-row";
pub const TITLE_CLASS: &str = "name";
pub const RATING_CLASS: &str = "rating";
pub const REVIEW_BODY_CLASS: &str = "js-review-body";
pub const VERB_BADGES: [&str; 2] = ["watched", "rewatched"];

// Rendering
pub const FULL_STAR: char = '★';
pub const HALF_STAR: char = '½';
pub const WATCHED_STUB: &str = "Watched on ";
pub const PREVIEW_CHARS: usize = 100;
pub const DATE_FMT: &str = "%b %d, %Y";
pub const DATE_SHORT_FMT: &str = "%b %d";
pub const UPDATE_TIME_FMT: &str = "%b %d, %Y %I:%M %p";

// Envelope
pub const DEFAULT_LIMIT: usize = 5;

// Files
pub const DEFAULT_SOURCE: &str = "letterboxd.com-ajax-activity-pagination-NicoleP.html";
pub const DEFAULT_OUT_FILE: &str = "letterboxd_trmnl_data.json";
pub const LOG_FILE: &str = ".store/debug.log";
