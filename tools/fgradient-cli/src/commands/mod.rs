pub mod copy;
pub mod export;
pub mod prefs;
pub mod preview;
pub mod scene;
