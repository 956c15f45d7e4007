// Public API
pub use reconciler::{ViewReconciler, ViewTimings, ERROR_DURATION, HIGHLIGHT_DURATION};
pub use state::{
    GameResult, HandResult, PendingTribute, PlayLog, PlayRecord, RoomState, ViewSnapshot,
    ViewState, PLAY_LOG_CAPACITY, STARTING_CARD_COUNT,
};
pub use transient::TransientSlot;

// Internal modules
mod reconciler;
mod state;
mod transient;
