pub mod actions;
pub mod domain;
pub mod estimator;
pub mod ports;
pub mod progress;

pub use actions::{ActionError, LoggedAction};
pub use domain::{
    next_badge, Action, ActionCategory, ActionDetails, BadgeTier, DetailFields, EcoUser,
    UserProgress, ValidationError, BADGE_TIERS, MAX_QUANTITY,
};
pub use estimator::estimate_co2e;
pub use ports::{
    CoachService, DatabaseService, PortError, PortResult, RecommendationRequest,
    RecommendationService,
};
pub use progress::{apply_action, ProgressError, ProgressUpdate, MAX_POINTS};
