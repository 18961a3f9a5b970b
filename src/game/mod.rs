pub mod controller;
pub mod countdown;
#[cfg(feature = "glib")]
pub mod glib_scheduler;
pub mod high_score;
pub mod leaderboard;
pub mod manual_scheduler;
pub mod rng;
pub mod round_history;
pub mod scheduler;
pub mod session;
pub mod settings;

pub use controller::{GameController, Phase};
pub use countdown::Countdown;
#[cfg(feature = "glib")]
pub use glib_scheduler::GlibScheduler;
pub use high_score::HighScore;
pub use leaderboard::Leaderboard;
pub use manual_scheduler::ManualScheduler;
pub use rng::{RandomSource, ScriptedSource, SecretSource};
pub use round_history::RoundHistory;
pub use scheduler::{Scheduler, TimerId};
pub use session::{GameSession, TIME_WARNING_THRESHOLD};
pub use settings::{Settings, SettingsError, SETTINGS_PATH_VAR};
