//! External API integrations

pub mod archive;
pub mod station;
pub mod telegram;

pub use archive::ArchiveClient;
pub use station::StationClient;
pub use telegram::TelegramNotifier;
