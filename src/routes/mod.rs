pub mod admin;

pub mod auth;

pub mod competitions;

pub mod homework;

pub mod posters;

pub mod profile;

pub mod realtime;

pub mod storage;

pub mod system;

pub mod tutorials;

pub use admin::configure_admin_routes;
pub use auth::configure_auth_routes;
pub use competitions::configure_competition_routes;
pub use homework::configure_homework_routes;
pub use posters::configure_poster_routes;
pub use profile::configure_profile_routes;
pub use realtime::configure_realtime_routes;
pub use storage::configure_storage_routes;
pub use system::configure_system_routes;
pub use tutorials::configure_tutorial_routes;
