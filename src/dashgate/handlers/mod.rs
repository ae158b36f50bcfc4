pub mod dashboard;
pub use self::dashboard::dashboard;

pub mod index;
pub use self::index::index;
