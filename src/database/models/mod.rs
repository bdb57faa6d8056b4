pub mod account;
pub mod course;
pub mod listing;
pub mod review;

pub use account::{Account, Role};
pub use course::Course;
pub use listing::{GeoColumns, Listing, Location};
pub use review::Review;
