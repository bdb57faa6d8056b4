pub mod account_service;
pub mod aggregate_service;
pub mod course_service;
pub mod geocoder;
pub mod listing_service;
pub mod mailer;
pub mod review_service;
pub mod validation;

pub use account_service::{AccountInput, AccountService};
pub use aggregate_service::{AggregateCommand, AggregateService};
pub use course_service::{CourseInput, CourseService};
pub use geocoder::{GeocodeError, Geocoder};
pub use listing_service::{ListingInput, ListingService};
pub use mailer::{EmailMessage, MailError, Mailer};
pub use review_service::{ReviewInput, ReviewService};
