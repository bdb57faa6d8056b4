// handlers/reviews/mod.rs - Review handlers
//
// Writers are users or admins. Every write issues `RecomputeAverageRating`
// for the parent listing.

pub mod create; // POST /listings/:listing_id/reviews
pub mod delete; // DELETE /reviews/:id
pub mod list;   // GET /reviews, GET /listings/:listing_id/reviews
pub mod show;   // GET /reviews/:id
pub mod update; // PUT /reviews/:id

pub use create::review_create;
pub use delete::review_delete;
pub use list::{listing_review_list, review_list};
pub use show::review_show;
pub use update::review_update;

pub(crate) fn not_found_message(id: impl std::fmt::Display) -> String {
    format!("No review found with the id of {}", id)
}
