// handlers/courses/mod.rs - Course handlers
//
// Every write issues `RecomputeAverageCost` for the parent listing once the
// course row has been written.

pub mod create; // POST /listings/:listing_id/courses
pub mod delete; // DELETE /courses/:id
pub mod list;   // GET /courses, GET /listings/:listing_id/courses
pub mod show;   // GET /courses/:id
pub mod update; // PUT /courses/:id

pub use create::course_create;
pub use delete::course_delete;
pub use list::{course_list, listing_course_list};
pub use show::course_show;
pub use update::course_update;

pub(crate) fn not_found_message(id: impl std::fmt::Display) -> String {
    format!("No course with the id of {}", id)
}
