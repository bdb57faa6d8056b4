// handlers/users/mod.rs - Account administration
//
// The whole group sits behind `protect` and `authorize(ADMINS)`. Unlike
// registration, an admin may assign any role here.

pub mod create; // POST /users
pub mod delete; // DELETE /users/:id
pub mod list;   // GET /users
pub mod show;   // GET /users/:id
pub mod update; // PUT /users/:id

pub use create::user_create;
pub use delete::user_delete;
pub use list::user_list;
pub use show::user_show;
pub use update::user_update;

pub(crate) fn not_found_message(id: impl std::fmt::Display) -> String {
    format!("No user with the id of {}", id)
}
