// handlers/listings/mod.rs - Listing handlers
//
// Reads are public. Writes need a publisher or admin, and update, delete and
// photo additionally need the caller to own the listing (or be admin).

use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::Listing;
use crate::database::{DatabaseError, Repository};
use crate::filter::collection::LISTINGS;

pub mod create; // POST /listings
pub mod delete; // DELETE /listings/:id
pub mod list;   // GET /listings
pub mod photo;  // PUT /listings/:id/photo
pub mod radius; // GET /listings/radius/:zipcode/:distance
pub mod show;   // GET /listings/:id
pub mod update; // PUT /listings/:id

pub use create::listing_create;
pub use delete::listing_delete;
pub use list::listing_list;
pub use photo::listing_photo;
pub use radius::listing_radius;
pub use show::listing_show;
pub use update::listing_update;

pub(crate) fn not_found_message(id: impl std::fmt::Display) -> String {
    format!("No listing with the id of {}", id)
}

/// Load a listing for a write path, 404 when absent
pub(crate) async fn load_listing(pool: &PgPool, id: Uuid) -> Result<Listing, DatabaseError> {
    Repository::<Listing>::new(&LISTINGS, pool.clone())
        .select_404(id, not_found_message(id))
        .await
}
