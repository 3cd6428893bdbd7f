// Client accounts: CRUD over the `accounts` table.
// Deleting an account cascades to every SOW generated for it.

pub mod handlers;
pub mod store;
