//! Build script for embedded migrations.
//!
//! `sqlx::migrate!` reads `data/sql/sqlite` at compile time, but cargo does not
//! track that directory on its own. Adding or editing a migration file must
//! trigger a rebuild, otherwise the binary keeps serving the old schema.

fn main() {
    println!("cargo:rerun-if-changed=data/sql/sqlite");
}
