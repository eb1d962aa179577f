// sqlx::migrate! embeds migrations/ at compile time; a new .sql file alone
// would not otherwise invalidate the build.
fn main() {
    println!("cargo:rerun-if-changed=migrations");
}
