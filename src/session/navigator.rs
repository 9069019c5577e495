/// Page location seam: where the user is and how to send them elsewhere.
pub trait Navigator: Send + Sync {
    /// Path of the current page, e.g. `/login`.
    fn current_path(&self) -> String;

    /// Leaves the current page for `path`. Work still in flight on this page is abandoned.
    fn navigate(&self, path: &str);
}
