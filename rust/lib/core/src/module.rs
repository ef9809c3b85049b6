use axum::Router;

/// A feature module that contributes HTTP routes to the dashboard.
///
/// The server binary collects every module and merges their routes into
/// a single Router.
pub trait Module: Send + Sync {
    /// Module name, used for logging.
    fn name(&self) -> &str;

    /// Return the module's routes, merged at the server root.
    fn routes(&self) -> Router;
}
