//! Plugin system.
//!
//! Plugins are composable units of functionality installed into an
//! [`AppBuilder`] with `.with(plugin)`. A plugin may mount routes, record
//! routes in the [`RouteTable`](crate::routes::RouteTable), defer layers until
//! the router is assembled, or register build hooks.

use crate::builder::AppBuilder;

/// A composable unit of functionality that can be installed into an [`AppBuilder`].
///
/// # Example
///
/// ```ignore
/// use apidoc_core::{AppBuilder, Plugin};
///
/// pub struct Health;
///
/// impl Plugin for Health {
///     fn install<T: Clone + Send + Sync + 'static>(self, app: AppBuilder<T>) -> AppBuilder<T> {
///         app.register_routes(Router::new().route("/health", get(|| async { "OK" })))
///     }
/// }
/// ```
pub trait Plugin: Send + 'static {
    /// Install this plugin into the given `AppBuilder`, returning the modified builder.
    fn install<T: Clone + Send + Sync + 'static>(self, app: AppBuilder<T>) -> AppBuilder<T>;

    /// The name of this plugin (for diagnostics).
    fn name() -> &'static str
    where
        Self: Sized,
    {
        std::any::type_name::<Self>()
    }
}
