//! Re-exports of the HTTP types the host and its plugins share.

pub use axum::body::Body;
pub use axum::extract::Request;
pub use axum::http::{header, HeaderValue, Method, StatusCode};
pub use axum::middleware::{self, Next};
pub use axum::response::{Html, IntoResponse, Response};
pub use axum::routing::{self, get, MethodRouter};
pub use axum::{serve, Json, Router};
