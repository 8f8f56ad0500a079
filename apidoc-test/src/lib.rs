//! In-process HTTP testing for apidoc applications.

mod app;

pub use app::{resolve_path, tokenize_path, PathToken, TestApp, TestRequest, TestResponse};
