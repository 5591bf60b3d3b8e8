use http::StatusCode;

/// Shape an error must have to travel over the HTTP boundary
///
/// The plan and completion crates each implement this on their own error
/// enum; the server layer renders any `&dyn HttpError` into a JSON error
/// body without those crates ever naming axum.
pub trait HttpError: std::error::Error {
    /// Status code the response should carry
    fn status_code(&self) -> StatusCode;

    /// Stable machine-readable kind, e.g. `generation_conflict`
    fn error_type(&self) -> &str;

    /// Human-readable text suitable for clients, with internals omitted
    fn client_message(&self) -> String;
}
