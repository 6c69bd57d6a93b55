/// Photo collaborators around the filter pipeline
///
/// - Picking and decoding a photo from disk (picker.rs)
/// - Writing the processed photo to the user's library (writer.rs)
///
/// Both do their blocking work on tokio's blocking pool and complete
/// exactly once per request.

pub mod picker;
pub mod writer;
