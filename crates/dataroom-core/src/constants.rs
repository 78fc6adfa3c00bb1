//! Constants shared between the upload service and its clients.

/// Default client- and server-side upload limit.
pub const DEFAULT_MAX_FILE_SIZE_MB: usize = 10;

/// Request body allowance on top of the file limit, for multipart framing.
pub const BODY_LIMIT_SLACK_BYTES: usize = 1024 * 1024;

/// Multipart field carrying the uploaded file.
pub const FILE_FIELD: &str = "file";

/// Bucket for general uploads (decks, documents).
pub const DEFAULT_UPLOAD_BUCKET: &str = "uploads";

/// Bucket for investment logos.
pub const DEFAULT_LOGO_BUCKET: &str = "investment-logos";

/// Route prefix under which stored objects are publicly served.
pub const PUBLIC_OBJECT_PREFIX: &str = "/storage/v1/object/public";

/// Route prefix for raw-body object writes.
pub const OBJECT_PREFIX: &str = "/storage/v1/object";

pub const UPLOAD_FILE_PATH: &str = "/api/upload-file";
pub const LEGACY_UPLOAD_FILE_PATH: &str = "/api/upload-file.php";
pub const EDGE_UPLOAD_FILE_PATH: &str = "/functions/v1/upload-file";
pub const EDGE_UPLOAD_LOGO_PATH: &str = "/functions/v1/upload-investment-logo";
