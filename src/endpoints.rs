//! Portal origin and endpoint paths.

/// Portal origin; every endpoint path is relative to it.
pub const BASE_URL: &str = "https://unisys.uii.ac.id/";

/// Login form target. Answers with a redirect carrying the session id.
pub const LOGIN_PATH: &str = "proseslogin.asp";

/// Academic status page holding the student record table.
pub const ACADEMIC_STATUS_PATH: &str = "uii-lia/akademik_status.asp";

/// Student photo (raw image bytes).
pub const PHOTO_PATH: &str = "uii-lia/getfoto.asp";

/// Login form field for the user id (student number).
pub const USER_ID_FIELD: &str = "user_id";

/// Login form field for the password.
pub const PASSWORD_FIELD: &str = "password";
