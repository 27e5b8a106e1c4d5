//! User-Agent string sent to the portal.
//!
//! The portal serves its pages to old desktop browsers; requests identify as
//! one so the login redirect and the table markup match what the scraper
//! expects.

/// Legacy browser User-Agent used for every portal request by default.
pub const LEGACY_BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows; U; Windows NT 5.1; rv:1.7.3) Gecko/20041001 Firefox/0.10.1";
