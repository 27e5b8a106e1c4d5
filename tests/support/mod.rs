//! Shared helpers for the integration tests.

#![allow(dead_code)]

pub mod socket_guard;

use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const USER_ID: &str = "12523001";
pub const PASSWORD: &str = "rahasia";
pub const SESSION_ID: &str = "ABC123";

/// Academic status page as served by the portal, trimmed to the table rows.
pub const STATUS_PAGE: &str = r#"<html><body>
<table>
<tr>
<td valign="top">No mahasiswa</td>
<td valign="top">12523001</td>
</tr>
<tr>
<td valign="top">Nama</td>
<td valign="top">Ahmad Fauzi</td>
</tr>
<tr>
<td valign="top">Habis teori</td>
<td valign="top">2023/2024 Genap</td>
</tr>
<tr>
<td valign="top">KKN</td>
<td valign="top">Lulus</td>
</tr>
<tr>
<td valign="top">Konsentrasi studi</td>
<td valign="top">Rekayasa Perangkat Lunak</td>
</tr>
<tr>
<td valign="top">SKS/IP kumulatif</td>
<td valign="top">144 / 3.50</td>
</tr>
</table>
</body></html>"#;

/// Mounts a login endpoint that accepts `USER_ID`/`PASSWORD` and redirects
/// with `SESSION_ID`.
pub async fn mount_login_success(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/proseslogin.asp"))
        .and(body_string_contains(format!("user_id={USER_ID}")))
        .and(body_string_contains(format!("password={PASSWORD}")))
        .respond_with(ResponseTemplate::new(302).insert_header(
            "Location",
            format!("uii-lia/main.asp?session_id={SESSION_ID}").as_str(),
        ))
        .mount(server)
        .await;
}

/// Mounts the status page, served only with the expected session id.
pub async fn mount_status_page(server: &MockServer, page: &str, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path("/uii-lia/akademik_status.asp"))
        .and(query_param("session_id", SESSION_ID))
        .respond_with(ResponseTemplate::new(200).set_body_string(page))
        .expect(expected_calls)
        .mount(server)
        .await;
}

/// Mounts the photo endpoint, served only with the expected session id.
pub async fn mount_photo(server: &MockServer, bytes: &[u8], expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path("/uii-lia/getfoto.asp"))
        .and(query_param("session_id", SESSION_ID))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", "image/jpeg")
                .set_body_bytes(bytes.to_vec()),
        )
        .expect(expected_calls)
        .mount(server)
        .await;
}
