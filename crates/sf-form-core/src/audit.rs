//! Diagnostic audit trail and generated identifiers.
//!
//! Audit events go to `tracing` under the `form_audit` target; the frontend
//! only lets them through when the page-level debug flag is on.

use uuid::Uuid;

/// Escape a user-supplied value before it is logged.
pub fn sanitize(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn audit(message: &str, data: &str) {
    tracing::debug!(target: "form_audit", data = %data, "{message}");
}

pub fn field_changed(id: &str, value: &str) {
    audit(
        "Field changed",
        &format!("id={} value={}", sanitize(id), sanitize(value)),
    );
}

pub fn submission_id() -> String {
    Uuid::new_v4().to_string()
}

/// `PERMIT-<epoch ms in base 36>-<6 random chars>`.
pub fn permit_id(now_ms: u64) -> String {
    let random = Uuid::new_v4().simple().to_string();
    format!("PERMIT-{}-{}", to_base36(now_ms), &random[..6])
}

fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_owned();
    }
    let mut buf = Vec::new();
    while n > 0 {
        buf.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    buf.reverse();
    String::from_utf8(buf).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_escapes_markup() {
        assert_eq!(sanitize(r#"<b>"x" & 'y'</b>"#), "&lt;b&gt;&quot;x&quot; &amp; &#39;y&#39;&lt;/b&gt;");
        assert_eq!(sanitize("Jung Kook"), "Jung Kook");
    }

    #[test]
    fn permit_id_shape() {
        let id = permit_id(1_700_000_000_000);
        let parts: Vec<&str> = id.split('-').collect();
        assert_eq!(parts[0], "PERMIT");
        assert_eq!(parts[1], "loyw3v28");
        assert_eq!(parts[2].len(), 6);
    }

    #[test]
    fn base36_zero() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
    }
}
