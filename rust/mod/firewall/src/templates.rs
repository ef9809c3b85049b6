//! Template detection for web-filter profiles.
//!
//! A web-filter profile built from a known template always contains that
//! template's signature URL. Detection is display-only classification.

use netblocker_upstream::UrlFilterEntry;

/// Signature URL → template name, in display order.
///
/// Wildcard-looking signatures are matched literally as substrings, the
/// same way the profiles store them.
pub const SIGNATURES: &[(&str, &str)] = &[
    ("classroom.google.com", "Google Classroom"),
    ("onlearn.it.kmitl.ac.th", "On:Learn"),
    ("jlearn.it.kmitl.ac.th", "J:Learn"),
    ("ujudge.it.kmitl.ac.th", "<U>Judge"),
    ("ijudge.it.kmitl.ac.th", "<I>Judge"),
    ("ejudge.it.kmitl.ac.th", "<E>Judge"),
    ("dblearning.it.kmitl.ac.th", "DB:Learn"),
    ("kits.it.kmitl.ac.th", "KITS"),
    ("webdev.it.kmitl.ac.th", "WebDev"),
    ("nolearn.it.kmitl.ac.th", "No:Learn"),
    ("ctf.it.kmitl.ac.th", "SecSpace (CTF)"),
    ("*.chatgpt.*", "Block AI"),
    ("*discord*", "Block Chat"),
];

/// Names of every template in `table` whose signature appears in some
/// entry URL, in table order.
pub fn detect_templates(entries: &[UrlFilterEntry], table: &[(&str, &str)]) -> Vec<String> {
    if entries.is_empty() {
        return Vec::new();
    }
    table
        .iter()
        .filter(|(signature, _)| entries.iter().any(|e| e.url.contains(signature)))
        .map(|(_, name)| name.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(urls: &[&str]) -> Vec<UrlFilterEntry> {
        urls.iter().map(|u| UrlFilterEntry::new(*u)).collect()
    }

    #[test]
    fn detects_google_classroom() {
        let found = detect_templates(&entries(&["classroom.google.com"]), SIGNATURES);
        assert_eq!(found, vec!["Google Classroom"]);
    }

    #[test]
    fn substring_match_counts() {
        let found = detect_templates(&entries(&["https://kits.it.kmitl.ac.th/login"]), SIGNATURES);
        assert_eq!(found, vec!["KITS"]);
    }

    #[test]
    fn no_signature_no_templates() {
        assert!(detect_templates(&entries(&["example.com", "*.facebook.com"]), SIGNATURES).is_empty());
        assert!(detect_templates(&[], SIGNATURES).is_empty());
    }

    #[test]
    fn output_follows_table_order() {
        let found = detect_templates(
            &entries(&["*discord*", "ctf.it.kmitl.ac.th", "onlearn.it.kmitl.ac.th"]),
            SIGNATURES,
        );
        assert_eq!(found, vec!["On:Learn", "SecSpace (CTF)", "Block Chat"]);
    }

    #[test]
    fn wildcards_are_literal() {
        assert!(detect_templates(&entries(&["chat.chatgpt.com"]), SIGNATURES).is_empty());
        assert_eq!(detect_templates(&entries(&["*.chatgpt.*"]), SIGNATURES), vec!["Block AI"]);
    }

    #[test]
    fn each_name_at_most_once() {
        let found = detect_templates(
            &entries(&["kits.it.kmitl.ac.th", "kits.it.kmitl.ac.th/api"]),
            SIGNATURES,
        );
        assert_eq!(found, vec!["KITS"]);
    }

    #[test]
    fn custom_table() {
        let table = [("intranet.local", "Intranet")];
        assert_eq!(detect_templates(&entries(&["intranet.local"]), &table), vec!["Intranet"]);
    }
}
