// Column header helpers

use std::collections::HashMap;

/// Canonical header form used for role detection and column lookup.
pub fn normalize_header(header: &str) -> String {
    header.trim().to_lowercase()
}

/// Sanitize raw headers the way spreadsheet readers commonly do:
/// blank headers become `unnamed: <idx>`, exact duplicates get `.1`, `.2`, ...
///
/// Only exact duplicates are renamed. Headers that differ by case or padding
/// are kept as-is and surface later as a normalization clash.
pub fn sanitize_headers<S: AsRef<str>>(raw: &[S]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut out = Vec::with_capacity(raw.len());

    for (idx, header) in raw.iter().enumerate() {
        let header = header.as_ref();
        let base = if header.trim().is_empty() {
            format!("unnamed: {idx}")
        } else {
            header.to_string()
        };

        let mut name = base.clone();
        if let Some(count) = seen.get_mut(&base) {
            loop {
                name = format!("{base}.{count}");
                *count += 1;
                if !raw.iter().any(|h| h.as_ref() == name) {
                    break;
                }
            }
        } else {
            seen.insert(base.clone(), 1);
        }
        out.push(name);
    }

    out
}
