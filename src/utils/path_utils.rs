const WINDOWS_SEPARATOR: &str = "\\";
const UNIX_SEPARATOR: &str = "/";

/// Joins segments with a Windows separator, starting at the first
/// non-empty one. Segments after it are kept even when empty.
pub fn path_join(elems: &[&str]) -> String {
    match elems.iter().position(|elem| !elem.is_empty()) {
        Some(start) => elems[start..].join(WINDOWS_SEPARATOR),
        None => String::new(),
    }
}

/// [`path_join`] rooted at an application base path.
pub fn app_path_join(base: &str, elems: &[&str]) -> String {
    let mut all = Vec::with_capacity(elems.len() + 1);
    all.push(base);
    all.extend_from_slice(elems);
    path_join(&all)
}

pub fn format_unix_path(path: &str) -> String {
    path.replace(WINDOWS_SEPARATOR, UNIX_SEPARATOR)
}

pub fn format_windows_path(path: &str) -> String {
    path.replace(UNIX_SEPARATOR, WINDOWS_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_join_skips_leading_empty_segments() {
        assert_eq!(path_join(&["", "", "a", "b"]), r"a\b");
        assert_eq!(path_join(&["a", "", "b"]), r"a\\b");
        assert_eq!(path_join(&["", ""]), "");
        assert_eq!(path_join(&[]), "");
    }

    #[test]
    fn app_path_join_uses_base() {
        assert_eq!(app_path_join(r"C:\portapps\app", &["data", "x.ini"]), r"C:\portapps\app\data\x.ini");
        assert_eq!(app_path_join("", &["data"]), "data");
    }

    #[test]
    fn format_paths_swap_separators() {
        assert_eq!(format_unix_path(r"C:\a\b"), "C:/a/b");
        assert_eq!(format_windows_path("C:/a/b"), r"C:\a\b");
        assert_eq!(format_windows_path(&format_unix_path(r"x\y")), r"x\y");
    }
}
