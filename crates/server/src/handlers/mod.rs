// Built-in handlers for the three request families.

mod api;
mod asset;
mod template;

pub use api::*;
pub use asset::*;
pub use template::*;

use std::path::{Component, Path, PathBuf};

/// Joins `relative` onto `root`, refusing anything but plain path segments
/// so requests cannot climb out of `root`.
pub(crate) fn contained_path(root: &Path, relative: &str) -> Option<PathBuf> {
    let relative = Path::new(relative);
    let mut components = relative.components().peekable();
    components.peek()?;

    if components.all(|component| matches!(component, Component::Normal(_))) {
        Some(root.join(relative))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contained_path() {
        let root = Path::new("/srv/public");
        assert_eq!(
            contained_path(root, "css/site.css"),
            Some(PathBuf::from("/srv/public/css/site.css"))
        );
        assert_eq!(contained_path(root, "../secret.txt"), None);
        assert_eq!(contained_path(root, "css/../../secret.txt"), None);
        assert_eq!(contained_path(root, "/etc/passwd"), None);
        assert_eq!(contained_path(root, ""), None);
    }
}
