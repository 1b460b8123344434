use std::path::{Path, PathBuf};

/// Centralized helpers for the console's on-disk client state.
/// Keeps slot locations consistent between the binary and the tests.
#[inline]
pub fn slots_dir(state_root: &Path) -> PathBuf { state_root.join("slots") }

#[inline]
pub fn slot_file(state_root: &Path, slot: &str) -> PathBuf { slots_dir(state_root).join(format!("{}.slot", slot)) }

// Written next to the final file and renamed over it.
#[inline]
pub fn slot_temp_file(state_root: &Path, slot: &str) -> PathBuf { slots_dir(state_root).join(format!(".{}.slot.tmp", slot)) }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_paths_live_under_slots_dir() {
        let root = Path::new("/tmp/civic");
        assert_eq!(slot_file(root, "adminToken"), PathBuf::from("/tmp/civic/slots/adminToken.slot"));
        assert_eq!(slot_temp_file(root, "adminInfo").parent(), Some(slots_dir(root).as_path()));
    }
}
