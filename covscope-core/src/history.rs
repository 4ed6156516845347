//! The host's addressable-location mechanism.
//!
//! [`LocationHost`] is what the controller reads the shareable location from
//! and writes it back to. [`SessionHistory`] is an in-memory host with a
//! browser-like back/forward stack.

/// Read/write access to the current shareable location.
pub trait LocationHost {
    fn current(&self) -> Option<String>;

    /// Overwrites the current entry without creating history.
    fn replace(&mut self, location: &str);

    /// Records a new history entry, discarding any forward entries.
    fn push(&mut self, location: &str);
}

#[derive(Debug, Clone, Default)]
pub struct SessionHistory {
    entries: Vec<String>,
    cursor: usize,
}

impl SessionHistory {
    pub fn new(initial: Option<String>) -> Self {
        Self {
            entries: initial.into_iter().collect(),
            cursor: 0,
        }
    }

    /// Steps back one entry. Returns `false` at the oldest entry.
    pub fn back(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        true
    }

    /// Steps forward one entry. Returns `false` at the newest entry.
    pub fn forward(&mut self) -> bool {
        if self.cursor + 1 >= self.entries.len() {
            return false;
        }
        self.cursor += 1;
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl LocationHost for SessionHistory {
    fn current(&self) -> Option<String> {
        self.entries.get(self.cursor).cloned()
    }

    fn replace(&mut self, location: &str) {
        match self.entries.get_mut(self.cursor) {
            Some(entry) => *entry = location.to_owned(),
            None => {
                self.entries.push(location.to_owned());
                self.cursor = self.entries.len() - 1;
            }
        }
    }

    fn push(&mut self, location: &str) {
        if self.entries.is_empty() {
            self.entries.push(location.to_owned());
            self.cursor = 0;
            return;
        }
        self.entries.truncate(self.cursor + 1);
        self.entries.push(location.to_owned());
        self.cursor = self.entries.len() - 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replace_does_not_grow_history() {
        let mut h = SessionHistory::new(Some("file-0".into()));
        h.replace("file-0:line-3");
        h.replace("file-0:line-4");
        assert_eq!(h.len(), 1);
        assert_eq!(h.current().as_deref(), Some("file-0:line-4"));
    }

    #[test]
    fn back_and_forward_walk_pushed_entries() {
        let mut h = SessionHistory::new(None);
        h.replace("file-0");
        h.push("file-2:line-9");
        h.push("file-1");
        assert!(h.back());
        assert_eq!(h.current().as_deref(), Some("file-2:line-9"));
        assert!(h.back());
        assert!(!h.back());
        assert!(h.forward());
        // A push from the middle drops the forward tail.
        h.push("file-3");
        assert!(!h.forward());
        assert_eq!(h.len(), 3);
    }
}
