//! Loaded models kept by name, with one of them selected for display
use crate::transform::RenderObject;

/// Cache of render objects keyed by name
///
/// Each entry keeps its own pose, so switching away from a model and back
/// restores it as it was left. Names are kept in insertion order.
#[derive(Debug, Clone, Default)]
pub struct ModelLibrary {
    entries: Vec<(String, RenderObject)>,
    selected: Option<usize>,
}

impl ModelLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `object` under `name` and selects it. An entry with the same
    /// name is replaced in place.
    pub fn insert(&mut self, name: impl Into<String>, object: RenderObject) -> &mut RenderObject {
        let name = name.into();
        let index = match self.position(&name) {
            Some(index) => {
                self.entries[index].1 = object;
                index
            }
            None => {
                self.entries.push((name, object));
                self.entries.len() - 1
            }
        };

        log::debug!("model '{}' cached ({} total)", self.entries[index].0, self.entries.len());
        self.selected = Some(index);
        &mut self.entries[index].1
    }

    /// Selects the cached model called `name`. An unknown name leaves
    /// nothing selected and returns `false`.
    pub fn select(&mut self, name: &str) -> bool {
        self.selected = self.position(name);
        if self.selected.is_none() {
            log::warn!("no cached model named '{name}'");
        }
        self.selected.is_some()
    }

    /// Moves the selection forward, wrapping at the end.
    pub fn select_next(&mut self) -> Option<&RenderObject> {
        if self.entries.is_empty() {
            return None;
        }
        let next = self.selected.map_or(0, |i| (i + 1) % self.entries.len());
        self.selected = Some(next);
        self.selected()
    }

    /// Moves the selection back, wrapping at the start.
    pub fn select_previous(&mut self) -> Option<&RenderObject> {
        let last = self.entries.len().checked_sub(1)?;
        let previous = match self.selected {
            Some(0) | None => last,
            Some(i) => i - 1,
        };
        self.selected = Some(previous);
        self.selected()
    }

    pub fn selected(&self) -> Option<&RenderObject> {
        self.selected.map(|i| &self.entries[i].1)
    }

    pub fn selected_mut(&mut self) -> Option<&mut RenderObject> {
        self.selected.map(|i| &mut self.entries[i].1)
    }

    pub fn selected_name(&self) -> Option<&str> {
        self.selected.map(|i| self.entries[i].0.as_str())
    }

    pub fn get(&self, name: &str) -> Option<&RenderObject> {
        self.position(name).map(|i| &self.entries[i].1)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|(n, _)| n == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Mesh;
    use crate::math::Vector3;
    use std::sync::Arc;

    fn object(description: &str) -> RenderObject {
        RenderObject::new(Arc::new(Mesh::cube(1.0))).with_description(description)
    }

    #[test]
    fn test_insert_selects_and_replaces() {
        let mut library = ModelLibrary::new();
        assert!(library.selected().is_none());

        library.insert("cube.obj", object("small cube"));
        library.insert("teapot.obj", object("teapot"));
        assert_eq!(library.selected_name(), Some("teapot.obj"));

        library.insert("cube.obj", object("replaced"));
        assert_eq!(library.len(), 2);
        assert_eq!(library.selected_name(), Some("cube.obj"));
        assert_eq!(library.selected().map(|o| o.description.as_str()), Some("replaced"));
        assert_eq!(library.names().collect::<Vec<_>>(), vec!["cube.obj", "teapot.obj"]);
    }

    #[test]
    fn test_selection_keeps_each_pose() {
        let mut library = ModelLibrary::new();
        library.insert("a", object("a"));
        library.insert("b", object("b"));

        if let Some(b) = library.selected_mut() {
            b.translation = Vector3::new(0.0, 0.0, -9.0);
        }
        assert!(library.select("a"));
        assert_eq!(library.selected().map(|o| o.translation.z), Some(0.0));
        assert!(library.select("b"));
        assert_eq!(library.selected().map(|o| o.translation.z), Some(-9.0));
    }

    #[test]
    fn test_unknown_name_clears_selection() {
        let mut library = ModelLibrary::new();
        library.insert("a", object("a"));
        assert!(!library.select("missing"));
        assert!(library.selected().is_none());
        assert!(library.get("a").is_some());
    }

    #[test]
    fn test_cycling_wraps() {
        let mut library = ModelLibrary::new();
        assert!(library.select_next().is_none());
        assert!(library.select_previous().is_none());

        for name in ["a", "b", "c"] {
            library.insert(name, object(name));
        }
        assert_eq!(library.select_next().map(|o| o.description.as_str()), Some("a"));
        assert_eq!(library.select_previous().map(|o| o.description.as_str()), Some("c"));
        assert_eq!(library.select_previous().map(|o| o.description.as_str()), Some("b"));
    }
}
