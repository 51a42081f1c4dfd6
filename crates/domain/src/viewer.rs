use crate::{Catalog, DomainError, Selection, TemplateDescriptor};

/// Catalog lifecycle plus the selection cursor once templates are available.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ViewerState {
    #[default]
    Uninitialized,
    Loading,
    Empty,
    Failed(String),
    Ready(Selection),
}

impl ViewerState {
    /// `Uninitialized -> Loading`. Any later call is refused so the catalog is fetched once.
    pub fn begin_loading(&mut self) -> Result<(), DomainError> {
        if !matches!(self, Self::Uninitialized) {
            return Err(DomainError::CatalogAlreadyRequested);
        }
        *self = Self::Loading;
        Ok(())
    }

    /// Applies the catalog fetch outcome. Returns `false` when not loading.
    pub fn finish_loading(&mut self, outcome: Result<Catalog, String>) -> bool {
        if !matches!(self, Self::Loading) {
            return false;
        }
        *self = match outcome {
            Ok(catalog) => match Selection::new(catalog) {
                Some(selection) => Self::Ready(selection),
                None => Self::Empty,
            },
            Err(reason) => Self::Failed(reason),
        };
        true
    }

    pub fn selection(&self) -> Option<&Selection> {
        match self {
            Self::Ready(selection) => Some(selection),
            _ => None,
        }
    }

    pub fn cursor(&self) -> Option<usize> {
        self.selection().map(Selection::cursor)
    }

    pub fn current(&self) -> Option<&TemplateDescriptor> {
        self.selection().map(Selection::current)
    }

    pub fn set_index(&mut self, index: i64) -> bool {
        match self {
            Self::Ready(selection) => selection.set_index(index),
            _ => false,
        }
    }

    pub fn next(&mut self) -> bool {
        match self {
            Self::Ready(selection) => selection.next(),
            _ => false,
        }
    }

    pub fn prev(&mut self) -> bool {
        match self {
            Self::Ready(selection) => selection.prev(),
            _ => false,
        }
    }
}

/// What the viewport is showing right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewportStatus {
    Idle,
    Loading { name: String },
    Showing { name: String },
    Failed { name: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_templates() -> Catalog {
        Catalog::new(vec![
            TemplateDescriptor::new("Tote", "/m/a.glb"),
            TemplateDescriptor::new("Duffel", "/m/b.glb"),
        ])
    }

    #[test]
    fn non_empty_load_becomes_ready_at_zero() {
        let mut state = ViewerState::default();
        state.begin_loading().expect("first request");
        assert!(state.finish_loading(Ok(two_templates())));
        assert_eq!(state.cursor(), Some(0));
        assert_eq!(state.current().map(|t| t.name.as_str()), Some("Tote"));
    }

    #[test]
    fn empty_load_and_failure_are_distinct() {
        let mut empty = ViewerState::default();
        empty.begin_loading().expect("request");
        empty.finish_loading(Ok(Catalog::default()));
        assert_eq!(empty, ViewerState::Empty);

        let mut failed = ViewerState::default();
        failed.begin_loading().expect("request");
        failed.finish_loading(Err("connection refused".to_string()));
        assert_eq!(failed, ViewerState::Failed("connection refused".to_string()));
        assert_eq!(failed.cursor(), None);
    }

    #[test]
    fn catalog_is_requested_only_once() {
        let mut state = ViewerState::default();
        state.begin_loading().expect("first request");
        assert_eq!(
            state.begin_loading(),
            Err(DomainError::CatalogAlreadyRequested)
        );
        state.finish_loading(Err("offline".to_string()));
        assert!(state.begin_loading().is_err());
    }

    #[test]
    fn outcome_is_ignored_outside_loading() {
        let mut state = ViewerState::default();
        assert!(!state.finish_loading(Ok(two_templates())));
        assert_eq!(state, ViewerState::Uninitialized);
    }

    #[test]
    fn cursor_operations_are_noops_without_templates() {
        let mut state = ViewerState::Empty;
        assert!(!state.next());
        assert!(!state.prev());
        assert!(!state.set_index(3));
        assert_eq!(state, ViewerState::Empty);
    }
}
