use crate::ViewerState;

pub const LOADING_LABEL: &str = "loading...";
pub const LOADING_HEADLINE: &str = "Loading templates…";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogStatus {
    Pending,
    Unavailable(String),
    NoTemplates,
    Ready,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliderView {
    pub min: usize,
    pub max: usize,
    pub value: usize,
    pub enabled: bool,
}

/// Everything the template controls need to draw, derived from [`ViewerState`].
///
/// Pending, failed and empty catalogs all read `loading...` in the index label;
/// `status` keeps them apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlPanel {
    pub index_label: String,
    pub headline: String,
    pub slider: SliderView,
    pub prev_enabled: bool,
    pub next_enabled: bool,
    pub status: CatalogStatus,
}

impl ControlPanel {
    pub fn from_state(state: &ViewerState) -> Self {
        let status = match state {
            ViewerState::Uninitialized | ViewerState::Loading => CatalogStatus::Pending,
            ViewerState::Empty => CatalogStatus::NoTemplates,
            ViewerState::Failed(reason) => CatalogStatus::Unavailable(reason.clone()),
            ViewerState::Ready(_) => CatalogStatus::Ready,
        };

        let Some(selection) = state.selection() else {
            return Self {
                index_label: LOADING_LABEL.to_string(),
                headline: LOADING_HEADLINE.to_string(),
                slider: SliderView {
                    min: 0,
                    max: 0,
                    value: 0,
                    enabled: false,
                },
                prev_enabled: false,
                next_enabled: false,
                status,
            };
        };

        let len = selection.catalog().len();
        Self {
            index_label: format!("{}/{}", selection.cursor() + 1, len),
            headline: selection.current().name.clone(),
            slider: SliderView {
                min: 0,
                max: selection.last_index(),
                value: selection.cursor(),
                enabled: true,
            },
            prev_enabled: !selection.is_first(),
            next_enabled: !selection.is_last(),
            status,
        }
    }
}
