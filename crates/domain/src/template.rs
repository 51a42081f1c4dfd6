use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateDescriptor {
    pub name: String,
    pub url: String,
}

impl TemplateDescriptor {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// Ordered, immutable list of templates. Position is identity and display order.
///
/// Entries are kept as given; a url that cannot be loaded only fails when that
/// template is selected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    templates: Vec<TemplateDescriptor>,
}

impl Catalog {
    pub fn new(templates: Vec<TemplateDescriptor>) -> Self {
        Self { templates }
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&TemplateDescriptor> {
        self.templates.get(index)
    }

    pub fn as_slice(&self) -> &[TemplateDescriptor] {
        &self.templates
    }

    pub fn iter(&self) -> impl Iterator<Item = &TemplateDescriptor> {
        self.templates.iter()
    }
}
