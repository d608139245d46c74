/// How a field is edited in the property form.
#[derive(Debug, Clone, PartialEq)]
pub enum Widget {
    /// Single-line text input.
    Text,
    /// Multi-line text input.
    TextArea,
    /// Multi-line input where each non-empty line becomes a list entry.
    Lines,
    Number,
    Toggle,
    /// One of a fixed set of choices.
    Select(Vec<String>),
}

/// Advisory rules checked by `NodeCatalog::validate`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldRules {
    pub required: bool,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub min_items: Option<usize>,
    pub max_items: Option<usize>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    /// Value must look like a variable name: a letter or `_` followed by letters, digits or `_`.
    pub identifier: bool,
}

/// One editable field of a node kind.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: String,
    pub label: String,
    pub widget: Widget,
    pub rules: FieldRules,
}

impl FieldSpec {
    pub fn new(name: &str, label: &str, widget: Widget) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            widget,
            rules: FieldRules::default(),
        }
    }

    pub fn text(name: &str, label: &str) -> Self {
        Self::new(name, label, Widget::Text)
    }

    pub fn text_area(name: &str, label: &str) -> Self {
        Self::new(name, label, Widget::TextArea)
    }

    pub fn lines(name: &str, label: &str) -> Self {
        Self::new(name, label, Widget::Lines)
    }

    pub fn number(name: &str, label: &str) -> Self {
        Self::new(name, label, Widget::Number)
    }

    pub fn toggle(name: &str, label: &str) -> Self {
        Self::new(name, label, Widget::Toggle)
    }

    pub fn select(name: &str, label: &str, choices: &[&str]) -> Self {
        Self::new(
            name,
            label,
            Widget::Select(choices.iter().map(|c| c.to_string()).collect()),
        )
    }

    pub fn required(mut self) -> Self {
        self.rules.required = true;
        self
    }

    pub fn length(mut self, min: Option<usize>, max: Option<usize>) -> Self {
        self.rules.min_length = min;
        self.rules.max_length = max;
        self
    }

    pub fn items(mut self, min: Option<usize>, max: Option<usize>) -> Self {
        self.rules.min_items = min;
        self.rules.max_items = max;
        self
    }

    pub fn range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.rules.min = min;
        self.rules.max = max;
        self
    }

    pub fn identifier(mut self) -> Self {
        self.rules.identifier = true;
        self
    }
}
