use serde::Serialize;

use crate::color::HexColor;
use crate::document::Path;

pub const MARKER_ICON: &str = include_str!("../assets/icon.svg");

pub const ACTIONS_LABEL: &str = "Marker Color";
const ACTIONS_PADDING: &str = "8px";
const SWATCH_SIZE: &str = "25px";

/// The control a tool contributes to the inline toolbar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolbarButton {
    button_type: &'static str,
    classes: Vec<String>,
    inner_html: String,
}

impl ToolbarButton {
    pub fn new(base_class: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            button_type: "button",
            classes: vec![base_class.into()],
            inner_html: icon.into(),
        }
    }

    pub fn button_type(&self) -> &str {
        self.button_type
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Adds `class` when `on`, removes it otherwise.
    pub fn toggle_class(&mut self, class: &str, on: bool) {
        let present = self.has_class(class);
        if on && !present {
            self.classes.push(class.to_string());
        } else if !on && present {
            self.classes.retain(|c| c != class);
        }
    }

    pub fn inner_html(&self) -> &str {
        &self.inner_html
    }

    pub fn to_html(&self) -> String {
        format!(
            "<button type=\"{}\" class=\"{}\">{}</button>",
            self.button_type,
            self.classes.join(" "),
            self.inner_html.trim_end()
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Swatch {
    color: HexColor,
    width: &'static str,
    height: &'static str,
}

impl Swatch {
    fn new(color: HexColor) -> Self {
        Self {
            color,
            width: SWATCH_SIZE,
            height: SWATCH_SIZE,
        }
    }

    pub fn color(&self) -> HexColor {
        self.color
    }

    pub fn size(&self) -> (&str, &str) {
        (self.width, self.height)
    }

    pub fn style_attr(&self) -> String {
        format!(
            "background-color: {}; width: {}; height: {}",
            self.color, self.width, self.height
        )
    }
}

/// Popup with one swatch per preset color. Built once; shown while the
/// selection sits inside a highlight, bound to that highlight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionPanel {
    padding: &'static str,
    label: Option<String>,
    hidden: bool,
    swatches: Vec<Swatch>,
    #[serde(skip)]
    target: Option<Path>,
}

impl ActionPanel {
    pub fn new(colors: &[HexColor]) -> Self {
        Self {
            padding: ACTIONS_PADDING,
            label: (!colors.is_empty()).then(|| ACTIONS_LABEL.to_string()),
            hidden: true,
            swatches: colors.iter().copied().map(Swatch::new).collect(),
            target: None,
        }
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn swatches(&self) -> &[Swatch] {
        &self.swatches
    }

    pub fn swatch(&self, index: usize) -> Option<&Swatch> {
        self.swatches.get(index)
    }

    /// Highlight the swatches currently apply to.
    pub fn target(&self) -> Option<&[usize]> {
        self.target.as_deref()
    }

    pub(crate) fn show(&mut self, target: Path) {
        self.target = Some(target);
        self.hidden = false;
    }

    pub(crate) fn hide(&mut self) {
        self.target = None;
        self.hidden = true;
    }

    pub fn to_html(&self) -> String {
        let mut out = format!("<div style=\"padding: {}\"", self.padding);
        if self.hidden {
            out.push_str(" hidden");
        }
        out.push('>');
        if let Some(label) = &self.label {
            out.push_str(&format!("<small>{label}</small>"));
        }
        out.push_str("<div></div>");
        for swatch in &self.swatches {
            out.push_str(&format!("<button style=\"{}\"></button>", swatch.style_attr()));
        }
        out.push_str("</div>");
        out
    }
}
