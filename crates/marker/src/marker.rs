use tracing::{debug, warn};

use crate::api::{EditorApi, ToolStyles};
use crate::config::MarkerConfig;
use crate::document::{ElementNode, Node, Path, Range};
use crate::error::MarkerError;
use crate::sanitize::{SanitizeConfig, SanitizeRule};
use crate::tool::InlineTool;
use crate::widget::{ActionPanel, MARKER_ICON, ToolbarButton};

/// Inline tool that wraps the selection in `<mark class="cdx-marker">` and,
/// when preset colors are configured, lets the user recolor the highlight.
pub struct Marker {
    config: MarkerConfig,
    styles: ToolStyles,
    button: Option<ToolbarButton>,
    actions: Option<ActionPanel>,
    state: bool,
}

impl Marker {
    pub const NAME: &'static str = "marker";
    pub const CSS: &'static str = "cdx-marker";
    pub const TAG: &'static str = "MARK";
    pub const ICON: &'static str = MARKER_ICON;

    pub fn new(api: &dyn EditorApi, config: MarkerConfig) -> Self {
        Self {
            config,
            styles: api.styles().clone(),
            button: None,
            actions: None,
            state: false,
        }
    }

    pub fn config(&self) -> &MarkerConfig {
        &self.config
    }

    pub fn button(&self) -> Option<&ToolbarButton> {
        self.button.as_ref()
    }

    pub fn actions(&self) -> Option<&ActionPanel> {
        self.actions.as_ref()
    }

    /// Last state computed by [`Marker::check_state`].
    pub fn is_marked(&self) -> bool {
        self.state
    }

    pub fn render(&mut self) -> &ToolbarButton {
        self.button
            .insert(ToolbarButton::new(&self.styles.inline_tool_button, Self::ICON))
    }

    pub fn render_actions(&mut self) -> &ActionPanel {
        self.actions
            .insert(ActionPanel::new(self.config.default_colors()))
    }

    /// Toggles the highlight around `range`. A missing range is a no-op.
    pub fn surround(
        &mut self,
        api: &mut dyn EditorApi,
        range: Option<&Range>,
    ) -> Result<(), MarkerError> {
        let Some(range) = range else {
            return Ok(());
        };

        match api.find_parent_tag(Self::TAG, Self::CSS) {
            Some(mark) => {
                let restored = Self::unwrap(api, &mark)?;
                debug!(path = ?mark, selection = ?restored, "unwrapped marker");
            }
            None => {
                let mark = Self::wrap(api, range)?;
                debug!(path = ?mark, "wrapped selection in marker");
            }
        }

        self.check_state(api);
        Ok(())
    }

    fn wrap(api: &mut dyn EditorApi, range: &Range) -> Result<Path, MarkerError> {
        let (contents, at) = api.extract_contents(range)?;
        let mark = ElementNode::new(Self::TAG)
            .with_class(Self::CSS)
            .with_children(contents);

        let inserted = api.insert_fragment(&at, vec![Node::Element(mark)])?;
        let mut path = inserted.start.path;
        path.push(inserted.start.offset);

        api.expand_to_tag(&path)?;
        Ok(path)
    }

    fn unwrap(api: &mut dyn EditorApi, mark: &[usize]) -> Result<Range, MarkerError> {
        api.expand_to_tag(mark)?;
        let range = api
            .current_range()
            .ok_or_else(|| MarkerError::InvalidRange("no selection after expanding".into()))?;

        let (contents, _) = api.extract_contents(&range)?;
        let (_, at) = api.remove_node(mark)?;
        let restored = api.insert_fragment(&at, contents)?;

        api.set_selection(restored.clone());
        Ok(restored)
    }

    /// Reflects whether the selection sits inside a highlight. Without a
    /// palette that drives the button's active class; with one it shows or
    /// hides the swatch panel.
    pub fn check_state(&mut self, api: &dyn EditorApi) -> bool {
        let mark = api.find_parent_tag(Self::TAG, Self::CSS);
        self.state = mark.is_some();

        if self.config.has_palette() {
            match mark {
                Some(path) => self.show_actions(path),
                None => self.hide_actions(),
            }
        } else if let Some(button) = self.button.as_mut() {
            button.toggle_class(&self.styles.inline_tool_button_active, self.state);
        }

        self.state
    }

    pub fn show_actions(&mut self, mark: Path) {
        if let Some(actions) = self.actions.as_mut() {
            actions.show(mark);
        }
    }

    pub fn hide_actions(&mut self) {
        if let Some(actions) = self.actions.as_mut() {
            actions.hide();
        }
    }

    /// Applies swatch `index` to the highlight the panel is bound to.
    /// Returns whether anything changed. The binding is a path, so the click
    /// is refused (and the panel hidden) unless that highlight is still the
    /// one enclosing the selection.
    pub fn click_swatch(&mut self, api: &mut dyn EditorApi, index: usize) -> bool {
        let Some(actions) = self.actions.as_ref() else {
            return false;
        };
        if actions.is_hidden() {
            return false;
        }
        let (Some(target), Some(swatch)) = (actions.target(), actions.swatch(index)) else {
            return false;
        };
        let target = target.to_vec();
        let color = swatch.color();

        if api.find_parent_tag(Self::TAG, Self::CSS).as_deref() != Some(target.as_slice()) {
            warn!(path = ?target, "swatch target no longer encloses the selection");
            self.hide_actions();
            return false;
        }

        let Some(mark) = api
            .element_mut(&target)
            .filter(|el| el.is_tag(Self::TAG) && el.has_class(Self::CSS))
        else {
            warn!(path = ?target, "swatch target is no longer a marker");
            self.hide_actions();
            return false;
        };

        mark.set_style("background-color", color.to_string());
        mark.set_style("color", color.contrast_text().as_str());
        debug!(path = ?target, color = %color, "applied marker color");
        true
    }

    pub fn sanitize() -> SanitizeConfig {
        SanitizeConfig::new().allow(
            Self::TAG,
            SanitizeRule {
                class: Some(Self::CSS.to_string()),
                style: true,
            },
        )
    }
}

impl InlineTool for Marker {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn render(&mut self) -> &ToolbarButton {
        Marker::render(self)
    }

    fn render_actions(&mut self) -> Option<&ActionPanel> {
        Some(Marker::render_actions(self))
    }

    fn surround(
        &mut self,
        api: &mut dyn EditorApi,
        range: Option<&Range>,
    ) -> Result<(), MarkerError> {
        Marker::surround(self, api, range)
    }

    fn check_state(&mut self, api: &dyn EditorApi) -> bool {
        Marker::check_state(self, api)
    }

    fn sanitize(&self) -> SanitizeConfig {
        Marker::sanitize()
    }
}
