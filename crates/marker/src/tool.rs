use std::collections::HashMap;

use crate::api::EditorApi;
use crate::document::Range;
use crate::error::MarkerError;
use crate::sanitize::SanitizeConfig;
use crate::widget::{ActionPanel, ToolbarButton};

/// Contract between an inline toolbar and one of its tools.
pub trait InlineTool: Send + Sync {
    fn name(&self) -> &'static str;

    /// Inline tools act on text selections rather than whole blocks.
    fn is_inline(&self) -> bool {
        true
    }

    fn render(&mut self) -> &ToolbarButton;

    fn render_actions(&mut self) -> Option<&ActionPanel> {
        None
    }

    fn surround(
        &mut self,
        api: &mut dyn EditorApi,
        range: Option<&Range>,
    ) -> Result<(), MarkerError>;

    /// Syncs the tool with the current selection; returns whether the tool
    /// is active there.
    fn check_state(&mut self, api: &dyn EditorApi) -> bool;

    fn sanitize(&self) -> SanitizeConfig {
        SanitizeConfig::default()
    }
}

#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Box<dyn InlineTool>>,
    by_name: HashMap<&'static str, usize>,
}

impl ToolRegistry {
    pub fn new(tools: impl IntoIterator<Item = Box<dyn InlineTool>>) -> Result<Self, MarkerError> {
        let mut registry = Self::default();
        for tool in tools {
            registry.register_tool(tool)?;
        }
        Ok(registry)
    }

    pub fn register_tool(&mut self, tool: Box<dyn InlineTool>) -> Result<(), MarkerError> {
        let name = tool.name();
        if self.by_name.contains_key(name) {
            return Err(MarkerError::DuplicateTool(name.to_string()));
        }
        self.by_name.insert(name, self.tools.len());
        self.tools.push(tool);
        Ok(())
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.tools.iter().map(|t| t.name())
    }

    pub fn tool(&self, name: &str) -> Option<&dyn InlineTool> {
        self.by_name.get(name).map(|&ix| self.tools[ix].as_ref())
    }

    pub fn tool_mut(&mut self, name: &str) -> Option<&mut (dyn InlineTool + 'static)> {
        let ix = *self.by_name.get(name)?;
        Some(self.tools[ix].as_mut())
    }

    /// Renders every tool's button, in registration order.
    pub fn render(&mut self) -> Vec<ToolbarButton> {
        self.tools.iter_mut().map(|t| t.render().clone()).collect()
    }

    /// Activation of a toolbar button: hands the current selection to `name`.
    pub fn activate(&mut self, name: &str, api: &mut dyn EditorApi) -> Result<(), MarkerError> {
        let range = api.current_range();
        let tool = self
            .tool_mut(name)
            .ok_or_else(|| MarkerError::UnknownTool(name.to_string()))?;
        tool.surround(api, range.as_ref())
    }

    /// Selection changed: every tool re-checks its state.
    pub fn check_state(&mut self, api: &dyn EditorApi) -> HashMap<&'static str, bool> {
        self.tools
            .iter_mut()
            .map(|t| (t.name(), t.check_state(api)))
            .collect()
    }

    /// Merged allow-list of every registered tool.
    pub fn sanitize_config(&self) -> SanitizeConfig {
        let mut config = SanitizeConfig::new();
        for tool in &self.tools {
            config.merge(tool.sanitize());
        }
        config
    }
}
