//! Resource-backed template engine.

use std::sync::Arc;

use serde_json::Value;

use crate::resources::{ResourceError, Resources};
use crate::templating::front_matter::{self, FrontMatter};
use crate::templating::syntax;
use crate::templating::{Layout, Model, TemplateEngine, TemplateError};

/// Deepest chain of partials or layouts followed before giving up.
const MAX_NESTING: usize = 16;

/// Renders `[[ ]]` templates stored as resources.
#[derive(Debug, Clone)]
pub struct BracketTemplates {
    resources: Arc<dyn Resources>,
    includes_dir: String,
    layouts_dir: String,
}

impl BracketTemplates {
    pub fn new(resources: Arc<dyn Resources>) -> Self {
        Self {
            resources,
            includes_dir: "_includes".to_string(),
            layouts_dir: "_layouts".to_string(),
        }
    }

    /// Directory searched for `[[> partial]]` tags.
    pub fn with_includes_dir(mut self, dir: impl Into<String>) -> Self {
        self.includes_dir = dir.into();
        self
    }

    /// Directory searched for front-matter `layout:` names.
    pub fn with_layouts_dir(mut self, dir: impl Into<String>) -> Self {
        self.layouts_dir = dir.into();
        self
    }

    /// Render template source that does not live in the resource tree.
    pub fn render_source(
        &self,
        name: &str,
        source: &str,
        bindings: &Model,
    ) -> Result<String, TemplateError> {
        let parsed = front_matter::parse(source);
        let (body, variables) = self.apply_layouts(name, parsed)?;

        let mut merged = bindings.clone();
        merged.merge_missing(&variables);
        self.expand(name, &body, &merged.to_value(), 0)
    }

    fn read_view(&self, name: &str) -> Result<String, TemplateError> {
        let path = self.resources.resolve_path(name).map_err(|e| match e {
            ResourceError::NotFound(_) => TemplateError::MissingView(name.to_string()),
            other => TemplateError::Resource(other),
        })?;
        tracing::trace!(view = %name, path = %path.display(), "Resolved view");
        Ok(self.resources.read_text(&path)?)
    }

    /// Wrap the body into its layout chain, collecting header variables.
    /// Inner headers take precedence over the layouts they sit in.
    fn apply_layouts(
        &self,
        view: &str,
        parsed: FrontMatter,
    ) -> Result<(String, Model), TemplateError> {
        let mut variables = parsed.variables.clone();
        let mut body = parsed.body.clone();
        let mut next_layout = parsed.layout().map(str::to_string);
        let mut depth = 0;

        while let Some(layout_name) = next_layout.take() {
            depth += 1;
            if depth > MAX_NESTING {
                return Err(TemplateError::Syntax {
                    view: view.to_string(),
                    message: format!("layouts nested deeper than {}", MAX_NESTING),
                });
            }

            let source = self.read_view(&format!("{}/{}", self.layouts_dir, layout_name))?;
            let layout = front_matter::parse(&source);
            body = Layout::new(layout.body.clone()).apply(&body);
            next_layout = layout.layout().map(str::to_string);

            variables.merge_missing(&layout.variables);
        }

        Ok((body, variables))
    }

    fn expand(
        &self,
        view: &str,
        source: &str,
        data: &Value,
        depth: usize,
    ) -> Result<String, TemplateError> {
        if depth > MAX_NESTING {
            return Err(TemplateError::Syntax {
                view: view.to_string(),
                message: format!("partials nested deeper than {}", MAX_NESTING),
            });
        }

        let nodes = syntax::parse(source).map_err(|message| TemplateError::Syntax {
            view: view.to_string(),
            message,
        })?;

        let mut out = String::with_capacity(source.len());
        let mut contexts = vec![data];
        syntax::render(
            &nodes,
            &mut contexts,
            &mut out,
            &mut |partial: &str, stack: &[&Value]| self.expand_partial(partial, stack, depth),
        )?;
        Ok(out)
    }

    fn expand_partial(
        &self,
        partial: &str,
        stack: &[&Value],
        depth: usize,
    ) -> Result<String, TemplateError> {
        let name = format!("{}/{}", self.includes_dir, partial);
        let source = front_matter::parse(&self.read_view(&name)?).body;

        // Partials see the full scope of the tag that included them.
        let mut scope = serde_json::Map::new();
        for context in stack {
            if let Value::Object(map) = context {
                for (key, value) in map {
                    scope.insert(key.clone(), value.clone());
                }
            }
        }
        self.expand(&name, &source, &Value::Object(scope), depth + 1)
    }
}

impl TemplateEngine for BracketTemplates {
    fn render(&self, view: &str, bindings: &Model) -> Result<String, TemplateError> {
        let source = self.read_view(view)?;
        self.render_source(view, &source, bindings)
    }
}
