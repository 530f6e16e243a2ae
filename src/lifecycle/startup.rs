//! Startup orchestration.
//!
//! # Responsibilities
//! - Build every collaborator from a validated configuration
//! - Append the static files route after the application's own routes
//!
//! # Design Decisions
//! - Fail fast: validation already ran, so building cannot fail
//! - Subsystems initialize in order, not concurrently

use std::sync::Arc;

use crate::compilers::{CompilerRegistry, ExternalCompiler};
use crate::config::AppConfig;
use crate::http::WebApp;
use crate::payload::BodyResolver;
use crate::resources::{DiskResources, Resources};
use crate::routing::RouteCollection;
use crate::templating::{BracketTemplates, TemplateEngine};
use crate::types::{ContentKind, ContentTypes};

/// Content type table: defaults plus configured entries.
pub fn content_types(config: &AppConfig) -> ContentTypes {
    config
        .content_types
        .iter()
        .fold(ContentTypes::default(), |table, entry| {
            table.with_type(
                &entry.extension,
                ContentKind {
                    mime: entry.mime.clone(),
                    binary: entry.binary,
                    templating: entry.templating,
                },
            )
        })
}

/// Compiler registry with one external compiler per configured extension.
pub fn compilers(config: &AppConfig) -> CompilerRegistry {
    let mut registry = CompilerRegistry::new();
    for entry in &config.compilers {
        match ExternalCompiler::from_command(&entry.command) {
            Some(compiler) => {
                tracing::info!(extension = %entry.extension, program = %entry.command[0], "Registered compiler");
                registry = registry.with_compiler(&entry.extension, compiler);
            }
            None => tracing::warn!(extension = %entry.extension, "Compiler without command skipped"),
        }
    }
    registry
}

/// Build the application over a resource tree, serving `routes` first.
pub fn build_app_with_resources(
    config: &AppConfig,
    resources: Arc<dyn Resources>,
    routes: RouteCollection,
) -> WebApp {
    let templates: Arc<dyn TemplateEngine> = Arc::new(
        BracketTemplates::new(resources.clone())
            .with_includes_dir(config.templating.includes_dir.clone())
            .with_layouts_dir(config.templating.layouts_dir.clone()),
    );

    let resolver = BodyResolver::new(
        Arc::new(content_types(config)),
        Arc::new(compilers(config)),
        resources.clone(),
        templates,
    );

    let routes = routes.static_files(resources);
    tracing::info!(routes = routes.len(), "Application built");
    WebApp::new(routes, resolver)
}

/// Build the application over the configured root directory.
pub fn build_app(config: &AppConfig, routes: RouteCollection) -> WebApp {
    tracing::info!(root = %config.resources.root, "Serving resources");
    let resources: Arc<dyn Resources> = Arc::new(DiskResources::new(&config.resources.root));
    build_app_with_resources(config, resources, routes)
}
