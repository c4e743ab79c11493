//! Core SqlHaus functionality
//!
//! This module contains the statement catalog: a registry of named
//! statements that can be filled programmatically or from configuration and
//! built with the configured placeholder style.

use std::collections::HashMap;

use config::{AppConfig, PlaceholderStyle, RenderConfig};
use query_object::{Placeholder, QueryParams, SqlGenerator, StatementBuilder};
use serde_json::{Map, Value};

use crate::errors::SqlHausError;

/// Registry of named statements
#[derive(Debug, Default)]
pub struct SqlHaus {
    placeholder: Placeholder,
    statements: HashMap<String, StatementBuilder>,
}

impl SqlHaus {
    /// Create an empty catalog that renders values as quoted literals
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty catalog with the given placeholder style
    pub fn with_placeholder(placeholder: Placeholder) -> Self {
        Self {
            placeholder,
            statements: HashMap::new(),
        }
    }

    /// Load configuration (see [`AppConfig::load`]) and build the catalog from it
    pub fn load() -> Result<Self, SqlHausError> {
        let config = AppConfig::load()?;
        Self::from_config(&config)
    }

    /// Build a catalog from configuration, registering every declared statement
    pub fn from_config(config: &AppConfig) -> Result<Self, SqlHausError> {
        config.validate()?;

        let mut haus = Self::with_placeholder(placeholder_for(&config.render));

        for (name, table) in &config.statements {
            let params = QueryParams::from_json(&serde_json::to_value(table)?)?;
            haus.register_statement(name.clone(), StatementBuilder::new().set_params(params))?;
        }

        debug_log!(
            "Loaded {} statements from configuration",
            haus.statements.len()
        );
        Ok(haus)
    }

    pub fn placeholder(&self) -> &Placeholder {
        &self.placeholder
    }

    /// Register a statement with a given name
    pub fn register_statement(
        &mut self,
        name: impl Into<String>,
        statement: StatementBuilder,
    ) -> Result<(), SqlHausError> {
        let name = name.into();
        if self.statements.contains_key(&name) {
            return Err(SqlHausError::StatementAlreadyRegistered(name));
        }

        trace_log!("Registering statement '{}'", name);
        self.statements.insert(name, statement);
        Ok(())
    }

    /// Get a registered statement by name
    pub fn statement(&self, name: &str) -> Result<&StatementBuilder, SqlHausError> {
        self.statements
            .get(name)
            .ok_or_else(|| SqlHausError::StatementNotFound(name.to_string()))
    }

    /// Get a mutable reference to a registered statement by name
    pub fn statement_mut(&mut self, name: &str) -> Result<&mut StatementBuilder, SqlHausError> {
        self.statements
            .get_mut(name)
            .ok_or_else(|| SqlHausError::StatementNotFound(name.to_string()))
    }

    /// Run a fluent chain against a registered statement in place
    pub fn modify_statement<F>(&mut self, name: &str, modify: F) -> Result<(), SqlHausError>
    where
        F: FnOnce(StatementBuilder) -> StatementBuilder,
    {
        let statement = self.statement_mut(name)?;
        *statement = modify(std::mem::take(statement));
        Ok(())
    }

    /// Remove a statement by name, returning it
    pub fn remove_statement(&mut self, name: &str) -> Result<StatementBuilder, SqlHausError> {
        self.statements
            .remove(name)
            .ok_or_else(|| SqlHausError::StatementNotFound(name.to_string()))
    }

    /// List all registered statement names, sorted
    pub fn statement_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.statements.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Build a registered statement with the catalog's placeholder style
    pub fn build(&self, name: &str) -> Result<String, SqlHausError> {
        Ok(self.statement(name)?.build_prepared(&self.placeholder)?)
    }

    /// Render an INSERT column/value part with the catalog's placeholder style
    pub fn render_insert(&self, data: &Map<String, Value>) -> String {
        SqlGenerator::build_insert(data, &self.placeholder)
    }

    /// Render an UPDATE assignment list with the catalog's placeholder style
    pub fn render_update(&self, data: &Map<String, Value>) -> String {
        SqlGenerator::build_update(data, &self.placeholder)
    }
}

fn placeholder_for(render: &RenderConfig) -> Placeholder {
    match render.placeholder {
        PlaceholderStyle::None => Placeholder::None,
        PlaceholderStyle::Named => Placeholder::Named,
        PlaceholderStyle::Wildcard => Placeholder::Wildcard(render.wildcard.clone()),
    }
}
