use std::{ffi::OsString, fs, sync::{Arc, RwLock}};

use indexmap::{IndexMap, IndexSet};
use serde_json::Value;

use crate::{error::TemplateError, template::{ExecutionResult, ParamInfo, Template, TemplateConfig}};

pub type Registry = Arc<RwLock<InternalRegistry>>;

/// Statement id -> parsed template.
#[derive(Debug, Default)]
pub struct InternalRegistry {
    config: TemplateConfig,
    templates: IndexMap<String, Arc<Template>>,
}

impl InternalRegistry {
    pub fn new_registry() -> Self {
        Self::new_registry_with_config(TemplateConfig::default())
    }

    pub fn new_registry_with_config(config: TemplateConfig) -> Self {
        Self { config, templates: IndexMap::new() }
    }

    pub fn into_protected(self) -> Registry {
        Arc::new(RwLock::new(self))
    }

    pub fn config(&self) -> &TemplateConfig {
        &self.config
    }

    pub fn register(&mut self, id: &str, sql: &str) -> Result<Arc<Template>, TemplateError> {
        let template = Arc::new(Template::parse_with_config(sql, self.config)?);
        self.templates.insert(id.to_string(), Arc::clone(&template));

        tracing::debug!("registered statement '{}'", id);
        Ok(template)
    }

    pub fn get(&self, id: &str) -> Option<Arc<Template>> {
        self.templates.get(id).map(Arc::clone)
    }

    pub fn remove(&mut self, id: &str) -> Option<Arc<Template>> {
        self.templates.shift_remove(id)
    }

    pub fn list_statements(&self) -> Vec<String> {
        self.templates.keys().cloned().collect::<Vec<_>>()
    }

    /// Register every `"id": "sql"` entry of a JSON object. Nothing is
    /// registered unless every statement parses.
    pub fn load_from_json(&mut self, json_value: Value) -> Result<Vec<String>, TemplateError> {
        let Value::Object(entries) = json_value else {
            return Err(TemplateError::Load("JSON root is not an object of statements".to_string()));
        };

        let mut parsed = Vec::with_capacity(entries.len());
        for (id, sql) in entries {
            let Value::String(sql) = sql else {
                return Err(TemplateError::Load(format!("statement '{id}' is not a string")));
            };
            let template = Template::parse_with_config(&sql, self.config)
                .map_err(|err| TemplateError::Load(format!("statement '{id}': {err}")))?;
            parsed.push((id, Arc::new(template)));
        }

        let ids = parsed.iter().map(|(id, _)| id.clone()).collect::<Vec<_>>();
        self.templates.extend(parsed);
        Ok(ids)
    }

    pub fn load_from_file(&mut self, file_path: &OsString) -> Result<String, TemplateError> {
        let file_path_lossy = file_path.to_string_lossy();

        let file_content = fs::read_to_string(file_path)
            .map_err(|err| TemplateError::Load(format!("could not read file {}: {}", file_path_lossy, err)))?;

        let json_value = serde_json::from_str::<Value>(&file_content)
            .map_err(|err| TemplateError::Load(format!("file {} does not contain valid JSON: {}", file_path_lossy, err)))?;

        let ids = self.load_from_json(json_value)?;
        Ok(format!("Loaded {} statements from {}", ids.len(), file_path_lossy))
    }
}

fn poisoned() -> TemplateError {
    tracing::warn!("registry lock poisoned");
    TemplateError::invariant("registry lock poisoned")
}

pub trait RegistryCommon {
    fn new_registry() -> Self;
    fn new_registry_with_config(config: TemplateConfig) -> Self;
    fn register(&self, id: &str, sql: &str) -> Result<Arc<Template>, TemplateError>;
    fn get(&self, id: &str) -> Result<Option<Arc<Template>>, TemplateError>;
    fn remove(&self, id: &str) -> Result<Option<Arc<Template>>, TemplateError>;
    fn list_statements(&self) -> Result<Vec<String>, TemplateError>;
    fn load_from_file(&self, file_path: &OsString) -> Result<String, TemplateError>;
}

impl RegistryCommon for Registry {
    fn new_registry() -> Self {
        InternalRegistry::new_registry().into_protected()
    }

    fn new_registry_with_config(config: TemplateConfig) -> Self {
        InternalRegistry::new_registry_with_config(config).into_protected()
    }

    fn register(&self, id: &str, sql: &str) -> Result<Arc<Template>, TemplateError> {
        self.write().map_err(|_| poisoned())?.register(id, sql)
    }

    fn get(&self, id: &str) -> Result<Option<Arc<Template>>, TemplateError> {
        Ok(self.read().map_err(|_| poisoned())?.get(id))
    }

    fn remove(&self, id: &str) -> Result<Option<Arc<Template>>, TemplateError> {
        Ok(self.write().map_err(|_| poisoned())?.remove(id))
    }

    fn list_statements(&self) -> Result<Vec<String>, TemplateError> {
        Ok(self.read().map_err(|_| poisoned())?.list_statements())
    }

    fn load_from_file(&self, file_path: &OsString) -> Result<String, TemplateError> {
        self.write().map_err(|_| poisoned())?.load_from_file(file_path)
    }
}

pub trait RegistryRunner {
    /// Apply the parameter object to the statement registered as `id`.
    fn apply(&self, id: &str, param: &Value) -> Result<ExecutionResult, TemplateError>;
    fn placeholders(&self, id: &str) -> Result<IndexSet<ParamInfo>, TemplateError>;
}

impl RegistryRunner for Registry {
    fn apply(&self, id: &str, param: &Value) -> Result<ExecutionResult, TemplateError> {
        // the lock is released before applying
        let template = RegistryCommon::get(self, id)?.ok_or_else(|| TemplateError::UnknownStatement(id.to_string()))?;
        template.apply(param)
    }

    fn placeholders(&self, id: &str) -> Result<IndexSet<ParamInfo>, TemplateError> {
        let template = RegistryCommon::get(self, id)?.ok_or_else(|| TemplateError::UnknownStatement(id.to_string()))?;
        Ok(template.placeholders().clone())
    }
}
