//! App-type to template registry.

use std::{collections::HashMap, fmt, rc::Rc};

use desktop_app_contract::AppTemplate;

use crate::error::DesktopError;

#[derive(Default, Clone)]
/// Templates keyed by app type. Registering an existing key replaces the template.
pub struct WindowRegistry {
    templates: HashMap<String, Rc<dyn AppTemplate>>,
}

impl fmt::Debug for WindowRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WindowRegistry")
            .field("app_types", &self.app_types())
            .finish()
    }
}

impl WindowRegistry {
    /// Registers `template` under `app_type`, replacing any previous template.
    pub fn register(&mut self, app_type: impl Into<String>, template: Rc<dyn AppTemplate>) {
        let app_type = app_type.into();
        if self.templates.insert(app_type.clone(), template).is_some() {
            tracing::debug!(%app_type, "replaced window template");
        } else {
            tracing::debug!(%app_type, "registered window template");
        }
    }

    /// Looks up the template for `app_type`.
    ///
    /// # Errors
    ///
    /// [`DesktopError::TemplateNotFound`] when nothing is registered under the key.
    pub fn lookup(&self, app_type: &str) -> Result<Rc<dyn AppTemplate>, DesktopError> {
        self.templates
            .get(app_type)
            .cloned()
            .ok_or_else(|| DesktopError::TemplateNotFound(app_type.to_string()))
    }

    /// Whether a template is registered under `app_type`.
    pub fn contains(&self, app_type: &str) -> bool {
        self.templates.contains_key(app_type)
    }

    /// Registered app types, sorted.
    pub fn app_types(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.templates.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}

#[cfg(test)]
mod tests {
    use desktop_app_contract::{
        AppInitError, AppServices, ContentMount, MergedWindowOptions, WindowOptions,
    };
    use pretty_assertions::assert_eq;

    use super::*;

    struct Named(&'static str);

    impl AppTemplate for Named {
        fn title(&self, _options: &WindowOptions) -> String {
            self.0.to_string()
        }

        fn default_size(&self) -> (i32, i32) {
            (100, 100)
        }

        fn init_content(
            &self,
            _mount: &mut ContentMount,
            _options: &MergedWindowOptions,
            _services: &mut AppServices<'_>,
        ) -> Result<(), AppInitError> {
            Ok(())
        }
    }

    #[test]
    fn re_registration_replaces_template() {
        let mut registry = WindowRegistry::default();
        registry.register("clock", Rc::new(Named("Old")));
        registry.register("clock", Rc::new(Named("New")));

        let template = registry.lookup("clock").expect("registered");
        assert_eq!(template.title(&WindowOptions::default()), "New");
        assert_eq!(registry.app_types(), vec!["clock"]);
    }

    #[test]
    fn lookup_miss_is_typed() {
        let registry = WindowRegistry::default();
        let err = registry.lookup("missing").err().expect("miss");
        assert_eq!(err, DesktopError::TemplateNotFound("missing".to_string()));
    }

    #[test]
    fn app_types_are_sorted() {
        let mut registry = WindowRegistry::default();
        registry.register("terminal", Rc::new(Named("T")));
        registry.register("calculator", Rc::new(Named("C")));
        assert_eq!(registry.app_types(), vec!["calculator", "terminal"]);
        assert!(registry.contains("terminal"));
    }
}
