//! Built-in app templates and their registration.

use std::rc::Rc;

use desktop_app_contract::{
    AppInitError, AppServices, AppTemplate, ContentMount, MergedWindowOptions, WindowOptions,
};
use desktop_app_terminal::{TerminalApp, TERMINAL_APP_TYPE};
use platform_host::VfsEntryKind;
use serde::{Deserialize, Serialize};

use crate::registry::WindowRegistry;

pub const CODE_EDITOR_APP_TYPE: &str = "code-editor";
pub const NOTEPAD_APP_TYPE: &str = "notepad";
pub const CALCULATOR_APP_TYPE: &str = "calculator";
pub const IMAGE_VIEWER_APP_TYPE: &str = "image-viewer";

const SAMPLE_CODE: &str = "// JavaScript code example\nconsole.log(\"Hello, world!\");\n\n// Define a function\nfunction greet(name) {\n  return `Hello, ${name}!`;\n}\n\ngreet(\"User\");";

/// Registers every built-in template.
pub fn register_builtin_apps(registry: &mut WindowRegistry) {
    registry.register(TERMINAL_APP_TYPE, Rc::new(TerminalApp));
    registry.register(CODE_EDITOR_APP_TYPE, Rc::new(CodeEditorApp));
    registry.register(NOTEPAD_APP_TYPE, Rc::new(NotepadApp));
    registry.register(CALCULATOR_APP_TYPE, Rc::new(CalculatorApp));
    registry.register(IMAGE_VIEWER_APP_TYPE, Rc::new(ImageViewerApp));
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeEditorState {
    pub file_path: Option<String>,
    pub code: String,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CodeEditorApp;

impl AppTemplate for CodeEditorApp {
    fn title(&self, options: &WindowOptions) -> String {
        options
            .param_str("filePath")
            .and_then(|path| path.rsplit('/').next())
            .filter(|name| !name.is_empty())
            .unwrap_or("Untitled")
            .to_string()
    }

    fn default_size(&self) -> (i32, i32) {
        (500, 400)
    }

    fn init_content(
        &self,
        mount: &mut ContentMount,
        options: &MergedWindowOptions,
        services: &mut AppServices<'_>,
    ) -> Result<(), AppInitError> {
        let file_path = options.param_str("filePath").map(str::to_string);
        let code = match (options.param_str("code"), file_path.as_deref()) {
            (Some(code), _) if !code.is_empty() => code.to_string(),
            (_, Some(path)) if services.vfs.stat(path).map(|m| m.kind) == Ok(VfsEntryKind::File) => {
                services
                    .vfs
                    .read_file(path)
                    .map_err(|e| AppInitError::Failed(e.to_string()))?
            }
            _ => SAMPLE_CODE.to_string(),
        };

        let state = CodeEditorState { file_path, code };
        mount.save_state(&state)?;
        mount.set_body(state.code);
        Ok(())
    }

    fn code(&self, mount: &ContentMount) -> Option<String> {
        mount
            .load_state::<CodeEditorState>()
            .map(|state| state.code)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotepadState {
    pub text: String,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NotepadApp;

impl AppTemplate for NotepadApp {
    fn title(&self, _options: &WindowOptions) -> String {
        "Notepad".to_string()
    }

    fn default_size(&self) -> (i32, i32) {
        (300, 250)
    }

    fn init_content(
        &self,
        mount: &mut ContentMount,
        options: &MergedWindowOptions,
        _services: &mut AppServices<'_>,
    ) -> Result<(), AppInitError> {
        let state = NotepadState {
            text: options.param_str("content").unwrap_or_default().to_string(),
        };
        mount.save_state(&state)?;
        mount.set_body(state.text);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculatorState {
    pub display: String,
}

impl Default for CalculatorState {
    fn default() -> Self {
        Self {
            display: "0".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CalculatorApp;

impl AppTemplate for CalculatorApp {
    fn title(&self, _options: &WindowOptions) -> String {
        "Calculator".to_string()
    }

    fn default_size(&self) -> (i32, i32) {
        (240, 320)
    }

    fn init_content(
        &self,
        mount: &mut ContentMount,
        _options: &MergedWindowOptions,
        _services: &mut AppServices<'_>,
    ) -> Result<(), AppInitError> {
        let state = CalculatorState::default();
        mount.save_state(&state)?;
        mount.set_body(state.display);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageViewerState {
    pub image_src: String,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ImageViewerApp;

impl AppTemplate for ImageViewerApp {
    fn title(&self, _options: &WindowOptions) -> String {
        "Image Viewer".to_string()
    }

    fn default_size(&self) -> (i32, i32) {
        (400, 300)
    }

    fn init_content(
        &self,
        mount: &mut ContentMount,
        options: &MergedWindowOptions,
        _services: &mut AppServices<'_>,
    ) -> Result<(), AppInitError> {
        let state = ImageViewerState {
            image_src: options.require_str("imageSrc")?.to_string(),
        };
        mount.save_state(&state)?;
        mount.set_body(format!("[image] {}", state.image_src));
        Ok(())
    }
}
