//! Post-save hook that writes a script next to every saved notebook.

use crate::error::ExportError;
use crate::exporter::ScriptExporter;
use nbscript_store::{ContentsModel, FileContentsManager, HookError, PostSaveHook};
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Writes the script rendition of a notebook after each notebook save.
///
/// Saves of anything other than a notebook are ignored entirely. The
/// exporter is injected at construction and shared across every invocation;
/// the hook holds no other state.
pub struct ScriptExportHook {
    exporter: Arc<ScriptExporter>,
}

impl ScriptExportHook {
    pub fn new(exporter: Arc<ScriptExporter>) -> Self {
        Self { exporter }
    }

    /// The exporter instance serving this hook.
    pub fn exporter(&self) -> &Arc<ScriptExporter> {
        &self.exporter
    }
}

impl PostSaveHook for ScriptExportHook {
    fn name(&self) -> &'static str {
        "script-export"
    }

    fn on_save(
        &self,
        model: &ContentsModel,
        os_path: &Path,
        manager: &FileContentsManager,
    ) -> Result<(), HookError> {
        if !model.is_notebook() {
            return Ok(());
        }

        // Transform fully before touching the target, so a failed export
        // leaves any previously written script untouched.
        let (source, meta) = self.exporter.export_file(os_path).map_err(HookError::new)?;
        let script_path = os_path.with_extension(&meta.file_extension);

        let display_path = manager
            .api_path(&script_path)
            .map(|p| p.to_string())
            .unwrap_or_else(|_| script_path.display().to_string());
        tracing::info!(path = %display_path, "writing script");

        fs::write(&script_path, source).map_err(|source| {
            HookError::new(ExportError::Write {
                path: script_path.display().to_string(),
                source,
            })
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nbscript_core::{ApiPath, Notebook};
    use nbscript_store::{Content, ContentType, StoreError};

    const PY_NOTEBOOK: &str = r##"{
        "cells": [
            {"cell_type": "markdown", "source": "# Title"},
            {"cell_type": "code", "source": ["x = 1\n", "print(x)\n"]}
        ],
        "metadata": {
            "language_info": {"name": "python", "file_extension": ".py"}
        },
        "nbformat": 4,
        "nbformat_minor": 5
    }"##;

    fn hooked_manager(
        root: &Path,
    ) -> (Arc<ScriptExporter>, Arc<ScriptExportHook>, FileContentsManager) {
        let exporter = Arc::new(ScriptExporter::new());
        let hook = Arc::new(ScriptExportHook::new(exporter.clone()));
        let mut manager = FileContentsManager::new(root).unwrap();
        manager.register_post_save_hook(hook.clone());
        (exporter, hook, manager)
    }

    /// Collects everything the subscriber writes, for asserting on log
    /// output.
    #[derive(Clone, Default)]
    struct CapturedLog(Arc<std::sync::Mutex<Vec<u8>>>);

    impl CapturedLog {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl std::io::Write for CapturedLog {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for CapturedLog {
        type Writer = CapturedLog;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn capture_logs(f: impl FnOnce()) -> String {
        let log = CapturedLog::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(log.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        log.contents()
    }

    fn notebook_model(path: &str, json: &str) -> ContentsModel {
        ContentsModel::for_save(
            ContentType::Notebook,
            ApiPath::new(path).unwrap(),
            Content::Notebook(Notebook::parse(json).unwrap()),
        )
    }

    #[test]
    fn test_notebook_save_writes_script_alongside() {
        let dir = tempfile::tempdir().unwrap();
        let (_, _, manager) = hooked_manager(dir.path());

        manager.save(&notebook_model("sub/Analysis.ipynb", PY_NOTEBOOK)).unwrap();

        let script = fs::read_to_string(dir.path().join("sub/Analysis.py")).unwrap();
        assert_eq!(script, "x = 1\nprint(x)\n");
    }

    #[test]
    fn test_non_notebook_save_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        let (_, _, manager) = hooked_manager(dir.path());

        let model = ContentsModel::for_save(
            ContentType::File,
            ApiPath::new("notes.txt").unwrap(),
            Content::Text("hello".to_string()),
        );
        manager.save(&model).unwrap();

        // Only the saved file itself exists; no derived artifact.
        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec!["notes.txt"]);
    }

    #[test]
    fn test_non_notebook_save_emits_no_log_line() {
        let dir = tempfile::tempdir().unwrap();
        let (_, _, manager) = hooked_manager(dir.path());

        let output = capture_logs(|| {
            let model = ContentsModel::for_save(
                ContentType::File,
                ApiPath::new("notes.txt").unwrap(),
                Content::Text("hello".to_string()),
            );
            manager.save(&model).unwrap();
        });
        assert!(!output.contains("writing script"), "unexpected log: {output}");

        // Sanity check the capture: a notebook save does emit the line.
        let output = capture_logs(|| {
            manager.save(&notebook_model("nb.ipynb", PY_NOTEBOOK)).unwrap();
        });
        assert!(output.contains("writing script"), "missing log: {output}");
    }

    #[test]
    fn test_exporter_instance_is_stable_across_saves() {
        let dir = tempfile::tempdir().unwrap();
        let (exporter, hook, manager) = hooked_manager(dir.path());

        manager.save(&notebook_model("nb.ipynb", PY_NOTEBOOK)).unwrap();
        manager.save(&notebook_model("nb.ipynb", PY_NOTEBOOK)).unwrap();

        // The hook still holds the injected instance, and nothing
        // constructed a second exporter along the way.
        assert!(Arc::ptr_eq(hook.exporter(), &exporter));
        assert_eq!(Arc::strong_count(&exporter), 2);
    }

    #[test]
    fn test_failed_export_leaves_previous_script_intact() {
        let dir = tempfile::tempdir().unwrap();
        let (_, _, manager) = hooked_manager(dir.path());

        manager.save(&notebook_model("nb.ipynb", PY_NOTEBOOK)).unwrap();
        let script_path = dir.path().join("nb.py");
        let before = fs::read_to_string(&script_path).unwrap();

        // Corrupt the notebook on disk behind the manager's back, then save
        // a model whose hook will fail to re-read it.
        let hook = ScriptExportHook::new(Arc::new(ScriptExporter::new()));
        fs::write(dir.path().join("nb.ipynb"), "{broken").unwrap();
        let saved = ContentsModel {
            content: None,
            ..notebook_model("nb.ipynb", PY_NOTEBOOK)
        };
        let err = hook
            .on_save(&saved, &dir.path().join("nb.ipynb").canonicalize().unwrap(), &manager)
            .unwrap_err();
        assert!(err.to_string().contains("malformed notebook"));
        assert_eq!(fs::read_to_string(&script_path).unwrap(), before);
    }

    #[test]
    fn test_fallback_extension_when_no_language_info() {
        let dir = tempfile::tempdir().unwrap();
        let (_, _, manager) = hooked_manager(dir.path());

        let bare = r#"{"cells": [{"cell_type": "code", "source": "1 + 1"}], "metadata": {}, "nbformat": 4, "nbformat_minor": 5}"#;
        manager.save(&notebook_model("nb.ipynb", bare)).unwrap();
        assert!(dir.path().join("nb.txt").is_file());
    }

    #[test]
    fn test_script_write_failure_surfaces_as_save_error() {
        let dir = tempfile::tempdir().unwrap();
        let (_, _, manager) = hooked_manager(dir.path());

        // Occupy the script target with a directory so the hook's write
        // fails after a successful transform.
        fs::create_dir(dir.path().join("nb.py")).unwrap();
        let err = manager.save(&notebook_model("nb.ipynb", PY_NOTEBOOK)).unwrap_err();
        assert!(matches!(err, StoreError::Hook { ref name, .. } if name == "script-export"));
        // The notebook itself still reached disk.
        assert!(dir.path().join("nb.ipynb").is_file());
    }
}
