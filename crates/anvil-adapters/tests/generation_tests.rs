//! End-to-end generation runs against the filesystem adapters.

use std::path::{Path, PathBuf};

use anvil_adapters::{LocalFilesystem, MemoryFilesystem};
use anvil_core::{
    application::{ApplicationError, ScaffoldService, ports::Filesystem},
    domain::{
        DomainError, FileMergeRecord, GenerationWarning, MergeOutcome, MergeStrategy,
        RelativePath, StackSelection,
    },
    error::{AnvilError, AnvilResult},
};
use mockall::mock;
use serde_json::Value;
use tempfile::TempDir;

const ROOT: &str = "/templates";

fn templates() -> MemoryFilesystem {
    let fs = MemoryFilesystem::new();
    fs.insert(
        "/templates/frameworks/react-with-ts/package.json",
        r#"{"name":"{{PROJECT_NAME}}","dependencies":{"react":"^19.0.0"}}"#,
    )
    .insert(
        "/templates/frameworks/react-with-ts/src/index.css",
        "body { margin: 0; }\n",
    )
    .insert(
        "/templates/frameworks/react-with-ts/tsconfig.json",
        "// generated\n{\n  \"compilerOptions\": {\n    \"paths\": { \"@/*\": [\"./src/*\"] },\n  },\n}\n",
    )
    .insert("/templates/frameworks/react-with-ts/.env", "VITE_API=/api")
    .insert("/templates/frameworks/react-with-ts/README.md", "# {{PROJECT_NAME}}\n")
    .insert(
        "/templates/frameworks/next-with-ts/package.json",
        r#"{"name":"{{PROJECT_NAME}}","dependencies":{"next":"^15.0.0"}}"#,
    )
    .insert(
        "/templates/addons/styling/react/tailwind/src/index.css",
        "@import \"tailwindcss\";\n",
    )
    .insert(
        "/templates/addons/styling/react/tailwind/package.json",
        r#"{"devDependencies":{"tailwindcss":"^4.0.0"}}"#,
    )
    .insert(
        "/templates/addons/styling/react/shadcn/src/index.css",
        "/*override*/\n@import \"tailwindcss\";\n:root { --radius: 0.5rem; }\n",
    )
    .insert(
        "/templates/addons/styling/react/shadcn/tsconfig.json",
        r#"{"compilerOptions":{"paths":{"@/*":["./src/components/*"],"~/*":["./lib/*"]}}}"#,
    )
    .insert("/templates/addons/extras/docker/Dockerfile", "FROM node:22\n")
    .insert("/templates/addons/extras/docker/README.md", "## Docker\n")
    .insert(
        "/templates/addons/auth/react/better-auth/src/lib/auth.ts",
        "export const provider = \"{{DATABASE_PROVIDER}}\";\n",
    )
    .insert("/templates/addons/auth/react/better-auth/.env", "BETTER_AUTH_SECRET=")
    .insert("/templates/addons/orm/react/broken/package.json", "{\"scripts\": ");
    fs
}

fn service(fs: &MemoryFilesystem) -> ScaffoldService {
    ScaffoldService::new(ROOT, Box::new(fs.clone()))
}

fn selection(base: &str, addons: &[&str]) -> StackSelection {
    StackSelection::builder()
        .base(base)
        .addons(addons.iter().copied())
        .destination("/work/shop")
        .build()
        .unwrap()
}

fn json(fs: &MemoryFilesystem, path: &str) -> Value {
    serde_json::from_str(&fs.read_to_string(path).unwrap()).unwrap()
}

fn staged_leftovers(fs: &MemoryFilesystem) -> Vec<String> {
    if !fs.is_dir(Path::new("/work")) {
        return Vec::new();
    }
    fs.list_dirs(Path::new("/work")).unwrap()
}

#[test]
fn composes_base_and_addons() {
    let fs = templates();
    let report = service(&fs)
        .generate(&selection("react-with-ts", &["tailwind", "docker"]))
        .unwrap();

    assert_eq!(report.applied_addons(), ["tailwind", "docker"]);
    // docker's README.md has no merger
    assert_eq!(report.warnings().len(), 1);

    let css = fs.read_to_string("/work/shop/src/index.css").unwrap();
    assert!(css.starts_with("@import \"tailwindcss\";"));
    assert!(css.contains("body { margin: 0; }"));

    let package = json(&fs, "/work/shop/package.json");
    assert_eq!(package["name"], "shop");
    assert_eq!(package["dependencies"]["react"], "^19.0.0");
    assert_eq!(package["devDependencies"]["tailwindcss"], "^4.0.0");

    assert_eq!(
        fs.read_to_string("/work/shop/Dockerfile").as_deref(),
        Some("FROM node:22\n")
    );
    assert_eq!(
        report.last_record_for("src/index.css").map(|r| r.strategy),
        Some(Some(MergeStrategy::Stylesheet))
    );
    assert_eq!(staged_leftovers(&fs), ["shop"]);
}

#[test]
fn override_marker_beats_merger() {
    let fs = templates();
    let report = service(&fs)
        .generate(&selection("react-with-ts", &["tailwind", "shadcn"]))
        .unwrap();

    let css = fs.read_to_string("/work/shop/src/index.css").unwrap();
    assert_eq!(css, "@import \"tailwindcss\";\n:root { --radius: 0.5rem; }\n");
    assert!(!css.contains("margin"));
    assert_eq!(
        report.last_record_for("src/index.css").map(|r| r.outcome),
        Some(MergeOutcome::Replaced)
    );
}

#[test]
fn unknown_file_type_is_overwritten_with_warning() {
    let fs = templates();
    let report = service(&fs)
        .generate(&selection("react-with-ts", &["docker"]))
        .unwrap();

    assert_eq!(
        fs.read_to_string("/work/shop/README.md").as_deref(),
        Some("## Docker\n")
    );
    assert_eq!(report.count(MergeOutcome::OverwrittenWarning), 1);
    assert_eq!(
        report.warnings(),
        [GenerationWarning::UnsupportedFileType {
            addon: "docker".into(),
            path: RelativePath::new("README.md"),
        }]
    );
}

#[test]
fn tsconfig_path_aliases_are_unioned() {
    let fs = templates();
    service(&fs)
        .generate(&selection("react-with-ts", &["shadcn"]))
        .unwrap();

    let tsconfig = json(&fs, "/work/shop/tsconfig.json");
    let paths = &tsconfig["compilerOptions"]["paths"];
    assert_eq!(paths["@/*"], serde_json::json!(["./src/*", "./src/components/*"]));
    assert_eq!(paths["~/*"], serde_json::json!(["./lib/*"]));
}

#[test]
fn missing_addon_is_skipped_with_warning() {
    let fs = templates();
    let report = service(&fs)
        .generate(&selection("react-with-ts", &["nope", "docker"]))
        .unwrap();

    assert_eq!(report.applied_addons(), ["docker"]);
    assert!(report.warnings().contains(&GenerationWarning::AddonNotFound {
        addon: "nope".into(),
        framework: "react".into(),
    }));
    assert!(fs.exists(Path::new("/work/shop/Dockerfile")));
}

#[test]
fn scoped_addon_falls_back_to_default_framework() {
    let fs = templates();
    let report = service(&fs)
        .generate(&selection("next-with-ts", &["tailwind"]))
        .unwrap();

    assert_eq!(report.applied_addons(), ["tailwind"]);
    assert!(fs.exists(Path::new("/work/shop/src/index.css")));
    let package = json(&fs, "/work/shop/package.json");
    assert_eq!(package["dependencies"]["next"], "^15.0.0");
}

#[test]
fn addon_params_only_reach_that_addons_files() {
    let fs = templates();
    fs.insert(
        "/templates/frameworks/react-with-ts/src/db.ts",
        "// {{DATABASE_PROVIDER}}\n",
    );
    let selection = StackSelection::builder()
        .base("react-with-ts")
        .addon("better-auth")
        .destination("/work/shop")
        .addon_param("better-auth", "DATABASE_PROVIDER", "postgresql")
        .build()
        .unwrap();

    service(&fs).generate(&selection).unwrap();

    assert_eq!(
        fs.read_to_string("/work/shop/src/lib/auth.ts").as_deref(),
        Some("export const provider = \"postgresql\";\n")
    );
    assert_eq!(
        fs.read_to_string("/work/shop/src/db.ts").as_deref(),
        Some("// {{DATABASE_PROVIDER}}\n")
    );
    assert_eq!(
        fs.read_to_string("/work/shop/.env").as_deref(),
        Some("VITE_API=/api\nBETTER_AUTH_SECRET=")
    );
    assert_eq!(
        fs.read_to_string("/work/shop/README.md").as_deref(),
        Some("# shop\n")
    );
}

#[test]
fn fatal_merge_leaves_nothing_behind() {
    let fs = templates();
    let err = service(&fs)
        .generate(&selection("react-with-ts", &["tailwind", "broken"]))
        .unwrap_err();

    match &err {
        AnvilError::Application(ApplicationError::AddonIntegration { addon, .. }) => {
            assert_eq!(addon, "broken")
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(matches!(
        err.root_cause(),
        AnvilError::Domain(DomainError::MergeFailed { .. })
    ));
    assert!(!fs.exists(Path::new("/work/shop")));
    assert!(staged_leftovers(&fs).is_empty());
}

/// Delegates to a memory filesystem but fails writes to matching paths and,
/// optionally, every rename.
struct FailingFilesystem {
    inner: MemoryFilesystem,
    fail_on: fn(&Path) -> bool,
    rename_fails: bool,
}

impl FailingFilesystem {
    fn new(inner: &MemoryFilesystem, fail_on: fn(&Path) -> bool) -> Self {
        Self {
            inner: inner.clone(),
            fail_on,
            rename_fails: false,
        }
    }

    fn without_rename(mut self) -> Self {
        self.rename_fails = true;
        self
    }

    fn check(&self, path: &Path) -> AnvilResult<()> {
        if (self.fail_on)(path) {
            return Err(ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "disk full".into(),
            }
            .into());
        }
        Ok(())
    }
}

impl Filesystem for FailingFilesystem {
    fn read_file(&self, path: &Path) -> AnvilResult<Vec<u8>> {
        self.inner.read_file(path)
    }
    fn write_file(&self, path: &Path, content: &[u8]) -> AnvilResult<()> {
        self.check(path)?;
        self.inner.write_file(path, content)
    }
    fn copy_file(&self, from: &Path, to: &Path) -> AnvilResult<()> {
        self.check(to)?;
        self.inner.copy_file(from, to)
    }
    fn create_dir_all(&self, path: &Path) -> AnvilResult<()> {
        self.inner.create_dir_all(path)
    }
    fn exists(&self, path: &Path) -> bool {
        self.inner.exists(path)
    }
    fn is_dir(&self, path: &Path) -> bool {
        self.inner.is_dir(path)
    }
    fn remove_dir_all(&self, path: &Path) -> AnvilResult<()> {
        self.inner.remove_dir_all(path)
    }
    fn rename(&self, from: &Path, to: &Path) -> AnvilResult<()> {
        if self.rename_fails {
            return Err(ApplicationError::FilesystemError {
                path: to.to_path_buf(),
                reason: "cross-device link".into(),
            }
            .into());
        }
        self.inner.rename(from, to)
    }
    fn list_files(&self, dir: &Path) -> AnvilResult<Vec<RelativePath>> {
        self.inner.list_files(dir)
    }
    fn list_dirs(&self, dir: &Path) -> AnvilResult<Vec<String>> {
        self.inner.list_dirs(dir)
    }
}

#[test]
fn io_failure_in_later_addon_rolls_back() {
    let fs = templates();
    let failing = FailingFilesystem::new(&fs, |p| p.ends_with("Dockerfile"));
    let service = ScaffoldService::new(ROOT, Box::new(failing));

    let err = service
        .generate(&selection("react-with-ts", &["tailwind", "docker"]))
        .unwrap_err();

    assert!(matches!(
        err.root_cause(),
        AnvilError::Application(ApplicationError::FilesystemError { .. })
    ));
    assert!(!fs.exists(Path::new("/work/shop")));
    assert!(staged_leftovers(&fs).is_empty());
}

#[test]
fn promotion_falls_back_to_copy_when_rename_fails() {
    let fs = templates();
    let failing = FailingFilesystem::new(&fs, |_| false).without_rename();
    let service = ScaffoldService::new(ROOT, Box::new(failing));

    service
        .generate(&selection("react-with-ts", &["tailwind", "docker"]))
        .unwrap();

    assert_eq!(json(&fs, "/work/shop/package.json")["name"], "shop");
    assert_eq!(
        fs.read_to_string("/work/shop/Dockerfile").as_deref(),
        Some("FROM node:22\n")
    );
    assert!(
        fs.read_to_string("/work/shop/src/index.css")
            .unwrap()
            .starts_with("@import \"tailwindcss\";")
    );
    assert_eq!(staged_leftovers(&fs), ["shop"]);
}

#[test]
fn failed_copy_during_promotion_leaves_no_destination() {
    let fs = templates();
    let failing = FailingFilesystem::new(&fs, |p| {
        p.starts_with("/work/shop") && p.ends_with("Dockerfile")
    })
    .without_rename();
    let service = ScaffoldService::new(ROOT, Box::new(failing));

    let err = service
        .generate(&selection("react-with-ts", &["docker"]))
        .unwrap_err();

    match &err {
        AnvilError::Application(ApplicationError::PromotionFailed { path, reason }) => {
            assert_eq!(path, Path::new("/work/shop"));
            assert!(reason.contains("disk full"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!fs.exists(Path::new("/work/shop")));
    assert!(staged_leftovers(&fs).is_empty());
}

#[test]
fn existing_destination_is_left_untouched() {
    let fs = templates();
    fs.insert("/work/shop/keep.txt", "mine");

    let err = service(&fs)
        .generate(&selection("react-with-ts", &["docker"]))
        .unwrap_err();

    assert!(matches!(
        err,
        AnvilError::Application(ApplicationError::ProjectExists { .. })
    ));
    assert_eq!(fs.read_to_string("/work/shop/keep.txt").as_deref(), Some("mine"));
    assert!(!fs.exists(Path::new("/work/shop/Dockerfile")));
    assert_eq!(staged_leftovers(&fs), ["shop"]);
}

#[test]
fn unknown_base_template_is_not_found() {
    let fs = templates();
    let err = service(&fs)
        .generate(&selection("svelte", &[]))
        .unwrap_err();

    match err {
        AnvilError::Application(ApplicationError::BaseTemplateNotFound { id, path }) => {
            assert_eq!(id, "svelte");
            assert_eq!(path, PathBuf::from("/templates/frameworks/svelte"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!fs.exists(Path::new("/work")));
}

mock! {
    Observer {}

    impl anvil_core::application::GenerationObserver for Observer {
        fn addon_started(&self, addon: &str, root: &Path);
        fn file_integrated(&self, record: &FileMergeRecord);
        fn warning(&self, warning: &GenerationWarning);
        fn promoted(&self, destination: &Path);
    }
}

#[test]
fn observer_sees_every_event() {
    let fs = templates();
    let mut observer = MockObserver::new();
    observer
        .expect_addon_started()
        .withf(|addon, _| addon == "docker")
        .times(1)
        .return_const(());
    observer.expect_file_integrated().times(2).return_const(());
    observer
        .expect_warning()
        .withf(|w| matches!(w, GenerationWarning::AddonNotFound { .. }))
        .times(1)
        .return_const(());
    observer
        .expect_warning()
        .withf(|w| matches!(w, GenerationWarning::UnsupportedFileType { .. }))
        .times(1)
        .return_const(());
    observer
        .expect_promoted()
        .withf(|dest| dest == Path::new("/work/shop"))
        .times(1)
        .return_const(());

    service(&fs)
        .with_observer(Box::new(observer))
        .generate(&selection("react-with-ts", &["nope", "docker"]))
        .unwrap();
}

#[test]
fn plan_resolves_without_writing() {
    let fs = templates();
    let plan = service(&fs)
        .plan(&selection("react-with-ts", &["tailwind", "nope"]))
        .unwrap();

    assert!(plan.base_exists);
    assert_eq!(plan.framework, "react");
    assert_eq!(
        plan.addons[0].1.as_deref(),
        Some(Path::new("/templates/addons/styling/react/tailwind"))
    );
    assert_eq!(plan.missing_addons().collect::<Vec<_>>(), ["nope"]);
    assert!(!plan.destination_exists);
    assert!(!fs.exists(Path::new("/work")));
}

#[test]
fn generates_on_local_disk() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().join("templates");
    let base = root.join("frameworks/react-with-ts");
    std::fs::create_dir_all(base.join("src")).unwrap();
    std::fs::write(base.join("src/main.tsx"), "import './index.css';\n").unwrap();
    std::fs::write(base.join("src/index.css"), "body {}\n").unwrap();
    let addon = root.join("addons/styling/react/tailwind/src");
    std::fs::create_dir_all(&addon).unwrap();
    std::fs::write(addon.join("index.css"), "@import \"tailwindcss\";\n").unwrap();

    let destination = tmp.path().join("out/shop");
    let selection = StackSelection::builder()
        .base("react-with-ts")
        .addon("tailwind")
        .destination(&destination)
        .build()
        .unwrap();

    let report = ScaffoldService::new(&root, Box::new(LocalFilesystem::new()))
        .generate(&selection)
        .unwrap();

    assert_eq!(report.count(MergeOutcome::Merged), 1);
    let css = std::fs::read_to_string(destination.join("src/index.css")).unwrap();
    assert!(css.starts_with("@import \"tailwindcss\";"));
    assert!(destination.join("src/main.tsx").is_file());

    let siblings: Vec<_> = std::fs::read_dir(tmp.path().join("out"))
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(siblings, ["shop"]);
}

/// Local disk whose destination directory shows up, empty, while the
/// project is being staged.
struct RacingFilesystem {
    inner: LocalFilesystem,
    destination: PathBuf,
}

impl Filesystem for RacingFilesystem {
    fn read_file(&self, path: &Path) -> AnvilResult<Vec<u8>> {
        self.inner.read_file(path)
    }
    fn write_file(&self, path: &Path, content: &[u8]) -> AnvilResult<()> {
        self.inner.write_file(path, content)
    }
    fn copy_file(&self, from: &Path, to: &Path) -> AnvilResult<()> {
        self.inner.copy_file(from, to)
    }
    fn create_dir_all(&self, path: &Path) -> AnvilResult<()> {
        self.inner.create_dir_all(path)
    }
    fn exists(&self, path: &Path) -> bool {
        self.inner.exists(path)
    }
    fn is_dir(&self, path: &Path) -> bool {
        self.inner.is_dir(path)
    }
    fn remove_dir_all(&self, path: &Path) -> AnvilResult<()> {
        self.inner.remove_dir_all(path)
    }
    fn rename(&self, from: &Path, to: &Path) -> AnvilResult<()> {
        self.inner.rename(from, to)
    }
    fn list_files(&self, dir: &Path) -> AnvilResult<Vec<RelativePath>> {
        self.inner.create_dir_all(&self.destination)?;
        self.inner.list_files(dir)
    }
    fn list_dirs(&self, dir: &Path) -> AnvilResult<Vec<String>> {
        self.inner.list_dirs(dir)
    }
}

#[test]
fn empty_destination_created_during_staging_is_not_replaced() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().join("templates");
    let base = root.join("frameworks/react-with-ts");
    std::fs::create_dir_all(&base).unwrap();
    std::fs::write(base.join("package.json"), "{}").unwrap();

    let destination = tmp.path().join("out/shop");
    let selection = StackSelection::builder()
        .base("react-with-ts")
        .destination(&destination)
        .build()
        .unwrap();
    let fs = RacingFilesystem {
        inner: LocalFilesystem::new(),
        destination: destination.clone(),
    };

    let err = ScaffoldService::new(&root, Box::new(fs))
        .generate(&selection)
        .unwrap_err();

    assert!(matches!(
        err,
        AnvilError::Application(ApplicationError::ProjectExists { .. })
    ));
    assert!(destination.is_dir());
    assert_eq!(std::fs::read_dir(&destination).unwrap().count(), 0);
    let siblings: Vec<_> = std::fs::read_dir(tmp.path().join("out"))
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(siblings, ["shop"]);
}
