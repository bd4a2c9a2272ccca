//! CLI integration tests for gah.
//!
//! These tests run the `gah` binary against a host built in a temporary
//! directory. The package manager step is always skipped.

use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get the gah binary command.
fn gah() -> Command {
    let mut cmd = Command::cargo_bin("gah").unwrap();
    cmd.env_remove("GAH_SKIP_PACKAGE_INSTALL");
    cmd
}

fn write(path: &Path, contents: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

/// A host referencing `app`, which depends on `core`.
fn create_host() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();

    write(
        &root.join("gah-host.json"),
        r#"{ "modules": [{ "names": ["app"], "path": "./modules/app/gah-module.json" }] }"#,
    );
    write(
        &root.join(".gah/tsconfig.json"),
        r#"{ "compilerOptions": { "baseUrl": "./", "paths": { "@mine/*": ["libs/*"] } } }"#,
    );
    write(
        &root.join(".gah/package.json"),
        r#"{ "name": "host", "dependencies": { "lodash": "1.2.3" } }"#,
    );

    write(
        &root.join("modules/core/gah-module.json"),
        r#"{ "modules": [{
            "name": "core",
            "packageName": "example",
            "facadePath": "src/facade",
            "dependencies": []
        }] }"#,
    );
    write(&root.join("modules/core/src/facade/styles.scss"), "body { margin: 0; }\n");
    write(&root.join("modules/core/src/facade/assets/logo.svg"), "<svg/>");
    write(
        &root.join("modules/core/package.json"),
        r#"{ "dependencies": { "lodash": "4.17.21", "rxjs": "7.8.0" } }"#,
    );

    write(
        &root.join("modules/app/gah-module.json"),
        r#"{ "modules": [{
            "name": "app",
            "packageName": "example",
            "isEntry": true,
            "baseNgModuleName": "AppModule",
            "dependencies": [{ "names": ["core"], "path": "../core/gah-module.json" }]
        }] }"#,
    );

    tmp
}

// ============================================================================
// gah install
// ============================================================================

#[test]
fn test_install_links_modules() {
    let host = create_host();
    let root = host.path();

    gah()
        .args(["install", "--skip-package-install"])
        .current_dir(root)
        .assert()
        .success();

    let deps = root.join(".gah/src/app/.gah/dependencies");
    assert!(fs::symlink_metadata(deps.join("core")).unwrap().file_type().is_symlink());
    assert!(fs::symlink_metadata(deps.join("app")).unwrap().file_type().is_symlink());
    assert!(root.join(".gah/src/app/.gah/generated/gah-generated.ts").is_file());
    assert!(root.join(".gah/src/assets/core/logo.svg").is_file());

    let tsconfig = fs::read_to_string(root.join(".gah/tsconfig.json")).unwrap();
    assert!(tsconfig.contains("@example/core"));
    assert!(tsconfig.contains("src/app/.gah/dependencies/core"));
    assert!(tsconfig.contains("[gah] This property was generated by gah"));
    assert!(tsconfig.contains("@mine/*"));

    let package = fs::read_to_string(root.join(".gah/package.json")).unwrap();
    assert!(package.contains(r#""lodash": "1.2.3""#));
    assert!(package.contains(r#""rxjs": "7.8.0""#));

    let styles = fs::read_to_string(root.join(".gah/src/styles.scss")).unwrap();
    assert!(styles.contains("@import \"app/.gah/dependencies/core/src/facade/styles.scss\";"));

    let gitignore = fs::read_to_string(root.join(".gah/.gitignore")).unwrap();
    assert!(gitignore.contains("src/app/.gah/**"));
    assert!(gitignore.contains("src/assets/**"));
}

#[test]
fn test_install_twice_is_idempotent() {
    let host = create_host();
    let root = host.path();
    let read_all = || {
        [".gah/tsconfig.json", ".gah/package.json", ".gah/src/styles.scss", ".gah/.gitignore"]
            .map(|f| fs::read_to_string(root.join(f)).unwrap())
    };

    gah()
        .args(["install", "--skip-package-install"])
        .current_dir(root)
        .assert()
        .success();
    let first = read_all();

    gah()
        .args(["install", "--skip-package-install"])
        .current_dir(root)
        .assert()
        .success();

    assert_eq!(first, read_all());
}

#[test]
fn test_install_from_subdirectory() {
    let host = create_host();
    let nested = host.path().join("modules/app");

    gah()
        .args(["install", "--skip-package-install"])
        .current_dir(&nested)
        .assert()
        .success();

    assert!(host.path().join(".gah/src/app/.gah/dependencies/core").exists());
}

#[test]
fn test_install_without_host_fails() {
    let tmp = TempDir::new().unwrap();

    gah()
        .args(["--no-color", "install", "--skip-package-install"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("gah-host.json"));
}

#[test]
fn test_install_reports_unknown_module() {
    let host = create_host();
    write(
        &host.path().join("gah-host.json"),
        r#"{ "modules": [{ "names": ["nope"], "path": "./modules/app/gah-module.json" }] }"#,
    );

    gah()
        .args(["--no-color", "install", "--skip-package-install"])
        .current_dir(host.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("module `nope` is not defined"))
        .stderr(predicate::str::contains("defined modules: app"));
}

#[test]
fn test_install_reports_invalid_manifest() {
    let host = create_host();
    write(&host.path().join("modules/core/gah-module.json"), "{ \"modules\": [ }");

    gah()
        .args(["--no-color", "install", "--skip-package-install"])
        .current_dir(host.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid JSON"));
}

#[test]
fn test_invalid_module_package_json_leaves_host_untouched() {
    let host = create_host();
    let root = host.path();
    write(&root.join("modules/core/package.json"), "{ \"dependencies\": ");
    let tsconfig = fs::read_to_string(root.join(".gah/tsconfig.json")).unwrap();

    gah()
        .args(["--no-color", "install", "--skip-package-install"])
        .current_dir(root)
        .assert()
        .failure()
        .stderr(predicate::str::contains("package.json"));

    assert_eq!(tsconfig, fs::read_to_string(root.join(".gah/tsconfig.json")).unwrap());
    assert!(!root.join(".gah/src/app/.gah").exists());
    assert!(!root.join(".gah/src/styles.scss").exists());
}

#[test]
fn test_module_base_dir_is_link_target() {
    let host = create_host();
    let root = host.path();
    write(
        &root.join("modules/core/gah-module.json"),
        r#"{ "modules": [{ "name": "core", "packageName": "example", "baseDir": "src" }] }"#,
    );

    gah()
        .args(["install", "--skip-package-install"])
        .current_dir(root)
        .assert()
        .success();

    let link = fs::read_link(root.join(".gah/src/app/.gah/dependencies/core")).unwrap();
    assert_eq!(link, root.join("modules/core/src").canonicalize().unwrap());
}

#[test]
fn test_skip_package_install_from_config() {
    let host = create_host();
    write(
        &host.path().join(".gah/config.toml"),
        "[install]\nskip-package-install = true\npackage-manager = \"gah-test-missing-pm\"\n",
    );

    gah()
        .args(["install"])
        .current_dir(host.path())
        .assert()
        .success();
}

#[test]
fn test_failing_package_manager_exits_nonzero() {
    let host = create_host();
    write(
        &host.path().join(".gah/config.toml"),
        "[install]\npackage-manager = \"gah-test-missing-pm\"\n",
    );

    gah()
        .args(["--no-color", "install"])
        .current_dir(host.path())
        .assert()
        .failure();

    // Linking happened before the package manager step and is kept.
    assert!(host.path().join(".gah/src/app/.gah/dependencies/core").exists());
}

// ============================================================================
// gah tree
// ============================================================================

#[test]
fn test_tree_prints_modules() {
    let host = create_host();

    gah()
        .args(["tree"])
        .current_dir(host.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("app (@example/app) [entry]"))
        .stdout(predicate::str::contains("└── core (@example/core)"));
}

#[test]
fn test_tree_reports_cycle() {
    let host = create_host();
    write(
        &host.path().join("modules/core/gah-module.json"),
        r#"{ "modules": [{
            "name": "core",
            "packageName": "example",
            "dependencies": [{ "names": ["app"], "path": "../app/gah-module.json" }]
        }] }"#,
    );

    gah()
        .args(["--no-color", "tree"])
        .current_dir(host.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("circular module dependency"))
        .stderr(predicate::str::contains("app -> core -> app"));
}

// ============================================================================
// gah clean
// ============================================================================

#[test]
fn test_clean_after_install() {
    let host = create_host();
    let root = host.path();

    gah()
        .args(["install", "--skip-package-install"])
        .current_dir(root)
        .assert()
        .success();
    gah().args(["clean"]).current_dir(root).assert().success();

    assert!(!root.join(".gah/src/app/.gah/dependencies").exists());
    assert!(!root.join(".gah/src/assets").exists());
    assert!(root.join("modules/core/src/facade/assets/logo.svg").is_file());

    let tsconfig = fs::read_to_string(root.join(".gah/tsconfig.json")).unwrap();
    assert!(!tsconfig.contains("@example/core"));
    assert!(tsconfig.contains("@mine/*"));
}

// ============================================================================
// gah completions
// ============================================================================

#[test]
fn test_completions_bash() {
    gah()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("gah"));
}
