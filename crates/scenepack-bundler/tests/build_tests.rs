mod helpers;

use helpers::{assert_bundle_contains, assert_error_mentions, rolldown_orchestrator};
use scenepack_bundler::{BuildRequest, BuildStatus, Framework};

#[tokio::test]
async fn tsx_entry_builds_and_repeats_from_cache() {
    let mut orchestrator = rolldown_orchestrator();
    let request = BuildRequest::new(Framework::ReactThreeFiber, "/src/index.tsx")
        .file("/src/index.tsx", "console.log(1)");

    let first = orchestrator.build(request.clone()).await;
    assert_bundle_contains(&first, "console.log(1)");
    assert!(first.bytes > 0);
    assert_eq!(first.bytes, first.bundle_code.as_ref().unwrap().len());
    assert!(!first.from_cache);

    let second = orchestrator.build(request).await;
    assert!(second.from_cache);
    assert_eq!(second.bundle_code, first.bundle_code);
    assert!(second.errors.is_empty());

    let stats = orchestrator.stats();
    assert_eq!(stats.total_builds, 2);
    assert_eq!(stats.cache_hits, 1);
}

#[tokio::test]
async fn js_files_are_jsx_under_react_three_fiber() {
    let mut orchestrator = rolldown_orchestrator();
    let request = BuildRequest::new(Framework::ReactThreeFiber, "/src/App.js")
        .file(
            "/src/App.js",
            r#"
import { Canvas } from '@react-three/fiber';
import Box from './Box.js';

export default function App() {
    return <Canvas><Box /></Canvas>;
}
"#,
        )
        .file(
            "/src/Box.js",
            r#"
export default function Box() {
    return <mesh><boxGeometry /></mesh>;
}
"#,
        );

    let result = orchestrator.build(request).await;
    assert_bundle_contains(&result, "mesh");
    assert_eq!(result.status, BuildStatus::Ok);
}

#[tokio::test]
async fn typescript_and_relative_imports_are_bundled() {
    let mut orchestrator = rolldown_orchestrator();
    let request = BuildRequest::new(Framework::ThreeJs, "/src/main.ts")
        .file(
            "/src/main.ts",
            r#"
import * as THREE from 'three';
import { makeCube } from './scene/cube';

const scene: THREE.Scene = new THREE.Scene();
scene.add(makeCube(2));
console.log("scene ready");
"#,
        )
        .file(
            "/src/scene/cube.ts",
            r#"
import { BoxGeometry, Mesh } from 'three';

export function makeCube(size: number): Mesh {
    return new Mesh(new BoxGeometry(size, size, size));
}
"#,
        );

    let result = orchestrator.build(request).await;
    assert_bundle_contains(&result, "scene ready");
    assert_bundle_contains(&result, "BoxGeometry");
}

#[tokio::test]
async fn vendor_subpath_imports_use_the_package_asset() {
    let mut orchestrator = rolldown_orchestrator();
    let request = BuildRequest::new(Framework::ThreeJs, "/src/index.js")
        .file(
            "/src/index.js",
            r#"
import { createRoot } from 'react-dom/client';
import { createElement } from 'react';

createRoot(document.getElementById('root')).render(createElement('div'));
"#,
        )
        .with_metafile(true);

    let result = orchestrator.build(request).await;
    assert_bundle_contains(&result, "ReactDom");
    assert_bundle_contains(&result, "createRoot");

    let code = result.bundle_code.as_deref().unwrap();
    assert!(!code.contains("react-dom/client"), "subpath must not survive: {}", code);

    let metafile = result.metafile.expect("metafile requested");
    let modules = metafile["modules"].as_array().unwrap();
    assert!(modules.iter().all(|m| !m.as_str().unwrap().contains("react-dom")));
}

#[tokio::test]
async fn defines_replace_identifiers() {
    let mut orchestrator = rolldown_orchestrator();
    let request = BuildRequest::new(Framework::BabylonJs, "/index.js")
        .file("/index.js", "console.log(process.env.NODE_ENV, __SCENE_NAME__);")
        .define("__SCENE_NAME__", "\"orbit-demo\"");

    let result = orchestrator.build(request).await;
    assert_bundle_contains(&result, "production");
    assert_bundle_contains(&result, "orbit-demo");
    let code = result.bundle_code.unwrap();
    assert!(!code.contains("process.env.NODE_ENV"));
}

#[tokio::test]
async fn missing_relative_import_names_the_looked_up_path() {
    let mut orchestrator = rolldown_orchestrator();
    let request = BuildRequest::new(Framework::ThreeJs, "/src/index.js")
        .file("/src/index.js", "import './missing';");

    let result = orchestrator.build(request).await;
    assert_error_mentions(&result, "/src/missing");
    assert_error_mentions(&result, "file not found in virtual file system");
}

#[tokio::test]
async fn unknown_bare_import_is_reported() {
    let mut orchestrator = rolldown_orchestrator();
    let request = BuildRequest::new(Framework::AFrame, "/src/index.js")
        .file("/src/index.js", "import _ from 'lodash';\nconsole.log(_);");

    let result = orchestrator.build(request).await;
    assert_error_mentions(&result, "lodash");
    assert_eq!(orchestrator.stats().cache_size, 0);
}

#[tokio::test]
async fn missing_entry_never_reaches_the_engine() {
    let mut orchestrator = rolldown_orchestrator();
    let request = BuildRequest::new(Framework::ThreeJs, "/src/index.js")
        .file("/src/app.js", "console.log('app');");

    let result = orchestrator.build(request).await;
    assert_error_mentions(&result, "/src/index.js");
    assert_eq!(result.errors.len(), 1);
}

#[tokio::test]
async fn syntax_errors_fail_the_build() {
    let mut orchestrator = rolldown_orchestrator();
    let request = BuildRequest::new(Framework::ThreeJs, "/src/index.js")
        .file("/src/index.js", "const = 1;");

    let result = orchestrator.build(request).await;
    assert_eq!(result.status, BuildStatus::Error);
    assert!(result.bundle_code.is_none());
    assert!(
        result.errors[0].starts_with("/src/index.js:1:"),
        "error should point at the virtual path: {:?}",
        result.errors
    );

    // Failures are never cached.
    let again = orchestrator
        .build(
            BuildRequest::new(Framework::ThreeJs, "/src/index.js").file("/src/index.js", "const = 1;"),
        )
        .await;
    assert!(!again.from_cache);
}

#[tokio::test]
async fn metafile_lists_modules_and_externals() {
    let mut orchestrator = rolldown_orchestrator();
    let request = BuildRequest::new(Framework::ThreeJs, "/src/index.js")
        .file("/src/index.js", "import { Scene } from 'three';\nimport './util.js';\nnew Scene();")
        .file("/src/util.js", "console.log('util');")
        .with_metafile(true);

    let result = orchestrator.build(request).await;
    assert!(result.is_ok(), "{:?}", result.errors);

    let metafile = result.metafile.expect("metafile requested");
    assert_eq!(metafile["entry"], "/src/index.js");
    let modules = metafile["modules"].as_array().unwrap();
    assert!(modules.iter().any(|m| m.as_str().unwrap().ends_with("util.js")));
}

#[tokio::test]
async fn minified_output_is_smaller() {
    let source = r#"
function computeOrbitRadius(distanceFromCenter, scaleFactor) {
    const adjustedDistance = distanceFromCenter * scaleFactor;
    return adjustedDistance;
}
console.log(computeOrbitRadius(10, 2));
"#;
    let mut orchestrator = rolldown_orchestrator();
    let plain = orchestrator
        .build(BuildRequest::new(Framework::ThreeJs, "/a.js").file("/a.js", source))
        .await;
    let minified = orchestrator
        .build(BuildRequest::new(Framework::ThreeJs, "/a.js").file("/a.js", source).minify(true))
        .await;

    assert!(plain.is_ok() && minified.is_ok());
    assert!(!minified.from_cache);
    assert!(
        minified.bytes < plain.bytes,
        "minified {} bytes, plain {} bytes",
        minified.bytes,
        plain.bytes
    );
}
